//! Technical indicators over price sequences.
//!
//! This crate provides the indicator engine:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD, Stochastic Oscillator)
//! - Volatility indicators (Bollinger Bands)
//! - Fibonacci retracement levels
//!
//! Every indicator returns a series as long as its input, with `None` in the
//! warm-up slots where the value is not yet defined. Window statistics go
//! through the SIMD kernels in [`simd`].

pub mod momentum;
pub mod moving_average;
pub mod request;
pub mod retracement;
pub mod simd;
pub mod volatility;

pub use momentum::{
    macd, rsi, stochastic, Macd, MacdOutput, Rsi, Stochastic, StochasticOutput, FLAT_RANGE_K,
    NO_LOSS_RSI,
};
pub use moving_average::{ema, sma, Ema, Sma};
pub use request::{IndicatorInfo, IndicatorOutput, IndicatorRequest, NamedLine};
pub use retracement::{fibonacci_retracements, FibonacciRetracement, DEFAULT_FIBONACCI_LEVELS};
pub use volatility::{bollinger_bands, BollingerBands, BollingerOutput};
