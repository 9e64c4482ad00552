//! Loosely-typed indicator requests.
//!
//! Configuration files and the command line describe indicators as JSON-like
//! values, either a bare name (`"rsi"`) or a table with parameters
//! (`{ kind = "sma", lookback = 20 }`). This module checks parameter kinds
//! and evaluates the resulting indicator against a price series.
//!
//! A parameter of the wrong kind (a fractional lookback, a string smoothing
//! factor, a MACD lookback that is not a pair) is a `TypeMismatch`; a value
//! of the right kind but out of range is `InvalidInput`.

use caishen_core::error::{IndicatorError, IndicatorResult};
use caishen_core::traits::{HlcIndicator, Indicator, MultiOutputIndicator};
use caishen_core::types::{PriceSeries, Series};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::momentum::{Macd, Rsi, Stochastic};
use crate::moving_average::{Ema, Sma};
use crate::retracement::{FibonacciRetracement, DEFAULT_FIBONACCI_LEVELS};
use crate::volatility::BollingerBands;

/// A validated indicator request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndicatorRequest {
    Sma {
        lookback: usize,
    },
    Ema {
        lookback: usize,
        smoothing: f64,
    },
    Bollinger {
        lookback: usize,
        multiplier: f64,
    },
    Fibonacci {
        levels: Vec<f64>,
    },
    Stochastic {
        k_lookback: usize,
        d_lookback: usize,
    },
    Macd {
        lookback: (usize, usize),
        smoothing: (f64, f64),
        signal_lookback: usize,
        signal_smoothing: f64,
    },
    Rsi {
        lookback: usize,
    },
}

/// One named line of an evaluated indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLine {
    pub name: String,
    pub values: Series,
}

/// Evaluated indicator, keyed by its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOutput {
    pub name: String,
    pub lines: Vec<NamedLine>,
}

impl IndicatorOutput {
    fn single(name: String, values: Series) -> Self {
        Self {
            lines: vec![NamedLine {
                name: name.clone(),
                values,
            }],
            name,
        }
    }

    fn multi(name: String, lines: Vec<(&str, Series)>) -> Self {
        let lines = lines
            .into_iter()
            .map(|(suffix, values)| NamedLine {
                name: format!("{} {}", name, suffix),
                values,
            })
            .collect();
        Self { name, lines }
    }
}

/// Catalog entry describing a supported indicator.
#[derive(Debug, Clone)]
pub struct IndicatorInfo {
    pub kind: &'static str,
    pub description: &'static str,
    pub defaults: IndicatorRequest,
}

impl IndicatorRequest {
    /// Every supported indicator with its default parameters.
    pub fn catalog() -> Vec<IndicatorInfo> {
        let describe = |kind: &'static str, description: &'static str| IndicatorInfo {
            kind,
            description,
            defaults: Self::defaults(kind).unwrap_or(IndicatorRequest::Sma {
                lookback: Sma::DEFAULT_LOOKBACK,
            }),
        };

        vec![
            describe("sma", "Simple moving average of closing prices"),
            describe("ema", "Exponential moving average seeded with the first window's mean"),
            describe("bollinger", "Middle band SMA with bands at +/- k population standard deviations"),
            describe("fibonacci", "Retracement levels between the first and last close"),
            describe("stochastic", "%K of close within the high/low window and its %D SMA"),
            describe("macd", "Fast minus slow EMA and its EMA signal line"),
            describe("rsi", "Relative strength index from SMA-averaged gains and losses"),
        ]
    }

    /// Request for `kind` with default parameters.
    pub fn defaults(kind: &str) -> IndicatorResult<Self> {
        Self::from_params(kind, &Map::new())
    }

    /// Parse a request from a bare name or a parameter table.
    pub fn from_value(value: &Value) -> IndicatorResult<Self> {
        match value {
            Value::String(kind) => Self::defaults(kind),
            Value::Object(params) => {
                let kind = match params.get("kind") {
                    Some(Value::String(kind)) => kind.as_str(),
                    Some(other) => {
                        return Err(IndicatorError::TypeMismatch(format!(
                            "The indicator kind is expected to be a string but it is {}",
                            other
                        )))
                    }
                    None => {
                        return Err(IndicatorError::InvalidInput(
                            "The indicator table is missing its \"kind\"".to_string(),
                        ))
                    }
                };
                Self::from_params(kind, params)
            }
            other => Err(IndicatorError::TypeMismatch(format!(
                "An indicator is expected to be a name or a table but it is {}",
                other
            ))),
        }
    }

    fn from_params(kind: &str, params: &Map<String, Value>) -> IndicatorResult<Self> {
        let request = match kind.to_ascii_lowercase().as_str() {
            "sma" => IndicatorRequest::Sma {
                lookback: lookback_param(params, "lookback", Sma::DEFAULT_LOOKBACK)?,
            },
            "ema" => IndicatorRequest::Ema {
                lookback: lookback_param(params, "lookback", Ema::DEFAULT_LOOKBACK)?,
                smoothing: float_param(params, "smoothing", Ema::DEFAULT_SMOOTHING)?,
            },
            "bollinger" | "bollinger_bands" => IndicatorRequest::Bollinger {
                lookback: lookback_param(params, "lookback", BollingerBands::DEFAULT_LOOKBACK)?,
                multiplier: float_param(params, "multiplier", BollingerBands::DEFAULT_MULTIPLIER)?,
            },
            "fibonacci" => IndicatorRequest::Fibonacci {
                levels: levels_param(params, "levels")?,
            },
            "stochastic" | "so" => IndicatorRequest::Stochastic {
                k_lookback: lookback_param(params, "k_lookback", Stochastic::DEFAULT_K_LOOKBACK)?,
                d_lookback: lookback_param(params, "d_lookback", Stochastic::DEFAULT_D_LOOKBACK)?,
            },
            "macd" => IndicatorRequest::Macd {
                lookback: pair_param(params, "lookback", Macd::DEFAULT_LOOKBACK, as_lookback)?,
                smoothing: pair_param(
                    params,
                    "smoothing",
                    (Ema::DEFAULT_SMOOTHING, Ema::DEFAULT_SMOOTHING),
                    as_float,
                )?,
                signal_lookback: lookback_param(
                    params,
                    "signal_lookback",
                    Macd::DEFAULT_SIGNAL_LOOKBACK,
                )?,
                signal_smoothing: float_param(params, "signal_smoothing", Ema::DEFAULT_SMOOTHING)?,
            },
            "rsi" => IndicatorRequest::Rsi {
                lookback: lookback_param(params, "lookback", Rsi::DEFAULT_LOOKBACK)?,
            },
            other => {
                return Err(IndicatorError::InvalidInput(format!(
                    "Unknown indicator: {}",
                    other
                )))
            }
        };
        Ok(request)
    }

    /// Short machine name, e.g. `"macd"`.
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorRequest::Sma { .. } => "sma",
            IndicatorRequest::Ema { .. } => "ema",
            IndicatorRequest::Bollinger { .. } => "bollinger",
            IndicatorRequest::Fibonacci { .. } => "fibonacci",
            IndicatorRequest::Stochastic { .. } => "stochastic",
            IndicatorRequest::Macd { .. } => "macd",
            IndicatorRequest::Rsi { .. } => "rsi",
        }
    }

    /// Display label including parameters, e.g. `"SMA(20)"`.
    pub fn label(&self) -> String {
        match self {
            IndicatorRequest::Sma { lookback } => format!("SMA({})", lookback),
            IndicatorRequest::Ema { lookback, .. } => format!("EMA({})", lookback),
            IndicatorRequest::Bollinger { lookback, multiplier } => {
                format!("BB({}, {})", lookback, multiplier)
            }
            IndicatorRequest::Fibonacci { .. } => "Fibonacci".to_string(),
            IndicatorRequest::Stochastic {
                k_lookback,
                d_lookback,
            } => format!("SO({}, {})", k_lookback, d_lookback),
            IndicatorRequest::Macd {
                lookback,
                signal_lookback,
                ..
            } => format!("MACD({}, {}, {})", lookback.0, lookback.1, signal_lookback),
            IndicatorRequest::Rsi { lookback } => format!("RSI({})", lookback),
        }
    }

    /// Evaluate against a price series.
    ///
    /// Single-series indicators read closing prices; the stochastic
    /// oscillator reads highs, lows and closes. Fibonacci levels span the
    /// first to the last close and are emitted as flat lines.
    pub fn evaluate(&self, series: &PriceSeries) -> IndicatorResult<IndicatorOutput> {
        let closes = series.closes();
        let label = self.label();

        let output = match self {
            IndicatorRequest::Sma { lookback } => {
                IndicatorOutput::single(label, Sma::new(*lookback)?.calculate(&closes)?)
            }
            IndicatorRequest::Ema {
                lookback,
                smoothing,
            } => IndicatorOutput::single(
                label,
                Ema::with_smoothing(*lookback, *smoothing)?.calculate(&closes)?,
            ),
            IndicatorRequest::Bollinger {
                lookback,
                multiplier,
            } => {
                let bands = BollingerBands::with_params(*lookback, *multiplier)?.calculate(&closes)?;
                IndicatorOutput::multi(
                    label,
                    vec![
                        ("lower", bands.lower),
                        ("middle", bands.middle),
                        ("upper", bands.upper),
                    ],
                )
            }
            IndicatorRequest::Fibonacci { levels } => {
                let retracement = FibonacciRetracement::new(levels.clone())?;
                let (first, last) = match (series.first(), series.last()) {
                    (Some(first), Some(last)) => (first.close, last.close),
                    _ => return Err(IndicatorError::empty_values()),
                };
                let prices = retracement.calculate(first, last)?;
                let lines = levels
                    .iter()
                    .zip(prices)
                    .map(|(level, price)| NamedLine {
                        name: format!("{} {:.1}%", label, level * 100.0),
                        values: vec![Some(price); closes.len()],
                    })
                    .collect();
                IndicatorOutput { name: label, lines }
            }
            IndicatorRequest::Stochastic {
                k_lookback,
                d_lookback,
            } => {
                let output = Stochastic::with_lookbacks(*k_lookback, *d_lookback)?.calculate_hlc(
                    &series.highs(),
                    &series.lows(),
                    &closes,
                )?;
                IndicatorOutput::multi(label, vec![("%K", output.k), ("%D", output.d)])
            }
            IndicatorRequest::Macd {
                lookback,
                smoothing,
                signal_lookback,
                signal_smoothing,
            } => {
                let output = Macd::with_params(*lookback, *smoothing, *signal_lookback, *signal_smoothing)?
                    .calculate(&closes)?;
                IndicatorOutput::multi(label, vec![("line", output.macd), ("signal", output.signal)])
            }
            IndicatorRequest::Rsi { lookback } => {
                IndicatorOutput::single(label, Rsi::new(*lookback)?.calculate(&closes)?)
            }
        };

        Ok(output)
    }
}

fn as_lookback(name: &str, value: &Value) -> IndicatorResult<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).map_err(|_| {
            IndicatorError::InvalidInput(format!("The {} value {} is too large", name, n))
        });
    }
    if let Some(n) = value.as_i64() {
        return Err(IndicatorError::InvalidInput(format!(
            "The {} value has to be a non negative integer, but it is set to {}",
            name, n
        )));
    }
    Err(IndicatorError::TypeMismatch(format!(
        "The {} is expected to be an int, but it is {}",
        name, value
    )))
}

fn as_float(name: &str, value: &Value) -> IndicatorResult<f64> {
    value.as_f64().ok_or_else(|| {
        IndicatorError::TypeMismatch(format!(
            "The {} value is expected to be a float, but it is {}",
            name, value
        ))
    })
}

fn lookback_param(params: &Map<String, Value>, name: &str, default: usize) -> IndicatorResult<usize> {
    params
        .get(name)
        .map_or(Ok(default), |value| as_lookback(name, value))
}

fn float_param(params: &Map<String, Value>, name: &str, default: f64) -> IndicatorResult<f64> {
    params
        .get(name)
        .map_or(Ok(default), |value| as_float(name, value))
}

fn pair_param<T>(
    params: &Map<String, Value>,
    name: &str,
    default: (T, T),
    parse: fn(&str, &Value) -> IndicatorResult<T>,
) -> IndicatorResult<(T, T)> {
    match params.get(name) {
        None => Ok(default),
        Some(Value::Array(items)) if items.len() == 2 => {
            Ok((parse(name, &items[0])?, parse(name, &items[1])?))
        }
        Some(other) => Err(IndicatorError::TypeMismatch(format!(
            "The {} is expected to be a pair but it is {}",
            name, other
        ))),
    }
}

fn levels_param(params: &Map<String, Value>, name: &str) -> IndicatorResult<Vec<f64>> {
    match params.get(name) {
        None => Ok(DEFAULT_FIBONACCI_LEVELS.to_vec()),
        Some(Value::Array(items)) => items.iter().map(|item| as_float(name, item)).collect(),
        Some(other) => Err(IndicatorError::TypeMismatch(format!(
            "The {} are expected to be a list but it is {}",
            name, other
        ))),
    }
}
