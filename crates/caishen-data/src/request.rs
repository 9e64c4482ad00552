//! History request builder for the market-data vendor.

use std::collections::BTreeMap;

use caishen_core::error::DataError;
use caishen_core::types::{DateRange, StockInterval};
use serde::Serialize;
use tracing::debug;

/// Most tickers a single history request may carry.
pub const MAX_TICKERS: usize = 10;

/// Environment variables the request is assembled from: host, endpoint, token.
pub const REQUIRED_ENV_VARS: [&str; 3] = ["RAPIDAPI_HOST", "RAPIDAPI_ENDPOINT", "RAPID_API_TOKEN"];

const API_KEY_HEADER: &str = "x-rapidapi-key";
const API_HOST_HEADER: &str = "x-rapidapi-host";

/// A fully assembled vendor request. Sending it is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

impl HistoryRequest {
    /// Copy of the request with the API key masked, for printing.
    pub fn redacted(&self) -> Self {
        let mut request = self.clone();
        if let Some(key) = request.headers.get_mut(API_KEY_HEADER) {
            *key = "***".to_string();
        }
        request
    }
}

/// Builder for [`HistoryRequest`].
#[derive(Debug, Clone)]
pub struct HistoryRequestBuilder {
    tickers: Vec<String>,
    range: DateRange,
    interval: StockInterval,
    env_names: [String; 3],
}

impl Default for HistoryRequestBuilder {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            range: DateRange::default(),
            interval: StockInterval::default(),
            env_names: REQUIRED_ENV_VARS.map(String::from),
        }
    }
}

impl HistoryRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read host, endpoint and token from differently named variables.
    pub fn env_names(
        mut self,
        host: impl Into<String>,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.env_names = [host.into(), endpoint.into(), token.into()];
        self
    }

    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn interval(mut self, interval: StockInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Build the request from the process environment.
    pub fn build(&self) -> Result<HistoryRequest, DataError> {
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Build the request, resolving environment variables through `lookup`.
    pub fn build_with<F>(&self, lookup: F) -> Result<HistoryRequest, DataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.tickers.is_empty() || self.tickers.len() > MAX_TICKERS {
            return Err(DataError::InvalidRequest(format!(
                "The requested number of tickers is not between 1 and {}",
                MAX_TICKERS
            )));
        }

        let require = |name: &str| lookup(name).ok_or_else(|| DataError::MissingEnvVar(name.to_string()));
        let [host_var, endpoint_var, token_var] = &self.env_names;
        let host = require(host_var.as_str())?;
        let endpoint = require(endpoint_var.as_str())?;
        let token = require(token_var.as_str())?;

        let headers = BTreeMap::from([
            (API_KEY_HEADER.to_string(), token),
            (API_HOST_HEADER.to_string(), host.clone()),
        ]);
        let query = BTreeMap::from([
            ("symbols".to_string(), self.tickers.join(",")),
            ("range".to_string(), self.range.as_str().to_string()),
            ("interval".to_string(), self.interval.as_str().to_string()),
        ]);

        debug!(
            tickers = self.tickers.len(),
            range = %self.range,
            interval = %self.interval,
            "Built history request"
        );

        Ok(HistoryRequest {
            url: format!("https://{}/{}", host, endpoint),
            headers,
            query,
        })
    }
}
