//! Quote lookup against the Stooq CSV endpoint.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{QuoteError, QuoteSource, StockQuote};

pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://stooq.com/q/l/";
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Field selection: symbol, date, time, open, high, low, close, volume
const FIELDS: &str = "sd2t2ohlcv";

pub struct StooqQuoteSource {
    client: reqwest::Client,
    endpoint: String,
}

impl StooqQuoteSource {
    /// Build a quote source whose requests are bounded by `timeout`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuoteError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl QuoteSource for StooqQuoteSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<StockQuote, QuoteError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("s", symbol), ("f", FIELDS), ("h", ""), ("e", "csv")])
            .send()
            .await
            .map_err(|e| QuoteError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Quote request for '{}' failed with status {}", symbol, status);
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Request(e.to_string()))?;
        tracing::debug!("Quote body for '{}': {}", symbol, body.trim());

        StockQuote::parse_csv(&body)
    }
}
