//! Stock quote lookup port and the CSV format quotes arrive in.

use async_trait::async_trait;

use super::QuoteError;

/// Columns of a quote row: Symbol,Date,Time,Open,High,Low,Close,Volume
const QUOTE_COLUMNS: usize = 8;
const CLOSE_COLUMN: usize = 6;
const MISSING_VALUE: &str = "N/D";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQuote {
    pub symbol: String,
    pub date: String,
    pub time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl StockQuote {
    /// Parse a CSV body with a header row followed by one quote row.
    ///
    /// When several data rows are present the last one wins.
    pub fn parse_csv(body: &str) -> Result<Self, QuoteError> {
        let mut lines = body.lines().map(str::trim).filter(|line| !line.is_empty());

        lines
            .next()
            .ok_or_else(|| QuoteError::Malformed("empty body".to_string()))?;

        let row = lines
            .last()
            .ok_or_else(|| QuoteError::Malformed("missing quote row".to_string()))?;

        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() < QUOTE_COLUMNS {
            return Err(QuoteError::Malformed(format!(
                "expected {} columns, got {}",
                QUOTE_COLUMNS,
                fields.len()
            )));
        }

        if fields[CLOSE_COLUMN] == MISSING_VALUE || fields[CLOSE_COLUMN].is_empty() {
            return Err(QuoteError::Unavailable(fields[0].to_string()));
        }

        Ok(Self {
            symbol: fields[0].to_string(),
            date: fields[1].to_string(),
            time: fields[2].to_string(),
            open: fields[3].to_string(),
            high: fields[4].to_string(),
            low: fields[5].to_string(),
            close: fields[CLOSE_COLUMN].to_string(),
            volume: fields[7].to_string(),
        })
    }

    /// Chat line announcing this quote
    pub fn announcement(&self) -> String {
        format!("{} quote is ${} per share", self.symbol, self.close)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, symbol: &str) -> Result<StockQuote, QuoteError>;
}
