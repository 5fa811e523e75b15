//! Classification of inbound text into plain chat or a bot command.

/// Reserved prefix that turns a chat message into a quote command
pub const STOCK_COMMAND_PREFIX: &str = "/stock=";

const MAX_SYMBOL_LENGTH: usize = 16;

/// Result of classifying a message once at the connection boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Plain,
    StockQuote { symbol: String },
}

impl MessageKind {
    /// Classify a normalized message text.
    ///
    /// Text starting with [`STOCK_COMMAND_PREFIX`] followed by a usable ticker
    /// symbol is a command; anything else, including a bare prefix, is plain chat.
    pub fn classify(text: &str) -> Self {
        let Some(rest) = text.strip_prefix(STOCK_COMMAND_PREFIX) else {
            return Self::Plain;
        };

        let symbol = rest.trim();
        if is_valid_symbol(symbol) {
            Self::StockQuote {
                symbol: symbol.to_string(),
            }
        } else {
            Self::Plain
        }
    }
}

fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LENGTH
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '_'))
}
