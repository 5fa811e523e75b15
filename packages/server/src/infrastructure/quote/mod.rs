//! Quote source adapters.

pub mod stooq;

pub use stooq::StooqQuoteSource;
