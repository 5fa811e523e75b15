//! Utilities shared by the quoteroom crates: logging setup and time helpers.

pub mod logger;
pub mod time;
