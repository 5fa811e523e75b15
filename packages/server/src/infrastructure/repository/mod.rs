//! Persistence adapters.

pub mod inmemory;

pub use inmemory::InMemoryChatRepository;
