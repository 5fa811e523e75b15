//! Command queue adapters.

pub mod inmemory;

pub use inmemory::InMemoryCommandQueue;
