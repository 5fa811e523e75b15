//! Infrastructure layer: adapters implementing the domain ports.

pub mod dto;
pub mod queue;
pub mod quote;
pub mod repository;
