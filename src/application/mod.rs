//! Application layer
//!
//! The resolver use case, its configuration and the process-wide database.

pub mod dto;
pub mod registry;
mod resolver;

pub use resolver::Resolver;
