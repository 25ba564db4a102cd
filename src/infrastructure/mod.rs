//! Infrastructure layer
//!
//! Adapters that read the on-disk MIME database.

pub mod database;
