//! Domain layer - rule model and matching
//!
//! Entities, the glob/magic/type-graph services, and the ports the
//! infrastructure layer implements.

pub mod entities;
pub mod repositories;
pub mod services;
