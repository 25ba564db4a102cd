//! Domain entities
//!
//! The rule and type values every index and the resolver operate on.

mod glob_rule;
mod magic_rule;
mod mime_type;

pub use glob_rule::{GlobKind, GlobRule};
pub use magic_rule::{MagicClause, MagicRule};
pub use mime_type::MimeType;
