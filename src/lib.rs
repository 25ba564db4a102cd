pub mod application;
pub mod domain;
mod error;
pub mod infrastructure;

pub use application::Resolver;
pub use application::dto::ResolverConfig;
pub use application::registry::{global, init};
pub use error::{DatabaseError, MagicParseError, Result};
pub use domain::entities::{GlobRule, MagicClause, MagicRule, MimeType};
pub use domain::repositories::{CommentSource, MimeBackend};
pub use domain::services::{GlobIndex, MagicIndex, TypeGraph};
pub use infrastructure::database::MimeDatabase;
