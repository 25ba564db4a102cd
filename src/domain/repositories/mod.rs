//! Repository traits (ports)
//!
//! Interfaces implemented by the infrastructure layer.

mod backend;

pub use backend::{CommentSource, MimeBackend, NoComments};
