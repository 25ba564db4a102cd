//! Domain services
//!
//! Rule indices and the type hierarchy.

mod glob_index;
mod magic_index;
mod type_graph;

pub use glob_index::GlobIndex;
pub use magic_index::MagicIndex;
pub use type_graph::TypeGraph;
