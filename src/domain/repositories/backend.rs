//! Backend traits
//!
//! Ports for the pieces of MIME lookup that live outside the resolution
//! engine: the lookup backend itself and the source of descriptions.

use crate::domain::entities::MimeType;

/// A source of MIME type information
///
/// The database-file backend is the only implementation in this crate;
/// platform registries would provide their own.
pub trait MimeBackend: Send + Sync {
    /// Type of a file, judged by name alone
    fn resolve_by_name(&self, name: &str) -> MimeType;

    /// Type of a file, judged by a prefix of its content and its full size
    fn resolve_by_content(&self, data: &[u8], size_hint: u64) -> MimeType;

    /// Human-readable description of `mime` in `lang`, if one exists
    fn comment(&self, mime: &MimeType, lang: &str) -> Option<String>;

    /// Icon name for `mime`
    fn icon(&self, mime: &MimeType) -> String;
}

/// Supplies type descriptions, e.g. from the XML catalogs of a MIME database
pub trait CommentSource: Send + Sync {
    /// Looks up the description of `mime` in `lang`
    fn load_comment(&self, mime: &MimeType, lang: &str) -> Option<String>;
}

/// A comment source that knows no descriptions
#[derive(Debug, Default, Clone, Copy)]
pub struct NoComments;

impl CommentSource for NoComments {
    fn load_comment(&self, _mime: &MimeType, _lang: &str) -> Option<String> {
        None
    }
}
