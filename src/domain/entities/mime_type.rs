//! MIME type entity
//!
//! A `media/subtype` identifier. The crate treats it as opaque apart from
//! the split at the first `/`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A MIME type identifier such as `text/plain`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeType(String);

impl MimeType {
    /// Fallback for content that looks textual
    pub const DEFAULT_TEXT: &'static str = "text/plain";
    /// Fallback for content that looks binary, and for unknown names
    pub const DEFAULT_BINARY: &'static str = "application/octet-stream";
    /// Type of files with no content at all
    pub const ZERO_SIZE: &'static str = "application/x-zerosize";

    /// Creates a MIME type from its string form
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn default_text() -> Self {
        Self::new(Self::DEFAULT_TEXT)
    }

    pub fn default_binary() -> Self {
        Self::new(Self::DEFAULT_BINARY)
    }

    pub fn zero_size() -> Self {
        Self::new(Self::ZERO_SIZE)
    }

    /// Returns the full `media/subtype` string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part before the `/`, or the whole name when there is none
    pub fn media_type(&self) -> &str {
        self.0.split_once('/').map_or(self.0.as_str(), |(media, _)| media)
    }

    /// Returns the part after the `/`, or an empty string when there is none
    pub fn subtype(&self) -> &str {
        self.0.split_once('/').map_or("", |(_, sub)| sub)
    }

    /// Returns the icon name for this type (`text/plain` becomes `text-plain`)
    pub fn icon(&self) -> String {
        self.0.replace('/', "-")
    }

    /// Returns the category-level generic type, e.g. `image/x-generic`
    pub fn generic_mime(&self) -> MimeType {
        MimeType(format!("{}/x-generic", self.media_type()))
    }

    /// Whether this is one of the two fallback types
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT_TEXT || self.0 == Self::DEFAULT_BINARY
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MimeType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MimeType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for MimeType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MimeType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MimeType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MimeType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
