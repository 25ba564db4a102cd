//! Glob rule entity
//!
//! One line of a `globs2` database: a filename pattern mapped to a type.

use super::MimeType;

const WILDCARDS: [char; 3] = ['*', '?', '['];

/// How a pattern is stored inside the glob index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobKind {
    /// No wildcard at all, matched by exact name
    Literal,
    /// `*.ext` with a wildcard-free suffix; holds the suffix including the dot
    Extension(String),
    /// Anything else, matched with a full glob matcher
    Wildcard,
}

/// A filename pattern mapped to a MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobRule {
    weight: u32,
    mime: MimeType,
    pattern: String,
    case_sensitive: bool,
}

impl GlobRule {
    pub fn new(weight: u32, mime: MimeType, pattern: impl Into<String>) -> Self {
        Self {
            weight,
            mime,
            pattern: pattern.into(),
            case_sensitive: false,
        }
    }

    /// Marks the rule as case-sensitive-only (the `cs` flag)
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn mime(&self) -> &MimeType {
        &self.mime
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Classifies the pattern for indexing
    pub fn kind(&self) -> GlobKind {
        if !self.pattern.contains(WILDCARDS) {
            return GlobKind::Literal;
        }
        match self.pattern.strip_prefix('*') {
            Some(suffix)
                if suffix.starts_with('.') && !suffix.contains(WILDCARDS) && !self.case_sensitive =>
            {
                GlobKind::Extension(suffix.to_string())
            }
            _ => GlobKind::Wildcard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str) -> GlobRule {
        GlobRule::new(50, MimeType::new("text/plain"), pattern)
    }

    #[test]
    fn test_kind_literal() {
        assert_eq!(rule("Makefile").kind(), GlobKind::Literal);
    }

    #[test]
    fn test_kind_extension() {
        assert_eq!(rule("*.tar.gz").kind(), GlobKind::Extension(".tar.gz".into()));
    }

    #[test]
    fn test_kind_wildcard() {
        assert_eq!(rule("*.[ch]").kind(), GlobKind::Wildcard);
        assert_eq!(rule("README*").kind(), GlobKind::Wildcard);
        assert_eq!(rule("*~").kind(), GlobKind::Wildcard);
    }

    #[test]
    fn test_case_sensitive_extension_is_wildcard() {
        assert_eq!(rule("*.C").case_sensitive(true).kind(), GlobKind::Wildcard);
    }
}
