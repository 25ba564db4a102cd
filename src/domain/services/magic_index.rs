//! Magic index service
//!
//! Holds the content signatures of a `magic` database in evaluation order
//! and finds the first one matching a buffer.

use crate::domain::entities::{MagicRule, MimeType};

/// Content rules sorted by descending priority
///
/// Rules of equal priority keep the order they were loaded in, so results
/// are reproducible.
#[derive(Debug, Default)]
pub struct MagicIndex {
    rules: Vec<MagicRule>,
    sample_size: usize,
}

impl MagicIndex {
    pub fn new(mut rules: Vec<MagicRule>) -> Self {
        rules.sort_by(|a, b| b.priority().cmp(&a.priority()));
        let sample_size = rules.iter().map(MagicRule::extent).max().unwrap_or(0);
        Self { rules, sample_size }
    }

    pub fn rules(&self) -> &[MagicRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of leading content bytes needed to evaluate every rule
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Finds the highest-priority rule matching `data`
    pub fn find(&self, data: &[u8]) -> Option<&MagicRule> {
        let rule = self.rules.iter().find(|rule| rule.matches(data))?;
        tracing::trace!(mime = %rule.mime(), priority = rule.priority(), "magic match");
        Some(rule)
    }

    /// Returns the type of the highest-priority matching rule
    pub fn match_content(&self, data: &[u8]) -> Option<&MimeType> {
        self.find(data).map(MagicRule::mime)
    }
}
