//! Glob index service
//!
//! Maps file names to MIME types using the rules of a `globs2` database.
//! Literal names and simple `*.ext` patterns are looked up in hash tables;
//! everything else is matched one pattern at a time.

use crate::domain::entities::{GlobKind, GlobRule, MimeType};
use glob::{Pattern, PatternError};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Index of filename rules
///
/// # Example
///
/// ```
/// use sharedmime::domain::entities::{GlobRule, MimeType};
/// use sharedmime::domain::services::GlobIndex;
///
/// let mut index = GlobIndex::new();
/// index.insert(GlobRule::new(50, MimeType::new("text/plain"), "*.txt")).unwrap();
/// assert_eq!(index.match_name("notes.TXT").unwrap(), "text/plain");
/// assert!(index.match_name("notes.rs").is_none());
/// ```
#[derive(Debug, Default)]
pub struct GlobIndex {
    literals: HashMap<String, GlobRule>,
    extensions: HashMap<String, GlobRule>,
    wildcards: Vec<(GlobRule, Pattern)>,
}

impl GlobIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a sequence of rules
    pub fn from_rules(rules: impl IntoIterator<Item = GlobRule>) -> Result<Self, PatternError> {
        let mut index = Self::new();
        for rule in rules {
            index.insert(rule)?;
        }
        Ok(index)
    }

    /// Adds a rule
    ///
    /// A literal or extension registered twice keeps the heavier rule, or
    /// the first one when weights are equal.
    pub fn insert(&mut self, rule: GlobRule) -> Result<(), PatternError> {
        match rule.kind() {
            GlobKind::Literal => {
                keep_heaviest(self.literals.entry(rule.pattern().to_string()), rule)
            }
            GlobKind::Extension(suffix) => {
                keep_heaviest(self.extensions.entry(suffix.to_lowercase()), rule)
            }
            GlobKind::Wildcard => {
                let pattern = compile(rule.pattern())?;
                self.wildcards.push((rule, pattern));
            }
        }
        Ok(())
    }

    /// Returns the total number of rules
    pub fn len(&self) -> usize {
        self.literals.len() + self.extensions.len() + self.wildcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the rule that decides the type of `name`
    pub fn find(&self, name: &str) -> Option<&GlobRule> {
        if let Some(rule) = self.literals.get(name) {
            return Some(rule);
        }

        if let Some(rule) = self.find_extension(name) {
            return Some(rule);
        }

        let lowered = name.to_lowercase();
        self.wildcards
            .iter()
            .filter(|(rule, pattern)| {
                pattern.matches(name) || (!rule.is_case_sensitive() && pattern.matches(&lowered))
            })
            .map(|(rule, _)| rule)
            .fold(None, |best: Option<&GlobRule>, rule| match best {
                Some(current) if rank(rule) <= rank(current) => Some(current),
                _ => Some(rule),
            })
    }

    /// Returns the type for `name`, if any rule matches
    pub fn match_name(&self, name: &str) -> Option<&MimeType> {
        let rule = self.find(name)?;
        tracing::trace!(name, pattern = rule.pattern(), mime = %rule.mime(), "glob match");
        Some(rule.mime())
    }

    /// Longest registered suffix wins; each suffix is tried as-is, then lower-cased
    ///
    /// Keys are stored lower-cased, so the second lookup covers any casing.
    fn find_extension(&self, name: &str) -> Option<&GlobRule> {
        if self.extensions.is_empty() {
            return None;
        }
        name.match_indices('.').find_map(|(idx, _)| {
            let suffix = &name[idx..];
            self.extensions
                .get(suffix)
                .or_else(|| self.extensions.get(&suffix.to_lowercase()))
        })
    }
}

/// Compiles a filename pattern with fnmatch semantics
///
/// Runs of `*` mean the same as a single `*`. A pattern whose brackets do
/// not form a valid set is retried with every bracket taken literally.
fn compile(pattern: &str) -> Result<Pattern, PatternError> {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c != '*' || !collapsed.ends_with('*') {
            collapsed.push(c);
        }
    }

    Pattern::new(&collapsed).or_else(|err| {
        tracing::debug!(pattern, error = %err, "treating brackets literally");
        let mut literal = String::with_capacity(collapsed.len() + 8);
        for c in collapsed.chars() {
            match c {
                '[' => literal.push_str("[[]"),
                ']' => literal.push_str("[]]"),
                _ => literal.push(c),
            }
        }
        Pattern::new(&literal)
    })
}

fn rank(rule: &GlobRule) -> (u32, usize) {
    (rule.weight(), rule.pattern().len())
}

fn keep_heaviest(entry: Entry<'_, String, GlobRule>, rule: GlobRule) {
    match entry {
        Entry::Occupied(mut slot) => {
            if rule.weight() > slot.get().weight() {
                slot.insert(rule);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(weight: u32, mime: &str, pattern: &str) -> GlobRule {
        GlobRule::new(weight, MimeType::new(mime), pattern)
    }

    fn index(rules: Vec<GlobRule>) -> GlobIndex {
        GlobIndex::from_rules(rules).unwrap()
    }

    #[test]
    fn test_literal_beats_pattern() {
        let idx = index(vec![
            rule(90, "text/x-readme", "Make*"),
            rule(50, "text/x-makefile", "Makefile"),
        ]);
        assert_eq!(idx.match_name("Makefile").unwrap(), "text/x-makefile");
        assert_eq!(idx.match_name("Makefile.am").unwrap(), "text/x-readme");
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        let idx = index(vec![rule(50, "text/x-makefile", "Makefile")]);
        assert!(idx.match_name("makefile").is_none());
    }

    #[test]
    fn test_longest_extension_wins() {
        let idx = index(vec![
            rule(50, "application/gzip", "*.gz"),
            rule(50, "application/x-compressed-tar", "*.tar.gz"),
        ]);
        assert_eq!(idx.match_name("x.tar.gz").unwrap(), "application/x-compressed-tar");
        assert_eq!(idx.match_name("x.gz").unwrap(), "application/gzip");
    }

    #[test]
    fn test_extension_case_fallback() {
        let idx = index(vec![rule(50, "text/plain", "*.txt")]);
        assert_eq!(idx.match_name("foo.txt").unwrap(), "text/plain");
        assert_eq!(idx.match_name("foo.TXT").unwrap(), "text/plain");
    }

    #[test]
    fn test_uppercase_extension_rule_ignores_case() {
        let idx = index(vec![rule(50, "image/x-targa", "*.TGA")]);
        assert_eq!(idx.match_name("shot.tga").unwrap(), "image/x-targa");
        assert_eq!(idx.match_name("shot.TGA").unwrap(), "image/x-targa");
    }

    #[test]
    fn test_wildcard_tie_break_on_length() {
        let idx = index(vec![
            rule(50, "text/x-short", "*.[ch]"),
            rule(50, "text/x-long", "*.tab.[ch]"),
        ]);
        assert_eq!(idx.match_name("parser.tab.c").unwrap(), "text/x-long");
        assert_eq!(idx.match_name("parser.c").unwrap(), "text/x-short");
    }

    #[test]
    fn test_wildcard_weight_beats_length() {
        let idx = index(vec![
            rule(80, "text/x-heavy", "*.[ch]"),
            rule(50, "text/x-long", "*.tab.[ch]"),
        ]);
        assert_eq!(idx.match_name("parser.tab.c").unwrap(), "text/x-heavy");
    }

    #[test]
    fn test_wildcard_first_rule_wins_full_tie() {
        let idx = index(vec![rule(50, "text/x-one", "a?c"), rule(50, "text/x-two", "?bc")]);
        assert_eq!(idx.match_name("abc").unwrap(), "text/x-one");
    }

    #[test]
    fn test_case_sensitive_rule() {
        let idx = index(vec![rule(50, "text/x-c++src", "*.C").case_sensitive(true)]);
        assert_eq!(idx.match_name("main.C").unwrap(), "text/x-c++src");
        assert!(idx.match_name("main.c").is_none());
    }

    #[test]
    fn test_extension_table_precedes_case_sensitive_wildcard() {
        let idx = index(vec![
            rule(50, "text/x-c++src", "*.C").case_sensitive(true),
            rule(50, "text/x-csrc", "*.c"),
        ]);
        assert_eq!(idx.match_name("main.c").unwrap(), "text/x-csrc");
        assert_eq!(idx.match_name("main.C").unwrap(), "text/x-csrc");
    }

    #[test]
    fn test_case_sensitive_rule_skips_lowercase_retry() {
        let idx = index(vec![rule(50, "text/x-readme", "readme*").case_sensitive(true)]);
        assert!(idx.match_name("README").is_none());
        assert_eq!(idx.match_name("readme.md").unwrap(), "text/x-readme");
    }

    #[test]
    fn test_duplicate_extension_keeps_heaviest() {
        let idx = index(vec![
            rule(40, "text/x-light", "*.dup"),
            rule(60, "text/x-heavy", "*.dup"),
            rule(60, "text/x-later", "*.dup"),
        ]);
        assert_eq!(idx.match_name("a.dup").unwrap(), "text/x-heavy");
    }

    #[test]
    fn test_repeated_stars_act_as_one() {
        let idx = index(vec![rule(50, "text/x-ab", "a**b")]);
        assert_eq!(idx.match_name("ab").unwrap(), "text/x-ab");
        assert_eq!(idx.match_name("a-long-b").unwrap(), "text/x-ab");
        assert!(idx.match_name("a-long-c").is_none());
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let idx = index(vec![rule(50, "text/x-bracket", "*[")]);
        assert_eq!(idx.match_name("odd[").unwrap(), "text/x-bracket");
        assert!(idx.match_name("odd").is_none());
    }

    #[test]
    fn test_no_match() {
        let idx = index(vec![rule(50, "text/plain", "*.txt")]);
        assert!(idx.find("archive.zip").is_none());
        assert!(GlobIndex::new().find("anything").is_none());
    }
}
