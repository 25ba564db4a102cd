//! Magic rule entity
//!
//! A content signature from the binary `magic` database. Each rule carries a
//! priority, the type it identifies, and a forest of byte-level clauses.
//! Top-level clauses are alternatives; nested clauses refine their parent.

use super::MimeType;
use memchr::memmem;

/// One byte-level test inside a magic rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicClause {
    offset: usize,
    value: Vec<u8>,
    mask: Option<Vec<u8>>,
    word_size: usize,
    range_length: usize,
    children: Vec<MagicClause>,
}

impl MagicClause {
    /// Creates a clause testing for `value` at exactly `offset`
    ///
    /// `value` (and any mask) must already be in the byte order the buffer
    /// will be compared in.
    pub fn new(offset: usize, value: Vec<u8>) -> Self {
        Self {
            offset,
            value,
            mask: None,
            word_size: 1,
            range_length: 1,
            children: Vec::new(),
        }
    }

    pub fn with_mask(mut self, mask: Vec<u8>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_word_size(mut self, word_size: usize) -> Self {
        self.word_size = word_size;
        self
    }

    /// Sets how many consecutive start positions are tried
    pub fn with_range(mut self, range_length: usize) -> Self {
        self.range_length = range_length.max(1);
        self
    }

    pub fn with_child(mut self, child: MagicClause) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn push_child(&mut self, child: MagicClause) {
        self.children.push(child);
    }

    pub(crate) fn last_child_mut(&mut self) -> Option<&mut MagicClause> {
        self.children.last_mut()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn mask(&self) -> Option<&[u8]> {
        self.mask.as_deref()
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    pub fn range_length(&self) -> usize {
        self.range_length
    }

    pub fn children(&self) -> &[MagicClause] {
        &self.children
    }

    /// Bytes of content needed to evaluate this clause and all of its children
    pub fn extent(&self) -> usize {
        let own = self.extent_own();
        self.children
            .iter()
            .map(MagicClause::extent)
            .fold(own, usize::max)
    }

    /// Whether this clause holds and, if it has children, any child holds too
    pub fn matches(&self, data: &[u8]) -> bool {
        self.test(data)
            && (self.children.is_empty() || self.children.iter().any(|c| c.matches(data)))
    }

    fn test(&self, data: &[u8]) -> bool {
        let len = self.value.len();
        let end = self.extent_own().min(data.len());
        let Some(region) = data.get(self.offset..end) else {
            return false;
        };
        if region.len() < len {
            return false;
        }
        if len == 0 {
            return true;
        }

        match &self.mask {
            None => memmem::find(region, &self.value).is_some(),
            Some(mask) => region.windows(len).any(|window| {
                window
                    .iter()
                    .zip(mask)
                    .zip(&self.value)
                    .all(|((byte, m), v)| byte & m == v & m)
            }),
        }
    }

    fn extent_own(&self) -> usize {
        self.offset
            .saturating_add(self.range_length - 1)
            .saturating_add(self.value.len())
    }
}

/// A prioritized set of clause trees identifying one MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicRule {
    priority: u8,
    mime: MimeType,
    clauses: Vec<MagicClause>,
}

impl MagicRule {
    pub fn new(priority: u8, mime: MimeType) -> Self {
        Self {
            priority,
            mime,
            clauses: Vec::new(),
        }
    }

    pub fn with_clause(mut self, clause: MagicClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn mime(&self) -> &MimeType {
        &self.mime
    }

    pub fn clauses(&self) -> &[MagicClause] {
        &self.clauses
    }

    pub(crate) fn clauses_mut(&mut self) -> &mut Vec<MagicClause> {
        &mut self.clauses
    }

    /// Bytes of content needed to evaluate every clause of this rule
    pub fn extent(&self) -> usize {
        self.clauses.iter().map(MagicClause::extent).max().unwrap_or(0)
    }

    /// Whether any top-level alternative matches the buffer
    pub fn matches(&self, data: &[u8]) -> bool {
        self.clauses.iter().any(|clause| clause.matches(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_offset() {
        let clause = MagicClause::new(1, b"PNG".to_vec());
        assert!(clause.matches(b"\x89PNG\r\n"));
        assert!(!clause.matches(b"PNG\r\n"));
    }

    #[test]
    fn test_range_scan() {
        let clause = MagicClause::new(0, b"AB".to_vec()).with_range(4);
        assert!(clause.matches(b"xxABxxxxxx"));
        assert!(clause.matches(b"xxxAB"));
        assert!(!clause.matches(b"xxxxAB"));
    }

    #[test]
    fn test_short_buffer_fails() {
        let clause = MagicClause::new(4, b"moov".to_vec());
        assert!(!clause.matches(b"\0\0\0\x20moo"));
        assert!(!clause.matches(b""));
    }

    #[test]
    fn test_mask_applies_to_both_sides() {
        let clause = MagicClause::new(0, vec![0xFF, 0xE0]).with_mask(vec![0xFF, 0xF0]);
        assert!(clause.matches(&[0xFF, 0xE7]));
        assert!(!clause.matches(&[0xFF, 0xD7]));
    }

    #[test]
    fn test_masked_range_scan() {
        let clause = MagicClause::new(0, vec![0x40])
            .with_mask(vec![0xF0])
            .with_range(3);
        assert!(clause.matches(&[0x00, 0x00, 0x4F]));
        assert!(!clause.matches(&[0x00, 0x00, 0x00, 0x4F]));
    }

    #[test]
    fn test_empty_value_ignores_mask() {
        let plain = MagicClause::new(2, Vec::new());
        let masked = MagicClause::new(2, Vec::new()).with_mask(Vec::new());
        assert!(plain.matches(b"abc"));
        assert!(masked.matches(b"abc"));
        assert!(!plain.matches(b"a"));
        assert!(!masked.matches(b"a"));
    }

    #[test]
    fn test_children_refine_parent() {
        let clause = MagicClause::new(0, b"RIFF".to_vec())
            .with_child(MagicClause::new(8, b"WAVE".to_vec()))
            .with_child(MagicClause::new(8, b"AVI ".to_vec()));
        assert!(clause.matches(b"RIFF\0\0\0\0WAVE"));
        assert!(clause.matches(b"RIFF\0\0\0\0AVI "));
        assert!(!clause.matches(b"RIFF\0\0\0\0WEBP"));
    }

    #[test]
    fn test_rule_alternatives() {
        let rule = MagicRule::new(50, MimeType::new("image/gif"))
            .with_clause(MagicClause::new(0, b"GIF87a".to_vec()))
            .with_clause(MagicClause::new(0, b"GIF89a".to_vec()));
        assert!(rule.matches(b"GIF89a...."));
        assert!(rule.matches(b"GIF87a...."));
        assert!(!rule.matches(b"GIF88a...."));
    }

    #[test]
    fn test_extent_covers_children() {
        let clause = MagicClause::new(0, b"RIFF".to_vec())
            .with_child(MagicClause::new(8, b"WAVE".to_vec()).with_range(4));
        assert_eq!(clause.extent(), 15);
    }
}
