//! Type resolution use case
//!
//! Combines the glob, magic and type-graph services into a single answer
//! for "what type is this file".

use crate::application::dto::ResolverConfig;
use crate::domain::entities::MimeType;
use crate::domain::services::{GlobIndex, MagicIndex, TypeGraph};

/// Resolves file names and contents to MIME types
///
/// # Example
///
/// ```
/// use sharedmime::application::Resolver;
/// use sharedmime::application::dto::ResolverConfig;
/// use sharedmime::domain::entities::{GlobRule, MimeType};
/// use sharedmime::domain::services::{GlobIndex, MagicIndex, TypeGraph};
///
/// let globs = GlobIndex::from_rules([GlobRule::new(50, MimeType::new("text/plain"), "*.txt")]).unwrap();
/// let resolver = Resolver::new(globs, MagicIndex::default(), TypeGraph::new(), ResolverConfig::default());
///
/// assert_eq!(resolver.resolve_by_name("report.txt"), "text/plain");
/// assert_eq!(resolver.resolve("empty.txt", b""), "application/x-zerosize");
/// ```
#[derive(Debug)]
pub struct Resolver {
    globs: GlobIndex,
    magic: MagicIndex,
    graph: TypeGraph,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(globs: GlobIndex, magic: MagicIndex, graph: TypeGraph, config: ResolverConfig) -> Self {
        Self {
            globs,
            magic,
            graph,
            config,
        }
    }

    pub fn globs(&self) -> &GlobIndex {
        &self.globs
    }

    pub fn magic(&self) -> &MagicIndex {
        &self.magic
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Number of leading bytes worth reading from a file before resolving it
    pub fn sample_size(&self) -> usize {
        self.magic
            .sample_size()
            .max(self.config.text_sniff_len)
            .min(self.config.max_sample_size)
    }

    /// Resolves a file name; unknown names are `application/octet-stream`
    pub fn resolve_by_name(&self, name: &str) -> MimeType {
        match self.globs.match_name(name) {
            Some(mime) => self.graph.canonicalize(mime),
            None => MimeType::default_binary(),
        }
    }

    /// Resolves content; `size_hint` is the full file size, `data` a prefix of it
    pub fn resolve_by_content(&self, data: &[u8], size_hint: u64) -> MimeType {
        if size_hint == 0 {
            return MimeType::zero_size();
        }
        match self.magic.match_content(data) {
            Some(mime) => self.graph.canonicalize(mime),
            None => self.sniff_default(data),
        }
    }

    /// Resolves using both name and content, taking the file size from `data`
    pub fn resolve(&self, name: &str, data: &[u8]) -> MimeType {
        self.resolve_with_size(name, data, data.len() as u64)
    }

    /// Resolves using both name and content
    ///
    /// A magic match overrides a glob match only at or above the configured
    /// priority threshold.
    pub fn resolve_with_size(&self, name: &str, data: &[u8], size: u64) -> MimeType {
        if size == 0 {
            tracing::debug!(name, "zero-size file");
            return MimeType::zero_size();
        }

        let by_name = self.globs.match_name(name);
        let by_content = self.magic.find(data);

        let chosen = match (by_name, by_content) {
            (Some(_), Some(rule)) if rule.priority() >= self.config.magic_threshold => {
                tracing::debug!(name, mime = %rule.mime(), priority = rule.priority(), "magic overrides glob");
                rule.mime()
            }
            (Some(glob), _) => glob,
            (None, Some(rule)) => rule.mime(),
            (None, None) => {
                let fallback = self.sniff_default(data);
                tracing::debug!(name, mime = %fallback, "no rule matched");
                return fallback;
            }
        };
        self.graph.canonicalize(chosen)
    }

    pub fn canonicalize(&self, mime: &MimeType) -> MimeType {
        self.graph.canonicalize(mime)
    }

    pub fn is_instance(&self, mime: &MimeType, ancestor: &MimeType) -> bool {
        self.graph.is_instance(mime, ancestor)
    }

    pub fn parents(&self, mime: &MimeType) -> &[MimeType] {
        self.graph.parents(mime)
    }

    pub fn aliases_of(&self, mime: &MimeType) -> Vec<&MimeType> {
        self.graph.aliases_of(mime)
    }

    pub fn generic_icon(&self, mime: &MimeType) -> String {
        self.graph.generic_icon(mime)
    }

    pub fn icon(&self, mime: &MimeType) -> String {
        mime.icon()
    }

    /// Text when the sampled prefix holds no NUL byte, binary otherwise
    fn sniff_default(&self, data: &[u8]) -> MimeType {
        let sample = &data[..data.len().min(self.config.text_sniff_len)];
        if memchr::memchr(0, sample).is_some() {
            MimeType::default_binary()
        } else {
            MimeType::default_text()
        }
    }
}
