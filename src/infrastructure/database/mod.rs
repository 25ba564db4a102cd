//! Database-file backend
//!
//! Loads the files `update-mime-database` writes into a MIME directory and
//! serves lookups from them.

mod comments;
mod magic_parser;
mod text_files;

pub use comments::CommentCache;
pub use magic_parser::{MAGIC_HEADER, parse_magic};
pub use text_files::{parse_aliases, parse_generic_icons, parse_globs, parse_subclasses};

use crate::application::Resolver;
use crate::application::dto::ResolverConfig;
use crate::domain::entities::MimeType;
use crate::domain::repositories::{CommentSource, MimeBackend};
use crate::domain::services::{GlobIndex, MagicIndex, TypeGraph};
use crate::error::{DatabaseError, Result};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub const GLOBS_FILE: &str = "globs2";
pub const MAGIC_FILE: &str = "magic";
pub const ALIASES_FILE: &str = "aliases";
pub const SUBCLASSES_FILE: &str = "subclasses";
pub const GENERIC_ICONS_FILE: &str = "generic-icons";

/// A MIME database loaded from one directory
///
/// # Example
///
/// ```ignore
/// let db = MimeDatabase::load_dir("/usr/share/mime", ResolverConfig::default())?;
/// let mime = db.resolve_path("/etc/hosts")?;
/// ```
#[derive(Debug)]
pub struct MimeDatabase {
    dir: PathBuf,
    resolver: Resolver,
    comments: CommentCache,
}

impl MimeDatabase {
    /// Loads every database file found in `dir`
    ///
    /// Missing files count as empty. Unreadable or malformed files fail
    /// the whole load.
    pub fn load_dir(dir: impl AsRef<Path>, config: ResolverConfig) -> Result<Self> {
        let dir = dir.as_ref();

        let mut globs = GlobIndex::new();
        if let Some((path, text)) = read_text(dir, GLOBS_FILE)? {
            for (line, rule) in parse_globs(&path, &text)? {
                let pattern = rule.pattern().to_string();
                globs.insert(rule).map_err(|source| DatabaseError::Pattern {
                    path: path.clone(),
                    line,
                    pattern,
                    source,
                })?;
            }
            tracing::debug!(path = %path.display(), rules = globs.len(), "loaded globs");
        }

        let magic = load_magic(&dir.join(MAGIC_FILE))?;

        let mut graph = TypeGraph::new();
        if let Some((path, text)) = read_text(dir, ALIASES_FILE)? {
            for (alias, canonical) in parse_aliases(&path, &text)? {
                graph.add_alias(alias, canonical);
            }
        }
        if let Some((path, text)) = read_text(dir, SUBCLASSES_FILE)? {
            for (mime, parent) in parse_subclasses(&path, &text)? {
                graph.add_parent(mime, parent);
            }
        }
        if let Some((path, text)) = read_text(dir, GENERIC_ICONS_FILE)? {
            for (mime, icon) in parse_generic_icons(&path, &text)? {
                graph.add_generic_icon(mime, icon);
            }
        }

        tracing::info!(
            dir = %dir.display(),
            globs = globs.len(),
            magic = magic.len(),
            aliases = graph.alias_count(),
            subclasses = graph.subclass_count(),
            "loaded MIME database"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            resolver: Resolver::new(globs, magic, graph, config),
            comments: CommentCache::default(),
        })
    }

    /// Uses `source` for type descriptions
    pub fn with_comment_source(mut self, source: impl CommentSource + 'static) -> Self {
        self.comments = CommentCache::new(Box::new(source));
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolves a file on disk by its name and the start of its content
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Result<MimeType> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        let file = File::open(path).map_err(|e| DatabaseError::io(path, e))?;
        let size = file.metadata().map_err(|e| DatabaseError::io(path, e))?.len();
        if size == 0 {
            return Ok(MimeType::zero_size());
        }

        let mut sample = Vec::with_capacity(self.resolver.sample_size());
        file.take(self.resolver.sample_size() as u64)
            .read_to_end(&mut sample)
            .map_err(|e| DatabaseError::io(path, e))?;

        Ok(self.resolver.resolve_with_size(&name, &sample, size))
    }
}

impl MimeBackend for MimeDatabase {
    fn resolve_by_name(&self, name: &str) -> MimeType {
        self.resolver.resolve_by_name(name)
    }

    fn resolve_by_content(&self, data: &[u8], size_hint: u64) -> MimeType {
        self.resolver.resolve_by_content(data, size_hint)
    }

    fn comment(&self, mime: &MimeType, lang: &str) -> Option<String> {
        self.comments.get(mime, lang)
    }

    fn icon(&self, mime: &MimeType) -> String {
        self.resolver.icon(mime)
    }
}

/// Reads `dir/name`; a missing file is `None`
fn read_text(dir: &Path, name: &str) -> Result<Option<(PathBuf, String)>> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(Some((path, text))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "database file missing, treating as empty");
            Ok(None)
        }
        Err(e) => Err(DatabaseError::io(path, e)),
    }
}

fn load_magic(path: &Path) -> Result<MagicIndex> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "database file missing, treating as empty");
            return Ok(MagicIndex::default());
        }
        Err(e) => return Err(DatabaseError::io(path, e)),
    };

    let len = file.metadata().map_err(|e| DatabaseError::io(path, e))?.len();
    let parsed = if len == 0 {
        parse_magic(&[])
    } else {
        // The map is only read during parsing and dropped right after
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| DatabaseError::io(path, e))?;
        parse_magic(&mmap)
    };

    let magic = MagicIndex::new(parsed.map_err(|source| DatabaseError::Magic {
        path: path.to_path_buf(),
        source,
    })?);
    tracing::debug!(path = %path.display(), rules = magic.len(), "loaded magic");
    Ok(magic)
}
