//! Process-wide database
//!
//! Built once by an explicit [`init`] call and read-only afterwards.

use crate::application::dto::ResolverConfig;
use crate::error::{DatabaseError, Result};
use crate::infrastructure::database::MimeDatabase;
use std::path::Path;
use std::sync::OnceLock;

static DATABASE: OnceLock<MimeDatabase> = OnceLock::new();

/// Loads `dir` and installs it as the process-wide database
///
/// Fails with [`DatabaseError::AlreadyInitialized`] if a database was
/// already installed.
pub fn init(dir: impl AsRef<Path>, config: ResolverConfig) -> Result<&'static MimeDatabase> {
    install(MimeDatabase::load_dir(dir, config)?)
}

/// Installs an already loaded database as the process-wide one
pub fn install(database: MimeDatabase) -> Result<&'static MimeDatabase> {
    DATABASE
        .set(database)
        .map_err(|_| DatabaseError::AlreadyInitialized)?;
    DATABASE.get().ok_or(DatabaseError::AlreadyInitialized)
}

/// The process-wide database, if [`init`] has run
pub fn global() -> Option<&'static MimeDatabase> {
    DATABASE.get()
}
