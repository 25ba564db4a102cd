use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding a binary magic database
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MagicParseError {
    #[error("Bad magic header")]
    BadHeader,

    #[error("Expected '{expected}' at byte {offset}, found {found:?}")]
    Expected {
        expected: char,
        found: Option<char>,
        offset: usize,
    },

    #[error("Invalid section header at byte {offset}: {reason}")]
    SectionHeader { offset: usize, reason: String },

    #[error("Priority {priority} out of range at byte {offset}")]
    PriorityOutOfRange { priority: u64, offset: usize },

    #[error("Number too large at byte {offset}")]
    NumberOverflow { offset: usize },

    #[error("Unexpected end of data at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("Unexpected character {found:?} in clause at byte {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Invalid word size {word_size} at byte {offset}")]
    InvalidWordSize { word_size: usize, offset: usize },

    #[error("Value length {length} is not a multiple of word size {word_size} at byte {offset}")]
    MisalignedValue {
        length: usize,
        word_size: usize,
        offset: usize,
    },

    #[error("Range length must be at least 1 at byte {offset}")]
    EmptyRange { offset: usize },

    #[error("Indent {indent} does not follow indent {previous:?} at byte {offset}")]
    IndentJump {
        indent: usize,
        previous: Option<usize>,
        offset: usize,
    },
}

/// Errors that can occur while loading a MIME database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{path}: invalid glob pattern {pattern:?} on line {line}: {source}")]
    Pattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{path}: {source}")]
    Magic {
        path: PathBuf,
        #[source]
        source: MagicParseError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("MIME database already initialized")]
    AlreadyInitialized,
}

impl DatabaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
