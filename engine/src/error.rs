use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Everything that can go wrong inside the rules core.
///
/// A lookup that finds nothing is not an error; those return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The raw export is malformed or incomplete. `record` names the
    /// offending character (or document number when the name is unknown).
    #[error("invalid import format in {record}: {reason}")]
    InvalidImportFormat { record: String, reason: String },

    #[error("invalid proficiency rank {0} (expected 0, 2, 4, 6 or 8)")]
    InvalidProficiencyRank(i32),

    #[error("invalid dice spec {count}d{faces} (need at least 1 die with 2+ faces)")]
    InvalidDiceSpec { count: u32, faces: u32 },

    #[error("total of {count}d{faces}{modifier:+} does not fit in a 32-bit integer")]
    RollOutOfRange { count: u32, faces: u32, modifier: i32 },

    #[error("cannot parse dice notation '{0}'")]
    InvalidDiceNotation(String),

    #[error("invalid backup: {0}")]
    InvalidBackup(String),

    #[error("invalid content: {0}")]
    InvalidContent(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("cannot read {path}")]
    Io {
        path: String,
        #[source]
        source: IoError,
    },
}

/// `io::Error` that can live inside a cloneable, comparable error. Two
/// values compare equal when their kinds match.
#[derive(Debug, Clone)]
pub struct IoError(Arc<io::Error>);

impl IoError {
    pub fn kind(&self) -> io::ErrorKind {
        self.0.kind()
    }
}

impl From<io::Error> for IoError {
    fn from(err: io::Error) -> Self {
        IoError(Arc::new(err))
    }
}

impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl Eq for IoError {}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

impl EngineError {
    pub(crate) fn import(record: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidImportFormat {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
