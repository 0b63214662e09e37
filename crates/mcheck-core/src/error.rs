//! Error taxonomy for harness runs.

use crate::comparator::Mismatch;
use std::path::PathBuf;

/// Errors produced while running a fixture against an engine.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Run file not found! ({})", .0.display())]
    FixtureNotFound(PathBuf),

    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed fixture line: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("line {line}: unknown input name: {name}")]
    UnknownInput { line: usize, name: String },

    #[error("line {line}: unknown output name: {name}")]
    UnknownOutput { line: usize, name: String },

    #[error("{0}")]
    Mismatch(Mismatch),

    #[error("slot {slot} out of range for vector of length {len}")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("engine error: {0}")]
    Engine(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl HarnessError {
    /// Whether this error comes from the fixture contents rather than the
    /// environment or the engine.
    pub fn is_fixture_format(&self) -> bool {
        matches!(
            self,
            HarnessError::MalformedLine { .. }
                | HarnessError::UnknownInput { .. }
                | HarnessError::UnknownOutput { .. }
        )
    }

    /// Process exit status for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            HarnessError::Mismatch(_) => 1,
            HarnessError::FixtureNotFound(_) | HarnessError::Io { .. } => 3,
            e if e.is_fixture_format() => 4,
            _ => 5,
        }
    }
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
