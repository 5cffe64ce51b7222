use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store key '{0}'; keys are lowercase [a-z0-9_-]")]
    InvalidKey(String),

    #[error("stored snapshot is unreadable: {source}")]
    CorruptSnapshot {
        #[source]
        source: serde_json::Error,
    },

    #[error("stored snapshot has unsupported version {found}; expected 1")]
    UnsupportedVersion { found: u32 },

    #[error("stored snapshot has invalid RFC3339 timestamp in field '{field}': {value}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
    },

    #[error("failed to serialize snapshot: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    #[error("failed to format current UTC timestamp as RFC3339: {0}")]
    ClockFormat(#[source] time::error::Format),
}

impl StoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// True when the error means "recover by resetting to an empty
    /// transcript" rather than "report a storage failure".
    #[must_use]
    pub fn is_corrupt_snapshot(&self) -> bool {
        matches!(
            self,
            Self::CorruptSnapshot { .. }
                | Self::UnsupportedVersion { .. }
                | Self::InvalidTimestamp { .. }
        )
    }
}
