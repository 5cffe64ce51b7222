use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::StoreError;

/// Versioned external representation of a transcript.
///
/// Written whole after every successful assistant turn; read once at
/// startup. Any decode failure is a corrupt-snapshot condition the caller
/// recovers from by starting empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptSnapshot {
    pub version: u32,
    pub saved_at: String,
    pub messages: Vec<SnapshotMessage>,
}

impl TranscriptSnapshot {
    #[must_use]
    pub fn v1(saved_at: impl Into<String>, messages: Vec<SnapshotMessage>) -> Self {
        Self {
            version: 1,
            saved_at: saved_at.into(),
            messages,
        }
    }

    pub fn encode(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(StoreError::JsonSerialize)
    }

    pub fn decode(raw: &str) -> Result<Self, StoreError> {
        let snapshot: Self =
            serde_json::from_str(raw).map_err(|source| StoreError::CorruptSnapshot { source })?;

        if snapshot.version != 1 {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        if OffsetDateTime::parse(&snapshot.saved_at, &Rfc3339).is_err() {
            return Err(StoreError::InvalidTimestamp {
                field: "saved_at",
                value: snapshot.saved_at,
            });
        }

        Ok(snapshot)
    }
}

/// One stored conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotMessage {
    pub role: SnapshotRole,
    pub content: String,
}

impl SnapshotMessage {
    #[must_use]
    pub fn new(role: SnapshotRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Roles a snapshot may carry. The system instruction is injected at
/// request-assembly time and is never stored, so it has no variant here;
/// a snapshot claiming a system turn fails decoding as corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotRole {
    User,
    Assistant,
}

/// Persisted UI theme choice. Stored as its plain string form; the store
/// never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Current UTC time in the snapshot's timestamp format.
pub fn now_rfc3339() -> Result<String, StoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(StoreError::ClockFormat)
}
