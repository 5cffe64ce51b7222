//! Client-local persistent key-value storage plus the transcript snapshot
//! schema written into it.
//!
//! The store itself is deliberately dumb: opaque string values addressed
//! by a small set of well-known keys, one file per key, surviving process
//! restarts. Snapshot encoding/decoding lives here so every consumer
//! agrees on one versioned representation.

mod error;
mod paths;
mod schema;
mod store;

pub use error::StoreError;
pub use paths::{state_root, KEY_API_KEY, KEY_THEME, KEY_TRANSCRIPT};
pub use schema::{now_rfc3339, SnapshotMessage, SnapshotRole, ThemePreference, TranscriptSnapshot};
pub use store::FileStore;
