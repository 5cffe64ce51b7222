use std::path::{Path, PathBuf};

pub const STATE_DIR: [&str; 2] = [".study_buddy", "state"];

/// Well-known store keys. The store treats values as opaque strings; these
/// names are the whole shared vocabulary between writers and readers.
pub const KEY_TRANSCRIPT: &str = "transcript";
pub const KEY_THEME: &str = "theme";
pub const KEY_API_KEY: &str = "api_key";

#[must_use]
pub fn state_root(base: &Path) -> PathBuf {
    base.join(STATE_DIR[0]).join(STATE_DIR[1])
}

pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-'))
}
