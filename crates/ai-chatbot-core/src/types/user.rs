use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::KEY_DELIMITER;

/// Identifier of a signed-in user, as issued by the identity provider.
///
/// Opaque and stable. Never empty: an absent or blank id is represented by
/// `Option<UserId>::None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a provider id. Returns `None` for empty or whitespace-only ids.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// The raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is free of the key delimiter.
    ///
    /// Ids containing it still work but may share a key prefix with another
    /// user (`a` vs `a_b`), which matters for `clear_all`.
    pub fn is_delimiter_free(&self) -> bool {
        !self.0.contains(KEY_DELIMITER)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
