//! Commit identifiers.

use std::fmt;

/// A full hexadecimal commit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Length of the abbreviated form.
    pub const SHORT_LEN: usize = 7;

    /// Creates a commit identifier from its hex form.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Returns the full hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the abbreviated hex form.
    pub fn short(&self) -> &str {
        self.0.get(..Self::SHORT_LEN).unwrap_or(&self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
