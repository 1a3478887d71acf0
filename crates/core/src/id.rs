//! Unique identifiers for estimation entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Number of trailing characters kept by the `short()` display form.
const SHORT_LEN: usize = 8;

/// Unique identifier for a Task.
///
/// Generated ids are lowercase ULIDs, but any string loaded from a file is
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a new TaskId
    pub fn new() -> Self {
        Self(generate())
    }

    /// Trailing characters of the id, for compact display.
    pub fn short(&self) -> &str {
        short(&self.0)
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for an Estimation project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstimationId(String);

impl EstimationId {
    /// Generate a new EstimationId
    pub fn new() -> Self {
        Self(generate())
    }

    /// Trailing characters of the id, for compact display.
    pub fn short(&self) -> &str {
        short(&self.0)
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EstimationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EstimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EstimationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn generate() -> String {
    Ulid::new().to_string().to_lowercase()
}

// ULID's random component sits at the end, so the tail is the
// distinguishing part.
fn short(s: &str) -> &str {
    match s.char_indices().rev().nth(SHORT_LEN - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
