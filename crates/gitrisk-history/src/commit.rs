//! Immutable commit value type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A resolved commit: identity hash, parent hashes, and message.
///
/// Commits are produced by a [`CommitSource`](crate::source::CommitSource)
/// and never mutated afterwards. Equality and hashing use the commit hash
/// only, so sets of commits deduplicate by identity.
///
/// # Examples
///
/// ```
/// use gitrisk_history::commit::Commit;
///
/// let commit = Commit::new(
///     "4b825dc642cb6eb9a060e54bf8d69288fbee4904",
///     vec![],
///     "JM-12 fix login\n\nlonger body",
/// );
/// assert_eq!(commit.short_id(), "4b825dc");
/// assert_eq!(commit.summary(), "JM-12 fix login");
/// assert!(!commit.is_merge());
/// ```
#[derive(Debug, Clone)]
pub struct Commit {
    id: String,
    parent_ids: Vec<String>,
    message: String,
}

const SHORT_ID_LEN: usize = 7;

impl Commit {
    /// Create a commit value. Hashes are normalized to lowercase hex.
    pub fn new(id: impl Into<String>, parent_ids: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into().to_ascii_lowercase(),
            parent_ids: parent_ids
                .into_iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
            message: message.into(),
        }
    }

    /// Full hex hash.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Abbreviated hash for display.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(SHORT_ID_LEN)]
    }

    /// Parent hashes in commit order (first parent first).
    pub fn parent_ids(&self) -> &[String] {
        &self.parent_ids
    }

    /// Number of parents; two or more means a merge.
    pub fn parent_count(&self) -> usize {
        self.parent_ids.len()
    }

    /// `true` when the commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// Full commit message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim_end()
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Commit {}

impl Hash for Commit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.short_id(), self.summary())
    }
}
