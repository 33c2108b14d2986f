//! Commit lookup and graph primitives, backed by git2.
//!
//! The merge-risk engine only needs five capabilities from the repository:
//! reference resolution, parent lookup, two-way and octopus merge bases,
//! and exclusive range enumeration. [`CommitSource`] names them;
//! [`GitRepository`] implements them on top of libgit2 and classifies
//! libgit2 failures into [`GitRiskError`] variants.

use std::path::Path;

use git2::{ErrorCode, Oid, Repository};
use gitrisk_core::GitRiskError;

use crate::commit::Commit;

/// Read-only access to a commit graph.
pub trait CommitSource {
    /// Resolve a full or abbreviated hash, or a symbolic name such as
    /// `HEAD` or a branch, to a commit.
    ///
    /// # Errors
    ///
    /// [`GitRiskError::NotFound`] if nothing matches,
    /// [`GitRiskError::AmbiguousRef`] if an abbreviated hash matches more
    /// than one object.
    fn resolve(&self, reference: &str) -> Result<Commit, GitRiskError>;

    /// Look up a commit by its full hash.
    fn find(&self, id: &str) -> Result<Commit, GitRiskError>;

    /// Nearest common ancestor of two commits, or `None` if they share no history.
    fn merge_base(&self, one: &Commit, two: &Commit) -> Result<Option<String>, GitRiskError>;

    /// Octopus merge base of three or more commits, or `None` if they share no history.
    fn octopus_merge_base(&self, commits: &[Commit]) -> Result<Option<String>, GitRiskError>;

    /// Hashes of every commit reachable from `tip` but not from `boundary`
    /// (`boundary..tip`).
    fn exclusive_range(&self, boundary: &Commit, tip: &Commit)
        -> Result<Vec<String>, GitRiskError>;

    /// The parents of `commit`, first parent first.
    fn parents(&self, commit: &Commit) -> Result<Vec<Commit>, GitRiskError> {
        commit.parent_ids().iter().map(|id| self.find(id)).collect()
    }
}

/// A git repository opened read-only for the lifetime of a query.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository at exactly `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::Git`] if `path` is not a git repository.
    pub fn open(path: &Path) -> Result<Self, GitRiskError> {
        let repo = Repository::open(path)
            .map_err(|e| GitRiskError::Git(format!("failed to open repository: {e}")))?;
        Ok(Self { repo })
    }

    /// Find the repository containing `path`, searching parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::Git`] if no enclosing repository exists.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use gitrisk_history::source::GitRepository;
    ///
    /// let repo = GitRepository::discover(Path::new(".")).unwrap();
    /// println!("repository root: {}", repo.root().display());
    /// ```
    pub fn discover(path: &Path) -> Result<Self, GitRiskError> {
        let repo = Repository::discover(path).map_err(|e| {
            GitRiskError::Git(format!(
                "no git repository at or above {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { repo })
    }

    /// Working-tree root, or the git directory for bare repositories.
    pub fn root(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    fn oid(&self, id: &str) -> Result<Oid, GitRiskError> {
        Oid::from_str(id).map_err(|_| GitRiskError::NotFound(id.to_string()))
    }
}

impl CommitSource for GitRepository {
    fn resolve(&self, reference: &str) -> Result<Commit, GitRiskError> {
        let object = self
            .repo
            .revparse_single(reference)
            .map_err(|e| classify(reference, e))?;
        let commit = object
            .peel_to_commit()
            .map_err(|e| classify(reference, e))?;
        Ok(to_commit(&commit))
    }

    fn find(&self, id: &str) -> Result<Commit, GitRiskError> {
        let commit = self
            .repo
            .find_commit(self.oid(id)?)
            .map_err(|e| classify(id, e))?;
        Ok(to_commit(&commit))
    }

    fn merge_base(&self, one: &Commit, two: &Commit) -> Result<Option<String>, GitRiskError> {
        match self.repo.merge_base(self.oid(one.id())?, self.oid(two.id())?) {
            Ok(oid) => Ok(Some(oid.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitRiskError::Git(format!("merge-base failed: {e}"))),
        }
    }

    // Left fold of pairwise bases, as `git merge-base --octopus` does. Never
    // merges the inputs into a hypothetical commit first.
    fn octopus_merge_base(&self, commits: &[Commit]) -> Result<Option<String>, GitRiskError> {
        let Some((first, rest)) = commits.split_first() else {
            return Ok(None);
        };
        let mut acc = self.oid(first.id())?;
        for commit in rest {
            match self.repo.merge_base(acc, self.oid(commit.id())?) {
                Ok(oid) => acc = oid,
                Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
                Err(e) => {
                    return Err(GitRiskError::Git(format!(
                        "octopus merge-base failed at {}: {e}",
                        commit.short_id()
                    )))
                }
            }
        }
        Ok(Some(acc.to_string()))
    }

    fn exclusive_range(
        &self,
        boundary: &Commit,
        tip: &Commit,
    ) -> Result<Vec<String>, GitRiskError> {
        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| GitRiskError::Git(format!("failed to create revwalk: {e}")))?;
        revwalk
            .push(self.oid(tip.id())?)
            .map_err(|e| GitRiskError::Git(format!("failed to push {}: {e}", tip.short_id())))?;
        revwalk
            .hide(self.oid(boundary.id())?)
            .map_err(|e| {
                GitRiskError::Git(format!("failed to hide {}: {e}", boundary.short_id()))
            })?;

        revwalk
            .map(|oid| {
                oid.map(|o| o.to_string())
                    .map_err(|e| GitRiskError::Git(format!("revwalk error: {e}")))
            })
            .collect()
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    Commit::new(
        commit.id().to_string(),
        commit.parent_ids().map(|p| p.to_string()).collect(),
        String::from_utf8_lossy(commit.message_bytes()),
    )
}

fn classify(reference: &str, err: git2::Error) -> GitRiskError {
    match err.code() {
        ErrorCode::NotFound | ErrorCode::Peel | ErrorCode::InvalidSpec => {
            GitRiskError::NotFound(reference.to_string())
        }
        ErrorCode::Ambiguous => GitRiskError::AmbiguousRef(reference.to_string()),
        _ => GitRiskError::Git(format!("failed to resolve '{reference}': {err}")),
    }
}
