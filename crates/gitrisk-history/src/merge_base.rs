//! Merge-base selection by parent count.
//!
//! One commit is its own base, two commits use the pairwise merge base,
//! and three or more use the octopus merge base so the walk boundary is a
//! commit that actually exists in history rather than a hypothetical
//! pairwise merge point.

use gitrisk_core::GitRiskError;

use crate::commit::Commit;
use crate::source::CommitSource;

/// Compute the walk boundary for a set of merge parents.
///
/// # Errors
///
/// Returns [`GitRiskError::NoMergeBase`] if `commits` is empty or the
/// commits share no ancestor.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitrisk_history::merge_base::merge_base;
/// use gitrisk_history::source::{CommitSource, GitRepository};
///
/// let repo = GitRepository::discover(Path::new(".")).unwrap();
/// let merge = repo.resolve("HEAD").unwrap();
/// let parents = repo.parents(&merge).unwrap();
/// let base = merge_base(&repo, &parents).unwrap();
/// println!("boundary: {base}");
/// ```
pub fn merge_base<S>(source: &S, commits: &[Commit]) -> Result<Commit, GitRiskError>
where
    S: CommitSource + ?Sized,
{
    let base_id = match commits {
        [] => {
            return Err(GitRiskError::NoMergeBase(
                "no commits to compute a merge base for".into(),
            ))
        }
        [only] => return Ok(only.clone()),
        [one, two] => source.merge_base(one, two)?,
        many => source.octopus_merge_base(many)?,
    };

    match base_id {
        Some(id) => source.find(&id),
        None => Err(GitRiskError::NoMergeBase(format!(
            "commits {} share no common ancestor",
            commits
                .iter()
                .map(Commit::short_id)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
