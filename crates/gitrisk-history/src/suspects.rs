//! Suspect commit enumeration.
//!
//! A parent's suspects are the commits in `boundary..tip` plus the
//! boundary itself. The merge base is always included: changes made right
//! at the divergence point are still part of the merge's risk surface.

use std::collections::HashSet;

use gitrisk_core::GitRiskError;

use crate::commit::Commit;
use crate::source::CommitSource;

/// Commits reachable from `tip` but not from `boundary`, plus `boundary`.
///
/// The result is a set; a commit reachable along several paths appears once.
///
/// # Errors
///
/// Propagates lookup failures from the [`CommitSource`].
pub fn suspects<S>(
    source: &S,
    tip: &Commit,
    boundary: &Commit,
) -> Result<HashSet<Commit>, GitRiskError>
where
    S: CommitSource + ?Sized,
{
    let mut found = HashSet::new();
    for id in source.exclusive_range(boundary, tip)? {
        found.insert(source.find(&id)?);
    }
    found.insert(boundary.clone());
    Ok(found)
}
