//! Throwaway repositories for unit tests.

use std::cell::Cell;
use std::path::Path;

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

use crate::source::GitRepository;

/// Seconds since the Unix epoch the fixture clock starts from.
const EPOCH: i64 = 1_700_000_000;

pub(crate) struct Fixture {
    dir: TempDir,
    repo: Repository,
    clock: Cell<i64>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self {
            dir,
            repo,
            clock: Cell::new(EPOCH),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a commit with an empty tree. Each call ticks the clock so
    /// identical messages and parents still produce distinct hashes.
    pub(crate) fn commit(&self, message: &str, parents: &[Oid]) -> Oid {
        let now = self.clock.get() + 60;
        self.clock.set(now);
        let sig = Signature::new("Test", "test@example.com", &Time::new(now, 0)).unwrap();

        let tree_id = self.repo.treebuilder(None).unwrap().write().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit<'_>> = parents
            .iter()
            .map(|p| self.repo.find_commit(*p).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        self.repo
            .commit(None, &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    /// Point `refs/heads/<name>` at `target` and make it HEAD.
    pub(crate) fn branch(&self, name: &str, target: Oid) {
        let refname = format!("refs/heads/{name}");
        self.repo.reference(&refname, target, true, "test").unwrap();
        self.repo.set_head(&refname).unwrap();
    }

    pub(crate) fn source(&self) -> GitRepository {
        GitRepository::open(self.path()).unwrap()
    }
}
