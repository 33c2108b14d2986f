//! Merge risk resolution.
//!
//! Ties the pieces together: resolve the merge, find the base of its
//! parents, gather every parent's suspects down to that base, then sort
//! the suspects into referenced tickets and ticket-less commits.

use std::collections::HashSet;
use std::fmt;

use gitrisk_core::{GitRiskError, TicketReference};

use crate::commit::Commit;
use crate::merge_base::merge_base;
use crate::source::CommitSource;
use crate::suspects::suspects;
use crate::tickets::TicketExtractor;

/// Progress of a single [`MergeRiskResolver::check_merge`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    Idle,
    ResolvingMerge,
    ComputingBase,
    WalkingSuspects,
    ExtractingTickets,
    Done,
    Failed,
}

impl fmt::Display for CheckStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStage::Idle => write!(f, "idle"),
            CheckStage::ResolvingMerge => write!(f, "resolving merge"),
            CheckStage::ComputingBase => write!(f, "computing merge base"),
            CheckStage::WalkingSuspects => write!(f, "walking suspects"),
            CheckStage::ExtractingTickets => write!(f, "extracting tickets"),
            CheckStage::Done => write!(f, "done"),
            CheckStage::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of checking one merge commit.
///
/// Both collections are sets with no defined iteration order; use
/// [`RiskReport::sorted_tickets`] and [`RiskReport::sorted_ticketless`]
/// when a stable order is needed for display.
#[derive(Debug, Clone)]
pub struct RiskReport {
    merge: Commit,
    base: Commit,
    tickets: HashSet<TicketReference>,
    ticketless: HashSet<Commit>,
}

impl RiskReport {
    /// The merge commit that was checked.
    pub fn merge(&self) -> &Commit {
        &self.merge
    }

    /// The merge base used as the walk boundary.
    pub fn base(&self) -> &Commit {
        &self.base
    }

    /// Every ticket referenced by a suspect commit.
    pub fn tickets(&self) -> &HashSet<TicketReference> {
        &self.tickets
    }

    /// Non-merge suspect commits that reference no ticket.
    pub fn ticketless(&self) -> &HashSet<Commit> {
        &self.ticketless
    }

    /// Tickets in lexical order.
    pub fn sorted_tickets(&self) -> Vec<&TicketReference> {
        let mut tickets: Vec<_> = self.tickets.iter().collect();
        tickets.sort();
        tickets
    }

    /// Ticket-less commits ordered by hash.
    pub fn sorted_ticketless(&self) -> Vec<&Commit> {
        let mut commits: Vec<_> = self.ticketless.iter().collect();
        commits.sort_by(|a, b| a.id().cmp(b.id()));
        commits
    }
}

/// Resolves the tickets at risk from a merge.
///
/// Holds a read-only commit source and an immutable ticket extractor;
/// each [`check_merge`](Self::check_merge) call builds a fresh report.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitrisk_history::risk::MergeRiskResolver;
/// use gitrisk_history::source::GitRepository;
/// use gitrisk_history::tickets::TicketExtractor;
///
/// let repo = GitRepository::discover(Path::new(".")).unwrap();
/// let extractor = TicketExtractor::new("^JM-[0-9]+").unwrap();
/// let resolver = MergeRiskResolver::new(repo, extractor);
/// let report = resolver.check_merge("HEAD").unwrap();
/// for ticket in report.sorted_tickets() {
///     println!("{ticket}");
/// }
/// ```
pub struct MergeRiskResolver<S> {
    source: S,
    extractor: TicketExtractor,
}

impl<S: CommitSource> MergeRiskResolver<S> {
    /// Build a resolver that reads history from `source` and finds tickets with `extractor`.
    pub fn new(source: S, extractor: TicketExtractor) -> Self {
        Self { source, extractor }
    }

    /// Check the merge commit named by `merge_ref`.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::NotFound`] or [`GitRiskError::AmbiguousRef`]
    /// if the reference does not resolve, [`GitRiskError::NotAMergeCommit`]
    /// if it has fewer than two parents, and [`GitRiskError::NoMergeBase`]
    /// if the parents share no history. Any failure aborts the whole check.
    pub fn check_merge(&self, merge_ref: &str) -> Result<RiskReport, GitRiskError> {
        let mut stage = CheckStage::Idle;
        self.tracked_check(merge_ref, &mut stage)
    }

    /// Leaves `stage` at [`CheckStage::Failed`] on error, after logging the
    /// stage that failed.
    fn tracked_check(
        &self,
        merge_ref: &str,
        stage: &mut CheckStage,
    ) -> Result<RiskReport, GitRiskError> {
        let result = self.run_check(merge_ref, stage);
        if let Err(ref err) = result {
            tracing::debug!(failed_at = %stage, merge_ref, error = %err, "merge check failed");
            *stage = CheckStage::Failed;
        }
        result
    }

    fn run_check(
        &self,
        merge_ref: &str,
        stage: &mut CheckStage,
    ) -> Result<RiskReport, GitRiskError> {
        *stage = CheckStage::ResolvingMerge;
        tracing::debug!(%stage, merge_ref);
        let merge = self.source.resolve(merge_ref)?;
        if !merge.is_merge() {
            return Err(GitRiskError::NotAMergeCommit {
                hash: merge.id().to_string(),
                parents: merge.parent_count(),
            });
        }

        *stage = CheckStage::ComputingBase;
        let parents = self.source.parents(&merge)?;
        tracing::debug!(%stage, merge = merge.short_id(), parents = parents.len());
        let base = merge_base(&self.source, &parents)?;

        *stage = CheckStage::WalkingSuspects;
        tracing::debug!(%stage, base = base.short_id());
        let mut population: HashSet<Commit> = HashSet::new();
        for parent in &parents {
            population.extend(suspects(&self.source, parent, &base)?);
        }
        population.insert(merge.clone());

        *stage = CheckStage::ExtractingTickets;
        tracing::debug!(%stage, suspects = population.len());
        let mut tickets = HashSet::new();
        let mut ticketless = HashSet::new();
        for commit in population {
            match self.extractor.tickets_in_commit(&commit) {
                Some(found) => tickets.extend(found),
                None if !commit.is_merge() => {
                    ticketless.insert(commit);
                }
                None => {}
            }
        }

        *stage = CheckStage::Done;
        tracing::debug!(
            %stage,
            tickets = tickets.len(),
            ticketless = ticketless.len()
        );
        Ok(RiskReport {
            merge,
            base,
            tickets,
            ticketless,
        })
    }
}
