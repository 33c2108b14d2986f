//! Rendering a [`RiskReport`] for people and machines.
//!
//! Ordering is decided here and only here: tickets sort lexically,
//! ticket-less commits by hash.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commit::Commit;
use crate::risk::RiskReport;

/// Presentation options fixed for the whole invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Omit the list of ticket-less commits.
    pub quiet: bool,
}

/// One-line description of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitLine {
    /// Full hash.
    pub hash: String,
    /// Abbreviated hash.
    pub short_hash: String,
    /// First line of the message.
    pub summary: String,
}

impl From<&Commit> for CommitLine {
    fn from(commit: &Commit) -> Self {
        Self {
            hash: commit.id().to_string(),
            short_hash: commit.short_id().to_string(),
            summary: commit.summary().to_string(),
        }
    }
}

impl fmt::Display for CommitLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.short_hash, self.summary)
    }
}

/// Display-ready, deterministically ordered view of a [`RiskReport`].
///
/// # Examples
///
/// ```
/// use gitrisk_history::report::{CommitLine, RiskSummary};
///
/// let summary = RiskSummary {
///     merge: CommitLine {
///         hash: "a1b2c3d4".into(),
///         short_hash: "a1b2c3d".into(),
///         summary: "Merge branch 'release'".into(),
///     },
///     tickets: vec!["JM-1966".into()],
///     ticketless: None,
/// };
/// let text = summary.to_string();
/// assert!(text.starts_with("a1b2c3d Merge branch 'release'"));
/// assert!(text.contains("JM-1966"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    /// The merge commit that was checked.
    pub merge: CommitLine,
    /// Tickets at risk, sorted.
    pub tickets: Vec<String>,
    /// Ticket-less suspects sorted by hash; `None` in quiet mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticketless: Option<Vec<CommitLine>>,
}

impl RiskSummary {
    /// Build the summary for `report` under `options`.
    pub fn new(report: &RiskReport, options: &ReportOptions) -> Self {
        let ticketless = (!options.quiet).then(|| {
            report
                .sorted_ticketless()
                .into_iter()
                .map(CommitLine::from)
                .collect()
        });
        Self {
            merge: CommitLine::from(report.merge()),
            tickets: report
                .sorted_tickets()
                .into_iter()
                .map(|t| t.to_string())
                .collect(),
            ticketless,
        }
    }

    /// Render the summary as a markdown string.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Merge Risk Report\n\n");
        out.push_str(&format!(
            "**Merge:** `{}` {}\n\n",
            self.merge.short_hash, self.merge.summary
        ));

        out.push_str("## Tickets at Risk\n\n");
        if self.tickets.is_empty() {
            out.push_str("No tickets found.\n");
        } else {
            for ticket in &self.tickets {
                out.push_str(&format!("- {ticket}\n"));
            }
        }

        if let Some(ticketless) = self.ticketless.as_ref().filter(|c| !c.is_empty()) {
            out.push_str("\n## Commits Without Tickets\n\n");
            for commit in ticketless {
                out.push_str(&format!("- `{}` {}\n", commit.short_hash, commit.summary));
            }
        }
        out
    }
}

impl fmt::Display for RiskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.merge)?;
        writeln!(f, "Tickets at risk:")?;
        if self.tickets.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for ticket in &self.tickets {
            writeln!(f, "  {ticket}")?;
        }

        if let Some(ticketless) = self.ticketless.as_ref().filter(|c| !c.is_empty()) {
            writeln!(
                f,
                "\nNote: {} suspect commit(s) reference no ticket:",
                ticketless.len()
            )?;
            for commit in ticketless {
                writeln!(f, "  {commit}")?;
            }
        }
        Ok(())
    }
}
