//! Ticket extraction from commit messages.
//!
//! The configured pattern is applied to one physical line at a time, so a
//! `^`-anchored spec only matches tickets at the start of a line. Blank
//! lines are skipped and never count as a failed match.

use std::collections::HashSet;
use std::path::Path;

use gitrisk_core::{GitRiskError, TicketReference};
use regex::Regex;

use crate::commit::Commit;

/// Finds ticket references using a compiled ticket spec.
///
/// # Examples
///
/// ```
/// use gitrisk_history::tickets::TicketExtractor;
///
/// let extractor = TicketExtractor::new("(JM|jm)-[0-9]+").unwrap();
/// let ticket = extractor.tickets_in_line("fix JM-1966").unwrap();
/// assert_eq!(ticket.as_str(), "JM-1966");
/// assert!(extractor.tickets_in_line("no ticket").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TicketExtractor {
    pattern: Regex,
}

impl TicketExtractor {
    /// Compile `spec` into an extractor.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::Pattern`] if `spec` is not a valid regular expression.
    pub fn new(spec: &str) -> Result<Self, GitRiskError> {
        let pattern = Regex::new(spec).map_err(|e| GitRiskError::Pattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// First match of the pattern in `line`, trimmed.
    ///
    /// Returns `None` for blank lines and lines without a match.
    pub fn tickets_in_line(&self, line: &str) -> Option<TicketReference> {
        if line.trim().is_empty() {
            return None;
        }
        self.pattern
            .find(line)
            .and_then(|m| TicketReference::new(m.as_str()))
    }

    /// Every distinct ticket referenced anywhere in the commit message.
    ///
    /// Returns `None` when no non-blank line matches; a returned set is
    /// never empty.
    pub fn tickets_in_commit(&self, commit: &Commit) -> Option<HashSet<TicketReference>> {
        let tickets: HashSet<TicketReference> = commit
            .message()
            .lines()
            .filter_map(|line| self.tickets_in_line(line))
            .collect();
        if tickets.is_empty() {
            None
        } else {
            Some(tickets)
        }
    }

    /// Extract one ticket per non-blank line of the file at `path`, in order.
    ///
    /// Intended for checking a ticket spec against known sample lines, so
    /// every non-blank line must match.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::FileNotFound`] or [`GitRiskError::Io`] if the
    /// file cannot be read, and [`GitRiskError::PatternMismatch`] naming the
    /// first non-blank line without a match.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use gitrisk_history::tickets::TicketExtractor;
    ///
    /// let extractor = TicketExtractor::new("^JM-[0-9]+").unwrap();
    /// for ticket in extractor.tickets_in_file(Path::new("samples.txt")).unwrap() {
    ///     println!("{ticket}");
    /// }
    /// ```
    pub fn tickets_in_file(&self, path: &Path) -> Result<Vec<TicketReference>, GitRiskError> {
        if !path.exists() {
            return Err(GitRiskError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        self.tickets_in_lines(&content)
    }

    fn tickets_in_lines(&self, content: &str) -> Result<Vec<TicketReference>, GitRiskError> {
        let mut tickets = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.tickets_in_line(line) {
                Some(ticket) => tickets.push(ticket),
                None => {
                    return Err(GitRiskError::PatternMismatch {
                        line_number: idx + 1,
                        line: line.to_string(),
                    })
                }
            }
        }
        Ok(tickets)
    }
}
