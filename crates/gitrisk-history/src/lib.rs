//! Merge risk resolution: which tickets might regress after a merge.
//!
//! Given a merge commit, computes the merge base of its parents (the
//! octopus base for three or more), walks each parent's exclusive history
//! down to that base, and scans the suspect commits' messages for ticket
//! references using a configured regular expression. Commits with no
//! ticket are reported separately.

pub mod commit;
pub mod merge_base;
pub mod report;
pub mod risk;
pub mod source;
pub mod suspects;
pub mod tickets;

#[cfg(test)]
mod testutil;
