use std::path::PathBuf;

/// Errors that can occur while resolving merge risk.
///
/// Backend failures are classified into these variants where they are
/// raised, so callers never have to inspect libgit2 error text. Every
/// variant is also a `miette` diagnostic, which the binary reports as-is.
///
/// # Examples
///
/// ```
/// use gitrisk_core::GitRiskError;
///
/// let err = GitRiskError::NotFound("deadbeef".into());
/// assert!(err.to_string().contains("deadbeef"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GitRiskError {
    /// The reference does not name any commit.
    #[error("reference not found: {0}")]
    #[diagnostic(
        code(git_risk::not_found),
        help("pass a commit hash, branch, or tag that exists in this repository")
    )]
    NotFound(String),

    /// An abbreviated reference matches more than one object.
    #[error("ambiguous reference: {0}")]
    #[diagnostic(
        code(git_risk::ambiguous_ref),
        help("use a longer hash prefix")
    )]
    AmbiguousRef(String),

    /// The commit has fewer than two parents.
    #[error("{hash} is not a merge commit ({parents} parent(s))")]
    #[diagnostic(code(git_risk::not_a_merge))]
    NotAMergeCommit {
        /// Full hash of the offending commit.
        hash: String,
        /// Number of parents it actually has.
        parents: usize,
    },

    /// No common ancestor exists, or the input list was empty.
    #[error("no merge base: {0}")]
    #[diagnostic(code(git_risk::no_merge_base))]
    NoMergeBase(String),

    /// A line of a validation file did not match the ticket pattern.
    #[error("line {line_number} does not match the ticket pattern: {line:?}")]
    #[diagnostic(code(git_risk::pattern_mismatch))]
    PatternMismatch {
        /// 1-based line number within the file.
        line_number: usize,
        /// The offending line, untrimmed.
        line: String,
    },

    /// The ticket spec is not a valid regular expression.
    #[error("invalid ticket pattern: {0}")]
    #[diagnostic(code(git_risk::pattern), help("check 'ticket-spec' under [main]"))]
    Pattern(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(git_risk::config))]
    Config(String),

    /// Any other git backend failure.
    #[error("git error: {0}")]
    Git(String),

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
