//! Core types, configuration, and error handling for git-risk.
//!
//! This crate provides the shared foundation used by the other git-risk crates:
//! - [`GitRiskError`] — unified error type using `thiserror`
//! - [`GitRiskConfig`] — configuration loaded from `.gitrisk.toml`
//! - Shared types: [`TicketReference`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GitRiskConfig, MainConfig};
pub use error::GitRiskError;
pub use types::{OutputFormat, TicketReference};

/// A convenience `Result` type for git-risk operations.
pub type Result<T> = std::result::Result<T, GitRiskError>;
