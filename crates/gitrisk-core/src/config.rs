use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GitRiskError;

/// Top-level configuration loaded from `.gitrisk.toml`.
///
/// The only required setting is the ticket spec, a regular expression
/// under the `[main]` table.
///
/// # Examples
///
/// ```
/// use gitrisk_core::GitRiskConfig;
///
/// let config = GitRiskConfig::from_toml("[main]\nticket-spec = \"JM-[0-9]+\"").unwrap();
/// assert_eq!(config.ticket_spec().unwrap(), "JM-[0-9]+");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitRiskConfig {
    /// The `[main]` table.
    #[serde(default)]
    pub main: MainConfig,
}

/// Settings under the `[main]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainConfig {
    /// Regular expression that matches a ticket identifier.
    #[serde(rename = "ticket-spec")]
    pub ticket_spec: Option<String>,
}

impl GitRiskConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::FileNotFound`] if `path` does not exist,
    /// [`GitRiskError::Io`] if it cannot be read, or
    /// [`GitRiskError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitrisk_core::GitRiskConfig;
    /// use std::path::Path;
    ///
    /// let config = GitRiskConfig::from_file(Path::new(".gitrisk.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, GitRiskError> {
        if !path.exists() {
            return Err(GitRiskError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::Toml`] if parsing fails.
    pub fn from_toml(content: &str) -> Result<Self, GitRiskError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// The configured ticket spec.
    ///
    /// # Errors
    ///
    /// Returns [`GitRiskError::Config`] if `main.ticket-spec` is missing or blank.
    pub fn ticket_spec(&self) -> Result<&str, GitRiskError> {
        match self.main.ticket_spec.as_deref() {
            Some(spec) if !spec.trim().is_empty() => Ok(spec),
            _ => Err(GitRiskError::Config(
                "missing 'ticket-spec' in the [main] section".into(),
            )),
        }
    }
}
