//! Tenancy configuration.
//!
//! [`TenancyConfig`] controls the initial state of the scoping switch, which
//! tenant column names are accepted, and whether mutations are checked
//! against the primary active tenant.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a [`TenantManager`](crate::TenantManager).
///
/// # Example
///
/// ```
/// use helios_tenancy::TenancyConfig;
///
/// let config = TenancyConfig {
///     enforce_mutation_ownership: true,
///     ..Default::default()
/// };
/// assert!(config.enabled_by_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Whether tenant scopes are applied when the manager is created.
    #[serde(default = "default_true")]
    pub enabled_by_default: bool,

    /// Allowed tenant column names (regex pattern).
    ///
    /// Column names end up in query predicates, so they are restricted to
    /// plain identifiers unless configured otherwise.
    #[serde(default = "default_column_pattern")]
    pub column_pattern: String,

    /// Reject updates and deletes of rows owned by a tenant other than the
    /// primary active one.
    #[serde(default)]
    pub enforce_mutation_ownership: bool,
}

fn default_true() -> bool {
    true
}

fn default_column_pattern() -> String {
    r"^[A-Za-z_][A-Za-z0-9_]*$".to_string()
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: true,
            column_pattern: default_column_pattern(),
            enforce_mutation_ownership: false,
        }
    }
}

impl TenancyConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with scoping disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled_by_default = false;
        self
    }

    /// Sets the allowed column name pattern.
    pub fn with_column_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.column_pattern = pattern.into();
        self
    }

    /// Enables the mutation ownership check.
    pub fn with_mutation_ownership(mut self) -> Self {
        self.enforce_mutation_ownership = true;
        self
    }

    /// Compiles the column pattern.
    pub fn column_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.column_pattern).map_err(|e| ConfigError::InvalidColumnPattern {
            pattern: self.column_pattern.clone(),
            message: e.to_string(),
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.column_regex().map(|_| ())
    }
}
