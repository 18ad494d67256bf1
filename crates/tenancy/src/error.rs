//! Error types for the tenancy layer.
//!
//! Every failure in this crate is a synchronous validation error raised by
//! the [`TenantManager`](crate::TenantManager). There is no retry logic;
//! callers are expected to propagate these with `?`.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for tenancy operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TenancyError {
    /// No usable identifier could be determined for a tenant.
    #[error("tenant id must not be null for column '{column}'")]
    NullIdentifier { column: String },

    /// The tenant reference did not resolve to a registered column.
    #[error(
        "unknown tenant column '{column}': tenant must be a registered column name or a tenant model"
    )]
    UnknownTenantColumn { column: String },

    /// The row belongs to a tenant other than the primary active one.
    ///
    /// Reported as "not found" so that callers cannot tell a foreign row from
    /// a missing one.
    #[error("no query results for entity {entity_type}")]
    EntityNotFoundForTenant { entity_type: String },

    /// Invalid tenancy configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while validating a [`TenancyConfig`](crate::TenancyConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The tenant column pattern is not a valid regular expression.
    #[error("invalid tenant column pattern '{pattern}': {message}")]
    InvalidColumnPattern { pattern: String, message: String },
}

impl TenancyError {
    /// Returns `true` for errors that callers should treat as "row not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, TenancyError::EntityNotFoundForTenant { .. })
    }
}

/// Result type for tenancy operations.
pub type TenancyResult<T> = Result<T, TenancyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_identifier_display() {
        let err = TenancyError::NullIdentifier {
            column: "tenant_a_id".to_string(),
        };
        assert!(err.to_string().contains("tenant_a_id"));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_not_found_hides_tenant() {
        let err = TenancyError::EntityNotFoundForTenant {
            entity_type: "invoice".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no query results for entity invoice");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: TenancyError = ConfigError::InvalidColumnPattern {
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        }
        .into();
        assert!(matches!(err, TenancyError::Config(_)));
        assert!(!err.is_not_found());
    }
}
