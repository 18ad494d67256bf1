//! Tenant identifier type.
//!
//! This module defines the [`TenantId`] type, an opaque, comparable
//! identifier for a tenant. Identifiers are never null.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque tenant identifier.
///
/// `TenantId` wraps whatever value the host stores in its tenant columns
/// (integers, strings, UUID strings, ...). The only constraint is that it is
/// not `null`; no other shape validation is performed.
///
/// # Examples
///
/// ```
/// use helios_tenancy::tenant::TenantId;
/// use serde_json::json;
///
/// let id = TenantId::from(42);
/// assert_eq!(id.as_value(), &json!(42));
///
/// assert!(TenantId::try_new(json!(null)).is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub struct TenantId(Value);

impl TenantId {
    /// Creates a tenant ID from a JSON value, returning `None` for `null`.
    pub fn try_new(value: impl Into<Value>) -> Option<Self> {
        match value.into() {
            Value::Null => None,
            value => Some(Self(value)),
        }
    }

    /// Returns the underlying value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns `true` if the given attribute value equals this ID.
    pub fn matches(&self, value: &Value) -> bool {
        &self.0 == value
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantId({})", self.0)
    }
}

impl From<i64> for TenantId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<u64> for TenantId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<i32> for TenantId {
    fn from(id: i32) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(Value::from(id))
    }
}

impl TryFrom<Value> for TenantId {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        TenantId::try_new(value).ok_or_else(|| "tenant id must not be null".to_string())
    }
}

impl From<TenantId> for Value {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tenant_id_creation() {
        let id = TenantId::try_new(json!(1)).unwrap();
        assert_eq!(id, TenantId::from(1));
        assert_eq!(id.to_string(), "1");
    }

    #[test]
    fn test_null_rejected() {
        assert!(TenantId::try_new(Value::Null).is_none());
        assert!(TenantId::try_new(None::<i64>).is_none());
    }

    #[test]
    fn test_string_display() {
        let id = TenantId::from("acme");
        assert_eq!(id.to_string(), "acme");
        assert_eq!(format!("{:?}", id), "TenantId(\"acme\")");
    }

    #[test]
    fn test_matches_by_value() {
        let id = TenantId::from(11);
        assert!(id.matches(&json!(11)));
        assert!(!id.matches(&json!("11")));
        assert!(!id.matches(&Value::Null));
    }

    #[test]
    fn test_serde_as_plain_value() {
        let id = TenantId::from("acme");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"acme\"");

        let parsed: TenantId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        assert!(serde_json::from_str::<TenantId>("null").is_err());
    }
}
