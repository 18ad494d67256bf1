//! Tenant column type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The name of a tenant dimension.
///
/// A tenant column is both the key of the tenant registry and the entity
/// attribute that holds the owning tenant's identifier (e.g. `org_id`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantColumn(String);

impl TenantColumn {
    /// Creates a tenant column from the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the column name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TenantColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantColumn({})", self.0)
    }
}

impl From<&str> for TenantColumn {
    fn from(s: &str) -> Self {
        TenantColumn::new(s)
    }
}

impl From<String> for TenantColumn {
    fn from(s: String) -> Self {
        TenantColumn::new(s)
    }
}

impl AsRef<str> for TenantColumn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TenantColumn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TenantColumn {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TenantColumn {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
