//! Tenant references.
//!
//! Registry operations accept either a raw column name or a tenant model
//! (an entity that *is* a tenant, such as an organization row). A model is
//! resolved to a column through its foreign key and to an identifier
//! through its own key.

use std::borrow::Cow;

use serde_json::Value;

use super::column::TenantColumn;

/// An entity that can act as a tenant.
///
/// # Examples
///
/// ```
/// use helios_tenancy::tenant::TenantModel;
/// use serde_json::{Value, json};
///
/// struct Organization {
///     id: i64,
/// }
///
/// impl TenantModel for Organization {
///     fn foreign_key(&self) -> String {
///         "organization_id".to_string()
///     }
///
///     fn key(&self) -> Option<Value> {
///         Some(json!(self.id))
///     }
/// }
/// ```
pub trait TenantModel {
    /// The column under which rows reference this tenant.
    fn foreign_key(&self) -> String;

    /// This tenant's own identifier, if it has been assigned one.
    fn key(&self) -> Option<Value>;
}

/// A reference to a tenant dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum TenantRef<'a> {
    /// A raw tenant column name.
    Column(Cow<'a, str>),

    /// A resolved tenant model.
    Model {
        /// The model's foreign key (the tenant column).
        foreign_key: String,
        /// The model's own identifier.
        key: Option<Value>,
    },
}

impl TenantRef<'_> {
    /// Returns the tenant column this reference resolves to.
    pub fn column(&self) -> &str {
        match self {
            TenantRef::Column(column) => column,
            TenantRef::Model { foreign_key, .. } => foreign_key,
        }
    }

    /// Returns the identifier carried by a model reference.
    pub fn key(&self) -> Option<&Value> {
        match self {
            TenantRef::Column(_) => None,
            TenantRef::Model { key, .. } => key.as_ref(),
        }
    }
}

impl<'a> From<&'a str> for TenantRef<'a> {
    fn from(column: &'a str) -> Self {
        TenantRef::Column(Cow::Borrowed(column))
    }
}

impl<'a> From<&'a String> for TenantRef<'a> {
    fn from(column: &'a String) -> Self {
        TenantRef::Column(Cow::Borrowed(column.as_str()))
    }
}

impl From<String> for TenantRef<'_> {
    fn from(column: String) -> Self {
        TenantRef::Column(Cow::Owned(column))
    }
}

impl<'a> From<&'a TenantColumn> for TenantRef<'a> {
    fn from(column: &'a TenantColumn) -> Self {
        TenantRef::Column(Cow::Borrowed(column.as_str()))
    }
}

impl<M: TenantModel> From<&M> for TenantRef<'_> {
    fn from(model: &M) -> Self {
        TenantRef::Model {
            foreign_key: model.foreign_key(),
            key: model.key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Team {
        id: Option<i64>,
    }

    impl TenantModel for Team {
        fn foreign_key(&self) -> String {
            "team_id".to_string()
        }

        fn key(&self) -> Option<Value> {
            self.id.map(Value::from)
        }
    }

    #[test]
    fn test_column_reference() {
        let tenant = TenantRef::from("tenant_a_id");
        assert_eq!(tenant.column(), "tenant_a_id");
        assert_eq!(tenant.key(), None);
    }

    #[test]
    fn test_model_reference() {
        let team = Team { id: Some(7) };
        let tenant = TenantRef::from(&team);
        assert_eq!(tenant.column(), "team_id");
        assert_eq!(tenant.key(), Some(&json!(7)));
    }

    #[test]
    fn test_model_without_key() {
        let team = Team { id: None };
        assert_eq!(TenantRef::from(&team).key(), None);
    }
}
