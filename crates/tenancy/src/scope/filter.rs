//! The installed tenant row filter.

use std::fmt;

use serde_json::Value;

use crate::entity::{GlobalScope, Query};
use crate::tenant::{TenantColumn, TenantId};

use super::ScopeSwitch;

/// A row filter restricting one tenant column to a captured identifier set.
///
/// The identifier set is fixed when the scope is installed; the switch is
/// read each time a query is built.
///
/// # Example
///
/// ```
/// use helios_tenancy::entity::{GlobalScope, Query};
/// use helios_tenancy::scope::{ScopeSwitch, TenantScope};
/// use helios_tenancy::tenant::TenantId;
///
/// let switch = ScopeSwitch::default();
/// let scope = TenantScope::new(
///     "org_id".into(),
///     "invoices.org_id",
///     vec![TenantId::from(1)],
///     switch.clone(),
/// );
///
/// let mut query = Query::new("invoices");
/// scope.apply(&mut query);
/// assert_eq!(query.predicates().len(), 1);
///
/// switch.disable();
/// let mut query = Query::new("invoices");
/// scope.apply(&mut query);
/// assert!(query.predicates().is_empty());
/// ```
#[derive(Clone)]
pub struct TenantScope {
    column: TenantColumn,
    qualified_column: String,
    ids: Vec<TenantId>,
    switch: ScopeSwitch,
}

impl TenantScope {
    /// Creates a scope for the given column and identifiers.
    pub fn new(
        column: TenantColumn,
        qualified_column: impl Into<String>,
        ids: Vec<TenantId>,
        switch: ScopeSwitch,
    ) -> Self {
        Self {
            column,
            qualified_column: qualified_column.into(),
            ids,
            switch,
        }
    }

    /// Returns the tenant column this scope filters on.
    pub fn column(&self) -> &TenantColumn {
        &self.column
    }

    /// Returns the storage-level column name used in predicates.
    pub fn qualified_column(&self) -> &str {
        &self.qualified_column
    }

    /// Returns the identifiers accepted by this scope.
    pub fn ids(&self) -> &[TenantId] {
        &self.ids
    }
}

impl GlobalScope for TenantScope {
    fn apply(&self, query: &mut Query) {
        if !self.switch.is_enabled() {
            return;
        }

        let values: Vec<Value> = self.ids.iter().map(|id| id.as_value().clone()).collect();
        query.where_in(self.qualified_column.clone(), values);
    }
}

impl fmt::Debug for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantScope")
            .field("column", &self.column)
            .field("qualified_column", &self.qualified_column)
            .field("ids", &self.ids)
            .field("enabled", &self.switch.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Predicate;
    use serde_json::json;

    #[test]
    fn test_scope_contributes_in_predicate() {
        let scope = TenantScope::new(
            "tenant_a_id".into(),
            "models.tenant_a_id",
            vec![TenantId::from(1), TenantId::from(11)],
            ScopeSwitch::default(),
        );

        assert_eq!(scope.column(), "tenant_a_id");
        assert_eq!(scope.qualified_column(), "models.tenant_a_id");
        assert_eq!(scope.ids(), [TenantId::from(1), TenantId::from(11)]);

        let mut query = Query::new("models");
        scope.apply(&mut query);

        assert_eq!(
            query.predicates(),
            [Predicate::In {
                column: "models.tenant_a_id".to_string(),
                values: vec![json!(1), json!(11)],
            }]
        );
    }

    #[test]
    fn test_switch_read_at_query_time() {
        let switch = ScopeSwitch::new(false);
        let scope = TenantScope::new(
            "tenant_a_id".into(),
            "models.tenant_a_id",
            vec![TenantId::from(1)],
            switch.clone(),
        );

        let mut query = Query::new("models");
        scope.apply(&mut query);
        assert!(query.predicates().is_empty());

        switch.enable();
        let mut query = Query::new("models");
        scope.apply(&mut query);
        assert_eq!(query.predicates().len(), 1);
    }
}
