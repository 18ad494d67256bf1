//! In-memory row storage for entity types.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::TenancyResult;
use crate::manager::TenantManager;

use super::model::{Entity, EntityType};
use super::query::Query;

/// Rows of a single entity type held in memory.
///
/// Creation runs the tenant stamper before the row is stored; updates and
/// deletes go through the entity type's scoped query and the manager's
/// ownership check.
#[derive(Debug)]
pub struct MemoryTable {
    entity_type: Arc<EntityType>,
    rows: RwLock<Vec<Map<String, Value>>>,
}

impl MemoryTable {
    /// Creates an empty table for the entity type.
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Returns the entity type stored in this table.
    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    /// Persists a new entity, stamping its tenant columns first.
    ///
    /// The row is stored as it is after stamping. If no tenant is registered
    /// yet the stamp is deferred: a later
    /// [`flush_deferred`](TenantManager::flush_deferred) fills the instance's
    /// tenant columns but not the stored row, which stays outside every
    /// tenant scope until it is written again with the columns set.
    pub fn insert(&self, manager: &mut TenantManager, entity: &Arc<Entity>) {
        manager.stamp_new_record(entity);
        self.rows.write().push(entity.attributes());
    }

    /// Stores a row as-is, bypassing the creation hook.
    pub fn insert_raw(&self, row: Map<String, Value>) {
        self.rows.write().push(row);
    }

    /// Returns the rows matching the query.
    pub fn get(&self, query: &Query) -> Vec<Map<String, Value>> {
        self.rows
            .read()
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect()
    }

    /// Returns the rows visible through the entity type's installed scopes.
    pub fn all(&self) -> Vec<Map<String, Value>> {
        self.get(&self.entity_type.new_query())
    }

    /// Counts the rows matching the query.
    pub fn count(&self, query: &Query) -> usize {
        self.rows.read().iter().filter(|row| query.matches(row)).count()
    }

    /// Applies `changes` to the stored row of `entity` and to the instance.
    ///
    /// Returns the number of rows updated.
    pub fn update(
        &self,
        manager: &TenantManager,
        entity: &Entity,
        changes: Map<String, Value>,
    ) -> TenancyResult<usize> {
        manager.authorize_mutation(entity)?;

        let Some(query) = self.key_query(entity) else {
            return Ok(0);
        };

        let mut updated = 0;
        for row in self.rows.write().iter_mut().filter(|row| query.matches(row)) {
            for (name, value) in &changes {
                row.insert(name.clone(), value.clone());
            }
            updated += 1;
        }

        entity.fill(&changes);
        Ok(updated)
    }

    /// Deletes the stored row of `entity`.
    ///
    /// Returns the number of rows deleted.
    pub fn delete(&self, manager: &TenantManager, entity: &Entity) -> TenancyResult<usize> {
        manager.authorize_mutation(entity)?;

        let Some(query) = self.key_query(entity) else {
            return Ok(0);
        };

        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| !query.matches(row));
        Ok(before - rows.len())
    }

    fn key_query(&self, entity: &Entity) -> Option<Query> {
        let key = entity.key()?;
        let mut query = self.entity_type.new_query();
        query.where_eq(
            self.entity_type.qualified_column(self.entity_type.primary_key()),
            key,
        );
        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice_type() -> Arc<EntityType> {
        Arc::new(
            EntityType::new("invoice")
                .with_table("invoices")
                .with_tenant_columns(["org_id"]),
        )
    }

    #[test]
    fn test_insert_stores_stamped_row() {
        let table = MemoryTable::new(invoice_type());
        let mut manager = TenantManager::new();
        manager.add_tenant("org_id", 4).unwrap();

        let invoice = Arc::new(Entity::new(table.entity_type().clone()).with_attribute("id", 1));
        table.insert(&mut manager, &invoice);

        let rows = table.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("org_id"), Some(&json!(4)));
    }

    #[test]
    fn test_deferred_insert_keeps_unstamped_row() {
        let table = MemoryTable::new(invoice_type());
        let mut manager = TenantManager::new();

        let invoice = Arc::new(Entity::new(table.entity_type().clone()).with_attribute("id", 1));
        manager.boot(&invoice);
        table.insert(&mut manager, &invoice);

        manager.add_tenant("org_id", 3).unwrap();
        manager.flush_deferred();

        assert_eq!(invoice.attribute("org_id"), Some(json!(3)));
        assert!(table.all().is_empty());

        let unscoped = manager.new_query_without_tenants(&*invoice);
        let rows = table.get(&unscoped);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("org_id"), None);
    }

    #[test]
    fn test_mutation_without_key_is_noop() {
        let table = MemoryTable::new(invoice_type());
        table.insert_raw(json!({"id": 1, "org_id": 1}).as_object().cloned().unwrap());
        let manager = TenantManager::new();

        let keyless = Entity::new(table.entity_type().clone());
        assert_eq!(table.delete(&manager, &keyless).unwrap(), 0);
        assert_eq!(table.count(&table.entity_type().new_query()), 1);
    }
}
