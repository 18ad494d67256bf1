//! Entity fixtures for tenancy testing.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Map, Value, json};

use helios_tenancy::entity::{Entity, EntityType, MemoryTable};

/// A flat entity type scoped by `tenant_a_id`.
pub fn model_type() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("model")
            .with_table("models")
            .with_tenant_columns(["tenant_a_id"]),
    )
}

/// A hierarchical entity type scoped by `tenant_a_id`.
pub fn hierarchy_type() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("model_b")
            .with_table("model_bs")
            .with_tenant_columns(["tenant_a_id"])
            .hierarchical(),
    )
}

/// A flat entity type scoped by two tenant columns.
pub fn ledger_type() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("ledger")
            .with_table("ledgers")
            .with_tenant_columns(["tenant_a_id", "tenant_b_id"]),
    )
}

/// A tenant entity whose foreign key is `tenant_a_id`.
pub fn tenant_a(id: i64) -> Entity {
    Entity::new(Arc::new(EntityType::new("tenant_a"))).with_attribute("id", id)
}

/// A tenant entity whose foreign key is `tenant_b_id`.
pub fn tenant_b(id: i64) -> Entity {
    Entity::new(Arc::new(EntityType::new("tenant_b"))).with_attribute("id", id)
}

/// Builds a row from a JSON object literal.
pub fn row(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

/// Creates a table holding one row per `(id, tenant_a_id)` pair.
pub fn seeded_table(entity_type: &Arc<EntityType>, rows: &[(i64, i64)]) -> MemoryTable {
    let table = MemoryTable::new(entity_type.clone());
    for (id, tenant) in rows {
        table.insert_raw(row(json!({"id": id, "tenant_a_id": tenant})));
    }
    table
}

/// Returns the `id` column of the given rows.
pub fn ids_of(rows: &[Map<String, Value>]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get("id").and_then(Value::as_i64))
        .collect()
}
