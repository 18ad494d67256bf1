//! Tenant registry integration tests.
//!
//! These tests exercise registration and removal of active tenants through
//! the public `TenantManager` API.

mod common;

use serde_json::{Value, json};

use helios_tenancy::{TenancyError, TenantId, TenantManager};

use common::*;

fn registry_json(manager: &TenantManager) -> Value {
    serde_json::to_value(manager.tenants()).unwrap()
}

// ============================================================================
// Column Name Tests
// ============================================================================

/// Test that column names add and remove tenants.
#[test]
fn test_tenants_with_strings() {
    let mut manager = TenantManager::new();

    manager.add_tenant("tenant_a_id", 1).unwrap();
    assert_eq!(registry_json(&manager), json!({"tenant_a_id": [1]}));

    manager.add_tenant("tenant_b_id", 2).unwrap();
    assert_eq!(
        registry_json(&manager),
        json!({"tenant_a_id": [1], "tenant_b_id": [2]})
    );

    manager.remove_tenant("tenant_a_id", 1).unwrap();
    assert_eq!(registry_json(&manager), json!({"tenant_b_id": [2]}));

    assert!(manager.has_tenant("tenant_b_id"));
    assert!(!manager.has_tenant("tenant_a_id"));
}

/// Test that a column keeps several identifiers and promotes the next one to primary.
#[test]
fn test_tenant_with_multiple_ids() {
    let mut manager = TenantManager::new();

    manager.add_tenant("tenant_a_id", 1).unwrap();
    manager.add_tenant("tenant_a_id", 11).unwrap();
    manager.add_tenant("tenant_b_id", 2).unwrap();
    manager.add_tenant("tenant_b_id", 22).unwrap();

    assert_eq!(
        registry_json(&manager),
        json!({"tenant_a_id": [1, 11], "tenant_b_id": [2, 22]})
    );

    manager.remove_tenant("tenant_a_id", 1).unwrap();

    assert_eq!(
        registry_json(&manager),
        json!({"tenant_a_id": [11], "tenant_b_id": [2, 22]})
    );
    assert_eq!(manager.primary_tenant("tenant_a_id"), Some(&TenantId::from(11)));
}

/// Test that the registry serializes columns in insertion order.
#[test]
fn test_registry_keeps_insertion_order() {
    let mut manager = TenantManager::new();

    manager.add_tenant("tenant_b_id", 2).unwrap();
    manager.add_tenant("tenant_a_id", 1).unwrap();
    manager.add_tenant("tenant_b_id", 22).unwrap();

    let json = serde_json::to_string(manager.tenants()).unwrap();
    assert_eq!(json, r#"{"tenant_b_id":[2,22],"tenant_a_id":[1]}"#);
}

/// Test that duplicate identifiers each need their own removal.
#[test]
fn test_duplicate_ids_kept() {
    let mut manager = TenantManager::new();

    manager.add_tenant("tenant_a_id", 1).unwrap();
    manager.add_tenant("tenant_a_id", 1).unwrap();
    assert_eq!(manager.tenant_ids("tenant_a_id").unwrap().len(), 2);

    manager.remove_tenant("tenant_a_id", 1).unwrap();
    assert!(manager.has_tenant("tenant_a_id"));

    manager.remove_tenant("tenant_a_id", 1).unwrap();
    assert!(!manager.has_tenant("tenant_a_id"));
}

/// Test that removing an unregistered identifier leaves the registry unchanged.
#[test]
fn test_remove_unknown_id_is_noop() {
    let mut manager = TenantManager::new();
    manager.add_tenant("tenant_a_id", 1).unwrap();

    manager.remove_tenant("tenant_a_id", 99).unwrap();
    manager.remove_tenant("tenant_z_id", 1).unwrap();
    manager.remove_tenant("tenant_a_id", Value::Null).unwrap();

    assert_eq!(registry_json(&manager), json!({"tenant_a_id": [1]}));
}

/// Test that string identifiers are accepted as-is.
#[test]
fn test_string_identifiers() {
    let mut manager = TenantManager::new();
    manager.add_tenant("org_id", "acme").unwrap();
    manager.add_tenant("org_id", "acme-research").unwrap();

    assert_eq!(
        manager.tenant_ids("org_id").unwrap(),
        [TenantId::from("acme"), TenantId::from("acme-research")]
    );
}

// ============================================================================
// Tenant Model Tests
// ============================================================================

/// Test that tenant models register under their foreign key.
#[test]
fn test_tenants_with_models() {
    let mut manager = TenantManager::new();
    let first = tenant_a(1);
    let second = tenant_b(2);

    manager.add_tenant_model(&first).unwrap();
    assert_eq!(registry_json(&manager), json!({"tenant_a_id": [1]}));

    manager.add_tenant_model(&second).unwrap();
    assert_eq!(
        registry_json(&manager),
        json!({"tenant_a_id": [1], "tenant_b_id": [2]})
    );

    manager.remove_tenant(&first, 1).unwrap();
    assert_eq!(registry_json(&manager), json!({"tenant_b_id": [2]}));

    assert!(manager.has_tenant("tenant_b_id"));
    assert!(manager.has_tenant(&second));
    assert!(!manager.has_tenant(&first));
}

/// Test that a tenant model can be registered with an explicit identifier.
#[test]
fn test_model_with_explicit_id() {
    let mut manager = TenantManager::new();
    let tenant = tenant_a(1);

    manager.add_tenant(&tenant, 5).unwrap();
    assert_eq!(manager.tenant_ids(&tenant).unwrap(), [TenantId::from(5)]);
}

// ============================================================================
// Error Tests
// ============================================================================

/// Test that a null identifier is rejected whatever the column.
#[test]
fn test_null_id_always_rejected() {
    let mut manager = TenantManager::new();

    for column in ["tenant_a_id", "tenant_b_id", "not a column", ""] {
        let err = manager.add_tenant(column, Value::Null).unwrap_err();
        assert!(
            matches!(err, TenancyError::NullIdentifier { .. }),
            "expected NullIdentifier for {column:?}, got {err:?}"
        );
    }
    assert!(manager.tenants().is_empty());
}

/// Test that a tenant model without a key cannot be registered.
#[test]
fn test_model_without_key_rejected() {
    let mut manager = TenantManager::new();
    let keyless = tenant_a(1);
    keyless.set_attribute("id", Value::Null);

    let err = manager.add_tenant_model(&keyless).unwrap_err();
    assert_eq!(
        err,
        TenancyError::NullIdentifier {
            column: "tenant_a_id".to_string()
        }
    );
}

/// Test that asking for the identifiers of an absent column fails.
#[test]
fn test_get_tenant_ids_unregistered_column() {
    let manager = TenantManager::new();

    let err = manager.tenant_ids("unregistered_column").unwrap_err();
    assert_eq!(
        err,
        TenancyError::UnknownTenantColumn {
            column: "unregistered_column".to_string()
        }
    );
}

/// Test that column names outside the configured pattern are rejected.
#[test]
fn test_unresolvable_column_rejected() {
    let mut manager = TenantManager::new();

    let err = manager.add_tenant("", 1).unwrap_err();
    assert!(matches!(err, TenancyError::UnknownTenantColumn { .. }));

    let err = manager.remove_tenant("tenant-a id", 1).unwrap_err();
    assert!(matches!(err, TenancyError::UnknownTenantColumn { .. }));
}
