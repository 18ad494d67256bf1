//! Host entity capabilities.
//!
//! The tenancy engine does not own entities or queries. It relies on a small
//! set of capabilities from the host data-access layer, expressed by the
//! [`TenantAware`] trait and the [`Query`]/[`GlobalScope`] pair.
//!
//! An in-memory host is included ([`EntityType`], [`Entity`],
//! [`MemoryTable`]). It backs the crate's tests and is usable wherever a
//! lightweight row store is enough.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use helios_tenancy::entity::{Entity, EntityType, MemoryTable};
//! use helios_tenancy::TenantManager;
//! use serde_json::json;
//!
//! let invoices = Arc::new(EntityType::new("invoice").with_tenant_columns(["org_id"]));
//! let table = MemoryTable::new(invoices.clone());
//!
//! let mut manager = TenantManager::new();
//! manager.add_tenant("org_id", 1).unwrap();
//!
//! let invoice = Arc::new(Entity::new(invoices.clone()));
//! manager.boot(&invoice);
//! table.insert(&mut manager, &invoice);
//!
//! assert_eq!(invoice.attribute("org_id"), Some(json!(1)));
//! assert_eq!(table.get(&invoices.new_query()).len(), 1);
//! ```

mod model;
mod query;
mod store;

pub use model::{Entity, EntityType};
pub use query::{GlobalScope, Predicate, Query};
pub use store::MemoryTable;

use std::sync::Arc;

use serde_json::Value;

use crate::scope::ScopePolicy;
use crate::tenant::TenantColumn;

/// Capabilities an entity instance exposes to the tenancy engine.
///
/// Instances are shared (`Arc`), so attribute writes go through `&self`;
/// implementations use interior mutability.
pub trait TenantAware: Send + Sync {
    /// A name identifying the entity type, used in logs and errors.
    fn type_name(&self) -> &str;

    /// The tenant columns this entity type is scoped by.
    fn tenant_columns(&self) -> &[TenantColumn];

    /// The scoping policy this entity type uses when booted.
    fn scope_policy(&self) -> ScopePolicy {
        ScopePolicy::SingleActiveTenant
    }

    /// Reads an attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Writes an attribute.
    fn set_attribute(&self, name: &str, value: Value);

    /// Returns `true` if the attribute is present and not null.
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|value| !value.is_null())
    }

    /// Returns the storage-level name of a tenant column (e.g. `table.column`).
    fn qualified_column(&self, column: &str) -> String;

    /// Installs a global scope on the entity type, replacing any scope of the
    /// same name.
    fn add_global_scope(&self, name: &str, scope: Arc<dyn GlobalScope>);

    /// Builds a query for the entity type with the named scopes left out.
    fn new_query_without_scopes(&self, names: &[&str]) -> Query;
}
