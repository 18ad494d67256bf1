//! Tenant registry and tenant references.
//!
//! This module provides the types describing *which* tenants are active in
//! the current execution context.
//!
//! # Core Types
//!
//! - [`TenantColumn`] - Name of a tenant dimension (e.g. `org_id`)
//! - [`TenantId`] - Opaque, non-null tenant identifier
//! - [`TenantRegistry`] - Ordered mapping of columns to active identifiers
//! - [`TenantRef`] / [`TenantModel`] - A column name or a tenant entity
//!
//! # Primary Identifiers
//!
//! A column may hold several active identifiers. The first one registered is
//! the column's *primary* identifier: it is stamped onto new records and used
//! for single-active-tenant scoping. Hierarchical scoping uses all of them.
//!
//! ```
//! use helios_tenancy::tenant::{TenantId, TenantRegistry};
//!
//! let mut registry = TenantRegistry::new();
//! registry.insert("unit_id".into(), TenantId::from(10));
//! registry.insert("unit_id".into(), TenantId::from(1));
//!
//! assert_eq!(registry.primary("unit_id"), Some(&TenantId::from(10)));
//! assert_eq!(registry.get("unit_id").map(|ids| ids.len()), Some(2));
//! ```

mod column;
mod id;
mod reference;
mod registry;

pub use column::TenantColumn;
pub use id::TenantId;
pub use reference::{TenantModel, TenantRef};
pub use registry::TenantRegistry;
