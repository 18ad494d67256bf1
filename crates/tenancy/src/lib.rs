//! Helios Row-Level Multitenancy
//!
//! This crate restricts which rows a data-access layer can see, and stamps
//! tenant identifiers onto newly created rows, based on the tenants that are
//! active in the current execution context.
//!
//! # Features
//!
//! - **Tenant registry**: Ordered active identifiers per tenant column
//! - **Automatic scoping**: A revocable `column IN (ids)` filter installed on
//!   every tenant-aware entity type
//! - **Two policies**: Single active tenant (primary identifier only) or
//!   hierarchical (every registered identifier)
//! - **Deferred scoping**: Entity types booted before any tenant is active are
//!   scoped once tenants are set up
//! - **Record stamping**: New rows receive the primary identifier of each
//!   unset tenant column
//! - **Global switch**: Disable every installed filter for administrative
//!   queries without uninstalling them
//!
//! # Architecture
//!
//! - [`tenant`] - Tenant columns, identifiers, references and the registry
//! - [`scope`] - Scope policies, the switch, installed filters and deferral
//! - [`manager`] - [`TenantManager`], the per-context entry point
//! - [`entity`] - Capabilities required from the host, plus an in-memory host
//! - [`config`] - [`TenancyConfig`]
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use helios_tenancy::TenantManager;
//! use helios_tenancy::entity::{Entity, EntityType, MemoryTable};
//! use serde_json::json;
//!
//! let invoices = Arc::new(EntityType::new("invoice").with_tenant_columns(["org_id"]));
//! let table = MemoryTable::new(invoices.clone());
//!
//! // One manager per request
//! let mut manager = TenantManager::new();
//! manager.add_tenant("org_id", 1).unwrap();
//! manager.boot(&Arc::new(Entity::new(invoices.clone())));
//!
//! // New rows are stamped with the active tenant
//! let mine = Arc::new(Entity::new(invoices.clone()).with_attribute("id", 1));
//! table.insert(&mut manager, &mine);
//! assert_eq!(mine.attribute("org_id"), Some(json!(1)));
//!
//! // Rows of other tenants are filtered out
//! let theirs = Arc::new(
//!     Entity::new(invoices.clone())
//!         .with_attribute("id", 2)
//!         .with_attribute("org_id", 2),
//! );
//! table.insert(&mut manager, &theirs);
//! assert_eq!(table.all().len(), 1);
//!
//! // Trusted code paths can bypass tenant scopes for one query
//! let unscoped = manager.new_query_without_tenants(&*mine);
//! assert_eq!(table.get(&unscoped).len(), 2);
//! ```
//!
//! # Execution Contexts
//!
//! A [`TenantManager`] and the entity types it scopes form one execution
//! context. Scopes are installed on the entity type, so concurrent contexts
//! each boot their own copy of a shared definition:
//!
//! ```
//! use std::sync::Arc;
//! use helios_tenancy::TenantManager;
//! use helios_tenancy::entity::{Entity, EntityType};
//!
//! let invoices = EntityType::new("invoice").with_tenant_columns(["org_id"]);
//!
//! let mut first = TenantManager::new();
//! first.add_tenant("org_id", 1).unwrap();
//! let first_invoices = Arc::new(invoices.clone_definition());
//! first.boot(&Arc::new(Entity::new(first_invoices.clone())));
//!
//! let mut second = TenantManager::new();
//! second.add_tenant("org_id", 2).unwrap();
//! let second_invoices = Arc::new(invoices.clone_definition());
//! second.boot(&Arc::new(Entity::new(second_invoices.clone())));
//!
//! assert_eq!(first_invoices.new_query().to_sql().1, vec![serde_json::json!(1)]);
//! assert_eq!(second_invoices.new_query().to_sql().1, vec![serde_json::json!(2)]);
//! ```
//!
//! # Deferred Scoping
//!
//! Entity types are often booted before the request's tenants are known.
//! Scoping requested against an empty registry is queued and applied by
//! [`TenantManager::flush_deferred`] once tenant setup completes:
//!
//! ```
//! use std::sync::Arc;
//! use helios_tenancy::TenantManager;
//! use helios_tenancy::entity::{Entity, EntityType};
//! use serde_json::json;
//!
//! let reports = Arc::new(
//!     EntityType::new("report")
//!         .with_tenant_columns(["unit_id"])
//!         .hierarchical(),
//! );
//!
//! let mut manager = TenantManager::new();
//! let report = Arc::new(Entity::new(reports.clone()));
//! manager.boot(&report);
//! assert_eq!(manager.deferred().len(), 1);
//!
//! manager.add_tenant("unit_id", 10).unwrap();
//! manager.add_tenant("unit_id", 1).unwrap();
//! manager.flush_deferred();
//!
//! assert_eq!(report.attribute("unit_id"), Some(json!(10)));
//! assert!(reports.has_global_scope("unit_id"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod entity;
pub mod error;
pub mod manager;
pub mod scope;
pub mod tenant;

// Re-export commonly used types at crate root
pub use config::TenancyConfig;
pub use error::{ConfigError, TenancyError, TenancyResult};
pub use manager::TenantManager;
pub use scope::{ScopePolicy, TenantScope};
pub use tenant::{TenantColumn, TenantId, TenantModel, TenantRef, TenantRegistry};

// Re-export host capabilities
pub use entity::{GlobalScope, Query, TenantAware};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
