//! Tenant scoping.
//!
//! This module holds the pieces the [`TenantManager`](crate::TenantManager)
//! uses to restrict queries to the active tenants:
//!
//! - [`ScopePolicy`] - Which identifiers of a column a filter accepts
//! - [`ScopeSwitch`] - Process-wide enable/disable switch read at query time
//! - [`relevant_columns`] - The registry subset applicable to an entity type
//! - [`TenantScope`] - The installed per-column row filter
//! - [`DeferralQueue`] - Entities waiting for the first tenant to be registered
//!
//! # Policies
//!
//! | Policy | Registry `org_id: [1, 11]` | Filter |
//! |--------|----------------------------|--------|
//! | Single active tenant | primary only | `org_id IN (1)` |
//! | Hierarchical | every identifier | `org_id IN (1, 11)` |

mod deferral;
mod filter;
mod resolver;

pub use deferral::{DeferralQueue, DeferredEntry};
pub use filter::TenantScope;
pub use resolver::relevant_columns;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::tenant::TenantId;

/// How a tenant filter selects identifiers from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
    /// Exactly one tenant is active: filter on the primary identifier only.
    #[default]
    SingleActiveTenant,

    /// The context is authorized for a chain of tenants: filter on every
    /// registered identifier of the column.
    Hierarchical,
}

impl ScopePolicy {
    /// Selects the identifiers a filter for this policy accepts.
    pub fn select(&self, ids: &[TenantId]) -> Vec<TenantId> {
        match self {
            ScopePolicy::SingleActiveTenant => ids.iter().take(1).cloned().collect(),
            ScopePolicy::Hierarchical => ids.to_vec(),
        }
    }
}

impl fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopePolicy::SingleActiveTenant => write!(f, "single-active-tenant"),
            ScopePolicy::Hierarchical => write!(f, "hierarchical"),
        }
    }
}

/// Shared enable/disable switch for tenant scoping.
///
/// Installed scopes hold a clone and read it when a query is built, so
/// toggling the switch affects every scope already installed.
#[derive(Debug, Clone)]
pub struct ScopeSwitch(Arc<AtomicBool>);

impl ScopeSwitch {
    /// Creates a switch in the given state.
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Turns scoping on.
    pub fn enable(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Turns scoping off.
    pub fn disable(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Returns `true` if scoping is on.
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for ScopeSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}
