//! Entities waiting for tenants to be registered.

use std::fmt;
use std::sync::Arc;

use crate::entity::TenantAware;

use super::ScopePolicy;

/// An entity whose scoping was requested before any tenant was active.
///
/// The policy it asked for is stored with it so that flushing installs the
/// same kind of filter it would have received at boot.
#[derive(Clone)]
pub struct DeferredEntry {
    /// The deferred entity instance.
    pub entity: Arc<dyn TenantAware>,
    /// The policy requested for it.
    pub policy: ScopePolicy,
}

impl fmt::Debug for DeferredEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEntry")
            .field("entity_type", &self.entity.type_name())
            .field("policy", &self.policy)
            .finish()
    }
}

/// FIFO queue of deferred entities.
#[derive(Debug, Default)]
pub struct DeferralQueue {
    entries: Vec<DeferredEntry>,
}

impl DeferralQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an entity with the policy it requested.
    pub fn push(&mut self, entity: Arc<dyn TenantAware>, policy: ScopePolicy) {
        self.entries.push(DeferredEntry { entity, policy });
    }

    /// Removes and returns every queued entry, oldest first.
    pub fn drain(&mut self) -> Vec<DeferredEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Returns the number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
