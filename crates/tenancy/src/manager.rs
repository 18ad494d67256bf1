//! The tenant manager.
//!
//! [`TenantManager`] owns the registry of active tenants and the deferral
//! queue for one execution context (typically one request). It installs
//! tenant scopes on entity types, stamps tenant identifiers onto new records
//! and builds unscoped queries for trusted code paths.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::config::TenancyConfig;
use crate::entity::{Query, TenantAware};
use crate::error::{TenancyError, TenancyResult};
use crate::scope::{
    DeferralQueue, DeferredEntry, ScopePolicy, ScopeSwitch, TenantScope, relevant_columns,
};
use crate::tenant::{TenantColumn, TenantId, TenantModel, TenantRef, TenantRegistry};

/// Registry of active tenants and entry point for tenant scoping.
///
/// A manager is a plain value without internal locking. Create one per
/// execution context and pass it to the data-access code that needs it;
/// sharing one manager between concurrent requests leaks tenants between
/// them.
///
/// Installed scopes live on the entity type and hold this manager's
/// identifiers and switch. An entity type that carries tenant scopes is
/// therefore per-context state as well: when several managers are alive at
/// once, each must scope its own copy (see [`EntityType::clone_definition`]).
/// Booting one shared type from two managers replaces the first manager's
/// scopes with the second's.
///
/// [`EntityType::clone_definition`]: crate::entity::EntityType::clone_definition
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use helios_tenancy::entity::{Entity, EntityType};
/// use helios_tenancy::TenantManager;
///
/// let mut manager = TenantManager::new();
/// manager.add_tenant("tenant_a_id", 1).unwrap();
/// manager.add_tenant("tenant_a_id", 11).unwrap();
///
/// let models = Arc::new(EntityType::new("model").with_tenant_columns(["tenant_a_id"]));
/// let model = Arc::new(Entity::new(models.clone()));
/// manager.apply_tenant_scopes(&model);
///
/// let (sql, _) = models.new_query().to_sql();
/// assert_eq!(sql, "SELECT * FROM model WHERE model.tenant_a_id IN (?)");
/// ```
#[derive(Debug)]
pub struct TenantManager {
    config: TenancyConfig,
    column_pattern: Regex,
    switch: ScopeSwitch,
    tenants: TenantRegistry,
    deferred: DeferralQueue,
}

impl TenantManager {
    /// Creates a manager with the default configuration.
    pub fn new() -> Self {
        let config = TenancyConfig::default();
        let column_pattern = config
            .column_regex()
            .expect("default column pattern is valid");
        Self::from_parts(config, column_pattern)
    }

    /// Creates a manager with the given configuration.
    pub fn with_config(config: TenancyConfig) -> TenancyResult<Self> {
        let column_pattern = config.column_regex()?;
        Ok(Self::from_parts(config, column_pattern))
    }

    fn from_parts(config: TenancyConfig, column_pattern: Regex) -> Self {
        Self {
            switch: ScopeSwitch::new(config.enabled_by_default),
            config,
            column_pattern,
            tenants: TenantRegistry::new(),
            deferred: DeferralQueue::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TenancyConfig {
        &self.config
    }

    /// Turns tenant scoping on for every installed scope.
    pub fn enable(&self) {
        self.switch.enable();
    }

    /// Turns tenant scoping off without uninstalling any scope.
    pub fn disable(&self) {
        self.switch.disable();
    }

    /// Returns `true` if tenant scoping is on.
    pub fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    /// Registers an active tenant identifier.
    ///
    /// `tenant` is a column name or a [`TenantModel`]. The identifier is
    /// appended to the column's list; the first one registered stays the
    /// column's primary identifier.
    ///
    /// # Errors
    ///
    /// - [`TenancyError::NullIdentifier`] if `id` is null.
    /// - [`TenancyError::UnknownTenantColumn`] if the column name is not a
    ///   valid tenant column.
    pub fn add_tenant<'a>(
        &mut self,
        tenant: impl Into<TenantRef<'a>>,
        id: impl Into<Value>,
    ) -> TenancyResult<()> {
        let tenant = tenant.into();
        let id = TenantId::try_new(id).ok_or_else(|| TenancyError::NullIdentifier {
            column: tenant.column().to_string(),
        })?;
        let column = self.resolve_column(&tenant)?;

        tracing::debug!("Adding tenant {}={}", column, id);
        self.tenants.insert(column, id);
        Ok(())
    }

    /// Registers a tenant model under its foreign key, using its own key as
    /// the identifier.
    ///
    /// # Errors
    ///
    /// [`TenancyError::NullIdentifier`] if the model has no key.
    pub fn add_tenant_model<M: TenantModel>(&mut self, model: &M) -> TenancyResult<()> {
        let tenant = TenantRef::from(model);
        let id = tenant.key().cloned().unwrap_or(Value::Null);
        self.add_tenant(tenant, id)
    }

    /// Removes one occurrence of a tenant identifier.
    ///
    /// Removing an identifier that is not registered is a no-op. A column
    /// with no identifiers left is dropped from the registry.
    pub fn remove_tenant<'a>(
        &mut self,
        tenant: impl Into<TenantRef<'a>>,
        id: impl Into<Value>,
    ) -> TenancyResult<()> {
        let column = self.resolve_column(&tenant.into())?;
        let Some(id) = TenantId::try_new(id) else {
            return Ok(());
        };

        if self.tenants.remove(column.as_str(), &id) {
            tracing::debug!("Removed tenant {}={}", column, id);
        }
        Ok(())
    }

    /// Returns `true` if the tenant column has at least one active identifier.
    pub fn has_tenant<'a>(&self, tenant: impl Into<TenantRef<'a>>) -> bool {
        self.tenants.contains(tenant.into().column())
    }

    /// Returns the registry of active tenants.
    pub fn tenants(&self) -> &TenantRegistry {
        &self.tenants
    }

    /// Returns the active identifiers for a tenant column.
    ///
    /// # Errors
    ///
    /// [`TenancyError::UnknownTenantColumn`] if the column has no active
    /// identifier.
    pub fn tenant_ids<'a>(&self, tenant: impl Into<TenantRef<'a>>) -> TenancyResult<&[TenantId]> {
        let tenant = tenant.into();
        self.tenants
            .get(tenant.column())
            .ok_or_else(|| TenancyError::UnknownTenantColumn {
                column: tenant.column().to_string(),
            })
    }

    /// Returns the primary identifier for a tenant column, if registered.
    pub fn primary_tenant(&self, column: &str) -> Option<&TenantId> {
        self.tenants.primary(column)
    }

    /// Returns the entities waiting for tenants to be registered.
    pub fn deferred(&self) -> &DeferralQueue {
        &self.deferred
    }

    /// Boots an entity type: applies scopes with its declared policy.
    pub fn boot<E: TenantAware + 'static>(&mut self, entity: &Arc<E>) {
        let policy = entity.scope_policy();
        self.apply_scopes(entity, policy);
    }

    /// Scopes an entity type to the primary identifier of each applicable
    /// tenant column.
    pub fn apply_tenant_scopes<E: TenantAware + 'static>(&mut self, entity: &Arc<E>) {
        self.apply_scopes(entity, ScopePolicy::SingleActiveTenant);
    }

    /// Scopes an entity type to every registered identifier of each
    /// applicable tenant column.
    pub fn apply_tenant_hierarchy_scopes<E: TenantAware + 'static>(&mut self, entity: &Arc<E>) {
        self.apply_scopes(entity, ScopePolicy::Hierarchical);
    }

    /// Installs one tenant scope per applicable column using `policy`.
    ///
    /// If no tenant is registered yet, the entity is deferred until
    /// [`flush_deferred`](Self::flush_deferred) runs.
    pub fn apply_scopes<E: TenantAware + 'static>(&mut self, entity: &Arc<E>, policy: ScopePolicy) {
        if self.tenants.is_empty() {
            self.defer(entity.clone(), policy);
            return;
        }

        for (column, ids) in relevant_columns(&self.tenants, &**entity) {
            self.install_scope(&**entity, column, policy.select(&ids));
        }
    }

    /// Applies scopes to every entity deferred before tenants were set up.
    ///
    /// Each entry is scoped with the policy it originally requested, and its
    /// unset tenant columns are filled with the primary identifiers. The
    /// queue is emptied; entries are not retried. Returns the number of
    /// entries processed.
    pub fn flush_deferred(&mut self) -> usize {
        let entries = self.deferred.drain();
        let count = entries.len();

        for DeferredEntry { entity, policy } in entries {
            let relevant = relevant_columns(&self.tenants, &*entity);
            if relevant.is_empty() {
                tracing::warn!(
                    "No active tenants apply to deferred {} entity; leaving it unscoped",
                    entity.type_name()
                );
                continue;
            }

            for (column, ids) in relevant {
                let ids = policy.select(&ids);
                if !entity.has_attribute(column.as_str()) {
                    if let Some(primary) = ids.first() {
                        entity.set_attribute(column.as_str(), primary.as_value().clone());
                    }
                }
                self.install_scope(&*entity, column, ids);
            }
        }

        if count > 0 {
            tracing::debug!("Flushed {} deferred entities", count);
        }
        count
    }

    /// Fills unset tenant columns of a new record with the primary
    /// identifiers. Explicitly set values are never overwritten.
    ///
    /// Does nothing while scoping is disabled. If no tenant is registered
    /// yet, the entity is deferred instead.
    pub fn stamp_new_record<E: TenantAware + 'static>(&mut self, entity: &Arc<E>) {
        if !self.is_enabled() {
            return;
        }

        if self.tenants.is_empty() {
            let policy = entity.scope_policy();
            self.defer(entity.clone(), policy);
            return;
        }

        for (column, ids) in relevant_columns(&self.tenants, &**entity) {
            if entity.has_attribute(column.as_str()) {
                continue;
            }
            if let Some(primary) = ids.first() {
                entity.set_attribute(column.as_str(), primary.as_value().clone());
            }
        }
    }

    /// Builds a query for the entity type with every tenant scope removed.
    ///
    /// Scopes named after any registered tenant column are left out of this
    /// query only; the installed scopes are untouched.
    pub fn new_query_without_tenants<E: TenantAware + ?Sized>(&self, entity: &E) -> Query {
        let columns: Vec<&str> = self.tenants.columns().map(TenantColumn::as_str).collect();
        entity.new_query_without_scopes(&columns)
    }

    /// Checks that an entity belongs to the primary active tenant before it
    /// is updated or deleted.
    ///
    /// Only enforced when [`TenancyConfig::enforce_mutation_ownership`] is set
    /// and scoping is enabled. Every applicable tenant column must hold that
    /// column's primary identifier.
    ///
    /// An entity with no applicable tenant column, because none of its
    /// declared columns has an active tenant, is allowed through. Hosts that
    /// must refuse mutations of such entities check
    /// [`relevant_columns`](crate::scope::relevant_columns) themselves.
    ///
    /// # Errors
    ///
    /// [`TenancyError::EntityNotFoundForTenant`], indistinguishable from a
    /// missing row.
    pub fn authorize_mutation<E: TenantAware + ?Sized>(&self, entity: &E) -> TenancyResult<()> {
        if !self.config.enforce_mutation_ownership || !self.is_enabled() {
            return Ok(());
        }

        for (column, ids) in relevant_columns(&self.tenants, entity) {
            let owned = match (ids.first(), entity.attribute(column.as_str())) {
                (Some(primary), Some(value)) => primary.matches(&value),
                _ => false,
            };

            if !owned {
                tracing::warn!(
                    "Refusing mutation of {} entity outside primary tenant {}",
                    entity.type_name(),
                    column
                );
                return Err(TenancyError::EntityNotFoundForTenant {
                    entity_type: entity.type_name().to_string(),
                });
            }
        }

        Ok(())
    }

    fn defer(&mut self, entity: Arc<dyn TenantAware>, policy: ScopePolicy) {
        tracing::debug!(
            "No tenants registered; deferring {} scoping ({})",
            entity.type_name(),
            policy
        );
        self.deferred.push(entity, policy);
    }

    fn install_scope(&self, entity: &dyn TenantAware, column: TenantColumn, ids: Vec<TenantId>) {
        let qualified = entity.qualified_column(column.as_str());
        tracing::debug!(
            "Installing tenant scope on {}: {} IN {:?}",
            entity.type_name(),
            qualified,
            ids
        );

        let name = column.as_str().to_string();
        let scope = TenantScope::new(column, qualified, ids, self.switch.clone());
        entity.add_global_scope(&name, Arc::new(scope));
    }

    fn resolve_column(&self, tenant: &TenantRef<'_>) -> TenancyResult<TenantColumn> {
        let column = tenant.column();
        if !self.column_pattern.is_match(column) {
            return Err(TenancyError::UnknownTenantColumn {
                column: column.to_string(),
            });
        }
        Ok(TenantColumn::new(column))
    }
}

impl Default for TenantManager {
    fn default() -> Self {
        Self::new()
    }
}
