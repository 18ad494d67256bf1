//! In-memory entity types and instances.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::scope::ScopePolicy;
use crate::tenant::{TenantColumn, TenantModel};

use super::query::{GlobalScope, Query};
use super::TenantAware;

/// Type-level description of an entity, shared by all its instances.
///
/// Global scopes are installed per entity type: every query built through
/// [`new_query`](Self::new_query) applies them in installation order.
///
/// # Example
///
/// ```
/// use helios_tenancy::entity::EntityType;
/// use helios_tenancy::scope::ScopePolicy;
///
/// let units = EntityType::new("report")
///     .with_table("reports")
///     .with_tenant_columns(["unit_id"])
///     .hierarchical();
///
/// assert_eq!(units.table(), "reports");
/// assert_eq!(units.policy(), ScopePolicy::Hierarchical);
/// assert_eq!(units.foreign_key(), "report_id");
/// ```
pub struct EntityType {
    name: String,
    table: String,
    primary_key: String,
    tenant_columns: Vec<TenantColumn>,
    policy: ScopePolicy,
    scopes: RwLock<Vec<(String, Arc<dyn GlobalScope>)>>,
}

impl EntityType {
    /// Creates an entity type; the table defaults to the type name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            primary_key: "id".to_string(),
            tenant_columns: Vec::new(),
            policy: ScopePolicy::default(),
            scopes: RwLock::new(Vec::new()),
        }
    }

    /// Sets the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the primary key attribute.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Declares the tenant columns this type is scoped by.
    pub fn with_tenant_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<TenantColumn>,
    {
        self.tenant_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the scoping policy.
    pub fn with_policy(mut self, policy: ScopePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Uses the hierarchical scoping policy.
    pub fn hierarchical(self) -> Self {
        self.with_policy(ScopePolicy::Hierarchical)
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the primary key attribute.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Returns the declared tenant columns.
    pub fn tenant_columns(&self) -> &[TenantColumn] {
        &self.tenant_columns
    }

    /// Returns the scoping policy.
    pub fn policy(&self) -> ScopePolicy {
        self.policy
    }

    /// Column under which other rows reference this type (`{name}_{primary_key}`).
    pub fn foreign_key(&self) -> String {
        format!("{}_{}", self.name, self.primary_key)
    }

    /// Returns `column` qualified with this type's table.
    pub fn qualified_column(&self, column: &str) -> String {
        format!("{}.{}", self.table, column)
    }

    /// Installs a global scope, replacing an existing scope of the same name
    /// in place.
    pub fn add_global_scope(&self, name: &str, scope: Arc<dyn GlobalScope>) {
        let mut scopes = self.scopes.write();
        match scopes.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = scope,
            None => scopes.push((name.to_string(), scope)),
        }
    }

    /// Removes a global scope. Returns `true` if it was installed.
    pub fn remove_global_scope(&self, name: &str) -> bool {
        let mut scopes = self.scopes.write();
        let before = scopes.len();
        scopes.retain(|(existing, _)| existing != name);
        scopes.len() != before
    }

    /// Returns `true` if a scope with this name is installed.
    pub fn has_global_scope(&self, name: &str) -> bool {
        self.scopes.read().iter().any(|(existing, _)| existing == name)
    }

    /// Returns the names of the installed scopes in installation order.
    pub fn global_scope_names(&self) -> Vec<String> {
        self.scopes
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Returns a copy of this type's definition with no scopes installed.
    ///
    /// Installed scopes are per-context state. A process-wide definition is
    /// copied for each execution context and the copy is booted by that
    /// context's [`TenantManager`](crate::TenantManager).
    pub fn clone_definition(&self) -> Self {
        Self {
            name: self.name.clone(),
            table: self.table.clone(),
            primary_key: self.primary_key.clone(),
            tenant_columns: self.tenant_columns.clone(),
            policy: self.policy,
            scopes: RwLock::new(Vec::new()),
        }
    }

    /// Builds a query with every installed scope applied.
    pub fn new_query(&self) -> Query {
        self.new_query_without_scopes(&[])
    }

    /// Builds a query with every installed scope except the named ones.
    ///
    /// The exclusion only affects this query.
    pub fn new_query_without_scopes(&self, excluded: &[&str]) -> Query {
        let mut query = Query::new(self.table.clone());
        for (name, scope) in self.scopes.read().iter() {
            if !excluded.contains(&name.as_str()) {
                query.apply_scope(name, scope.as_ref());
            }
        }
        query
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("tenant_columns", &self.tenant_columns)
            .field("policy", &self.policy)
            .field("scopes", &self.global_scope_names())
            .finish()
    }
}

/// An entity instance: an entity type plus an attribute map.
///
/// Instances are meant to be shared as `Arc<Entity>`; attributes can be
/// written through a shared reference.
#[derive(Debug)]
pub struct Entity {
    entity_type: Arc<EntityType>,
    attributes: RwLock<Map<String, Value>>,
}

impl Entity {
    /// Creates an instance with no attributes.
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            attributes: RwLock::new(Map::new()),
        }
    }

    /// Sets an attribute while building the instance.
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.write().insert(name.into(), value.into());
        self
    }

    /// Returns the entity type.
    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    /// Reads an attribute.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    /// Writes an attribute.
    pub fn set_attribute(&self, name: &str, value: impl Into<Value>) {
        self.attributes.write().insert(name.to_string(), value.into());
    }

    /// Merges attributes into the instance.
    pub fn fill(&self, attributes: &Map<String, Value>) {
        let mut current = self.attributes.write();
        for (name, value) in attributes {
            current.insert(name.clone(), value.clone());
        }
    }

    /// Returns a copy of all attributes.
    pub fn attributes(&self) -> Map<String, Value> {
        self.attributes.read().clone()
    }

    /// Returns the primary key value, if set.
    pub fn key(&self) -> Option<Value> {
        self.attribute(self.entity_type.primary_key())
            .filter(|value| !value.is_null())
    }
}

impl TenantAware for Entity {
    fn type_name(&self) -> &str {
        self.entity_type.name()
    }

    fn tenant_columns(&self) -> &[TenantColumn] {
        self.entity_type.tenant_columns()
    }

    fn scope_policy(&self) -> ScopePolicy {
        self.entity_type.policy()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        Entity::attribute(self, name)
    }

    fn set_attribute(&self, name: &str, value: Value) {
        Entity::set_attribute(self, name, value)
    }

    fn qualified_column(&self, column: &str) -> String {
        self.entity_type.qualified_column(column)
    }

    fn add_global_scope(&self, name: &str, scope: Arc<dyn GlobalScope>) {
        self.entity_type.add_global_scope(name, scope)
    }

    fn new_query_without_scopes(&self, names: &[&str]) -> Query {
        self.entity_type.new_query_without_scopes(names)
    }
}

impl TenantModel for Entity {
    fn foreign_key(&self) -> String {
        self.entity_type.foreign_key()
    }

    fn key(&self) -> Option<Value> {
        Entity::key(self)
    }
}
