//! Registry of active tenants.
//!
//! The [`TenantRegistry`] maps each tenant column to the ordered list of
//! identifiers currently active for it. The first identifier of a column is
//! its *primary* identifier.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::column::TenantColumn;
use super::id::TenantId;

/// Ordered mapping from tenant column to active identifiers.
///
/// Invariants:
///
/// - A column present in the registry always has at least one identifier.
///   Removing the last identifier removes the column.
/// - Columns and identifiers keep their insertion order.
/// - Identifiers are not deduplicated; each add needs a matching remove.
///
/// # Examples
///
/// ```
/// use helios_tenancy::tenant::{TenantId, TenantRegistry};
///
/// let mut registry = TenantRegistry::new();
/// registry.insert("tenant_a_id".into(), TenantId::from(1));
/// registry.insert("tenant_a_id".into(), TenantId::from(11));
///
/// assert_eq!(registry.primary("tenant_a_id"), Some(&TenantId::from(1)));
///
/// registry.remove("tenant_a_id", &TenantId::from(1));
/// assert_eq!(registry.primary("tenant_a_id"), Some(&TenantId::from(11)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantRegistry {
    entries: Vec<(TenantColumn, Vec<TenantId>)>,
}

impl TenantRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an identifier to a column, creating the column if needed.
    pub fn insert(&mut self, column: TenantColumn, id: TenantId) {
        match self.position(column.as_str()) {
            Some(idx) => self.entries[idx].1.push(id),
            None => self.entries.push((column, vec![id])),
        }
    }

    /// Removes one occurrence of an identifier from a column.
    ///
    /// Returns `true` if an identifier was removed. The column is dropped
    /// once it has no identifiers left.
    pub fn remove(&mut self, column: &str, id: &TenantId) -> bool {
        let Some(idx) = self.position(column) else {
            return false;
        };

        let ids = &mut self.entries[idx].1;
        let removed = match ids.iter().position(|existing| existing == id) {
            Some(pos) => {
                ids.remove(pos);
                true
            }
            None => false,
        };

        if ids.is_empty() {
            self.entries.remove(idx);
        }

        removed
    }

    /// Returns `true` if the column has at least one active identifier.
    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Returns the identifiers registered for a column.
    pub fn get(&self, column: &str) -> Option<&[TenantId]> {
        self.position(column)
            .map(|idx| self.entries[idx].1.as_slice())
    }

    /// Returns the primary (first registered) identifier for a column.
    pub fn primary(&self, column: &str) -> Option<&TenantId> {
        self.get(column).and_then(|ids| ids.first())
    }

    /// Returns `true` if no tenant is registered at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of registered columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the registered columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &TenantColumn> + '_ {
        self.entries.iter().map(|(column, _)| column)
    }

    /// Restricts the registry to the given columns.
    ///
    /// The result keeps registry order, not the order of `columns`.
    pub fn only<'a, I>(&self, columns: I) -> Vec<(TenantColumn, Vec<TenantId>)>
    where
        I: IntoIterator<Item = &'a TenantColumn>,
    {
        let wanted: Vec<&TenantColumn> = columns.into_iter().collect();
        self.entries
            .iter()
            .filter(|(column, _)| wanted.contains(&column))
            .cloned()
            .collect()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.as_str() == column)
    }
}

impl Serialize for TenantRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, ids) in &self.entries {
            map.serialize_entry(column, ids)?;
        }
        map.end()
    }
}
