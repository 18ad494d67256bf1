//! Resolution of the tenant columns that apply to an entity type.

use crate::entity::TenantAware;
use crate::tenant::{TenantColumn, TenantId, TenantRegistry};

/// Returns the registered tenants applicable to an entity.
///
/// This is the intersection of the entity's declared tenant columns with the
/// columns currently present in the registry, in registry order. It reads the
/// live registry on every call.
pub fn relevant_columns<E>(
    registry: &TenantRegistry,
    entity: &E,
) -> Vec<(TenantColumn, Vec<TenantId>)>
where
    E: TenantAware + ?Sized,
{
    registry.only(entity.tenant_columns())
}
