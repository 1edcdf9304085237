use aether_core::TenantId;

/// Tenant context for a request.
///
/// Immutable and required on every tenant-scoped route. Inserted by the
/// tenant middleware from the `X-Tenant-Id` header; in a full deployment an
/// authentication collaborator would resolve it from the caller's identity
/// instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
