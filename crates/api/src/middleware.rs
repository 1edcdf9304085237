use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use aether_core::TenantId;

use crate::app::errors::json_error;
use crate::context::TenantContext;

/// Header carrying the caller's tenant id, pending a real auth collaborator.
pub const TENANT_HEADER: &str = "x-tenant-id";

pub async fn tenant_middleware(mut req: Request, next: Next) -> Result<Response, Response> {
    let tenant_id = extract_tenant(req.headers())?;

    req.extensions_mut().insert(TenantContext::new(tenant_id));

    Ok(next.run(req).await)
}

fn extract_tenant(headers: &HeaderMap) -> Result<TenantId, Response> {
    let header = headers.get(TENANT_HEADER).ok_or_else(|| {
        json_error(
            StatusCode::UNAUTHORIZED,
            "missing_tenant",
            "X-Tenant-Id header is required",
        )
    })?;

    let header = header.to_str().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_tenant",
            "X-Tenant-Id header is not valid text",
        )
    })?;

    header.trim().parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_tenant",
            "X-Tenant-Id header is not a valid tenant id",
        )
    })
}
