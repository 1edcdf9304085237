use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};

use crate::app::{errors, AppServices};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new().route("/metrics", get(metrics))
}

pub async fn metrics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.dashboard.metrics(tenant.tenant_id()).await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
