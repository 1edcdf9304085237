//! HTTP application wiring (axum router + store wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;

use aether_infra::{
    OrderService, PgCustomerStore, PgDashboardStore, PgOrderStore, PgProductStore,
};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Store and service handles shared by all handlers.
pub struct AppServices {
    pub orders: OrderService<PgOrderStore>,
    pub products: PgProductStore,
    pub customers: PgCustomerStore,
    pub dashboard: PgDashboardStore,
}

pub fn build_services(pool: PgPool) -> AppServices {
    AppServices {
        orders: OrderService::new(PgOrderStore::new(pool.clone())),
        products: PgProductStore::new(pool.clone()),
        customers: PgCustomerStore::new(pool.clone()),
        dashboard: PgDashboardStore::new(pool),
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(pool: PgPool) -> Router {
    let services = Arc::new(build_services(pool));

    // Tenant-scoped routes: require the tenant context.
    let tenant_scoped = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::tenant_middleware))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", tenant_scoped)
}
