use axum::Router;

pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/products", products::router())
        .nest("/customers", customers::router())
        .nest("/dashboard", dashboard::router())
}
