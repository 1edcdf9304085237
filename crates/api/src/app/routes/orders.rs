use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use aether_core::{CustomerId, OrderId};
use aether_orders::LineItem;

use crate::app::{dto, errors, AppServices};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order_details))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let customer_id: CustomerId = match body.customer_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    let mut items = Vec::with_capacity(body.items.len());
    for item in &body.items {
        let product_id = match item.product_id.parse() {
            Ok(v) => v,
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid product id",
                )
            }
        };
        let unit_price = match item.unit_price.parse() {
            Ok(v) => v,
            Err(e) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_price",
                    format!("{e}"),
                )
            }
        };
        items.push(LineItem {
            product_id,
            quantity: item.quantity,
            unit_price,
        });
    }

    match services
        .orders
        .create_order(tenant.tenant_id(), customer_id, &items)
        .await
    {
        Ok(order_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": order_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.orders.list_orders(tenant.tenant_id()).await {
        Ok(orders) => {
            let orders: Vec<_> = orders
                .into_iter()
                .map(dto::order_summary_to_response)
                .collect();
            (StatusCode::OK, Json(orders)).into_response()
        }
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn get_order_details(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    match services.orders.get_order_details(order_id).await {
        Ok(details) => {
            (StatusCode::OK, Json(dto::order_details_to_response(details))).into_response()
        }
        Err(e) => errors::order_error_to_response(e),
    }
}
