use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use aether_infra::{OrderError, StoreError};

pub fn order_error_to_response(err: OrderError) -> axum::response::Response {
    match err {
        OrderError::Validation(e) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
        OrderError::StockUnavailable { product_id } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "stock_unavailable",
            format!("insufficient stock or unknown product {product_id}"),
        ),
        OrderError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        OrderError::Persistence(msg) => {
            tracing::error!(error = %msg, "order operation failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage failure",
            )
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::CustomerNotFound | StoreError::OrderNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        StoreError::Stock(e) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "stock_unavailable", e.to_string())
        }
        StoreError::Storage(msg) => {
            tracing::error!(error = %msg, "storage operation failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage failure",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_core::{DomainError, ProductId};

    #[test]
    fn order_errors_map_to_expected_statuses() {
        let cases = [
            (
                order_error_to_response(OrderError::Validation(DomainError::validation("bad"))),
                StatusCode::BAD_REQUEST,
            ),
            (
                order_error_to_response(OrderError::StockUnavailable {
                    product_id: ProductId::new(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                order_error_to_response(OrderError::NotFound),
                StatusCode::NOT_FOUND,
            ),
            (
                order_error_to_response(OrderError::Persistence("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }
}
