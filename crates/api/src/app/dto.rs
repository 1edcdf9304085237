use serde::{Deserialize, Serialize};

use aether_infra::postgres::customers::CustomerKind;
use aether_orders::{OrderDetails, OrderItemView, OrderSummary};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateOrderItemRequest {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock_quantity: i32,
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OrderResponse {
    pub id: String,
    pub customer_name: String,
    pub total_amount: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OrderItemResponse {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub total_price: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OrderDetailsResponse {
    pub items: Vec<OrderItemResponse>,
}

/// Order lists carry a date, not a timestamp.
pub fn order_summary_to_response(summary: OrderSummary) -> OrderResponse {
    OrderResponse {
        id: summary.id.to_string(),
        customer_name: summary.customer_name,
        total_amount: summary.total_amount.to_string(),
        status: summary.status.to_string(),
        created_at: summary.created_at.format("%Y-%m-%d").to_string(),
    }
}

pub fn order_details_to_response(details: OrderDetails) -> OrderDetailsResponse {
    OrderDetailsResponse {
        items: details.items.into_iter().map(order_item_to_response).collect(),
    }
}

fn order_item_to_response(item: OrderItemView) -> OrderItemResponse {
    OrderItemResponse {
        product_name: item.product_name,
        quantity: item.quantity,
        unit_price: item.unit_price.to_string(),
        total_price: item.line_total.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_core::OrderId;
    use aether_orders::OrderStatus;
    use chrono::{TimeZone, Utc};

    #[test]
    fn order_summary_formats_date_and_money() {
        let id = OrderId::new();
        let response = order_summary_to_response(OrderSummary {
            id,
            customer_name: "Ada Lovelace".to_string(),
            total_amount: "44.98".parse().unwrap(),
            status: OrderStatus::Completed,
            created_at: Utc.with_ymd_and_hms(2024, 3, 7, 15, 4, 5).unwrap(),
        });

        assert_eq!(response.id, id.to_string());
        assert_eq!(response.total_amount, "44.98");
        assert_eq!(response.status, "completed");
        assert_eq!(response.created_at, "2024-03-07");
    }

    #[test]
    fn order_items_keep_two_decimal_strings() {
        let response = order_details_to_response(OrderDetails {
            items: vec![OrderItemView {
                product_name: "Widget".to_string(),
                quantity: 2,
                unit_price: "19.99".parse().unwrap(),
                line_total: "39.98".parse().unwrap(),
            }],
        });

        assert_eq!(response.items[0].unit_price, "19.99");
        assert_eq!(response.items[0].total_price, "39.98");
    }
}
