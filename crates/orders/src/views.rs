//! Read models returned by order queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use aether_core::{Money, OrderId};

use crate::order::OrderStatus;

/// One row of a tenant's order list, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer_name: String,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line of an order's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemView {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Detail view of a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    pub items: Vec<OrderItemView>,
}
