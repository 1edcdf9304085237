//! `aether-orders` — order domain (pure).
//!
//! Validation and pricing of order requests, the order status enumeration,
//! and the read models served back to clients. No storage concerns here;
//! the atomic write path lives in `aether-infra`.

pub mod order;
pub mod views;

pub use order::{price_order, LineItem, OrderStatus, PricedLine, PricedOrder};
pub use views::{OrderDetails, OrderItemView, OrderSummary};
