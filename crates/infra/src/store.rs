//! The order storage contract.
//!
//! [`OrderStore`] is the seam between the order service and durable storage.
//! Two implementations exist: [`crate::postgres::PgOrderStore`] (production)
//! and [`crate::in_memory::InMemoryOrderStore`] (tests/dev). Both must make
//! `create_order` atomic: all inventory decrements and row writes land
//! together, or none of them do.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use aether_core::{CustomerId, OrderId, TenantId};
use aether_inventory::LedgerError;
use aether_orders::{OrderItemView, OrderSummary, PricedOrder};

/// Storage-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An inventory decrement could not be satisfied. No write survives.
    #[error(transparent)]
    Stock(#[from] LedgerError),

    /// The referenced customer does not exist.
    #[error("customer not found")]
    CustomerNotFound,

    /// The referenced order does not exist.
    #[error("order not found")]
    OrderNotFound,

    /// Underlying storage/transport failure. The whole operation is safe to
    /// retry: nothing was committed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Durable storage for orders and the inventory they reserve.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Atomically decrement stock for every line, then persist the order
    /// header and its items.
    ///
    /// Implementations must guarantee that two concurrent calls competing
    /// for the same stock serialize: when only one can be satisfied, exactly
    /// one succeeds and the other observes [`LedgerError::InsufficientStock`]
    /// with no stock change.
    async fn create_order(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        order: &PricedOrder,
    ) -> Result<OrderId, StoreError>;

    /// All orders of a tenant, newest first. Read-only.
    async fn list_orders(&self, tenant_id: TenantId) -> Result<Vec<OrderSummary>, StoreError>;

    /// The item rows of one order. Read-only. Fails with
    /// [`StoreError::OrderNotFound`] when no such order header exists; an
    /// existing order with no items yields an empty vector.
    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItemView>, StoreError>;
}

#[async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn create_order(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        order: &PricedOrder,
    ) -> Result<OrderId, StoreError> {
        (**self).create_order(tenant_id, customer_id, order).await
    }

    async fn list_orders(&self, tenant_id: TenantId) -> Result<Vec<OrderSummary>, StoreError> {
        (**self).list_orders(tenant_id).await
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItemView>, StoreError> {
        (**self).get_order_items(order_id).await
    }
}
