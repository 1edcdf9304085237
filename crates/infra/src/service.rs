//! The order service: validation, pricing, and the atomic write path.

use thiserror::Error;
use tracing::instrument;

use aether_core::{CustomerId, DomainError, OrderId, ProductId, TenantId};
use aether_inventory::LedgerError;
use aether_orders::{price_order, LineItem, OrderDetails, OrderSummary};

use crate::store::{OrderStore, StoreError};

/// Outcome taxonomy of the order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The request was malformed (empty item list, non-positive quantity,
    /// negative price). Rejected before any transaction opens.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// One or more items could not be reserved: not enough stock, or the
    /// product does not exist for this tenant. The whole transaction was
    /// rolled back; nothing changed. A terminal business outcome, not a
    /// transient fault.
    #[error("stock unavailable for product {product_id}")]
    StockUnavailable { product_id: ProductId },

    /// The referenced customer or order does not exist.
    #[error("not found")]
    NotFound,

    /// Underlying storage failure. The transaction was rolled back, so the
    /// whole call is safe to retry.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Stock(LedgerError::InsufficientStock { product_id })
            | StoreError::Stock(LedgerError::NotFound { product_id }) => {
                OrderError::StockUnavailable { product_id }
            }
            StoreError::CustomerNotFound | StoreError::OrderNotFound => OrderError::NotFound,
            StoreError::Storage(msg) => OrderError::Persistence(msg),
        }
    }
}

/// Orchestrates order creation and the order read paths.
#[derive(Debug, Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an order from a customer's line items.
    ///
    /// Totals are computed up front with exact arithmetic; the store then
    /// decrements stock and writes the header and item rows as one unit of
    /// work. Either the order exists with all its items and every decrement
    /// applied, or nothing happened at all.
    #[instrument(
        skip(self, items),
        fields(tenant_id = %tenant_id, customer_id = %customer_id, item_count = items.len()),
        err
    )]
    pub async fn create_order(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        items: &[LineItem],
    ) -> Result<OrderId, OrderError> {
        let priced = price_order(items)?;

        let order_id = self
            .store
            .create_order(tenant_id, customer_id, &priced)
            .await?;

        tracing::info!(order_id = %order_id, total_amount = %priced.total_amount, "order created");
        Ok(order_id)
    }

    /// All orders of a tenant, newest first. Read-only; never mutates state.
    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub async fn list_orders(&self, tenant_id: TenantId) -> Result<Vec<OrderSummary>, OrderError> {
        Ok(self.store.list_orders(tenant_id).await?)
    }

    /// Detail view of one order. Read-only; fails with
    /// [`OrderError::NotFound`] for an unknown order id.
    #[instrument(skip(self), fields(order_id = %order_id), err)]
    pub async fn get_order_details(&self, order_id: OrderId) -> Result<OrderDetails, OrderError> {
        let items = self.store.get_order_items(order_id).await?;
        Ok(OrderDetails { items })
    }
}
