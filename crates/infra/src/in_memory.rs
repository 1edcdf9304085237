//! In-memory order store.
//!
//! Intended for tests/dev. The whole state sits behind one `RwLock`;
//! `create_order` validates every line under the write guard before mutating
//! anything, so the exactly-one-wins guarantee for competing decrements
//! holds here just as it does under row-level locking in Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use aether_core::{CustomerId, Money, OrderId, ProductId, TenantId};
use aether_inventory::{LedgerError, StockLevel};
use aether_orders::{OrderItemView, OrderStatus, OrderSummary, PricedLine, PricedOrder};

use crate::store::{OrderStore, StoreError};

#[derive(Debug, Clone)]
struct ProductEntry {
    tenant_id: TenantId,
    name: String,
    stock: StockLevel,
}

#[derive(Debug, Clone)]
struct CustomerEntry {
    tenant_id: TenantId,
    name: String,
}

#[derive(Debug, Clone)]
struct OrderRow {
    id: OrderId,
    tenant_id: TenantId,
    customer_id: CustomerId,
    total_amount: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, ProductEntry>,
    customers: HashMap<CustomerId, CustomerEntry>,
    orders: Vec<OrderRow>,
    items: HashMap<OrderId, Vec<PricedLine>>,
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    state: RwLock<State>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product with stock on hand.
    pub fn add_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        name: impl Into<String>,
        stock: StockLevel,
    ) {
        if let Ok(mut state) = self.state.write() {
            state.products.insert(
                product_id,
                ProductEntry {
                    tenant_id,
                    name: name.into(),
                    stock,
                },
            );
        }
    }

    /// Seed a customer.
    pub fn add_customer(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        name: impl Into<String>,
    ) {
        if let Ok(mut state) = self.state.write() {
            state.customers.insert(
                customer_id,
                CustomerEntry {
                    tenant_id,
                    name: name.into(),
                },
            );
        }
    }

    /// Current stock of a product, if it exists.
    pub fn stock_of(&self, product_id: ProductId) -> Option<i64> {
        let state = self.state.read().ok()?;
        state.products.get(&product_id).map(|p| p.stock.units())
    }

    /// Total number of persisted orders, across all tenants.
    pub fn order_count(&self) -> usize {
        self.state.read().map(|s| s.orders.len()).unwrap_or(0)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        order: &PricedOrder,
    ) -> Result<OrderId, StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        match state.customers.get(&customer_id) {
            Some(c) if c.tenant_id == tenant_id => {}
            _ => return Err(StoreError::CustomerNotFound),
        }

        // Validate every decrement before applying any, so a failing line
        // leaves the earlier ones untouched.
        for line in &order.lines {
            let product_id = line.product_id;
            match state.products.get(&product_id) {
                None => return Err(LedgerError::NotFound { product_id }.into()),
                Some(p) if p.tenant_id != tenant_id => {
                    return Err(LedgerError::NotFound { product_id }.into());
                }
                Some(p) if !p.stock.can_satisfy(i64::from(line.quantity)) => {
                    return Err(LedgerError::InsufficientStock { product_id }.into());
                }
                Some(_) => {}
            }
        }

        for line in &order.lines {
            let entry = state
                .products
                .get_mut(&line.product_id)
                .ok_or(LedgerError::NotFound {
                    product_id: line.product_id,
                })?;
            entry.stock = entry
                .stock
                .checked_decrement(i64::from(line.quantity))
                .ok_or(LedgerError::InsufficientStock {
                    product_id: line.product_id,
                })?;
        }

        let order_id = OrderId::new();
        state.orders.push(OrderRow {
            id: order_id,
            tenant_id,
            customer_id,
            total_amount: order.total_amount,
            status: OrderStatus::Completed,
            created_at: Utc::now(),
        });
        state.items.insert(order_id, order.lines.clone());

        Ok(order_id)
    }

    async fn list_orders(&self, tenant_id: TenantId) -> Result<Vec<OrderSummary>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        // Orders are appended in creation order; reverse for newest-first.
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.tenant_id == tenant_id)
            .map(|o| OrderSummary {
                id: o.id,
                customer_name: state
                    .customers
                    .get(&o.customer_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                total_amount: o.total_amount,
                status: o.status,
                created_at: o.created_at,
            })
            .collect())
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItemView>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let Some(lines) = state.items.get(&order_id) else {
            return Err(StoreError::OrderNotFound);
        };

        Ok(lines
            .iter()
            .map(|line| OrderItemView {
                product_name: state
                    .products
                    .get(&line.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
            })
            .collect())
    }
}
