//! Order repository and the Postgres order store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use aether_core::{CustomerId, Money, OrderId, TenantId};
use aether_orders::{OrderItemView, OrderStatus, OrderSummary, PricedLine, PricedOrder};

use super::{ledger, map_sqlx_error, money_column};
use crate::store::{OrderStore, StoreError};

/// Insert the order header row. Transaction-scoped.
pub async fn insert_order_header(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: TenantId,
    customer_id: CustomerId,
    total_amount: Money,
    status: OrderStatus,
) -> Result<OrderId, StoreError> {
    let order_id = OrderId::new();

    sqlx::query(
        r#"
        INSERT INTO orders (id, tenant_id, customer_id, total_amount, status)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(order_id.as_uuid())
    .bind(tenant_id.as_uuid())
    .bind(customer_id.as_uuid())
    .bind(total_amount.into_decimal())
    .bind(status.as_str())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_order_header", e))?;

    Ok(order_id)
}

/// Insert the order's item rows as one batch. Transaction-scoped.
pub async fn insert_order_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
    lines: &[PricedLine],
) -> Result<(), StoreError> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, total_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(order_id.as_uuid())
        .bind(line.product_id.as_uuid())
        .bind(line.quantity)
        .bind(line.unit_price.into_decimal())
        .bind(line.line_total.into_decimal())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order_items", e))?;
    }

    Ok(())
}

/// Postgres-backed [`OrderStore`].
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    /// The order-creation unit of work.
    ///
    /// Decrement stock for every line, then write the header and item rows,
    /// all inside one transaction. Every exit path except the final commit
    /// drops the [`Transaction`] guard, which rolls the whole unit back —
    /// including cancellation of the calling task mid-flight. No retry is
    /// attempted here: an unsatisfiable decrement is a terminal business
    /// outcome, not a transient fault.
    #[instrument(
        skip(self, order),
        fields(
            tenant_id = %tenant_id,
            customer_id = %customer_id,
            line_count = order.lines.len()
        ),
        err
    )]
    async fn create_order(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        order: &PricedOrder,
    ) -> Result<OrderId, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for line in &order.lines {
            ledger::decrement_if_available(&mut tx, tenant_id, line.product_id, line.quantity)
                .await?;
        }

        let order_id = insert_order_header(
            &mut tx,
            tenant_id,
            customer_id,
            order.total_amount,
            OrderStatus::Completed,
        )
        .await?;
        insert_order_items(&mut tx, order_id, &order.lines).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(order_id)
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    async fn list_orders(&self, tenant_id: TenantId) -> Result<Vec<OrderSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, c.name AS customer_name, o.total_amount, o.status, o.created_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.tenant_id = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders", e))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let id: Uuid = row
                .try_get("id")
                .map_err(|e| StoreError::Storage(format!("decode id: {e}")))?;
            let status: String = row
                .try_get("status")
                .map_err(|e| StoreError::Storage(format!("decode status: {e}")))?;

            summaries.push(OrderSummary {
                id: OrderId::from_uuid(id),
                customer_name: row
                    .try_get("customer_name")
                    .map_err(|e| StoreError::Storage(format!("decode customer_name: {e}")))?,
                total_amount: money_column(&row, "total_amount")?,
                status: status
                    .parse()
                    .map_err(|e| StoreError::Storage(format!("decode status: {e}")))?,
                created_at: row
                    .try_get("created_at")
                    .map_err(|e| StoreError::Storage(format!("decode created_at: {e}")))?,
            });
        }

        Ok(summaries)
    }

    #[instrument(skip(self), fields(order_id = %order_id), err)]
    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItemView>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT p.name AS product_name, oi.quantity, oi.unit_price, oi.total_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_order_items", e))?;

        // Zero items is ambiguous on its own: the order may be missing, or it
        // may exist with no lines. Check the header before reporting either.
        if rows.is_empty() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
                    .bind(order_id.as_uuid())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error("get_order_header", e))?;
            if !exists {
                return Err(StoreError::OrderNotFound);
            }
            return Ok(Vec::new());
        }

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(OrderItemView {
                product_name: row
                    .try_get("product_name")
                    .map_err(|e| StoreError::Storage(format!("decode product_name: {e}")))?,
                quantity: row
                    .try_get("quantity")
                    .map_err(|e| StoreError::Storage(format!("decode quantity: {e}")))?,
                unit_price: money_column(&row, "unit_price")?,
                line_total: money_column(&row, "total_price")?,
            });
        }

        Ok(items)
    }
}
