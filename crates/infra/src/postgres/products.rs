//! Product catalog store: single-statement reads and writes, no transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::instrument;

use aether_core::{Money, ProductId, TenantId};

use super::{map_sqlx_error, money_column, LOW_STOCK_THRESHOLD};
use crate::store::StoreError;

/// Input for product creation (already validated at the HTTP edge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i32,
    pub sku: Option<String>,
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Tenant-wide catalog aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductMetrics {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub inventory_value: Money,
}

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, product), fields(tenant_id = %tenant_id, name = %product.name), err)]
    pub async fn create_product(
        &self,
        tenant_id: TenantId,
        product: NewProduct,
    ) -> Result<ProductRecord, StoreError> {
        let id = ProductId::new();

        let row = sqlx::query(
            r#"
            INSERT INTO products (id, tenant_id, name, description, price, stock_quantity, sku)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING is_active, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(tenant_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.into_decimal())
        .bind(product.stock_quantity)
        .bind(&product.sku)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        Ok(ProductRecord {
            id,
            tenant_id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock_quantity: product.stock_quantity,
            sku: product.sku,
            is_active: row
                .try_get("is_active")
                .map_err(|e| StoreError::Storage(format!("decode is_active: {e}")))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| StoreError::Storage(format!("decode created_at: {e}")))?,
        })
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub async fn list_products(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, stock_quantity, sku, is_active, created_at
            FROM products
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let id: uuid::Uuid = row
                .try_get("id")
                .map_err(|e| StoreError::Storage(format!("decode id: {e}")))?;
            products.push(ProductRecord {
                id: ProductId::from_uuid(id),
                tenant_id,
                name: row
                    .try_get("name")
                    .map_err(|e| StoreError::Storage(format!("decode name: {e}")))?,
                description: row
                    .try_get("description")
                    .map_err(|e| StoreError::Storage(format!("decode description: {e}")))?,
                price: money_column(&row, "price")?,
                stock_quantity: row
                    .try_get("stock_quantity")
                    .map_err(|e| StoreError::Storage(format!("decode stock_quantity: {e}")))?,
                sku: row
                    .try_get("sku")
                    .map_err(|e| StoreError::Storage(format!("decode sku: {e}")))?,
                is_active: row
                    .try_get("is_active")
                    .map_err(|e| StoreError::Storage(format!("decode is_active: {e}")))?,
                created_at: row
                    .try_get("created_at")
                    .map_err(|e| StoreError::Storage(format!("decode created_at: {e}")))?,
            });
        }

        Ok(products)
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub async fn product_metrics(&self, tenant_id: TenantId) -> Result<ProductMetrics, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_products,
                COUNT(*) FILTER (WHERE stock_quantity < $2) AS low_stock_count,
                COALESCE(SUM(price * stock_quantity), 0) AS inventory_value
            FROM products
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("product_metrics", e))?;

        Ok(ProductMetrics {
            total_products: row
                .try_get("total_products")
                .map_err(|e| StoreError::Storage(format!("decode total_products: {e}")))?,
            low_stock_count: row
                .try_get("low_stock_count")
                .map_err(|e| StoreError::Storage(format!("decode low_stock_count: {e}")))?,
            inventory_value: money_column(&row, "inventory_value")?,
        })
    }
}
