//! Dashboard metrics: tenant-wide aggregate reads.

use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::instrument;

use aether_core::{Money, TenantId};

use super::{map_sqlx_error, money_column, LOW_STOCK_THRESHOLD};
use crate::store::StoreError;

/// The numbers shown on a tenant's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total_revenue: Money,
    pub sales_count: i64,
    pub customers_count: i64,
    pub low_stock_count: i64,
}

#[derive(Debug, Clone)]
pub struct PgDashboardStore {
    pool: PgPool,
}

impl PgDashboardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub async fn metrics(&self, tenant_id: TenantId) -> Result<DashboardMetrics, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE tenant_id = $1)
                    AS total_revenue,
                (SELECT COUNT(*) FROM orders WHERE tenant_id = $1) AS sales_count,
                (SELECT COUNT(*) FROM customers WHERE tenant_id = $1) AS customers_count,
                (SELECT COUNT(*) FROM products WHERE tenant_id = $1 AND stock_quantity < $2)
                    AS low_stock_count
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("dashboard_metrics", e))?;

        Ok(DashboardMetrics {
            total_revenue: money_column(&row, "total_revenue")?,
            sales_count: row
                .try_get("sales_count")
                .map_err(|e| StoreError::Storage(format!("decode sales_count: {e}")))?,
            customers_count: row
                .try_get("customers_count")
                .map_err(|e| StoreError::Storage(format!("decode customers_count: {e}")))?,
            low_stock_count: row
                .try_get("low_stock_count")
                .map_err(|e| StoreError::Storage(format!("decode low_stock_count: {e}")))?,
        })
    }
}
