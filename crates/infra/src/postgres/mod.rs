//! Postgres-backed storage.
//!
//! All queries are tenant-scoped: every statement carries `tenant_id` in its
//! WHERE clause or insert column list, which makes cross-tenant access
//! impossible by construction. Money columns are `NUMERIC(12, 2)` and travel
//! as [`rust_decimal::Decimal`] through sqlx.
//!
//! ## Error mapping
//!
//! sqlx errors funnel through [`map_sqlx_error`]:
//!
//! | Postgres code | Constraint        | StoreError         |
//! |---------------|-------------------|--------------------|
//! | `23503`       | customer FK       | `CustomerNotFound` |
//! | anything else | —                 | `Storage`          |
//!
//! Insufficient stock never surfaces as a database error: the conditional
//! decrement reports it as zero rows affected (see [`ledger`]).

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use aether_core::Money;

use crate::store::StoreError;

pub mod customers;
pub mod dashboard;
pub mod ledger;
pub mod orders;
pub mod products;

pub use customers::PgCustomerStore;
pub use dashboard::PgDashboardStore;
pub use orders::PgOrderStore;
pub use products::PgProductStore;

/// Products with fewer units on hand than this count as "low stock".
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub(crate) fn map_sqlx_error(operation: &str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23503")
            && db.constraint().is_some_and(|c| c.contains("customer"))
        {
            return StoreError::CustomerNotFound;
        }
    }
    StoreError::Storage(format!("{operation}: {e}"))
}

/// Decode one money column, treating undecodable amounts as storage faults.
pub(crate) fn money_column(row: &PgRow, column: &str) -> Result<Money, StoreError> {
    let raw: rust_decimal::Decimal = row
        .try_get(column)
        .map_err(|e| StoreError::Storage(format!("decode {column}: {e}")))?;
    Money::try_from_decimal(raw).map_err(|e| StoreError::Storage(format!("decode {column}: {e}")))
}
