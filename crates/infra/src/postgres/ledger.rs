//! Inventory ledger: the conditional stock decrement.

use sqlx::{Postgres, Transaction};
use tracing::instrument;

use aether_core::{ProductId, TenantId};
use aether_inventory::LedgerError;

use super::map_sqlx_error;
use crate::store::StoreError;

/// Decrement a product's stock by `quantity`, only if that much is on hand.
///
/// Check and decrement are a single conditional `UPDATE`, not a read
/// followed by a write: under row-level locking two transactions racing for
/// the last units serialize on the row, and the loser's predicate re-check
/// sees the decremented count. Zero rows affected means the predicate
/// failed; a follow-up read splits that into "not enough stock" vs "no such
/// product for this tenant". Neither error path leaves any side effect.
///
/// Runs inside the caller's transaction, so the decrement commits or rolls
/// back together with the order rows.
#[instrument(
    skip(tx),
    fields(tenant_id = %tenant_id, product_id = %product_id, quantity)
)]
pub async fn decrement_if_available(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: TenantId,
    product_id: ProductId,
    quantity: i32,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock_quantity = stock_quantity - $3
        WHERE id = $1 AND tenant_id = $2 AND stock_quantity >= $3
        "#,
    )
    .bind(product_id.as_uuid())
    .bind(tenant_id.as_uuid())
    .bind(quantity)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("decrement_stock", e))?;

    if result.rows_affected() == 0 {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM products WHERE id = $1 AND tenant_id = $2)",
        )
        .bind(product_id.as_uuid())
        .bind(tenant_id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("decrement_stock_check", e))?;

        let err = if exists {
            LedgerError::InsufficientStock { product_id }
        } else {
            LedgerError::NotFound { product_id }
        };
        return Err(err.into());
    }

    Ok(())
}
