//! Customer store: single-statement reads and writes, no transaction.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::instrument;

use aether_core::{CustomerId, DomainError, TenantId};

use super::map_sqlx_error;
use crate::store::StoreError;

/// Whether a customer is a person or a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerKind {
    Individual,
    Company,
}

impl CustomerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerKind::Individual => "individual",
            CustomerKind::Company => "company",
        }
    }
}

impl FromStr for CustomerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(CustomerKind::Individual),
            "company" => Ok(CustomerKind::Company),
            other => Err(DomainError::validation(format!("unknown customer kind {other:?}"))),
        }
    }
}

/// Input for customer creation (already validated at the HTTP edge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub kind: CustomerKind,
}

/// One customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub tenant_id: TenantId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, customer), fields(tenant_id = %tenant_id, name = %customer.name), err)]
    pub async fn create_customer(
        &self,
        tenant_id: TenantId,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, StoreError> {
        let id = CustomerId::new();

        let row = sqlx::query(
            r#"
            INSERT INTO customers (id, tenant_id, name, email, phone, document, kind)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(tenant_id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.document)
        .bind(customer.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_customer", e))?;

        Ok(CustomerRecord {
            id,
            tenant_id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            document: customer.document,
            kind: customer.kind,
            created_at: row
                .try_get("created_at")
                .map_err(|e| StoreError::Storage(format!("decode created_at: {e}")))?,
        })
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub async fn list_customers(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<CustomerRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, document, kind, created_at
            FROM customers
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_customers", e))?;

        let mut customers = Vec::with_capacity(rows.len());
        for row in rows {
            let id: uuid::Uuid = row
                .try_get("id")
                .map_err(|e| StoreError::Storage(format!("decode id: {e}")))?;
            let kind: String = row
                .try_get("kind")
                .map_err(|e| StoreError::Storage(format!("decode kind: {e}")))?;
            customers.push(CustomerRecord {
                id: CustomerId::from_uuid(id),
                tenant_id,
                name: row
                    .try_get("name")
                    .map_err(|e| StoreError::Storage(format!("decode name: {e}")))?,
                email: row
                    .try_get("email")
                    .map_err(|e| StoreError::Storage(format!("decode email: {e}")))?,
                phone: row
                    .try_get("phone")
                    .map_err(|e| StoreError::Storage(format!("decode phone: {e}")))?,
                document: row
                    .try_get("document")
                    .map_err(|e| StoreError::Storage(format!("decode document: {e}")))?,
                kind: kind
                    .parse()
                    .map_err(|e| StoreError::Storage(format!("decode kind: {e}")))?,
                created_at: row
                    .try_get("created_at")
                    .map_err(|e| StoreError::Storage(format!("decode created_at: {e}")))?,
            });
        }

        Ok(customers)
    }
}
