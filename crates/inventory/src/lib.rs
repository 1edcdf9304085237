//! `aether-inventory` — stock domain.
//!
//! The inventory ledger is the single source of truth for product stock.
//! This crate holds the pure half of its contract: the non-negative
//! [`StockLevel`] count and the [`LedgerError`] outcomes of a conditional
//! decrement. The storage half (the conditional `UPDATE` against Postgres)
//! lives in `aether-infra`.

pub mod stock;

pub use stock::{LedgerError, StockLevel};
