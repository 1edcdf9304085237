//! Stock levels and the conditional-decrement contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aether_core::{DomainError, DomainResult, ProductId};

/// Outcome of a failed conditional decrement.
///
/// Both variants are side-effect free: a ledger implementation must leave
/// stock untouched when it returns either of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Current stock is lower than the requested quantity.
    #[error("insufficient stock for product {product_id}")]
    InsufficientStock { product_id: ProductId },

    /// The product does not exist, or belongs to a different tenant.
    #[error("product {product_id} not found")]
    NotFound { product_id: ProductId },
}

/// A non-negative number of stock units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLevel(i64);

impl StockLevel {
    pub fn new(units: i64) -> DomainResult<Self> {
        if units < 0 {
            return Err(DomainError::validation("stock quantity must not be negative"));
        }
        Ok(Self(units))
    }

    pub fn units(self) -> i64 {
        self.0
    }

    pub fn can_satisfy(self, quantity: i64) -> bool {
        quantity >= 0 && self.0 >= quantity
    }

    /// Decrement by `quantity`, or `None` when stock would go negative.
    /// Check and subtraction are one step; callers never observe a partial
    /// decrement.
    pub fn checked_decrement(self, quantity: i64) -> Option<StockLevel> {
        if !self.can_satisfy(quantity) {
            return None;
        }
        Some(Self(self.0 - quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_initial_stock() {
        assert!(StockLevel::new(-1).is_err());
        assert_eq!(StockLevel::new(0).unwrap().units(), 0);
    }

    #[test]
    fn decrement_succeeds_down_to_zero() {
        let level = StockLevel::new(3).unwrap();
        let level = level.checked_decrement(3).unwrap();
        assert_eq!(level.units(), 0);
    }

    #[test]
    fn decrement_past_available_fails_without_change() {
        let level = StockLevel::new(2).unwrap();
        assert!(level.checked_decrement(3).is_none());
        assert_eq!(level.units(), 2);
    }

    #[test]
    fn negative_request_never_satisfies() {
        let level = StockLevel::new(5).unwrap();
        assert!(!level.can_satisfy(-1));
        assert!(level.checked_decrement(-1).is_none());
    }
}
