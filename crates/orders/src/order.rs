use core::str::FromStr;

use serde::{Deserialize, Serialize};

use aether_core::{DomainError, DomainResult, Money, ProductId};

/// Order lifecycle status.
///
/// Orders are currently written in their final state, so `Completed` is the
/// only value produced. The enumeration is open so states like `pending` or
/// `cancelled` can be added without a wire-format break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OrderStatus {
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "completed",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(OrderStatus::Completed),
            other => Err(DomainError::validation(format!("unknown order status {other:?}"))),
        }
    }
}

/// One requested line of an order: product, quantity, unit price.
///
/// The unit price is supplied by the client and snapshotted into the order;
/// later product price changes do not touch existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Money,
}

/// A validated line with its exact total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// A validated order ready to be written: all line totals and the order
/// total computed, `total_amount == Σ line_total` by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total_amount: Money,
}

/// Validate a request's line items and compute exact totals.
///
/// Fails on an empty item list, a non-positive quantity, or a negative unit
/// price. Runs before any transaction opens, so a rejection has no side
/// effects.
pub fn price_order(items: &[LineItem]) -> DomainResult<PricedOrder> {
    if items.is_empty() {
        return Err(DomainError::validation("order must contain at least one item"));
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total_amount = Money::ZERO;

    for item in items {
        if item.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if item.unit_price < Money::ZERO {
            return Err(DomainError::validation("unit_price must not be negative"));
        }

        let line_total = item.unit_price.checked_mul(item.quantity)?;
        total_amount = total_amount.checked_add(line_total)?;

        lines.push(PricedLine {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total,
        });
    }

    Ok(PricedOrder { lines, total_amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(quantity: i32, unit_price: &str) -> LineItem {
        LineItem {
            product_id: ProductId::new(),
            quantity,
            unit_price: unit_price.parse().unwrap(),
        }
    }

    #[test]
    fn prices_a_two_line_order_exactly() {
        let priced = price_order(&[line(2, "19.99"), line(1, "5.00")]).unwrap();

        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].line_total.to_string(), "39.98");
        assert_eq!(priced.lines[1].line_total.to_string(), "5.00");
        assert_eq!(priced.total_amount.to_string(), "44.98");
    }

    #[test]
    fn zero_priced_lines_are_allowed() {
        let priced = price_order(&[line(3, "0.00")]).unwrap();
        assert_eq!(priced.total_amount, Money::ZERO);
    }

    #[test]
    fn empty_order_is_rejected() {
        let err = price_order(&[]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(price_order(&[line(0, "1.00")]).is_err());
        assert!(price_order(&[line(-2, "1.00")]).is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(price_order(&[line(1, "-0.01")]).is_err());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let items = [line(1, "9999999999.99"), line(1, "0.01")];
        assert!(price_order(&items).is_err());
    }

    #[test]
    fn status_round_trips_as_text() {
        assert_eq!(OrderStatus::Completed.as_str(), "completed");
        assert_eq!("completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!("pending".parse::<OrderStatus>().is_err());
    }

    proptest! {
        #[test]
        fn total_is_sum_of_line_totals(
            quantities in proptest::collection::vec(1i32..1_000, 1..20),
            prices in proptest::collection::vec(0i64..1_000_000, 1..20),
        ) {
            let items: Vec<LineItem> = quantities
                .iter()
                .zip(prices.iter())
                .map(|(&quantity, &minor)| LineItem {
                    product_id: ProductId::new(),
                    quantity,
                    unit_price: Money::from_minor_units(minor).unwrap(),
                })
                .collect();

            let priced = price_order(&items).unwrap();

            let mut sum = Money::ZERO;
            for l in &priced.lines {
                prop_assert_eq!(
                    l.line_total.minor_units(),
                    i64::from(l.quantity) * l.unit_price.minor_units()
                );
                sum = sum.checked_add(l.line_total).unwrap();
            }
            prop_assert_eq!(priced.total_amount, sum);
        }
    }
}
