//! Per-item cost, value, and priority derivation.
//!
//! Everything here is pure: the same inputs always produce the same
//! [`Valuation`], and invalid inputs surface as [`DataIntegrityError`]
//! rather than being clamped.

use super::domain::ItemId;
use super::error::DataIntegrityError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub order_cost: f64,
    pub order_value: f64,
    pub priority_score: f64,
}

impl Valuation {
    /// `order_cost = qty * cost`, `order_value = qty * (price - cost)`, and
    /// `priority_score = value / cost`, with `0.0` when the order costs nothing.
    pub fn derive(reorder_quantity: u64, unit_cost: f64, unit_price: f64) -> Self {
        let quantity = reorder_quantity as f64;
        let order_cost = quantity * unit_cost;
        let order_value = quantity * (unit_price - unit_cost);
        let priority_score = if order_cost > 0.0 {
            order_value / order_cost
        } else {
            0.0
        };

        Self {
            order_cost,
            order_value,
            priority_score,
        }
    }
}

pub(crate) fn finite(
    item_id: &ItemId,
    field: &'static str,
    value: f64,
) -> Result<f64, DataIntegrityError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DataIntegrityError::NonFinite {
            item_id: item_id.clone(),
            field,
            value,
        })
    }
}

pub(crate) fn non_negative(
    item_id: &ItemId,
    field: &'static str,
    value: f64,
) -> Result<f64, DataIntegrityError> {
    let value = finite(item_id, field, value)?;
    if value < 0.0 {
        return Err(DataIntegrityError::Negative {
            item_id: item_id.clone(),
            field,
            value,
        });
    }
    Ok(value)
}

/// Rounds the upstream average-sales estimate half-to-even.
pub(crate) fn reorder_quantity(item_id: &ItemId, estimate: f64) -> Result<u64, DataIntegrityError> {
    let estimate = non_negative(item_id, "reorder_quantity", estimate)?;
    Ok(estimate.round_ties_even() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ItemId {
        ItemId::from("P-1")
    }

    #[test]
    fn derives_cost_value_and_ratio() {
        let valuation = Valuation::derive(10, 2.70, 4.50);
        assert!((valuation.order_cost - 27.0).abs() < 1e-9);
        assert!((valuation.order_value - 18.0).abs() < 1e-9);
        assert!((valuation.priority_score - 18.0 / 27.0).abs() < 1e-9);
    }

    #[test]
    fn zero_cost_uses_sentinel_score() {
        let free = Valuation::derive(12, 0.0, 3.0);
        assert_eq!(free.order_cost, 0.0);
        assert_eq!(free.order_value, 36.0);
        assert_eq!(free.priority_score, 0.0);

        let nothing_ordered = Valuation::derive(0, 5.0, 8.0);
        assert_eq!(nothing_ordered.order_cost, 0.0);
        assert_eq!(nothing_ordered.priority_score, 0.0);
    }

    #[test]
    fn loss_making_items_score_negative() {
        let valuation = Valuation::derive(4, 5.0, 3.0);
        assert_eq!(valuation.order_value, -8.0);
        assert!((valuation.priority_score + 0.4).abs() < 1e-9);
    }

    #[test]
    fn quantity_rounds_half_to_even() {
        assert_eq!(reorder_quantity(&id(), 2.5).expect("valid"), 2);
        assert_eq!(reorder_quantity(&id(), 3.5).expect("valid"), 4);
        assert_eq!(reorder_quantity(&id(), 7.49).expect("valid"), 7);
        assert_eq!(reorder_quantity(&id(), 0.0).expect("valid"), 0);
    }

    #[test]
    fn negative_quantity_is_not_clamped() {
        let error = reorder_quantity(&id(), -1.0).expect_err("negative rejected");
        assert_eq!(
            error,
            DataIntegrityError::Negative {
                item_id: id(),
                field: "reorder_quantity",
                value: -1.0,
            }
        );
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        assert!(matches!(
            non_negative(&id(), "unit_cost", f64::NAN),
            Err(DataIntegrityError::NonFinite { field: "unit_cost", .. })
        ));
        assert!(matches!(
            finite(&id(), "low_stock_threshold", f64::INFINITY),
            Err(DataIntegrityError::NonFinite { .. })
        ));
    }
}
