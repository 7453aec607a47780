use super::error::{ConfigurationError, DataIntegrityError};
use super::valuation::{self, Valuation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which allocator produced a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunType {
    Optimized,
    Baseline,
}

impl RunType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Optimized => "Priority Score (Greedy)",
            Self::Baseline => "Cheapest First (Baseline)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Selected,
    Rejected,
}

impl DecisionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Selected => "Selected",
            Self::Rejected => "Rejected",
        }
    }
}

/// A validated, non-negative reorder budget.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Budget(f64);

impl Budget {
    pub const ZERO: Budget = Budget(0.0);

    pub fn new(amount: f64) -> Result<Self, ConfigurationError> {
        if !amount.is_finite() {
            return Err(ConfigurationError::NonFiniteBudget { amount });
        }
        if amount < 0.0 {
            return Err(ConfigurationError::NegativeBudget { amount });
        }
        Ok(Self(amount))
    }

    pub const fn amount(self) -> f64 {
        self.0
    }
}

/// Raw inventory attributes for one low-stock product, as delivered upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub id: ItemId,
    pub name: String,
    pub current_stock: f64,
    /// Average-sales estimate; rounded to a whole quantity during validation.
    pub reorder_quantity: f64,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub low_stock_threshold: f64,
}

/// A product eligible for reorder, with its valuation fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateItem {
    id: ItemId,
    name: String,
    current_stock: u64,
    reorder_quantity: u64,
    unit_cost: f64,
    unit_price: f64,
    low_stock_threshold: f64,
    #[serde(flatten)]
    valuation: Valuation,
}

impl CandidateItem {
    pub fn from_row(row: CandidateRow) -> Result<Self, DataIntegrityError> {
        let CandidateRow {
            id,
            name,
            current_stock,
            reorder_quantity,
            unit_cost,
            unit_price,
            low_stock_threshold,
        } = row;

        let current_stock = valuation::non_negative(&id, "current_stock", current_stock)?.trunc();
        let reorder_quantity = valuation::reorder_quantity(&id, reorder_quantity)?;
        let unit_cost = valuation::non_negative(&id, "unit_cost", unit_cost)?;
        let unit_price = valuation::non_negative(&id, "unit_price", unit_price)?;
        let low_stock_threshold =
            valuation::finite(&id, "low_stock_threshold", low_stock_threshold)?;

        Ok(Self {
            valuation: Valuation::derive(reorder_quantity, unit_cost, unit_price),
            id,
            name,
            current_stock: current_stock as u64,
            reorder_quantity,
            unit_cost,
            unit_price,
            low_stock_threshold,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_stock(&self) -> u64 {
        self.current_stock
    }

    pub fn reorder_quantity(&self) -> u64 {
        self.reorder_quantity
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn low_stock_threshold(&self) -> f64 {
        self.low_stock_threshold
    }

    pub fn valuation(&self) -> Valuation {
        self.valuation
    }

    pub fn order_cost(&self) -> f64 {
        self.valuation.order_cost
    }

    pub fn order_value(&self) -> f64 {
        self.valuation.order_value
    }

    pub fn priority_score(&self) -> f64 {
        self.valuation.priority_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CandidateRow {
        CandidateRow {
            id: ItemId::from("P-100"),
            name: "Coffee Beans".to_string(),
            current_stock: 3.0,
            reorder_quantity: 11.6,
            unit_cost: 6.0,
            unit_price: 15.0,
            low_stock_threshold: 4.0,
        }
    }

    #[test]
    fn from_row_rounds_quantity_and_derives_valuation() {
        let item = CandidateItem::from_row(row()).expect("valid row");
        assert_eq!(item.reorder_quantity(), 12);
        assert_eq!(item.current_stock(), 3);
        assert_eq!(item.order_cost(), 72.0);
        assert_eq!(item.order_value(), 108.0);
        assert_eq!(item.priority_score(), 1.5);
    }

    #[test]
    fn from_row_rejects_negative_fields() {
        let cases: [(&str, fn(&mut CandidateRow)); 4] = [
            ("reorder_quantity", |r| r.reorder_quantity = -2.0),
            ("unit_cost", |r| r.unit_cost = -0.5),
            ("unit_price", |r| r.unit_price = -1.0),
            ("current_stock", |r| r.current_stock = -3.0),
        ];

        for (field, mutate) in cases {
            let mut candidate = row();
            mutate(&mut candidate);
            match CandidateItem::from_row(candidate) {
                Err(DataIntegrityError::Negative {
                    field: rejected, ..
                }) => assert_eq!(rejected, field),
                other => panic!("expected {field} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn budget_rejects_negative_and_non_finite_amounts() {
        assert_eq!(Budget::new(0.0).map(Budget::amount), Ok(0.0));
        assert_eq!(
            Budget::new(-0.01),
            Err(ConfigurationError::NegativeBudget { amount: -0.01 })
        );
        assert!(matches!(
            Budget::new(f64::NAN),
            Err(ConfigurationError::NonFiniteBudget { .. })
        ));
    }
}
