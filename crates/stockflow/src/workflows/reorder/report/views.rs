use super::super::domain::RunType;
use serde::Serialize;

/// One candidate with its raw attributes and derived valuation.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub product_id: String,
    pub name: String,
    pub current_stock: u64,
    pub reorder_quantity: u64,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub low_stock_threshold: f64,
    pub order_cost: f64,
    pub order_value: f64,
    pub priority_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedItemView {
    pub rank: usize,
    pub product_id: String,
    pub name: String,
    pub priority_score: f64,
    pub order_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummaryView {
    pub run_type: RunType,
    pub run_label: &'static str,
    pub budget: f64,
    pub items_evaluated: usize,
    pub items_selected: usize,
    pub items_rejected: usize,
    pub total_cost_spent: f64,
    pub remaining_budget: f64,
    pub total_expected_profit: f64,
    pub selected: Vec<CandidateView>,
    pub rejected: Vec<CandidateView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub budget: f64,
    pub optimized: RunSummaryView,
    pub baseline: RunSummaryView,
    pub ranked: Vec<RankedItemView>,
    pub profit_uplift: f64,
}
