use super::super::allocation::RunResult;
use super::super::comparator::ComparisonReport;
use super::super::domain::CandidateItem;
use super::views::{CandidateView, ComparisonSummary, RankedItemView, RunSummaryView};

impl ComparisonReport {
    pub fn summary(&self) -> ComparisonSummary {
        let ranked = self
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(index, item)| RankedItemView {
                rank: index + 1,
                product_id: item.id().0.clone(),
                name: item.name().to_string(),
                priority_score: item.priority_score(),
                order_cost: item.order_cost(),
            })
            .collect();

        ComparisonSummary {
            budget: self.budget().amount(),
            optimized: self.optimized().summary(),
            baseline: self.baseline().summary(),
            ranked,
            profit_uplift: self.profit_uplift(),
        }
    }
}

impl RunResult {
    pub fn summary(&self) -> RunSummaryView {
        let run_type = self.run_type();
        RunSummaryView {
            run_type,
            run_label: run_type.label(),
            budget: self.budget().amount(),
            items_evaluated: self.items_evaluated(),
            items_selected: self.selected().len(),
            items_rejected: self.rejected().len(),
            total_cost_spent: self.total_cost_spent(),
            remaining_budget: self.remaining_budget(),
            total_expected_profit: self.total_expected_profit(),
            selected: self.selected().iter().map(CandidateItem::to_view).collect(),
            rejected: self.rejected().iter().map(CandidateItem::to_view).collect(),
        }
    }
}

impl CandidateItem {
    pub fn to_view(&self) -> CandidateView {
        CandidateView {
            product_id: self.id().0.clone(),
            name: self.name().to_string(),
            current_stock: self.current_stock(),
            reorder_quantity: self.reorder_quantity(),
            unit_cost: self.unit_cost(),
            unit_price: self.unit_price(),
            low_stock_threshold: self.low_stock_threshold(),
            order_cost: self.order_cost(),
            order_value: self.order_value(),
            priority_score: self.priority_score(),
        }
    }
}
