use super::allocation::{Allocator, RunResult};
use super::domain::{Budget, CandidateItem};
use super::source::Snapshot;

/// Runs the greedy and baseline allocators over independent forks of the
/// same snapshot and budget.
#[derive(Debug, Clone, Copy)]
pub struct RunComparator {
    greedy: Allocator,
    baseline: Allocator,
}

impl Default for RunComparator {
    fn default() -> Self {
        Self {
            greedy: Allocator::greedy(),
            baseline: Allocator::baseline(),
        }
    }
}

impl RunComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compare(&self, snapshot: &Snapshot, budget: Budget) -> ComparisonReport {
        let optimized = self.greedy.allocate(snapshot.fork(), budget);
        let baseline = self.baseline.allocate(snapshot.fork(), budget);

        ComparisonReport {
            budget,
            optimized,
            baseline,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    budget: Budget,
    optimized: RunResult,
    baseline: RunResult,
}

impl ComparisonReport {
    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn optimized(&self) -> &RunResult {
        &self.optimized
    }

    pub fn baseline(&self) -> &RunResult {
        &self.baseline
    }

    /// Full candidate list by priority score, descending. This is the order
    /// the optimized run evaluated items in.
    pub fn ranked(&self) -> Vec<&CandidateItem> {
        self.optimized.ranked().collect()
    }

    pub fn profit_uplift(&self) -> f64 {
        self.optimized.total_expected_profit() - self.baseline.total_expected_profit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::reorder::domain::{CandidateRow, ItemId};

    fn snapshot() -> Snapshot {
        let rows = [("X", 100.0, 1.9), ("Y", 60.0, 1.5), ("Z", 50.0, 1.4)]
            .into_iter()
            .map(|(id, quantity, unit_price)| CandidateRow {
                id: ItemId::from(id),
                name: id.to_string(),
                current_stock: 0.0,
                reorder_quantity: quantity,
                unit_cost: 1.0,
                unit_price,
                low_stock_threshold: 1.0,
            });
        Snapshot::from_rows(rows).expect("valid rows")
    }

    #[test]
    fn both_runs_see_the_same_snapshot() {
        let snapshot = snapshot();
        let before = snapshot.clone();
        let report = RunComparator::new().compare(&snapshot, Budget::new(150.0).expect("budget"));

        assert_eq!(snapshot, before);
        for run in [report.optimized(), report.baseline()] {
            assert_eq!(run.items_evaluated(), snapshot.len());
            let mut seen: Vec<&ItemId> = run
                .selected()
                .iter()
                .chain(run.rejected())
                .map(|item| item.id())
                .collect();
            seen.sort();
            assert_eq!(
                seen,
                vec![&ItemId::from("X"), &ItemId::from("Y"), &ItemId::from("Z")]
            );
        }
    }

    #[test]
    fn ranking_and_uplift_come_from_the_optimized_run() {
        let report = RunComparator::new().compare(&snapshot(), Budget::new(150.0).expect("budget"));

        let ranked: Vec<&str> = report
            .ranked()
            .iter()
            .map(|item| item.id().0.as_str())
            .collect();
        assert_eq!(ranked, vec!["X", "Y", "Z"]);
        assert!((report.profit_uplift() - 60.0).abs() < 1e-9);
    }
}
