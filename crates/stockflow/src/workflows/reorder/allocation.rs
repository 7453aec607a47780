use super::domain::{Budget, CandidateItem, DecisionStatus, RunType};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Order in which an allocator visits candidates. Both orderings are stable,
/// so equal keys keep the order the snapshot delivered them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPolicy {
    /// Highest profit-to-cost ratio first.
    PriorityScore,
    /// Lowest order cost first.
    CheapestFirst,
}

impl RankingPolicy {
    pub const fn run_type(self) -> RunType {
        match self {
            Self::PriorityScore => RunType::Optimized,
            Self::CheapestFirst => RunType::Baseline,
        }
    }

    pub fn rank(self, items: &mut [CandidateItem]) {
        match self {
            Self::PriorityScore => items.sort_by(|a, b| {
                b.priority_score()
                    .partial_cmp(&a.priority_score())
                    .unwrap_or(Ordering::Equal)
            }),
            Self::CheapestFirst => items.sort_by(|a, b| {
                a.order_cost()
                    .partial_cmp(&b.order_cost())
                    .unwrap_or(Ordering::Equal)
            }),
        }
    }
}

/// Single forward pass over ranked candidates that accepts every item whose
/// order cost fits the budget still remaining. No backtracking, no partial
/// orders; the result is a heuristic, not a guaranteed-best subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocator {
    policy: RankingPolicy,
}

impl Allocator {
    pub const fn new(policy: RankingPolicy) -> Self {
        Self { policy }
    }

    /// Ranks by priority score, descending.
    pub const fn greedy() -> Self {
        Self::new(RankingPolicy::PriorityScore)
    }

    /// Ranks by order cost, ascending.
    pub const fn baseline() -> Self {
        Self::new(RankingPolicy::CheapestFirst)
    }

    pub const fn policy(&self) -> RankingPolicy {
        self.policy
    }

    pub const fn run_type(&self) -> RunType {
        self.policy.run_type()
    }

    pub fn allocate(&self, mut candidates: Vec<CandidateItem>, budget: Budget) -> RunResult {
        self.policy.rank(&mut candidates);

        let run_type = self.run_type();
        let mut remaining_budget = budget.amount();
        let mut total_cost_spent = 0.0;
        let mut total_expected_profit = 0.0;
        let mut selected = Vec::new();
        let mut rejected = Vec::new();
        let mut evaluations = Vec::with_capacity(candidates.len());

        for item in candidates {
            let remaining_before = remaining_budget;
            let cost = item.order_cost();

            let status = if cost <= remaining_budget {
                remaining_budget -= cost;
                total_cost_spent += cost;
                total_expected_profit += item.order_value();
                selected.push(item.clone());
                DecisionStatus::Selected
            } else {
                rejected.push(item.clone());
                DecisionStatus::Rejected
            };

            debug!(
                ?run_type,
                item_id = %item.id(),
                cost,
                remaining_before,
                status = status.label(),
                "evaluated reorder candidate"
            );

            evaluations.push(Evaluation {
                item,
                status,
                remaining_before,
            });
        }

        info!(
            ?run_type,
            budget = budget.amount(),
            selected = selected.len(),
            rejected = rejected.len(),
            total_cost_spent,
            total_expected_profit,
            "allocation run complete"
        );

        RunResult {
            run_type,
            budget,
            selected,
            rejected,
            evaluations,
            total_cost_spent,
            total_expected_profit,
            remaining_budget,
        }
    }
}

/// One candidate as the allocator saw it, in ranked order.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub item: CandidateItem,
    pub status: DecisionStatus,
    /// Budget left immediately before this item was considered.
    pub remaining_before: f64,
}

impl Evaluation {
    /// Amount actually charged against the budget; zero when rejected.
    pub fn budget_cost(&self) -> f64 {
        match self.status {
            DecisionStatus::Selected => self.item.order_cost(),
            DecisionStatus::Rejected => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    run_type: RunType,
    budget: Budget,
    selected: Vec<CandidateItem>,
    rejected: Vec<CandidateItem>,
    evaluations: Vec<Evaluation>,
    total_cost_spent: f64,
    total_expected_profit: f64,
    remaining_budget: f64,
}

impl RunResult {
    pub fn run_type(&self) -> RunType {
        self.run_type
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn selected(&self) -> &[CandidateItem] {
        &self.selected
    }

    pub fn rejected(&self) -> &[CandidateItem] {
        &self.rejected
    }

    /// Every candidate in the order it was ranked and evaluated.
    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    pub fn ranked(&self) -> impl Iterator<Item = &CandidateItem> {
        self.evaluations.iter().map(|evaluation| &evaluation.item)
    }

    pub fn items_evaluated(&self) -> usize {
        self.evaluations.len()
    }

    pub fn total_cost_spent(&self) -> f64 {
        self.total_cost_spent
    }

    pub fn total_expected_profit(&self) -> f64 {
        self.total_expected_profit
    }

    pub fn remaining_budget(&self) -> f64 {
        self.remaining_budget
    }
}
