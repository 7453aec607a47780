use super::allocation::RunResult;
use super::domain::{DecisionStatus, ItemId, RunType};
use super::error::PersistenceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Audit record for one candidate in one run. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(rename = "product_id")]
    pub item_id: ItemId,
    pub order_quantity: u64,
    pub budget_cost: f64,
    pub status: DecisionStatus,
    pub run_type: RunType,
    pub timestamp: DateTime<Utc>,
}

/// Append-only destination for decision records.
///
/// Implementations acquire whatever handle they need inside `append` and
/// release it before returning; no handle outlives a single record.
pub trait DecisionSink: Send + Sync {
    fn append(&self, decision: &Decision) -> Result<(), PersistenceError>;
}

#[derive(Debug)]
pub struct FailedWrite {
    pub item_id: ItemId,
    pub error: PersistenceError,
}

/// Outcome of recording one run. Failed writes are kept apart from the
/// selected/rejected counts of the run itself.
#[derive(Debug)]
pub struct RecordingSummary {
    pub run_type: RunType,
    pub attempted: usize,
    pub persisted: usize,
    pub failures: Vec<FailedWrite>,
}

impl RecordingSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct DecisionRecorder<S: ?Sized> {
    sink: Arc<S>,
}

impl<S> DecisionRecorder<S>
where
    S: DecisionSink + ?Sized + 'static,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    pub fn record(&self, run: &RunResult) -> RecordingSummary {
        self.record_at(run, Utc::now())
    }

    /// Writes one decision per evaluated item, in ranked order. A failed
    /// write is logged and collected; the remaining records are still
    /// attempted.
    pub fn record_at(&self, run: &RunResult, timestamp: DateTime<Utc>) -> RecordingSummary {
        let run_type = run.run_type();
        let mut summary = RecordingSummary {
            run_type,
            attempted: 0,
            persisted: 0,
            failures: Vec::new(),
        };

        for decision in decisions_for(run, timestamp) {
            summary.attempted += 1;
            match self.sink.append(&decision) {
                Ok(()) => summary.persisted += 1,
                Err(error) => {
                    warn!(
                        ?run_type,
                        item_id = %decision.item_id,
                        %error,
                        "failed to persist reorder decision"
                    );
                    summary.failures.push(FailedWrite {
                        item_id: decision.item_id,
                        error,
                    });
                }
            }
        }

        info!(
            ?run_type,
            attempted = summary.attempted,
            persisted = summary.persisted,
            failed = summary.failed(),
            "recorded reorder decisions"
        );

        summary
    }
}

/// Converts a run into decision records without persisting them.
pub fn decisions_for(run: &RunResult, timestamp: DateTime<Utc>) -> Vec<Decision> {
    run.evaluations()
        .iter()
        .map(|evaluation| Decision {
            item_id: evaluation.item.id().clone(),
            order_quantity: evaluation.item.reorder_quantity(),
            budget_cost: evaluation.budget_cost(),
            status: evaluation.status,
            run_type: run.run_type(),
            timestamp,
        })
        .collect()
}
