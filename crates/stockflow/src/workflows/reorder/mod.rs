//! Budget-constrained reorder planning.
//!
//! A [`Snapshot`] of low-stock candidates is valued once, then handed to two
//! allocators: the priority-score greedy pass and a cheapest-first baseline.
//! [`RunComparator`] packages both runs for reporting and
//! [`DecisionRecorder`] writes one audit record per evaluated item.

pub mod allocation;
pub mod audit;
pub mod comparator;
pub mod decision;
pub mod domain;
pub mod error;
pub mod report;
pub mod source;
pub mod valuation;

pub use allocation::{Allocator, Evaluation, RankingPolicy, RunResult};
pub use audit::CsvAuditLog;
pub use comparator::{ComparisonReport, RunComparator};
pub use decision::{
    decisions_for, Decision, DecisionRecorder, DecisionSink, FailedWrite, RecordingSummary,
};
pub use domain::{Budget, CandidateItem, CandidateRow, DecisionStatus, ItemId, RunType};
pub use error::{
    ConfigurationError, DataIntegrityError, PersistenceError, ReorderError, ReorderErrorKind,
    SourceUnavailableError,
};
pub use report::{render_markdown, ReportContext};
pub use source::{CsvSnapshotSource, Snapshot, SnapshotSource};
pub use valuation::Valuation;
