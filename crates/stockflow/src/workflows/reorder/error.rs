use super::domain::ItemId;
use std::path::PathBuf;

/// A candidate row carries a value the valuation model cannot accept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("item {item_id}: {field} must be a finite number (got {value})")]
    NonFinite {
        item_id: ItemId,
        field: &'static str,
        value: f64,
    },
    #[error("item {item_id}: {field} must not be negative (got {value})")]
    Negative {
        item_id: ItemId,
        field: &'static str,
        value: f64,
    },
}

impl DataIntegrityError {
    pub fn item_id(&self) -> &ItemId {
        match self {
            Self::NonFinite { item_id, .. } | Self::Negative { item_id, .. } => item_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("budget must not be negative (got {amount})")]
    NegativeBudget { amount: f64 },
    #[error("budget must be a finite number (got {amount})")]
    NonFiniteBudget { amount: f64 },
}

/// One decision record could not be written to the audit trail.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("audit log io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("audit log encoding failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("audit log unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceUnavailableError {
    #[error("failed to open candidate snapshot {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid candidate snapshot data: {0}")]
    Read(#[from] csv::Error),
}

/// Fatal conditions that stop a run before any allocator executes.
#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    SourceUnavailable(#[from] SourceUnavailableError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderErrorKind {
    DataIntegrity,
    Configuration,
    SourceUnavailable,
}

impl ReorderError {
    pub const fn kind(&self) -> ReorderErrorKind {
        match self {
            Self::DataIntegrity(_) => ReorderErrorKind::DataIntegrity,
            Self::Configuration(_) => ReorderErrorKind::Configuration,
            Self::SourceUnavailable(_) => ReorderErrorKind::SourceUnavailable,
        }
    }
}
