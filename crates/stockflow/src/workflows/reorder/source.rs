use super::domain::{CandidateItem, CandidateRow, ItemId};
use super::error::{DataIntegrityError, ReorderError, SourceUnavailableError};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Immutable candidate set for one planning session. Each allocator run
/// receives its own [`fork`](Snapshot::fork), so nothing a run does can
/// leak into another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    items: Vec<CandidateItem>,
}

impl Snapshot {
    pub fn new(items: Vec<CandidateItem>) -> Self {
        Self { items }
    }

    /// Validates every row; the first invalid row fails the whole snapshot.
    pub fn from_rows<I>(rows: I) -> Result<Self, DataIntegrityError>
    where
        I: IntoIterator<Item = CandidateRow>,
    {
        let items = rows
            .into_iter()
            .map(CandidateItem::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[CandidateItem] {
        &self.items
    }

    pub fn fork(&self) -> Vec<CandidateItem> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Provider of the low-stock candidate snapshot.
pub trait SnapshotSource {
    fn load(&self) -> Result<Snapshot, ReorderError>;
}

/// Reads the cleaned inventory CSV and keeps rows whose stock is below
/// threshold, ordered by product name. Every row is validated, including
/// rows the threshold filter would drop.
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    path: PathBuf,
}

impl CsvSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Snapshot, ReorderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<SnapshotRow>() {
            let row = record.map_err(SourceUnavailableError::Read)?;
            rows.push(CandidateRow::from(row));
        }

        let total = rows.len();
        let mut items = Vec::new();
        for row in rows {
            // Compare the stock as delivered; the item keeps a whole-unit count.
            let below_threshold = row.current_stock < row.low_stock_threshold;
            let item = CandidateItem::from_row(row)?;
            if below_threshold {
                items.push(item);
            }
        }
        items.sort_by(|a, b| a.name().cmp(b.name()));

        let snapshot = Snapshot::new(items);
        info!(
            rows = total,
            candidates = snapshot.len(),
            "loaded low-stock candidate snapshot"
        );
        Ok(snapshot)
    }
}

impl SnapshotSource for CsvSnapshotSource {
    fn load(&self) -> Result<Snapshot, ReorderError> {
        let file =
            std::fs::File::open(&self.path).map_err(|source| SourceUnavailableError::Open {
                path: self.path.clone(),
                source,
            })?;
        Self::from_reader(file)
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "PRODUCT_ID")]
    product_id: String,
    #[serde(rename = "PRODUCT_NAME")]
    product_name: String,
    #[serde(rename = "CURRENT_STOCK")]
    current_stock: f64,
    #[serde(rename = "REORDER_QUANTITY")]
    reorder_quantity: f64,
    #[serde(rename = "UNIT_COST")]
    unit_cost: f64,
    #[serde(rename = "UNIT_PRICE")]
    unit_price: f64,
    #[serde(rename = "LOW_STOCK_THRESHOLD")]
    low_stock_threshold: f64,
}

impl From<SnapshotRow> for CandidateRow {
    fn from(row: SnapshotRow) -> Self {
        Self {
            id: ItemId(row.product_id),
            name: row.product_name,
            current_stock: row.current_stock,
            reorder_quantity: row.reorder_quantity,
            unit_cost: row.unit_cost,
            unit_price: row.unit_price,
            low_stock_threshold: row.low_stock_threshold,
        }
    }
}
