//! Raw inventory cleaning: collapses a sales export into one snapshot row
//! per product with simulated pricing and a derived low-stock threshold.

mod normalizer;
mod parser;
pub mod pricing;

use crate::workflows::reorder::{CandidateRow, ItemId};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use parser::RawInventoryRow;
pub use pricing::{price_profile_for, PriceProfile};

/// Share of average sales below which a product counts as low stock.
pub const LOW_STOCK_RATIO: f64 = 0.30;

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    Empty,
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to access inventory data: {}", err),
            IngestError::Csv(err) => write!(f, "invalid inventory CSV data: {}", err),
            IngestError::Empty => write!(f, "inventory export contains no rows"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            IngestError::Empty => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One product in the cleaned snapshot layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRow {
    #[serde(rename = "PRODUCT_ID")]
    pub product_id: String,
    #[serde(rename = "PRODUCT_NAME")]
    pub product_name: String,
    #[serde(rename = "CURRENT_STOCK")]
    pub current_stock: i64,
    #[serde(rename = "REORDER_QUANTITY", serialize_with = "two_decimals")]
    pub reorder_quantity: f64,
    #[serde(rename = "UNIT_COST", serialize_with = "two_decimals")]
    pub unit_cost: f64,
    #[serde(rename = "UNIT_PRICE", serialize_with = "two_decimals")]
    pub unit_price: f64,
    #[serde(rename = "LOW_STOCK_THRESHOLD", serialize_with = "two_decimals")]
    pub low_stock_threshold: f64,
}

impl From<&CleanedRow> for CandidateRow {
    fn from(row: &CleanedRow) -> Self {
        Self {
            id: ItemId(row.product_id.clone()),
            name: row.product_name.clone(),
            current_stock: row.current_stock as f64,
            reorder_quantity: row.reorder_quantity,
            unit_cost: row.unit_cost,
            unit_price: row.unit_price,
            low_stock_threshold: row.low_stock_threshold,
        }
    }
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

pub struct InventoryCleaner;

impl InventoryCleaner {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CleanedRow>, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Groups sales rows by product id. The name is the first one seen, the
    /// reorder quantity is mean unit sales, and current stock is the last
    /// quantity on hand reported.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CleanedRow>, IngestError> {
        let rows = parser::parse_rows(reader)?;
        if rows.is_empty() {
            return Err(IngestError::Empty);
        }

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, ProductAggregate> = HashMap::new();
        for row in rows {
            match groups.get_mut(&row.product_id) {
                Some(aggregate) => aggregate.observe(&row),
                None => {
                    order.push(row.product_id.clone());
                    groups.insert(row.product_id.clone(), ProductAggregate::start(&row));
                }
            }
        }

        sort_product_ids(&mut order);

        let cleaned: Vec<CleanedRow> = order
            .into_iter()
            .filter_map(|product_id| {
                groups
                    .remove(&product_id)
                    .map(|aggregate| aggregate.finish(product_id))
            })
            .collect();

        info!(products = cleaned.len(), "cleaned raw inventory export");
        Ok(cleaned)
    }

    pub fn write_path<P: AsRef<Path>>(rows: &[CleanedRow], path: P) -> Result<(), IngestError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        Self::write(rows, file)
    }

    pub fn write<W: Write>(rows: &[CleanedRow], writer: W) -> Result<(), IngestError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
struct ProductAggregate {
    name: String,
    sales_total: f64,
    observations: usize,
    last_on_hand: i64,
}

impl ProductAggregate {
    fn start(row: &RawInventoryRow) -> Self {
        Self {
            name: row.product_name.clone(),
            sales_total: row.unit_sales,
            observations: 1,
            last_on_hand: row.quantity_on_hand,
        }
    }

    fn observe(&mut self, row: &RawInventoryRow) {
        self.sales_total += row.unit_sales;
        self.observations += 1;
        self.last_on_hand = row.quantity_on_hand;
    }

    fn finish(self, product_id: String) -> CleanedRow {
        let average_sales = self.sales_total / self.observations as f64;
        let profile = price_profile_for(&self.name);

        CleanedRow {
            product_id,
            product_name: self.name,
            current_stock: self.last_on_hand,
            reorder_quantity: average_sales,
            unit_cost: profile.unit_cost(),
            unit_price: profile.unit_price,
            low_stock_threshold: (average_sales * LOW_STOCK_RATIO).ceil(),
        }
    }
}

/// Ids sort numerically only when every id in the batch is numeric;
/// otherwise the whole batch sorts as text.
fn sort_product_ids(ids: &mut [String]) {
    if ids.iter().all(|id| id.parse::<i64>().is_ok()) {
        ids.sort_by_cached_key(|id| id.parse::<i64>().ok());
    } else {
        ids.sort();
    }
}
