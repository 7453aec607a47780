use serde::Deserialize;
use std::io::Read;

/// One sales observation from the raw retail inventory export.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawInventoryRow {
    #[serde(rename = "PRODUCT_ID")]
    pub(crate) product_id: String,
    #[serde(rename = "PRODUCT_NAME")]
    pub(crate) product_name: String,
    #[serde(rename = "UNIT_SALES")]
    pub(crate) unit_sales: f64,
    #[serde(rename = "QUANTITY_ON_HAND")]
    pub(crate) quantity_on_hand: i64,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawInventoryRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<RawInventoryRow>() {
        rows.push(record?);
    }

    Ok(rows)
}
