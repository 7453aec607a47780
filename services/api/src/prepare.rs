use clap::Args;
use std::path::PathBuf;
use stockflow::config::AppConfig;
use stockflow::error::AppError;
use stockflow::telemetry;
use stockflow::workflows::ingest::InventoryCleaner;

#[derive(Args, Debug)]
pub(crate) struct PrepareArgs {
    /// Raw sales export with PRODUCT_ID, PRODUCT_NAME, UNIT_SALES and QUANTITY_ON_HAND columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Cleaned snapshot destination (defaults to STOCKFLOW_SNAPSHOT_PATH)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_prepare(args: PrepareArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let output = args.output.unwrap_or(config.storage.snapshot_path);
    let rows = InventoryCleaner::from_path(&args.input)?;
    InventoryCleaner::write_path(&rows, &output)?;

    let low_stock = rows
        .iter()
        .filter(|row| (row.current_stock as f64) < row.low_stock_threshold)
        .count();
    println!(
        "Cleaned {} products from {} into {} ({} below their low-stock threshold)",
        rows.len(),
        args.input.display(),
        output.display(),
        low_stock
    );

    Ok(())
}
