pub mod ingest;
pub mod reorder;
