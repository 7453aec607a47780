mod markdown;
mod summary;
pub mod views;

pub use markdown::{render_markdown, ReportContext};
