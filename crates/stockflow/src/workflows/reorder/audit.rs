use super::decision::{Decision, DecisionSink};
use super::error::PersistenceError;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Append-only CSV audit trail. Every append opens the file, writes a
/// single row (plus the header when the file is empty), flushes, and
/// closes it again.
#[derive(Debug, Clone)]
pub struct CsvAuditLog {
    path: PathBuf,
}

impl CsvAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the trail back in write order. A log that was never written
    /// reads as empty.
    pub fn read_all(&self) -> Result<Vec<Decision>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut decisions = Vec::new();
        for record in reader.deserialize::<Decision>() {
            decisions.push(record?);
        }
        Ok(decisions)
    }
}

impl DecisionSink for CsvAuditLog {
    fn append(&self, decision: &Decision) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let write_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(decision)?;
        writer.flush()?;
        Ok(())
    }
}
