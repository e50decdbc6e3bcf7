//! Record loading and eligibility filtering.

use std::fs;
use std::path::Path;

use creator_types::SourceRecord;
use tracing::{debug, info};

use crate::error::IndexingError;

/// Records read from the export, split by eligibility.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    /// Records in the file
    pub total: usize,
    /// Records worth embedding, in file order
    pub eligible: Vec<SourceRecord>,
    /// Records skipped by the eligibility filter
    pub excluded: usize,
}

impl LoadedRecords {
    /// Split `records` into eligible and excluded, keeping file order.
    pub fn partition(records: Vec<SourceRecord>) -> Self {
        let total = records.len();
        let eligible: Vec<SourceRecord> = records
            .into_iter()
            .filter(|r| {
                let keep = r.is_eligible();
                if !keep {
                    debug!(record = r.label(), "Skipping record without enough data");
                }
                keep
            })
            .collect();
        let excluded = total - eligible.len();
        Self {
            total,
            eligible,
            excluded,
        }
    }

    /// Ids of the first `n` eligible records.
    pub fn sample_ids(&self, n: usize) -> Vec<String> {
        self.eligible
            .iter()
            .filter_map(|r| r.id().map(str::to_string))
            .take(n)
            .collect()
    }
}

/// Read a JSON array of records from `path` and filter it.
pub fn load_records(path: &Path) -> Result<LoadedRecords, IndexingError> {
    let raw = fs::read_to_string(path).map_err(|e| IndexingError::Data {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let records: Vec<SourceRecord> = serde_json::from_str(&raw).map_err(|e| IndexingError::Data {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let loaded = LoadedRecords::partition(records);
    info!(
        path = %path.display(),
        total = loaded.total,
        eligible = loaded.eligible.len(),
        excluded = loaded.excluded,
        "Loaded records"
    );
    Ok(loaded)
}
