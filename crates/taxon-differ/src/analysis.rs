//! JSON analysis files written next to a delta.
//!
//! `summary.json` is always written. `added.json`, `retired.json` and
//! `modified.json` (UUID lists) are written when classification finished.

use std::fs;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use taxon_core::errors::{DifferError, TaxonResult};

use crate::delta::{ChangeKind, DeltaSet, DeltaSummary};

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffAnalysis {
    /// False when the job failed before classification finished.
    pub complete: bool,
    pub error: Option<String>,
    pub old_objects: usize,
    pub new_objects: usize,
    pub skipped_old: u64,
    pub skipped_new: u64,
    pub summary: DeltaSummary,
}

impl DiffAnalysis {
    pub fn write(&self, dir: &Path, delta: Option<&DeltaSet>) -> TaxonResult<()> {
        fs::create_dir_all(dir).map_err(analysis_failed)?;
        write_json(&dir.join("summary.json"), self)?;
        if let Some(delta) = delta {
            for (kind, name) in [
                (ChangeKind::Added, "added.json"),
                (ChangeKind::Retired, "retired.json"),
                (ChangeKind::Modified, "modified.json"),
            ] {
                let uuids: Vec<Uuid> = delta.uuids(kind);
                write_json(&dir.join(name), &uuids)?;
            }
        }
        tracing::info!(dir = %dir.display(), complete = self.complete, "analysis written");
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> TaxonResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(analysis_failed)?;
    fs::write(path, json).map_err(analysis_failed)?;
    Ok(())
}

fn analysis_failed(e: impl std::fmt::Display) -> DifferError {
    DifferError::AnalysisFailed {
        reason: e.to_string(),
    }
}
