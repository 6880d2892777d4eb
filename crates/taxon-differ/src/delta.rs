//! The changes between two exports, in a form that can be written as IBDF
//! and imported as an incremental update.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use taxon_core::errors::TaxonResult;
use taxon_ibdf::{ExternalChronology, IbdfObject, IbdfWriter};

use crate::export::Export;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Retired,
    Modified,
    Unchanged,
}

/// Per-class counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeltaSummary {
    pub added: usize,
    pub retired: usize,
    pub modified: usize,
    pub unchanged: usize,
    /// Non-component records present only in the new export.
    pub records: usize,
}

/// Output of [`crate::diff`].
///
/// `added` holds whole chronologies, `retired` one inactivating version per
/// component, and `modified` only the versions the new export introduced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaSet {
    pub added: Vec<ExternalChronology>,
    pub retired: Vec<ExternalChronology>,
    pub modified: Vec<ExternalChronology>,
    pub unchanged: BTreeSet<Uuid>,
    pub records: Vec<IbdfObject>,
}

impl DeltaSet {
    /// Nothing to write: unchanged components do not count.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.retired.is_empty()
            && self.modified.is_empty()
            && self.records.is_empty()
    }

    pub fn summary(&self) -> DeltaSummary {
        DeltaSummary {
            added: self.added.len(),
            retired: self.retired.len(),
            modified: self.modified.len(),
            unchanged: self.unchanged.len(),
            records: self.records.len(),
        }
    }

    pub fn classify(&self, uuid: &Uuid) -> Option<ChangeKind> {
        let has = |list: &[ExternalChronology]| list.iter().any(|c| c.primordial_uuid == *uuid);
        if has(&self.added) {
            Some(ChangeKind::Added)
        } else if has(&self.retired) {
            Some(ChangeKind::Retired)
        } else if has(&self.modified) {
            Some(ChangeKind::Modified)
        } else if self.unchanged.contains(uuid) {
            Some(ChangeKind::Unchanged)
        } else {
            None
        }
    }

    pub fn uuids(&self, kind: ChangeKind) -> Vec<Uuid> {
        let of = |list: &[ExternalChronology]| list.iter().map(|c| c.primordial_uuid).collect();
        match kind {
            ChangeKind::Added => of(&self.added),
            ChangeKind::Retired => of(&self.retired),
            ChangeKind::Modified => of(&self.modified),
            ChangeKind::Unchanged => self.unchanged.iter().copied().collect(),
        }
    }

    /// Delta objects in write order: added, modified, retired, then other
    /// records.
    pub fn objects(&self) -> Vec<IbdfObject> {
        self.added
            .iter()
            .chain(&self.modified)
            .chain(&self.retired)
            .cloned()
            .map(IbdfObject::from_chronology)
            .chain(self.records.iter().cloned())
            .collect()
    }

    pub fn write_to<W: Write>(&self, writer: &mut IbdfWriter<W>) -> TaxonResult<u64> {
        let before = writer.written();
        writer.write_all(&self.objects())?;
        Ok(writer.written() - before)
    }

    pub fn write_file(&self, path: &Path) -> TaxonResult<u64> {
        let mut writer = IbdfWriter::create(path)?;
        let written = self.write_to(&mut writer)?;
        writer.finish()?;
        Ok(written)
    }

    /// Apply to the export the delta was computed from.
    ///
    /// Added chronologies are inserted, modified ones get their new versions
    /// appended and their header replaced, retired ones get the
    /// inactivating version appended.
    pub fn apply(&self, base: &Export) -> Export {
        let mut result = base.clone();
        for chronology in &self.added {
            result.replace(chronology.clone());
        }
        for change in self.modified.iter().chain(&self.retired) {
            let mut updated = match base.get(&change.primordial_uuid) {
                Some(existing) => existing.clone(),
                None => ExternalChronology {
                    versions: Vec::new(),
                    ..change.clone()
                },
            };
            updated.kind = change.kind;
            updated.additional_uuids = change.additional_uuids.clone();
            updated.versions.extend(change.versions.iter().cloned());
            result.replace(updated);
        }
        for record in &self.records {
            result.insert(record.clone());
        }
        result
    }
}
