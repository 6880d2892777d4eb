//! A full export held in memory, indexed by primordial UUID.

use std::collections::BTreeMap;
use std::path::Path;

use uuid::Uuid;

use taxon_core::errors::TaxonResult;
use taxon_ibdf::{ExternalChronology, IbdfObject, IbdfReader, IbdfWriter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Export {
    chronologies: BTreeMap<Uuid, ExternalChronology>,
    /// Commit records, aliases and comments, in stream order.
    records: Vec<IbdfObject>,
    skipped: u64,
}

impl Export {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: impl IntoIterator<Item = IbdfObject>) -> Self {
        let mut export = Self::new();
        for object in objects {
            export.insert(object);
        }
        export
    }

    /// Read a whole IBDF file, skipping records of unsupported types.
    pub fn read(path: &Path) -> TaxonResult<Self> {
        let (objects, skipped) = IbdfReader::open(path)?.read_all_skipping_unsupported()?;
        let mut export = Self::from_objects(objects);
        export.skipped = skipped;
        Ok(export)
    }

    /// Chronologies sharing a primordial UUID are merged: unseen versions
    /// are appended and additional UUIDs unioned.
    pub fn insert(&mut self, object: IbdfObject) {
        match object {
            IbdfObject::Concept(chronology) | IbdfObject::Semantic(chronology) => {
                self.merge_chronology(chronology)
            }
            record => {
                if !self.records.contains(&record) {
                    self.records.push(record);
                }
            }
        }
    }

    fn merge_chronology(&mut self, chronology: ExternalChronology) {
        let Some(existing) = self.chronologies.get_mut(&chronology.primordial_uuid) else {
            self.chronologies.insert(chronology.primordial_uuid, chronology);
            return;
        };
        for version in chronology.versions {
            if !existing.versions.contains(&version) {
                existing.versions.push(version);
            }
        }
        existing.additional_uuids.extend(chronology.additional_uuids);
    }

    pub(crate) fn replace(&mut self, chronology: ExternalChronology) {
        self.chronologies.insert(chronology.primordial_uuid, chronology);
    }

    pub(crate) fn add_skipped(&mut self, skipped: u64) {
        self.skipped += skipped;
    }

    pub fn get(&self, uuid: &Uuid) -> Option<&ExternalChronology> {
        self.chronologies.get(uuid)
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.chronologies.contains_key(uuid)
    }

    pub fn chronologies(&self) -> impl Iterator<Item = &ExternalChronology> + '_ {
        self.chronologies.values()
    }

    pub fn uuids(&self) -> impl Iterator<Item = &Uuid> + '_ {
        self.chronologies.keys()
    }

    pub fn records(&self) -> &[IbdfObject] {
        &self.records
    }

    /// Chronologies plus other records.
    pub fn len(&self) -> usize {
        self.chronologies.len() + self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records dropped while reading because their type was unsupported.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Write chronologies in UUID order, then the other records.
    pub fn write(&self, path: &Path) -> TaxonResult<u64> {
        let mut writer = IbdfWriter::create(path)?;
        for chronology in self.chronologies.values() {
            writer.write(&IbdfObject::from_chronology(chronology.clone()))?;
        }
        writer.write_all(&self.records)?;
        let written = writer.written();
        writer.finish()?;
        Ok(written)
    }
}
