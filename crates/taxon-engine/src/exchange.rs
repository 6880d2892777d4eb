//! Whole-store export and import as an IBDF stream.
//!
//! Export order: chronologies by nid, stamp aliases, stamp comments, then
//! commit records in commit order. Import accepts any order, registers every
//! stamp it meets, and skips records of unsupported types with a count.

use std::io::{Read, Write};
use std::path::Path;

use taxon_core::errors::IbdfError;
use taxon_core::models::CommitRecord;
use taxon_core::TaxonResult;
use taxon_ibdf::{IbdfObject, IbdfReader, IbdfWriter};

use crate::engine::VersioningEngine;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportCounts {
    pub chronologies: usize,
    pub aliases: usize,
    pub comments: usize,
    pub commit_records: usize,
}

impl ExportCounts {
    pub fn total(&self) -> usize {
        self.chronologies + self.aliases + self.comments + self.commit_records
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub chronologies: usize,
    pub aliases: usize,
    pub comments: usize,
    pub commit_records: usize,
    /// Records already present in the ledger.
    pub duplicate_commit_records: usize,
    /// Records of unsupported object types.
    pub skipped: u64,
}

impl VersioningEngine {
    pub fn export_ibdf<W: Write>(&self, writer: &mut IbdfWriter<W>) -> TaxonResult<ExportCounts> {
        let ids = self.ids();
        let mut counts = ExportCounts::default();

        for chronology in self.chronicles().export_all()? {
            writer.write(&IbdfObject::from_chronology(chronology))?;
            counts.chronologies += 1;
        }
        for alias in self.stamps().all_aliases() {
            let external = self.stamps().alias_to_external(&alias, ids)?;
            writer.write(&IbdfObject::StampAlias(external))?;
            counts.aliases += 1;
        }
        for comment in self.stamps().comments() {
            let external = self.stamps().comment_to_external(&comment, ids)?;
            writer.write(&IbdfObject::StampComment(external))?;
            counts.comments += 1;
        }
        for record in self.ledger().export_records()? {
            writer.write(&IbdfObject::CommitRecord(record))?;
            counts.commit_records += 1;
        }

        tracing::info!(
            chronologies = counts.chronologies,
            aliases = counts.aliases,
            comments = counts.comments,
            commit_records = counts.commit_records,
            "store exported"
        );
        Ok(counts)
    }

    pub fn export_file(&self, path: &Path) -> TaxonResult<ExportCounts> {
        let mut writer = IbdfWriter::create(path)?;
        let counts = self.export_ibdf(&mut writer)?;
        writer.finish()?;
        Ok(counts)
    }

    pub fn import_ibdf<R: Read>(&self, mut reader: IbdfReader<R>) -> TaxonResult<ImportReport> {
        let mut report = ImportReport::default();
        loop {
            let object = match reader.read_object() {
                Ok(Some(object)) => object,
                Ok(None) => break,
                Err(IbdfError::UnsupportedObjectType { tag }) => {
                    tracing::warn!(tag, "skipping unsupported record on import");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            self.import_object(object, &mut report)?;
        }
        report.skipped = reader.skipped();
        tracing::info!(
            chronologies = report.chronologies,
            aliases = report.aliases,
            comments = report.comments,
            commit_records = report.commit_records,
            skipped = report.skipped,
            "store imported"
        );
        Ok(report)
    }

    pub fn import_file(&self, path: &Path) -> TaxonResult<ImportReport> {
        self.import_ibdf(IbdfReader::open(path)?)
    }

    fn import_object(&self, object: IbdfObject, report: &mut ImportReport) -> TaxonResult<()> {
        let ids = self.ids();
        match object {
            IbdfObject::Concept(chronology) | IbdfObject::Semantic(chronology) => {
                self.chronicles().import(&chronology)?;
                report.chronologies += 1;
            }
            IbdfObject::StampAlias(external) => {
                let alias = self.stamps().alias_from_external(&external, ids)?;
                self.stamps().add_alias(alias.alias, alias.primordial)?;
                report.aliases += 1;
            }
            IbdfObject::StampComment(external) => {
                self.stamps().import_comment(&external, ids)?;
                report.comments += 1;
            }
            IbdfObject::CommitRecord(external) => {
                let record = self.ledger().from_external(&external)?;
                if self.has_commit(&record) {
                    report.duplicate_commit_records += 1;
                } else {
                    self.ledger().import(&external)?;
                    report.commit_records += 1;
                }
            }
        }
        Ok(())
    }

    fn has_commit(&self, record: &CommitRecord) -> bool {
        self.ledger().records().iter().any(|r| r.as_ref() == record)
    }
}
