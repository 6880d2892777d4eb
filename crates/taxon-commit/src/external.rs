//! CommitRecord ↔ IBDF external record.

use std::sync::Arc;

use taxon_core::errors::TaxonResult;
use taxon_core::models::{CommitRecord, StampAlias};
use taxon_ibdf::ExternalCommitRecord;

use crate::ledger::CommitLedger;

impl CommitLedger {
    pub fn to_external(&self, record: &CommitRecord) -> TaxonResult<ExternalCommitRecord> {
        let ids = self.ids.as_ref();
        let stamps = record
            .stamps_in_commit
            .iter()
            .map(|s| self.stamps.to_external(*s, ids))
            .collect::<TaxonResult<Vec<_>>>()?;
        let aliases = record
            .stamp_aliases
            .iter()
            .map(|(alias, primordial)| {
                self.stamps.alias_to_external(
                    &StampAlias {
                        alias: *alias,
                        primordial: *primordial,
                    },
                    ids,
                )
            })
            .collect::<TaxonResult<Vec<_>>>()?;
        Ok(ExternalCommitRecord {
            commit_time: record.commit_time,
            stamps,
            aliases,
            components: record.components_in_commit.clone(),
            comment: record.comment.clone(),
        })
    }

    /// Rebuild a record, registering its stamps locally.
    pub fn from_external(&self, external: &ExternalCommitRecord) -> TaxonResult<CommitRecord> {
        let ids = self.ids.as_ref();
        let mut record = CommitRecord {
            commit_time: external.commit_time,
            stamps_in_commit: Default::default(),
            stamp_aliases: Default::default(),
            components_in_commit: external.components.clone(),
            comment: external.comment.clone(),
        };
        for stamp in &external.stamps {
            record
                .stamps_in_commit
                .insert(self.stamps.from_external(stamp, ids)?);
        }
        for alias in &external.aliases {
            let alias = self.stamps.alias_from_external(alias, ids)?;
            record.stamp_aliases.insert(alias.alias, alias.primordial);
        }
        Ok(record)
    }

    /// Append a record produced by another store to this ledger's history.
    pub fn import(&self, external: &ExternalCommitRecord) -> TaxonResult<Arc<CommitRecord>> {
        let record = self.from_external(external)?;
        self.install(record)
    }

    /// Every finalized record in wire form, in commit order.
    pub fn export_records(&self) -> TaxonResult<Vec<ExternalCommitRecord>> {
        self.records()
            .iter()
            .map(|r| self.to_external(r))
            .collect()
    }
}
