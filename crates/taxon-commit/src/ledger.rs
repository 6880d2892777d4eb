//! CommitLedger: open commits and the finalized history.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use taxon_core::errors::{CommitError, IbdfError, StampError, TaxonResult};
use taxon_core::models::{CommitRecord, StampAlias};
use taxon_core::traits::{IdentifierService, PersistenceProvider};
use taxon_core::StampSequence;
use taxon_ibdf::{codec, IbdfObject};
use taxon_stamp::StampRegistry;

/// Opaque handle to an open commit. Consumed by finalize.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CommitHandle(u64);

impl CommitHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct PendingCommit {
    comment: String,
    stamps: BTreeSet<StampSequence>,
    components: BTreeSet<Uuid>,
    aliases: BTreeMap<StampSequence, StampSequence>,
}

pub struct CommitLedger {
    pub(crate) stamps: Arc<StampRegistry>,
    pub(crate) ids: Arc<dyn IdentifierService>,
    persistence: Arc<dyn PersistenceProvider>,
    pending: DashMap<u64, PendingCommit>,
    next_handle: AtomicU64,
    /// Finalized records; record `i` is persisted under key `-(i + 1)`.
    records: RwLock<Vec<Arc<CommitRecord>>>,
}

/// Persistence key of the `index`-th commit record. Commit records use the
/// negative key space so they never collide with chronicles keyed by nid.
pub fn record_key(index: usize) -> i32 {
    -(index as i32) - 1
}

impl CommitLedger {
    pub fn new(
        stamps: Arc<StampRegistry>,
        ids: Arc<dyn IdentifierService>,
        persistence: Arc<dyn PersistenceProvider>,
    ) -> Self {
        Self {
            stamps,
            ids,
            persistence,
            pending: DashMap::new(),
            next_handle: AtomicU64::new(1),
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn begin_commit(&self, comment: impl Into<String>) -> CommitHandle {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.pending.insert(
            id,
            PendingCommit {
                comment: comment.into(),
                ..PendingCommit::default()
            },
        );
        tracing::debug!(handle = id, "commit opened");
        CommitHandle(id)
    }

    pub fn record_touched(
        &self,
        handle: &CommitHandle,
        stamp: StampSequence,
        component: Uuid,
    ) -> TaxonResult<()> {
        if !self.stamps.contains(stamp) {
            return Err(StampError::UnknownStamp(stamp).into());
        }
        let mut pending = self
            .pending
            .get_mut(&handle.0)
            .ok_or(CommitError::UnknownHandle(handle.0))?;
        pending.stamps.insert(stamp);
        pending.components.insert(component);
        Ok(())
    }

    /// Queue an alias for install at finalize. Validation happens then.
    pub fn attach_alias(
        &self,
        handle: &CommitHandle,
        alias: StampSequence,
        primordial: StampSequence,
    ) -> TaxonResult<()> {
        let mut pending = self
            .pending
            .get_mut(&handle.0)
            .ok_or(CommitError::UnknownHandle(handle.0))?;
        pending.aliases.insert(alias, primordial);
        Ok(())
    }

    /// Drop an open commit without recording anything.
    pub fn abandon(&self, handle: CommitHandle) -> TaxonResult<()> {
        self.pending
            .remove(&handle.0)
            .map(|_| ())
            .ok_or_else(|| CommitError::UnknownHandle(handle.0).into())
    }

    pub fn finalize_commit(&self, handle: CommitHandle) -> TaxonResult<Arc<CommitRecord>> {
        self.finalize_commit_at(handle, Utc::now())
    }

    /// Finalize with an explicit commit time.
    pub fn finalize_commit_at(
        &self,
        handle: CommitHandle,
        commit_time: DateTime<Utc>,
    ) -> TaxonResult<Arc<CommitRecord>> {
        let _span = taxon_core::commit_span!(handle.0).entered();
        let (_, pending) = self
            .pending
            .remove(&handle.0)
            .ok_or(CommitError::UnknownHandle(handle.0))?;
        let record = CommitRecord {
            commit_time,
            stamps_in_commit: pending.stamps,
            stamp_aliases: pending.aliases,
            components_in_commit: pending.components,
            comment: pending.comment,
        };
        let record = self.install(record)?;
        tracing::info!(
            handle = handle.0,
            stamps = record.stamps_in_commit.len(),
            components = record.components_in_commit.len(),
            aliases = record.stamp_aliases.len(),
            "commit finalized"
        );
        Ok(record)
    }

    /// Validate aliases, persist, then publish the record and its aliases.
    pub(crate) fn install(&self, record: CommitRecord) -> TaxonResult<Arc<CommitRecord>> {
        let aliases: Vec<StampAlias> = record
            .stamp_aliases
            .iter()
            .map(|(alias, primordial)| StampAlias {
                alias: *alias,
                primordial: *primordial,
            })
            .collect();

        let mut records = self.records.write();
        let key = record_key(records.len());
        self.stamps.apply_aliases(&aliases, || {
            let bytes = codec::encode_to_vec(&IbdfObject::CommitRecord(
                self.to_external(&record)?,
            ))?;
            self.persistence
                .put(key, &bytes)
                .map_err(|e| CommitError::PersistenceFailed {
                    reason: e.to_string(),
                })?;
            Ok(())
        })?;

        let record = Arc::new(record);
        records.push(Arc::clone(&record));
        Ok(record)
    }

    /// Finalized records in commit order.
    pub fn records(&self) -> Vec<Arc<CommitRecord>> {
        self.records.read().clone()
    }

    pub fn records_touching(&self, component: &Uuid) -> Vec<Arc<CommitRecord>> {
        self.records
            .read()
            .iter()
            .filter(|r| r.components_in_commit.contains(component))
            .cloned()
            .collect()
    }

    pub fn open_commits(&self) -> usize {
        self.pending.len()
    }

    /// Decode the record stored under `key`.
    pub fn read_persisted(&self, key: i32) -> TaxonResult<CommitRecord> {
        let bytes = self
            .persistence
            .get(key)?
            .ok_or(CommitError::RecordNotFound(key))?;
        match codec::decode_from_slice(&bytes)? {
            IbdfObject::CommitRecord(external) => self.from_external(&external),
            other => Err(IbdfError::UnexpectedObject {
                expected: "commit_record".to_string(),
                found: other.object_type().to_string(),
            }
            .into()),
        }
    }

    /// Reload the persisted history into an empty ledger. Aliases recorded
    /// by each commit are reinstalled. Returns the number of records loaded.
    pub fn load_persisted(&self) -> TaxonResult<usize> {
        let mut records = self.records.write();
        let start = records.len();
        loop {
            let key = record_key(records.len());
            if self.persistence.get(key)?.is_none() {
                break;
            }
            let record = self.read_persisted(key)?;
            let aliases: Vec<StampAlias> = record
                .stamp_aliases
                .iter()
                .map(|(a, p)| StampAlias {
                    alias: *a,
                    primordial: *p,
                })
                .collect();
            self.stamps.apply_aliases(&aliases, || Ok(()))?;
            records.push(Arc::new(record));
        }
        let loaded = records.len() - start;
        tracing::info!(loaded, "commit history loaded");
        Ok(loaded)
    }
}
