//! Write transactions.
//!
//! Versions written in a transaction carry uncommitted stamps and are
//! invisible to every coordinate. Commit mints the committed replacement of
//! each uncommitted stamp, finalizes the commit record, and only then
//! restamps the written versions. A failed commit, cancel, or dropping the
//! transaction restamps them as canceled.
//!
//! Uncommitted stamps are shared by every open transaction writing with the
//! same (status, author, module, path), so a transaction restamps only the
//! versions it wrote itself, addressed by chronicle and version index.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use taxon_commit::CommitHandle;
use taxon_core::errors::{CommitError, StampError};
use taxon_core::models::{ChronologyKind, CommitRecord, Stamp, Status, Version, VersionPayload};
use taxon_core::{Nid, StampSequence, TaxonResult};

use crate::engine::VersioningEngine;

type Writes = BTreeMap<Nid, Vec<usize>>;

pub struct Transaction<'e> {
    engine: &'e VersioningEngine,
    handle: Option<CommitHandle>,
    /// uncommitted stamp → chronicle → indices of the versions written here
    writes: BTreeMap<StampSequence, Writes>,
    comments: Vec<(StampSequence, String)>,
}

impl<'e> Transaction<'e> {
    pub(crate) fn new(engine: &'e VersioningEngine, comment: String) -> Self {
        Self {
            engine,
            handle: Some(engine.ledger().begin_commit(comment)),
            writes: BTreeMap::new(),
            comments: Vec::new(),
        }
    }

    /// The uncommitted stamp for writes by `author` in `module` on `path`.
    pub fn stamp(&self, status: Status, author: Nid, module: Nid, path: Nid) -> StampSequence {
        self.engine
            .stamps()
            .get_stamp_sequence(&Stamp::uncommitted(status, author, module, path))
    }

    fn require_uncommitted(&self, stamp: StampSequence) -> TaxonResult<()> {
        if self.engine.stamps().resolve(stamp)?.is_uncommitted() {
            Ok(())
        } else {
            Err(StampError::NotUncommitted(stamp).into())
        }
    }

    /// Start a new chronicle.
    pub fn create(
        &mut self,
        nid: Nid,
        kind: ChronologyKind,
        stamp: StampSequence,
        payload: VersionPayload,
    ) -> TaxonResult<()> {
        self.require_uncommitted(stamp)?;
        self.engine
            .chronicles()
            .create(nid, kind, Version::new(stamp, payload))?;
        self.record_write(stamp, nid, 0);
        Ok(())
    }

    /// Append a version to an existing chronicle.
    pub fn append(
        &mut self,
        nid: Nid,
        stamp: StampSequence,
        payload: VersionPayload,
    ) -> TaxonResult<()> {
        self.require_uncommitted(stamp)?;
        let index = self
            .engine
            .chronicles()
            .append(nid, Version::new(stamp, payload))?;
        self.record_write(stamp, nid, index);
        Ok(())
    }

    fn record_write(&mut self, stamp: StampSequence, nid: Nid, index: usize) {
        self.writes
            .entry(stamp)
            .or_default()
            .entry(nid)
            .or_default()
            .push(index);
    }

    /// Record `alias → primordial` with this commit. Validated at commit.
    pub fn alias(&self, alias: StampSequence, primordial: StampSequence) -> TaxonResult<()> {
        self.engine
            .ledger()
            .attach_alias(self.handle()?, alias, primordial)
    }

    /// Comment attached to the committed replacement of `stamp`.
    pub fn comment(&mut self, stamp: StampSequence, comment: impl Into<String>) -> TaxonResult<()> {
        self.require_uncommitted(stamp)?;
        self.comments.push((stamp, comment.into()));
        Ok(())
    }

    fn handle(&self) -> TaxonResult<&CommitHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| CommitError::UnknownHandle(0).into())
    }

    pub fn commit(self) -> TaxonResult<Arc<CommitRecord>> {
        self.commit_at(Utc::now())
    }

    pub fn commit_at(mut self, time: DateTime<Utc>) -> TaxonResult<Arc<CommitRecord>> {
        let Some(handle) = self.handle.take() else {
            return Err(CommitError::UnknownHandle(0).into());
        };
        let engine = self.engine;
        let writes = std::mem::take(&mut self.writes);
        let ledger = engine.ledger();

        let plan = match self.plan_commit(&handle, &writes, time.timestamp_millis()) {
            Ok(plan) => plan,
            Err(e) => {
                // Nothing has been restamped yet.
                let _ = ledger.abandon(handle);
                self.writes = writes;
                self.cancel_writes();
                return Err(e);
            }
        };

        let record = match ledger.finalize_commit_at(handle, time) {
            Ok(record) => record,
            Err(e) => {
                self.writes = writes;
                self.cancel_writes();
                return Err(e);
            }
        };

        let chronicles = engine.chronicles();
        let mut touched = BTreeSet::new();
        for (uncommitted, committed) in &plan {
            for (nid, indices) in &writes[uncommitted] {
                for index in indices {
                    chronicles.restamp_version(*nid, *index, *uncommitted, *committed)?;
                }
                touched.insert(*nid);
            }
        }
        for (stamp, comment) in std::mem::take(&mut self.comments) {
            if let Some(committed) = plan.get(&stamp) {
                engine.stamps().set_comment(*committed, comment)?;
            }
        }
        for nid in touched {
            chronicles.persist(nid, engine.persistence())?;
        }
        Ok(record)
    }

    /// Mint committed stamps and register them with the open commit.
    fn plan_commit(
        &self,
        handle: &CommitHandle,
        writes: &BTreeMap<StampSequence, Writes>,
        commit_time: i64,
    ) -> TaxonResult<BTreeMap<StampSequence, StampSequence>> {
        let mut plan = BTreeMap::new();
        for (uncommitted, nids) in writes {
            let committed = self
                .engine
                .stamps()
                .commit_uncommitted(*uncommitted, commit_time)?;
            for nid in nids.keys() {
                let uuid = self.engine.ids().uuid_for_nid(*nid)?;
                self.engine.ledger().record_touched(handle, committed, uuid)?;
            }
            plan.insert(*uncommitted, committed);
        }
        Ok(plan)
    }

    /// Restamp every written version as canceled and drop the open commit.
    pub fn cancel(mut self) -> TaxonResult<()> {
        if let Some(handle) = self.handle.take() {
            self.engine.ledger().abandon(handle)?;
        }
        self.cancel_writes();
        Ok(())
    }

    fn cancel_writes(&mut self) {
        let engine = self.engine;
        for (uncommitted, nids) in std::mem::take(&mut self.writes) {
            let canceled = match engine.stamps().cancel_uncommitted(uncommitted) {
                Ok(canceled) => canceled,
                Err(error) => {
                    tracing::warn!(stamp = %uncommitted, %error, "cancel failed");
                    continue;
                }
            };
            for (nid, indices) in nids {
                for index in indices {
                    if let Err(error) =
                        engine
                            .chronicles()
                            .restamp_version(nid, index, uncommitted, canceled)
                    {
                        tracing::warn!(%nid, index, %error, "restamp to canceled failed");
                    }
                }
            }
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::warn!(handle = handle.id(), "transaction dropped without commit; canceling");
            let _ = self.engine.ledger().abandon(handle);
            self.cancel_writes();
        }
    }
}
