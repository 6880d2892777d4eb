//! StampRegistry: concurrent tuple ↔ sequence tables.

use std::sync::atomic::{AtomicI32, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use taxon_core::config::StampConfig;
use taxon_core::constants::FIRST_STAMP_SEQUENCE;
use taxon_core::errors::{StampError, TaxonResult};
use taxon_core::models::{Stamp, StampComment};
use taxon_core::StampSequence;

/// Process-wide stamp table.
///
/// Reads are lock-free apart from the dashmap shard read lock. Allocation of
/// a novel tuple happens under that tuple's shard entry lock, so concurrent
/// callers with the same tuple observe one sequence.
pub struct StampRegistry {
    by_stamp: DashMap<Stamp, StampSequence>,
    by_sequence: DashMap<StampSequence, Stamp>,
    next_sequence: AtomicI32,
    /// alias → primordial.
    pub(crate) aliases: DashMap<StampSequence, StampSequence>,
    /// primordial → aliases, in install order.
    pub(crate) aliases_by_primordial: DashMap<StampSequence, Vec<StampSequence>>,
    /// Serializes alias validation and install.
    pub(crate) alias_lock: Mutex<()>,
    comments: DashMap<StampSequence, String>,
}

impl StampRegistry {
    pub fn new() -> Self {
        Self::with_config(&StampConfig::default())
    }

    pub fn with_config(config: &StampConfig) -> Self {
        Self {
            by_stamp: DashMap::with_capacity(config.initial_capacity),
            by_sequence: DashMap::with_capacity(config.initial_capacity),
            next_sequence: AtomicI32::new(FIRST_STAMP_SEQUENCE),
            aliases: DashMap::new(),
            aliases_by_primordial: DashMap::new(),
            alias_lock: Mutex::new(()),
            comments: DashMap::new(),
        }
    }

    /// Sequence for `stamp`, allocating one on first sight.
    pub fn get_stamp_sequence(&self, stamp: &Stamp) -> StampSequence {
        if let Some(existing) = self.by_stamp.get(stamp) {
            return *existing;
        }
        match self.by_stamp.entry(*stamp) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let sequence =
                    StampSequence(self.next_sequence.fetch_add(1, Ordering::SeqCst));
                // Reverse entry first: a sequence is never observable
                // before it resolves.
                self.by_sequence.insert(sequence, *stamp);
                entry.insert(sequence);
                tracing::trace!(%sequence, time = stamp.time, "allocated stamp sequence");
                sequence
            }
        }
    }

    /// The sequence already assigned to `stamp`, without allocating.
    pub fn find(&self, stamp: &Stamp) -> Option<StampSequence> {
        self.by_stamp.get(stamp).map(|s| *s)
    }

    pub fn resolve(&self, sequence: StampSequence) -> TaxonResult<Stamp> {
        self.by_sequence
            .get(&sequence)
            .map(|s| *s)
            .ok_or_else(|| StampError::UnknownStamp(sequence).into())
    }

    pub fn contains(&self, sequence: StampSequence) -> bool {
        self.by_sequence.contains_key(&sequence)
    }

    pub fn len(&self) -> usize {
        self.by_sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sequence.is_empty()
    }

    /// Mint the committed replacement of an uncommitted stamp.
    pub fn commit_uncommitted(
        &self,
        sequence: StampSequence,
        commit_time: i64,
    ) -> TaxonResult<StampSequence> {
        if commit_time == Stamp::CANCELED_TIME || commit_time == Stamp::UNCOMMITTED_TIME {
            return Err(StampError::InvalidCommitTime(commit_time).into());
        }
        let stamp = self.uncommitted(sequence)?;
        Ok(self.get_stamp_sequence(&stamp.with_time(commit_time)))
    }

    /// Mint the canceled replacement of an uncommitted stamp.
    pub fn cancel_uncommitted(&self, sequence: StampSequence) -> TaxonResult<StampSequence> {
        let stamp = self.uncommitted(sequence)?;
        Ok(self.get_stamp_sequence(&stamp.with_time(Stamp::CANCELED_TIME)))
    }

    fn uncommitted(&self, sequence: StampSequence) -> TaxonResult<Stamp> {
        let stamp = self.resolve(sequence)?;
        if !stamp.is_uncommitted() {
            return Err(StampError::NotUncommitted(sequence).into());
        }
        Ok(stamp)
    }

    /// Every stamp that may be written out, ordered by sequence.
    /// Uncommitted stamps are never persisted.
    pub fn persistable_stamps(&self) -> Vec<(StampSequence, Stamp)> {
        let mut stamps: Vec<(StampSequence, Stamp)> = self
            .by_sequence
            .iter()
            .filter(|e| !e.value().is_uncommitted())
            .map(|e| (*e.key(), *e.value()))
            .collect();
        stamps.sort_by_key(|(sequence, _)| *sequence);
        stamps
    }

    /// Attach (or replace) the comment on a stamp.
    pub fn set_comment(&self, sequence: StampSequence, comment: impl Into<String>) -> TaxonResult<()> {
        if !self.contains(sequence) {
            return Err(StampError::UnknownStamp(sequence).into());
        }
        self.comments.insert(sequence, comment.into());
        Ok(())
    }

    pub fn comment(&self, sequence: StampSequence) -> Option<String> {
        self.comments.get(&sequence).map(|c| c.clone())
    }

    /// All comments, ordered by stamp sequence.
    pub fn comments(&self) -> Vec<StampComment> {
        let mut comments: Vec<StampComment> = self
            .comments
            .iter()
            .map(|e| StampComment {
                stamp: *e.key(),
                comment: e.value().clone(),
            })
            .collect();
        comments.sort_by_key(|c| c.stamp);
        comments
    }
}

impl Default for StampRegistry {
    fn default() -> Self {
        Self::new()
    }
}
