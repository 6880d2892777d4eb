//! Owned, structured form of a taxonomy record.

use std::collections::BTreeMap;

use taxon_core::{Nid, StampSequence};

use crate::flags::TaxonomyFlags;

/// destination → stamp → flags.
pub type DestinationStamps = BTreeMap<Nid, BTreeMap<StampSequence, TaxonomyFlags>>;

/// relationship type → destination → stamp → flags, for one concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyRecordUnpacked {
    concept: Nid,
    entries: BTreeMap<Nid, DestinationStamps>,
}

impl TaxonomyRecordUnpacked {
    pub fn new(concept: Nid) -> Self {
        Self {
            concept,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn from_entries(concept: Nid, entries: BTreeMap<Nid, DestinationStamps>) -> Self {
        Self { concept, entries }
    }

    pub fn concept(&self) -> Nid {
        self.concept
    }

    pub fn entries(&self) -> &BTreeMap<Nid, DestinationStamps> {
        &self.entries
    }

    /// Record `stamp` under `concept -type-> destination`. Flags for the
    /// same stamp accumulate.
    pub fn add(
        &mut self,
        relationship_type: Nid,
        destination: Nid,
        stamp: StampSequence,
        flags: TaxonomyFlags,
    ) {
        let slot = self
            .entries
            .entry(relationship_type)
            .or_default()
            .entry(destination)
            .or_default()
            .entry(stamp)
            .or_default();
        *slot = *slot | flags;
    }

    /// True when `stamp` is recorded for the edge and not as a detachment.
    pub fn asserts(&self, relationship_type: Nid, destination: Nid, stamp: StampSequence) -> bool {
        self.stamps(relationship_type, destination)
            .and_then(|stamps| stamps.get(&stamp))
            .is_some_and(|flags| !flags.contains(TaxonomyFlags::DETACHED))
    }

    pub fn destinations(&self, relationship_type: Nid) -> Option<&DestinationStamps> {
        self.entries.get(&relationship_type)
    }

    pub fn stamps(
        &self,
        relationship_type: Nid,
        destination: Nid,
    ) -> Option<&BTreeMap<StampSequence, TaxonomyFlags>> {
        self.entries.get(&relationship_type)?.get(&destination)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of (type, destination) pairs.
    pub fn edge_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }
}
