//! In-memory UUID ↔ nid service.

use std::sync::atomic::{AtomicI32, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use taxon_core::errors::{StorageError, TaxonResult};
use taxon_core::traits::IdentifierService;
use taxon_core::Nid;

/// Assigns nids on first sight of a UUID, counting up from 1.
pub struct InMemoryIdentifierService {
    by_uuid: DashMap<Uuid, Nid>,
    by_nid: DashMap<Nid, Uuid>,
    next_nid: AtomicI32,
}

impl InMemoryIdentifierService {
    pub fn new() -> Self {
        Self {
            by_uuid: DashMap::new(),
            by_nid: DashMap::new(),
            next_nid: AtomicI32::new(1),
        }
    }

    /// Bind `uuid` to a caller-chosen nid. Later automatic assignments skip
    /// past it.
    pub fn register(&self, uuid: Uuid, nid: Nid) {
        self.by_uuid.insert(uuid, nid);
        self.by_nid.insert(nid, uuid);
        self.next_nid.fetch_max(nid.get() + 1, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.by_nid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_nid.is_empty()
    }
}

impl Default for InMemoryIdentifierService {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierService for InMemoryIdentifierService {
    fn nid_for_uuid(&self, uuid: &Uuid) -> TaxonResult<Nid> {
        if let Some(nid) = self.by_uuid.get(uuid) {
            return Ok(*nid);
        }
        let nid = match self.by_uuid.entry(*uuid) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let nid = Nid(self.next_nid.fetch_add(1, Ordering::SeqCst));
                self.by_nid.insert(nid, *uuid);
                entry.insert(nid);
                nid
            }
        };
        Ok(nid)
    }

    fn uuid_for_nid(&self, nid: Nid) -> TaxonResult<Uuid> {
        self.by_nid
            .get(&nid)
            .map(|u| *u)
            .ok_or_else(|| StorageError::UnknownIdentifier(format!("nid {nid}")).into())
    }
}
