//! ChronicleStore: concurrent nid → chronicle map.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use taxon_core::errors::{ChronicleError, IbdfError, StampError, TaxonResult};
use taxon_core::models::{Chronicle, ChronologyKind, Version};
use taxon_core::traits::{IdentifierService, PersistenceProvider};
use taxon_core::{Nid, StampSequence};
use taxon_ibdf::codec;
use taxon_ibdf::IbdfObject;
use taxon_stamp::StampRegistry;

use crate::filter::StampFilter;

/// Appending to a chronicle locks only its dashmap shard.
pub struct ChronicleStore {
    chronicles: DashMap<Nid, Chronicle>,
    pub(crate) stamps: Arc<StampRegistry>,
    pub(crate) ids: Arc<dyn IdentifierService>,
}

impl ChronicleStore {
    pub fn new(stamps: Arc<StampRegistry>, ids: Arc<dyn IdentifierService>) -> Self {
        Self {
            chronicles: DashMap::new(),
            stamps,
            ids,
        }
    }

    fn check_stamp(&self, stamp: StampSequence) -> TaxonResult<()> {
        if self.stamps.contains(stamp) {
            Ok(())
        } else {
            Err(StampError::UnknownStamp(stamp).into())
        }
    }

    /// Start a chronicle for `nid` with its primordial version.
    pub fn create(&self, nid: Nid, kind: ChronologyKind, version: Version) -> TaxonResult<()> {
        self.check_stamp(version.stamp)?;
        let uuid = self.ids.uuid_for_nid(nid)?;
        match self.chronicles.entry(nid) {
            Entry::Occupied(_) => Err(ChronicleError::AlreadyExists(nid).into()),
            Entry::Vacant(entry) => {
                entry.insert(Chronicle::new(nid, uuid, kind, version));
                Ok(())
            }
        }
    }

    /// Returns the index of the appended version.
    pub fn append(&self, nid: Nid, version: Version) -> TaxonResult<usize> {
        self.check_stamp(version.stamp)?;
        let mut chronicle = self
            .chronicles
            .get_mut(&nid)
            .ok_or(ChronicleError::UnknownChronicle(nid))?;
        Ok(chronicle.push_version(version))
    }

    /// The version of `nid` visible through `filter`, if any.
    pub fn snapshot(&self, nid: Nid, filter: &StampFilter) -> TaxonResult<Option<Version>> {
        let chronicle = self
            .chronicles
            .get(&nid)
            .ok_or(ChronicleError::UnknownChronicle(nid))?;
        filter.latest_version(&chronicle)
    }

    pub fn all_versions(&self, nid: Nid) -> TaxonResult<Vec<Version>> {
        self.chronicles
            .get(&nid)
            .map(|c| c.versions().to_vec())
            .ok_or_else(|| ChronicleError::UnknownChronicle(nid).into())
    }

    /// Replace stamp `from` with `to` in `nid`'s versions.
    pub fn restamp(&self, nid: Nid, from: StampSequence, to: StampSequence) -> TaxonResult<usize> {
        self.check_stamp(to)?;
        let mut chronicle = self
            .chronicles
            .get_mut(&nid)
            .ok_or(ChronicleError::UnknownChronicle(nid))?;
        Ok(chronicle.restamp(from, to))
    }

    /// Replace `from` with `to` on the single version at `index`. Returns
    /// false when that version no longer carries `from`.
    pub fn restamp_version(
        &self,
        nid: Nid,
        index: usize,
        from: StampSequence,
        to: StampSequence,
    ) -> TaxonResult<bool> {
        self.check_stamp(to)?;
        let mut chronicle = self
            .chronicles
            .get_mut(&nid)
            .ok_or(ChronicleError::UnknownChronicle(nid))?;
        Ok(chronicle.restamp_version(index, from, to))
    }

    pub fn chronicle(&self, nid: Nid) -> Option<Chronicle> {
        self.chronicles.get(&nid).map(|c| c.clone())
    }

    pub fn contains(&self, nid: Nid) -> bool {
        self.chronicles.contains_key(&nid)
    }

    /// Every nid in the store, ascending.
    pub fn nids(&self) -> Vec<Nid> {
        let mut nids: Vec<Nid> = self.chronicles.iter().map(|e| *e.key()).collect();
        nids.sort_unstable();
        nids
    }

    pub fn len(&self) -> usize {
        self.chronicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chronicles.is_empty()
    }

    /// Clone every chronicle, ordered by nid.
    pub fn chronicles(&self) -> Vec<Chronicle> {
        let mut all: Vec<Chronicle> = self.chronicles.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|c| c.nid);
        all
    }

    /// Insert `incoming`, or merge it into the existing chronicle: unseen
    /// versions are appended in incoming order and UUIDs are unioned.
    pub fn merge(&self, incoming: Chronicle) -> TaxonResult<()> {
        for stamp in incoming.stamps() {
            self.check_stamp(stamp)?;
        }
        match self.chronicles.entry(incoming.nid) {
            Entry::Vacant(entry) => {
                entry.insert(incoming);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                if existing.primordial_uuid != incoming.primordial_uuid {
                    existing.additional_uuids.insert(incoming.primordial_uuid);
                }
                existing
                    .additional_uuids
                    .extend(incoming.additional_uuids.iter().copied());
                for version in incoming.versions() {
                    if !existing.versions().contains(version) {
                        existing.push_version(version.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Write `nid`'s chronicle to `persistence` as one IBDF frame keyed by nid.
    pub fn persist(&self, nid: Nid, persistence: &dyn PersistenceProvider) -> TaxonResult<()> {
        let external = self.export(nid)?;
        let bytes = codec::encode_to_vec(&IbdfObject::from_chronology(external))?;
        persistence.put(nid.get(), &bytes)
    }

    /// Read `nid`'s chronicle from `persistence` and merge it in. Returns
    /// false when nothing is stored under that key.
    pub fn load(&self, nid: Nid, persistence: &dyn PersistenceProvider) -> TaxonResult<bool> {
        let Some(bytes) = persistence.get(nid.get())? else {
            return Ok(false);
        };
        let object = codec::decode_from_slice(&bytes)?;
        let found = object.object_type().to_string();
        let external = object.into_chronology().ok_or(IbdfError::UnexpectedObject {
            expected: "chronology".to_string(),
            found,
        })?;
        let chronicle = self.from_external(&external)?;
        if chronicle.nid != nid {
            return Err(ChronicleError::Corrupt {
                nid,
                reason: format!("stored chronicle belongs to {}", chronicle.nid),
            }
            .into());
        }
        self.merge(chronicle)?;
        Ok(true)
    }
}
