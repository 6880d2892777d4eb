//! Chronicle ↔ IBDF external chronology.

use taxon_core::errors::{ChronicleError, TaxonResult};
use taxon_core::models::{Chronicle, ChronologyKind, Version};
use taxon_core::Nid;
use taxon_ibdf::{ExternalChronology, ExternalKind, ExternalVersion};

use crate::store::ChronicleStore;

impl ChronicleStore {
    /// Wire form of `nid`'s chronicle.
    pub fn export(&self, nid: Nid) -> TaxonResult<ExternalChronology> {
        let chronicle = self
            .chronicle(nid)
            .ok_or(ChronicleError::UnknownChronicle(nid))?;
        self.to_external(&chronicle)
    }

    /// Wire form of every chronicle with at least one committed version,
    /// ordered by nid.
    pub fn export_all(&self) -> TaxonResult<Vec<ExternalChronology>> {
        let mut exported = Vec::with_capacity(self.len());
        for chronicle in self.chronicles() {
            let external = self.to_external(&chronicle)?;
            if !external.versions.is_empty() {
                exported.push(external);
            }
        }
        Ok(exported)
    }

    /// Versions with uncommitted stamps are not exported.
    pub fn to_external(&self, chronicle: &Chronicle) -> TaxonResult<ExternalChronology> {
        let ids = self.ids.as_ref();
        let kind = match chronicle.kind {
            ChronologyKind::Concept => ExternalKind::Concept,
            ChronologyKind::Semantic {
                assemblage,
                referenced_component,
            } => ExternalKind::Semantic {
                assemblage: ids.uuid_for_nid(assemblage)?,
                referenced_component: ids.uuid_for_nid(referenced_component)?,
            },
        };
        let mut versions = Vec::with_capacity(chronicle.versions().len());
        for version in chronicle.versions() {
            if self.stamps.resolve(version.stamp)?.is_uncommitted() {
                continue;
            }
            versions.push(ExternalVersion {
                stamp: self.stamps.to_external(version.stamp, ids)?,
                payload: version.payload.clone(),
            });
        }
        Ok(ExternalChronology {
            kind,
            primordial_uuid: chronicle.primordial_uuid,
            additional_uuids: chronicle.additional_uuids.clone(),
            versions,
        })
    }

    /// Rebuild a chronicle from wire form, registering its stamps.
    pub fn from_external(&self, external: &ExternalChronology) -> TaxonResult<Chronicle> {
        let ids = self.ids.as_ref();
        let nid = ids.nid_for_uuid(&external.primordial_uuid)?;
        let kind = match external.kind {
            ExternalKind::Concept => ChronologyKind::Concept,
            ExternalKind::Semantic {
                assemblage,
                referenced_component,
            } => ChronologyKind::Semantic {
                assemblage: ids.nid_for_uuid(&assemblage)?,
                referenced_component: ids.nid_for_uuid(&referenced_component)?,
            },
        };
        let mut versions = Vec::with_capacity(external.versions.len());
        for version in &external.versions {
            versions.push(Version::new(
                self.stamps.from_external(&version.stamp, ids)?,
                version.payload.clone(),
            ));
        }
        Chronicle::from_versions(
            nid,
            external.primordial_uuid,
            external.additional_uuids.clone(),
            kind,
            versions,
        )
        .ok_or_else(|| {
            ChronicleError::Corrupt {
                nid,
                reason: "chronology has no versions".to_string(),
            }
            .into()
        })
    }

    /// Register and merge an external chronology. Returns its nid.
    pub fn import(&self, external: &ExternalChronology) -> TaxonResult<Nid> {
        let chronicle = self.from_external(external)?;
        let nid = chronicle.nid;
        self.merge(chronicle)?;
        Ok(nid)
    }
}
