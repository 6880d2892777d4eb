//! Chronicles (full version histories) and their version payloads.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{Nid, StampSequence};

/// Whether a relationship was authored or produced by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    Stated,
    Inferred,
}

/// Field shape of a version, selected by an explicit discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionPayload {
    /// A concept version carries nothing beyond its stamp.
    Concept,
    /// Membership in a refset, no additional fields.
    Membership,
    Nid {
        nid: Nid,
    },
    NidNid {
        nid1: Nid,
        nid2: Nid,
    },
    NidLong {
        nid: Nid,
        value: i64,
    },
    Long {
        value: i64,
    },
    Str {
        text: String,
    },
    Description {
        case_significance: Nid,
        language: Nid,
        text: String,
        description_type: Nid,
    },
    Relationship {
        destination: Nid,
        relationship_type: Nid,
        group: i32,
        characteristic: Characteristic,
    },
}

/// Discriminant of [`VersionPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    Concept,
    Membership,
    Nid,
    NidNid,
    NidLong,
    Long,
    Str,
    Description,
    Relationship,
}

impl VersionPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            VersionPayload::Concept => PayloadKind::Concept,
            VersionPayload::Membership => PayloadKind::Membership,
            VersionPayload::Nid { .. } => PayloadKind::Nid,
            VersionPayload::NidNid { .. } => PayloadKind::NidNid,
            VersionPayload::NidLong { .. } => PayloadKind::NidLong,
            VersionPayload::Long { .. } => PayloadKind::Long,
            VersionPayload::Str { .. } => PayloadKind::Str,
            VersionPayload::Description { .. } => PayloadKind::Description,
            VersionPayload::Relationship { .. } => PayloadKind::Relationship,
        }
    }
}

/// One revision of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub stamp: StampSequence,
    pub payload: VersionPayload,
}

impl Version {
    pub fn new(stamp: StampSequence, payload: VersionPayload) -> Self {
        Self { stamp, payload }
    }
}

/// What kind of component a chronicle describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChronologyKind {
    Concept,
    Semantic {
        /// The refset / pattern this semantic belongs to.
        assemblage: Nid,
        /// The component the semantic annotates.
        referenced_component: Nid,
    },
}

/// The full version history of one component.
///
/// Always holds at least one version. Versions are kept in insertion order
/// and never removed; cancellation is recorded by appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chronicle {
    pub nid: Nid,
    pub primordial_uuid: Uuid,
    pub additional_uuids: BTreeSet<Uuid>,
    pub kind: ChronologyKind,
    versions: Vec<Version>,
}

impl Chronicle {
    pub fn new(nid: Nid, primordial_uuid: Uuid, kind: ChronologyKind, first: Version) -> Self {
        Self {
            nid,
            primordial_uuid,
            additional_uuids: BTreeSet::new(),
            kind,
            versions: vec![first],
        }
    }

    /// Rebuild a chronicle from a decoded version list. Returns `None` when
    /// `versions` is empty.
    pub fn from_versions(
        nid: Nid,
        primordial_uuid: Uuid,
        additional_uuids: BTreeSet<Uuid>,
        kind: ChronologyKind,
        versions: Vec<Version>,
    ) -> Option<Self> {
        if versions.is_empty() {
            return None;
        }
        Some(Self {
            nid,
            primordial_uuid,
            additional_uuids,
            kind,
            versions,
        })
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// The first version ever written.
    pub fn primordial_version(&self) -> &Version {
        &self.versions[0]
    }

    /// Append `version`. Returns its index, which stays valid because
    /// versions are never removed.
    pub fn push_version(&mut self, version: Version) -> usize {
        self.versions.push(version);
        self.versions.len() - 1
    }

    /// Restamp the version at `index` when it still carries `from`.
    pub fn restamp_version(&mut self, index: usize, from: StampSequence, to: StampSequence) -> bool {
        match self.versions.get_mut(index) {
            Some(version) if version.stamp == from => {
                version.stamp = to;
                true
            }
            _ => false,
        }
    }

    /// Replace every occurrence of stamp `from` with `to`. Returns how many
    /// versions changed.
    pub fn restamp(&mut self, from: StampSequence, to: StampSequence) -> usize {
        let mut changed = 0;
        for version in self.versions.iter_mut().filter(|v| v.stamp == from) {
            version.stamp = to;
            changed += 1;
        }
        changed
    }

    /// Distinct stamps used by this chronicle, in first-use order.
    pub fn stamps(&self) -> Vec<StampSequence> {
        let mut seen = BTreeSet::new();
        self.versions
            .iter()
            .filter(|v| seen.insert(v.stamp))
            .map(|v| v.stamp)
            .collect()
    }

    /// Every UUID identifying this component.
    pub fn uuids(&self) -> impl Iterator<Item = &Uuid> {
        std::iter::once(&self.primordial_uuid).chain(self.additional_uuids.iter())
    }
}
