//! Derives taxonomy records from relationship chronicles.

use std::collections::{BTreeMap, BTreeSet};

use taxon_chronicle::ChronicleStore;
use taxon_core::errors::TaxonResult;
use taxon_core::models::{Chronicle, ChronologyKind, VersionPayload};
use taxon_core::{Nid, StampSequence};

use crate::flags::TaxonomyFlags;
use crate::packed::TaxonomyRecordPacked;
use crate::unpacked::TaxonomyRecordUnpacked;

/// Builds one record per concept. A relationship semantic contributes to
/// the record of its referenced component.
///
/// Every stamp of a relationship chronicle is written under every
/// (type, destination) the chronicle ever pointed at; stamps whose version
/// points elsewhere carry [`TaxonomyFlags::DETACHED`]. Latest selection per
/// destination therefore sees the chronicle's full history.
///
/// Detachments are applied after every assertion is in place and never land
/// on a stamp that some relationship asserts for the same edge: one commit
/// may move relationship A off an edge while relationship B takes it on.
pub struct TaxonomyIndexer;

/// (concept, type, destination, stamp, flags) of a pending detachment.
type Detachment = (Nid, Nid, Nid, StampSequence, TaxonomyFlags);

impl TaxonomyIndexer {
    pub fn index_chronicles<'a>(
        chronicles: impl IntoIterator<Item = &'a Chronicle>,
    ) -> BTreeMap<Nid, TaxonomyRecordUnpacked> {
        let mut records: BTreeMap<Nid, TaxonomyRecordUnpacked> = BTreeMap::new();
        let mut detachments: Vec<Detachment> = Vec::new();
        for chronicle in chronicles {
            match chronicle.kind {
                ChronologyKind::Concept => {
                    records
                        .entry(chronicle.nid)
                        .or_insert_with(|| TaxonomyRecordUnpacked::new(chronicle.nid));
                }
                ChronologyKind::Semantic {
                    referenced_component,
                    ..
                } => {
                    let record = records
                        .entry(referenced_component)
                        .or_insert_with(|| TaxonomyRecordUnpacked::new(referenced_component));
                    Self::index_relationship(record, chronicle, &mut detachments);
                }
            }
        }

        for (concept, relationship_type, destination, stamp, flags) in detachments {
            let Some(record) = records.get_mut(&concept) else {
                continue;
            };
            if record.asserts(relationship_type, destination, stamp) {
                tracing::debug!(%concept, %destination, %stamp, "detachment shadowed by assertion");
                continue;
            }
            record.add(relationship_type, destination, stamp, flags);
        }
        records
    }

    fn index_relationship(
        record: &mut TaxonomyRecordUnpacked,
        chronicle: &Chronicle,
        detachments: &mut Vec<Detachment>,
    ) {
        let targets: BTreeSet<(Nid, Nid)> = chronicle
            .versions()
            .iter()
            .filter_map(|v| match v.payload {
                VersionPayload::Relationship {
                    destination,
                    relationship_type,
                    ..
                } => Some((relationship_type, destination)),
                _ => None,
            })
            .collect();

        for version in chronicle.versions() {
            let VersionPayload::Relationship {
                destination,
                relationship_type,
                characteristic,
                ..
            } = version.payload
            else {
                continue;
            };
            let flags = TaxonomyFlags::for_characteristic(characteristic);
            for (target_type, target_destination) in &targets {
                if *target_type == relationship_type && *target_destination == destination {
                    record.add(*target_type, *target_destination, version.stamp, flags);
                } else {
                    detachments.push((
                        record.concept(),
                        *target_type,
                        *target_destination,
                        version.stamp,
                        flags | TaxonomyFlags::DETACHED,
                    ));
                }
            }
        }
    }

    /// Packed records for every concept in `store`, ordered by concept.
    pub fn index_store(store: &ChronicleStore) -> TaxonResult<Vec<TaxonomyRecordPacked>> {
        let chronicles = store.chronicles();
        Self::index_chronicles(chronicles.iter())
            .values()
            .map(TaxonomyRecordPacked::pack)
            .collect()
    }
}
