//! Chronicle store operations, persistence, and external form.

use std::sync::Arc;

use taxon_chronicle::{ChronicleStore, StampFilter};
use taxon_core::errors::{ChronicleError, StampError, TaxonError};
use taxon_core::models::{
    ChronologyKind, Stamp, StampCoordinate, Status, Version, VersionPayload,
};
use taxon_core::{Nid, StampSequence};
use taxon_path::{PathRegistry, StaticPathSource};
use taxon_stamp::StampRegistry;
use taxon_storage::MemoryPersistence;
use test_fixtures::{
    branching_paths, concept, identifiers, is_a, stamp_at, StampBuilder, AUTHOR, MASTER_PATH,
    MODULE, RELATIONSHIP_ASSEMBLAGE,
};

struct Fixture {
    stamps: Arc<StampRegistry>,
    paths: PathRegistry,
    store: ChronicleStore,
}

fn fixture() -> Fixture {
    let stamps = Arc::new(StampRegistry::new());
    let ids = Arc::new(identifiers((0..10).map(concept)));
    let paths = PathRegistry::new(Arc::new(StaticPathSource::new(branching_paths(50))));
    let store = ChronicleStore::new(Arc::clone(&stamps), ids);
    Fixture {
        stamps,
        paths,
        store,
    }
}

impl Fixture {
    fn version(&self, stamp: Stamp, payload: VersionPayload) -> Version {
        Version::new(self.stamps.get_stamp_sequence(&stamp), payload)
    }

    fn filter(&self, coordinate: StampCoordinate) -> StampFilter {
        StampFilter::new(coordinate, Arc::clone(&self.stamps), &self.paths).unwrap()
    }
}

#[test]
fn create_append_and_read_back() {
    let f = fixture();
    let nid = concept(1);
    f.store
        .create(nid, ChronologyKind::Concept, f.version(stamp_at(10), VersionPayload::Concept))
        .unwrap();
    f.store
        .append(nid, f.version(stamp_at(20), VersionPayload::Concept))
        .unwrap();
    let versions = f.store.all_versions(nid).unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(f.stamps.resolve(versions[0].stamp).unwrap().time, 10);
    assert_eq!(f.store.nids(), vec![nid]);
    assert_eq!(
        f.store.chronicle(nid).unwrap().primordial_uuid,
        test_fixtures::fixture_uuid(nid)
    );
}

#[test]
fn create_twice_is_rejected() {
    let f = fixture();
    let v = f.version(stamp_at(10), VersionPayload::Concept);
    f.store.create(concept(1), ChronologyKind::Concept, v.clone()).unwrap();
    assert!(matches!(
        f.store.create(concept(1), ChronologyKind::Concept, v),
        Err(TaxonError::Chronicle(ChronicleError::AlreadyExists(_)))
    ));
}

#[test]
fn append_with_unregistered_stamp_fails() {
    let f = fixture();
    f.store
        .create(concept(1), ChronologyKind::Concept, f.version(stamp_at(10), VersionPayload::Concept))
        .unwrap();
    let err = f
        .store
        .append(concept(1), Version::new(StampSequence(999), VersionPayload::Concept))
        .unwrap_err();
    assert!(matches!(err, TaxonError::Stamp(StampError::UnknownStamp(_))));
    assert_eq!(f.store.all_versions(concept(1)).unwrap().len(), 1);
}

#[test]
fn append_to_unknown_chronicle_fails() {
    let f = fixture();
    let v = f.version(stamp_at(10), VersionPayload::Concept);
    assert!(matches!(
        f.store.append(concept(5), v),
        Err(TaxonError::Chronicle(ChronicleError::UnknownChronicle(_)))
    ));
}

#[test]
fn snapshot_returns_latest_visible_version() {
    let f = fixture();
    let nid = concept(1);
    f.store
        .create(nid, ChronologyKind::Concept, f.version(stamp_at(10), VersionPayload::Long { value: 1 }))
        .unwrap();
    f.store
        .append(nid, f.version(stamp_at(20), VersionPayload::Long { value: 2 }))
        .unwrap();

    let at_15 = f.store.snapshot(nid, &f.filter(StampCoordinate::latest_active(MASTER_PATH, 15))).unwrap();
    assert_eq!(at_15.unwrap().payload, VersionPayload::Long { value: 1 });
    let at_25 = f.store.snapshot(nid, &f.filter(StampCoordinate::latest_active(MASTER_PATH, 25))).unwrap();
    assert_eq!(at_25.unwrap().payload, VersionPayload::Long { value: 2 });
    let at_5 = f.store.snapshot(nid, &f.filter(StampCoordinate::latest_active(MASTER_PATH, 5))).unwrap();
    assert!(at_5.is_none());
}

#[test]
fn restamp_replaces_uncommitted_stamp() {
    let f = fixture();
    let nid = concept(1);
    let pending = f
        .stamps
        .get_stamp_sequence(&Stamp::uncommitted(Status::Active, AUTHOR, MODULE, MASTER_PATH));
    f.store
        .create(nid, ChronologyKind::Concept, Version::new(pending, VersionPayload::Concept))
        .unwrap();
    let filter = f.filter(StampCoordinate::latest_active(MASTER_PATH, i64::MAX - 1));
    assert!(f.store.snapshot(nid, &filter).unwrap().is_none());

    let committed = f.stamps.commit_uncommitted(pending, 100).unwrap();
    assert_eq!(f.store.restamp(nid, pending, committed).unwrap(), 1);
    assert!(f.store.snapshot(nid, &filter).unwrap().is_some());
}

#[test]
fn persist_and_load_through_provider() {
    let f = fixture();
    let nid = concept(2);
    let kind = ChronologyKind::Semantic {
        assemblage: RELATIONSHIP_ASSEMBLAGE,
        referenced_component: concept(1),
    };
    f.store.create(nid, kind, f.version(stamp_at(10), is_a(concept(0)))).unwrap();
    f.store
        .append(nid, f.version(StampBuilder::at(20).inactive().build(), is_a(concept(0))))
        .unwrap();

    let persistence = MemoryPersistence::new();
    f.store.persist(nid, &persistence).unwrap();

    let other = fixture();
    assert!(other.store.load(nid, &persistence).unwrap());
    assert!(!other.store.load(concept(3), &persistence).unwrap());
    let loaded = other.store.chronicle(nid).unwrap();
    assert_eq!(loaded.kind, kind);
    assert_eq!(loaded.versions().len(), 2);
    let second = other.stamps.resolve(loaded.versions()[1].stamp).unwrap();
    assert_eq!(second.status, Status::Inactive);
    assert_eq!(second.time, 20);
}

#[test]
fn import_merges_new_versions_only() {
    let f = fixture();
    let nid = concept(1);
    f.store
        .create(nid, ChronologyKind::Concept, f.version(stamp_at(10), VersionPayload::Concept))
        .unwrap();
    let exported = f.store.export(nid).unwrap();

    f.store
        .append(nid, f.version(stamp_at(30), VersionPayload::Concept))
        .unwrap();
    assert_eq!(f.store.import(&exported).unwrap(), nid);
    assert_eq!(f.store.all_versions(nid).unwrap().len(), 2);

    let mut extended = f.store.export(nid).unwrap();
    extended.versions.push(extended.versions[0].clone());
    extended.versions[2].stamp.time = 40;
    f.store.import(&extended).unwrap();
    assert_eq!(f.store.all_versions(nid).unwrap().len(), 3);
}

#[test]
fn export_skips_uncommitted_versions() {
    let f = fixture();
    let pending = f
        .stamps
        .get_stamp_sequence(&Stamp::uncommitted(Status::Active, AUTHOR, MODULE, MASTER_PATH));
    f.store
        .create(concept(1), ChronologyKind::Concept, Version::new(pending, VersionPayload::Concept))
        .unwrap();
    f.store
        .create(concept(2), ChronologyKind::Concept, f.version(stamp_at(5), VersionPayload::Concept))
        .unwrap();
    let exported = f.store.export_all().unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].primordial_uuid, test_fixtures::fixture_uuid(concept(2)));
}

#[test]
fn unknown_nid_has_no_uuid() {
    let f = fixture();
    let v = f.version(stamp_at(10), VersionPayload::Concept);
    assert!(f.store.create(Nid(-7), ChronologyKind::Concept, v).is_err());
}
