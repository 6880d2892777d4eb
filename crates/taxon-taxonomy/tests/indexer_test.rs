//! Records derived from relationship chronicles.

use taxon_core::models::{Chronicle, ChronologyKind, Version, VersionPayload};
use taxon_core::{Nid, StampSequence};
use taxon_taxonomy::{TaxonomyFlags, TaxonomyIndexer};
use test_fixtures::{fixture_uuid, is_a, relationship, IS_A, PART_OF, RELATIONSHIP_ASSEMBLAGE};

fn relationship_chronicle(nid: i32, source: Nid, versions: Vec<Version>) -> Chronicle {
    let mut iter = versions.into_iter();
    let first = iter.next().unwrap();
    let mut chronicle = Chronicle::new(
        Nid(nid),
        fixture_uuid(Nid(nid)),
        ChronologyKind::Semantic {
            assemblage: RELATIONSHIP_ASSEMBLAGE,
            referenced_component: source,
        },
        first,
    );
    for version in iter {
        chronicle.push_version(version);
    }
    chronicle
}

#[test]
fn concepts_get_empty_records() {
    let concept = Chronicle::new(
        Nid(9),
        fixture_uuid(Nid(9)),
        ChronologyKind::Concept,
        Version::new(StampSequence(1), VersionPayload::Concept),
    );
    let records = TaxonomyIndexer::index_chronicles([&concept]);
    assert!(records[&Nid(9)].is_empty());
}

#[test]
fn retargeted_relationship_is_detached_from_old_destination() {
    let chronicle = relationship_chronicle(
        500,
        Nid(9),
        vec![
            Version::new(StampSequence(1), is_a(Nid(5))),
            Version::new(StampSequence(2), is_a(Nid(6))),
        ],
    );
    let records = TaxonomyIndexer::index_chronicles([&chronicle]);
    let record = &records[&Nid(9)];

    let old = record.stamps(IS_A, Nid(5)).unwrap();
    assert_eq!(old[&StampSequence(1)], TaxonomyFlags::STATED);
    assert_eq!(old[&StampSequence(2)], TaxonomyFlags::STATED | TaxonomyFlags::DETACHED);

    let new = record.stamps(IS_A, Nid(6)).unwrap();
    assert_eq!(new[&StampSequence(1)], TaxonomyFlags::STATED | TaxonomyFlags::DETACHED);
    assert_eq!(new[&StampSequence(2)], TaxonomyFlags::STATED);
}

#[test]
fn types_are_kept_apart() {
    let a = relationship_chronicle(500, Nid(9), vec![Version::new(StampSequence(1), is_a(Nid(5)))]);
    let b = relationship_chronicle(
        501,
        Nid(9),
        vec![Version::new(StampSequence(1), relationship(Nid(7), PART_OF))],
    );
    let records = TaxonomyIndexer::index_chronicles([&a, &b]);
    let record = &records[&Nid(9)];
    assert!(record.stamps(IS_A, Nid(7)).is_none());
    assert!(record.stamps(PART_OF, Nid(7)).is_some());
    assert_eq!(record.edge_count(), 2);
}

#[test]
fn detachment_never_hides_an_assertion_at_the_same_stamp() {
    // One commit moves relationship 500 from 5 to 6 while 501 takes on 5.
    let moved = relationship_chronicle(
        500,
        Nid(9),
        vec![
            Version::new(StampSequence(1), is_a(Nid(5))),
            Version::new(StampSequence(2), is_a(Nid(6))),
        ],
    );
    let added = relationship_chronicle(
        501,
        Nid(9),
        vec![Version::new(StampSequence(2), is_a(Nid(5)))],
    );

    for order in [[&moved, &added], [&added, &moved]] {
        let records = TaxonomyIndexer::index_chronicles(order);
        let record = &records[&Nid(9)];
        let five = record.stamps(IS_A, Nid(5)).unwrap();
        assert_eq!(five[&StampSequence(1)], TaxonomyFlags::STATED);
        assert_eq!(five[&StampSequence(2)], TaxonomyFlags::STATED);
        assert!(record.asserts(IS_A, Nid(5), StampSequence(2)));
        assert!(!record.asserts(IS_A, Nid(6), StampSequence(1)));
    }
}
