//! Stamp registry: bijection, uncommitted lifecycle, comments.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use taxon_core::errors::{StampError, TaxonError};
use taxon_core::models::{Stamp, Status};
use taxon_core::{Nid, StampSequence};
use taxon_stamp::StampRegistry;
use test_fixtures::{identifiers, stamp_at, StampBuilder, AUTHOR, MASTER_PATH, MODULE};

#[test]
fn sequences_start_at_one_and_are_idempotent() {
    let registry = StampRegistry::new();
    let a = registry.get_stamp_sequence(&stamp_at(10));
    let b = registry.get_stamp_sequence(&stamp_at(20));
    assert_eq!(a, StampSequence(1));
    assert_eq!(b, StampSequence(2));
    assert_eq!(registry.get_stamp_sequence(&stamp_at(10)), a);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.resolve(a).unwrap(), stamp_at(10));
    assert_eq!(registry.find(&stamp_at(30)), None);
}

#[test]
fn unknown_sequence_is_an_error() {
    let registry = StampRegistry::new();
    let err = registry.resolve(StampSequence(42)).unwrap_err();
    assert!(matches!(
        err,
        TaxonError::Stamp(StampError::UnknownStamp(StampSequence(42)))
    ));
}

#[test]
fn concurrent_identical_stamps_share_a_sequence() {
    let registry = Arc::new(StampRegistry::new());
    let stamp = StampBuilder::at(1_000).build();
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get_stamp_sequence(&stamp))
        })
        .collect();
    let sequences: Vec<StampSequence> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(sequences[0], sequences[1]);
    assert_eq!(registry.len(), 1);
}

#[test]
fn concurrent_mixed_stamps_allocate_each_tuple_once() {
    let registry = Arc::new(StampRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..200)
                    .map(|i| {
                        // Every worker walks the same 100 tuples from a different start.
                        let time = ((i + worker * 13) % 100) as i64;
                        (time, registry.get_stamp_sequence(&stamp_at(time)))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = std::collections::HashMap::new();
    for handle in handles {
        for (time, sequence) in handle.join().unwrap() {
            let prior = seen.insert(time, sequence);
            assert!(prior.is_none() || prior == Some(sequence));
        }
    }
    assert_eq!(registry.len(), 100);
    let distinct: HashSet<_> = seen.values().collect();
    assert_eq!(distinct.len(), 100);
    for (time, sequence) in seen {
        assert_eq!(registry.resolve(sequence).unwrap().time, time);
    }
}

#[test]
fn commit_replaces_uncommitted_stamp() {
    let registry = StampRegistry::new();
    let pending = registry.get_stamp_sequence(&Stamp::uncommitted(
        Status::Active,
        AUTHOR,
        MODULE,
        MASTER_PATH,
    ));
    let committed = registry.commit_uncommitted(pending, 500).unwrap();
    assert_ne!(pending, committed);
    let stamp = registry.resolve(committed).unwrap();
    assert_eq!(stamp.time, 500);
    assert!(stamp.is_committed());

    assert!(matches!(
        registry.commit_uncommitted(committed, 600),
        Err(TaxonError::Stamp(StampError::NotUncommitted(_)))
    ));
    assert!(matches!(
        registry.commit_uncommitted(pending, Stamp::UNCOMMITTED_TIME),
        Err(TaxonError::Stamp(StampError::InvalidCommitTime(_)))
    ));
}

#[test]
fn cancel_replaces_uncommitted_stamp() {
    let registry = StampRegistry::new();
    let pending = registry.get_stamp_sequence(&Stamp::uncommitted(
        Status::Active,
        AUTHOR,
        MODULE,
        MASTER_PATH,
    ));
    let canceled = registry.cancel_uncommitted(pending).unwrap();
    assert!(registry.resolve(canceled).unwrap().is_canceled());
}

#[test]
fn persistable_stamps_exclude_uncommitted() {
    let registry = StampRegistry::new();
    let committed = registry.get_stamp_sequence(&stamp_at(5));
    registry.get_stamp_sequence(&Stamp::uncommitted(Status::Active, AUTHOR, MODULE, MASTER_PATH));
    let persistable = registry.persistable_stamps();
    assert_eq!(persistable, vec![(committed, stamp_at(5))]);
}

#[test]
fn comments_attach_to_known_stamps_only() {
    let registry = StampRegistry::new();
    let seq = registry.get_stamp_sequence(&stamp_at(5));
    registry.set_comment(seq, "bulk load").unwrap();
    assert_eq!(registry.comment(seq).as_deref(), Some("bulk load"));
    assert!(registry.set_comment(StampSequence(99), "x").is_err());
    assert_eq!(registry.comments().len(), 1);
}

#[test]
fn external_round_trip_through_identifier_service() {
    let registry = StampRegistry::new();
    let ids = identifiers([]);
    let seq = registry.get_stamp_sequence(&StampBuilder::at(77).inactive().build());
    let external = registry.to_external(seq, &ids).unwrap();
    assert_eq!(external.time, 77);
    assert_eq!(external.status, Status::Inactive);

    let other = StampRegistry::new();
    let imported = other.from_external(&external, &ids).unwrap();
    assert_eq!(other.resolve(imported).unwrap(), registry.resolve(seq).unwrap());
}

#[test]
fn external_conversion_needs_registered_nids() {
    let registry = StampRegistry::new();
    let ids = identifiers([]);
    let seq = registry.get_stamp_sequence(&StampBuilder::at(1).author(Nid(4242)).build());
    assert!(registry.to_external(seq, &ids).is_err());
}

proptest! {
    #[test]
    fn tuple_sequence_bijection(times in prop::collection::vec(-1_000i64..1_000, 1..64)) {
        let registry = StampRegistry::new();
        let mut by_time = std::collections::HashMap::new();
        for time in &times {
            let seq = registry.get_stamp_sequence(&stamp_at(*time));
            let prior = by_time.insert(*time, seq);
            prop_assert!(prior.is_none() || prior == Some(seq));
        }
        prop_assert_eq!(registry.len(), by_time.len());
        for (time, seq) in by_time {
            prop_assert_eq!(registry.resolve(seq).unwrap(), stamp_at(time));
        }
    }
}
