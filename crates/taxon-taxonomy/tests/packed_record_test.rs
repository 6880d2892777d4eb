//! Packed taxonomy record codec.

use proptest::prelude::*;

use taxon_core::constants::MAX_PACKED_STAMP_SEQUENCE;
use taxon_core::errors::{TaxonError, TaxonomyError};
use taxon_core::{Nid, StampSequence};
use taxon_taxonomy::{TaxonomyFlags, TaxonomyRecordPacked, TaxonomyRecordUnpacked};

fn sample() -> TaxonomyRecordUnpacked {
    let mut record = TaxonomyRecordUnpacked::new(Nid(9));
    record.add(Nid(20), Nid(5), StampSequence(1), TaxonomyFlags::STATED);
    record.add(Nid(20), Nid(5), StampSequence(1), TaxonomyFlags::INFERRED);
    record.add(Nid(20), Nid(6), StampSequence(2), TaxonomyFlags::STATED);
    record.add(Nid(21), Nid(7), StampSequence(3), TaxonomyFlags::INFERRED | TaxonomyFlags::DETACHED);
    record
}

#[test]
fn layout_matches_documented_words() {
    let mut record = TaxonomyRecordUnpacked::new(Nid(9));
    record.add(Nid(20), Nid(5), StampSequence(7), TaxonomyFlags::STATED);
    let packed = TaxonomyRecordPacked::pack(&record).unwrap();
    assert_eq!(packed.words(), &[9, 1, 20, 1, 5, 1, (1 << 28) | 7]);
    assert_eq!(packed.concept(), Some(Nid(9)));
}

#[test]
fn flags_accumulate_per_stamp() {
    let record = sample();
    let stamps = record.stamps(Nid(20), Nid(5)).unwrap();
    assert_eq!(
        stamps.get(&StampSequence(1)),
        Some(&(TaxonomyFlags::STATED | TaxonomyFlags::INFERRED))
    );
    assert_eq!(record.edge_count(), 3);
}

#[test]
fn sample_round_trips_through_bytes() {
    let packed = TaxonomyRecordPacked::pack(&sample()).unwrap();
    let restored = TaxonomyRecordPacked::from_bytes(&packed.to_bytes()).unwrap();
    assert_eq!(restored, packed);
    assert_eq!(restored.unpack().unwrap(), sample());
}

#[test]
fn high_flag_bit_survives_sign() {
    let flags = TaxonomyFlags::from_bits(0x8 | 0x1).unwrap();
    let mut record = TaxonomyRecordUnpacked::new(Nid(1));
    record.add(Nid(2), Nid(3), StampSequence(MAX_PACKED_STAMP_SEQUENCE), flags);
    let packed = TaxonomyRecordPacked::pack(&record).unwrap();
    assert!(packed.words()[6] < 0);
    assert_eq!(packed.unpack().unwrap(), record);
}

#[test]
fn oversized_stamp_rejected() {
    let mut record = TaxonomyRecordUnpacked::new(Nid(1));
    record.add(Nid(2), Nid(3), StampSequence(MAX_PACKED_STAMP_SEQUENCE + 1), TaxonomyFlags::STATED);
    assert!(matches!(
        TaxonomyRecordPacked::pack(&record),
        Err(TaxonError::Taxonomy(TaxonomyError::StampOutOfRange(_)))
    ));
}

#[test]
fn flags_beyond_four_bits_rejected() {
    assert!(matches!(
        TaxonomyFlags::from_bits(0x10),
        Err(TaxonError::Taxonomy(TaxonomyError::FlagsOutOfRange(0x10)))
    ));
}

#[test]
fn malformed_words_rejected() {
    let malformed = |words: Vec<i32>| {
        matches!(
            TaxonomyRecordPacked::from_words(words).unpack(),
            Err(TaxonError::Taxonomy(TaxonomyError::MalformedRecord { .. }))
        )
    };
    assert!(malformed(vec![]));
    assert!(malformed(vec![9]));
    assert!(malformed(vec![9, 1, 20]));
    assert!(malformed(vec![9, -1]));
    assert!(malformed(vec![9, 5, 20, 0]));
    assert!(malformed(vec![9, 0, 42]));
    assert!(TaxonomyRecordPacked::from_bytes(&[0, 0, 1]).is_err());
}

#[test]
fn empty_record_packs_to_two_words() {
    let record = TaxonomyRecordUnpacked::new(Nid(3));
    let packed = TaxonomyRecordPacked::pack(&record).unwrap();
    assert_eq!(packed.words(), &[3, 0]);
    assert!(packed.unpack().unwrap().is_empty());
}

fn arb_record() -> impl Strategy<Value = TaxonomyRecordUnpacked> {
    (
        any::<i32>(),
        prop::collection::vec(
            (0i32..8, any::<i32>(), 0..=MAX_PACKED_STAMP_SEQUENCE, 0u8..16),
            0..40,
        ),
    )
        .prop_map(|(concept, entries)| {
            let mut record = TaxonomyRecordUnpacked::new(Nid(concept));
            for (ty, dest, stamp, flags) in entries {
                record.add(
                    Nid(ty),
                    Nid(dest),
                    StampSequence(stamp),
                    TaxonomyFlags::from_bits(flags).unwrap(),
                );
            }
            record
        })
}

proptest! {
    #[test]
    fn pack_unpack_round_trip(record in arb_record()) {
        let packed = TaxonomyRecordPacked::pack(&record).unwrap();
        prop_assert_eq!(packed.unpack().unwrap(), record);
    }
}
