//! Packed taxonomy record codec.
//!
//! Layout, one `i32` per word:
//!
//! ```text
//! [concept][type_count]
//!   { [type][destination_count]
//!       { [destination][stamp_count]
//!           { [flags << 28 | stamp] } } }
//! ```
//!
//! A stamp sequence occupies the low 28 bits; flags the high 4.

use std::collections::BTreeMap;

use taxon_core::constants::MAX_PACKED_STAMP_SEQUENCE;
use taxon_core::errors::{TaxonResult, TaxonomyError};
use taxon_core::{Nid, StampSequence};

use crate::flags::TaxonomyFlags;
use crate::unpacked::{DestinationStamps, TaxonomyRecordUnpacked};

const STAMP_BITS: u32 = 28;
const STAMP_MASK: u32 = (1 << STAMP_BITS) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxonomyRecordPacked {
    words: Vec<i32>,
}

impl TaxonomyRecordPacked {
    /// Wrap raw words. Validation happens in [`unpack`](Self::unpack).
    pub fn from_words(words: Vec<i32>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[i32] {
        &self.words
    }

    /// The concept word, if present.
    pub fn concept(&self) -> Option<Nid> {
        self.words.first().map(|w| Nid(*w))
    }

    pub fn pack(record: &TaxonomyRecordUnpacked) -> TaxonResult<Self> {
        let entries = record.entries();
        let mut words = Vec::with_capacity(2 + record.edge_count() * 4);
        words.push(record.concept().get());
        words.push(len_word(entries.len()));
        for (relationship_type, destinations) in entries {
            words.push(relationship_type.get());
            words.push(len_word(destinations.len()));
            for (destination, stamps) in destinations {
                words.push(destination.get());
                words.push(len_word(stamps.len()));
                for (stamp, flags) in stamps {
                    words.push(pack_word(*stamp, *flags)?);
                }
            }
        }
        Ok(Self { words })
    }

    pub fn unpack(&self) -> TaxonResult<TaxonomyRecordUnpacked> {
        let mut cursor = Cursor {
            words: &self.words,
            offset: 0,
        };
        let concept = Nid(cursor.next("concept")?);
        let type_count = cursor.count("type count")?;
        let mut entries = BTreeMap::new();
        for _ in 0..type_count {
            let relationship_type = Nid(cursor.next("relationship type")?);
            let destination_count = cursor.count("destination count")?;
            let mut destinations: DestinationStamps = BTreeMap::new();
            for _ in 0..destination_count {
                let destination = Nid(cursor.next("destination")?);
                let stamp_count = cursor.count("stamp count")?;
                let stamps = destinations.entry(destination).or_default();
                for _ in 0..stamp_count {
                    let (stamp, flags) = unpack_word(cursor.next("stamp word")?)?;
                    let slot = stamps.entry(stamp).or_default();
                    *slot = *slot | flags;
                }
            }
            entries.insert(relationship_type, destinations);
        }
        if cursor.offset != self.words.len() {
            return Err(TaxonomyError::MalformedRecord {
                offset: cursor.offset,
                reason: format!("{} trailing words", self.words.len() - cursor.offset),
            }
            .into());
        }
        Ok(TaxonomyRecordUnpacked::from_entries(concept, entries))
    }

    /// Big-endian byte form for persistence.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> TaxonResult<Self> {
        if bytes.len() % 4 != 0 {
            return Err(TaxonomyError::MalformedRecord {
                offset: bytes.len() / 4,
                reason: "byte length is not a multiple of 4".to_string(),
            }
            .into());
        }
        let words = bytes
            .chunks_exact(4)
            .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { words })
    }
}

fn len_word(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

fn pack_word(stamp: StampSequence, flags: TaxonomyFlags) -> TaxonResult<i32> {
    if stamp.get() < 0 || stamp.get() > MAX_PACKED_STAMP_SEQUENCE {
        return Err(TaxonomyError::StampOutOfRange(stamp).into());
    }
    let flags = TaxonomyFlags::from_bits(flags.bits())?;
    Ok(((u32::from(flags.bits()) << STAMP_BITS) | stamp.get() as u32) as i32)
}

fn unpack_word(word: i32) -> TaxonResult<(StampSequence, TaxonomyFlags)> {
    let raw = word as u32;
    let stamp = StampSequence((raw & STAMP_MASK) as i32);
    let flags = TaxonomyFlags::from_bits((raw >> STAMP_BITS) as u8)?;
    Ok((stamp, flags))
}

struct Cursor<'a> {
    words: &'a [i32],
    offset: usize,
}

impl Cursor<'_> {
    fn next(&mut self, what: &str) -> TaxonResult<i32> {
        let word = self.words.get(self.offset).copied().ok_or_else(|| {
            TaxonomyError::MalformedRecord {
                offset: self.offset,
                reason: format!("record ended before {what}"),
            }
        })?;
        self.offset += 1;
        Ok(word)
    }

    fn count(&mut self, what: &str) -> TaxonResult<usize> {
        let offset = self.offset;
        let word = self.next(what)?;
        let remaining = self.words.len() - self.offset;
        if word < 0 || word as usize > remaining {
            return Err(TaxonomyError::MalformedRecord {
                offset,
                reason: format!("{what} {word} exceeds remaining {remaining} words"),
            }
            .into());
        }
        Ok(word as usize)
    }
}
