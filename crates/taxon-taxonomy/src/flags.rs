//! Per-stamp taxonomy flags, stored in the top four bits of a packed word.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use taxon_core::errors::{TaxonResult, TaxonomyError};
use taxon_core::models::{Characteristic, PremiseType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TaxonomyFlags(u8);

impl TaxonomyFlags {
    pub const EMPTY: Self = Self(0);
    /// Asserted by an author.
    pub const STATED: Self = Self(1);
    /// Produced by the classifier.
    pub const INFERRED: Self = Self(2);
    /// At this stamp the relationship points somewhere else.
    pub const DETACHED: Self = Self(4);

    const FIELD_MASK: u8 = 0x0F;

    pub fn from_bits(bits: u8) -> TaxonResult<Self> {
        if bits & !Self::FIELD_MASK != 0 {
            return Err(TaxonomyError::FlagsOutOfRange(bits).into());
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn for_characteristic(characteristic: Characteristic) -> Self {
        match characteristic {
            Characteristic::Stated => Self::STATED,
            Characteristic::Inferred => Self::INFERRED,
        }
    }

    pub fn for_premise(premise: PremiseType) -> Self {
        match premise {
            PremiseType::Stated => Self::STATED,
            PremiseType::Inferred => Self::INFERRED,
        }
    }
}

impl BitOr for TaxonomyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
