//! Object type tags.

use serde::{Deserialize, Serialize};
use taxon_core::errors::IbdfError;

use crate::IbdfResult;

/// Every object type the stream can carry, keyed by its one-byte tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IbdfObjectType {
    Concept,
    Semantic,
    CommitRecord,
    StampAlias,
    StampComment,
}

impl IbdfObjectType {
    pub const ALL: [IbdfObjectType; 5] = [
        IbdfObjectType::Concept,
        IbdfObjectType::Semantic,
        IbdfObjectType::CommitRecord,
        IbdfObjectType::StampAlias,
        IbdfObjectType::StampComment,
    ];

    pub fn tag(self) -> u8 {
        match self {
            IbdfObjectType::Concept => 1,
            IbdfObjectType::Semantic => 2,
            IbdfObjectType::CommitRecord => 3,
            IbdfObjectType::StampAlias => 4,
            IbdfObjectType::StampComment => 5,
        }
    }

    pub fn from_tag(tag: u8) -> IbdfResult<Self> {
        match tag {
            1 => Ok(IbdfObjectType::Concept),
            2 => Ok(IbdfObjectType::Semantic),
            3 => Ok(IbdfObjectType::CommitRecord),
            4 => Ok(IbdfObjectType::StampAlias),
            5 => Ok(IbdfObjectType::StampComment),
            other => Err(IbdfError::UnsupportedObjectType { tag: other }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IbdfObjectType::Concept => "concept",
            IbdfObjectType::Semantic => "semantic",
            IbdfObjectType::CommitRecord => "commit_record",
            IbdfObjectType::StampAlias => "stamp_alias",
            IbdfObjectType::StampComment => "stamp_comment",
        }
    }
}

impl std::fmt::Display for IbdfObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
