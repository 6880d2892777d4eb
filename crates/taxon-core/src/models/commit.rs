//! Commit records and the stamp-level objects persisted alongside them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::StampSequence;

/// Immutable summary of one commit.
///
/// Components are recorded by primordial UUID rather than nid so the record
/// stays meaningful outside the process that wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit_time: DateTime<Utc>,
    pub stamps_in_commit: BTreeSet<StampSequence>,
    /// alias → primordial.
    pub stamp_aliases: BTreeMap<StampSequence, StampSequence>,
    pub components_in_commit: BTreeSet<Uuid>,
    pub comment: String,
}

impl CommitRecord {
    /// True when the commit touched nothing.
    pub fn is_empty(&self) -> bool {
        self.stamps_in_commit.is_empty()
            && self.components_in_commit.is_empty()
            && self.stamp_aliases.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StampAlias {
    pub alias: StampSequence,
    pub primordial: StampSequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StampComment {
    pub stamp: StampSequence,
    pub comment: String,
}
