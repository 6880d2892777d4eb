//! The STAMP tuple: status, time, author, module, path.

use serde::{Deserialize, Serialize};

use crate::ids::Nid;

use super::path::StampPosition;

/// Revision status carried by every stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn is_active(self) -> bool {
        matches!(self, Status::Active)
    }
}

/// Immutable five-dimensional identity of a component revision.
///
/// `time` is epoch milliseconds. Two sentinels are reserved:
/// [`Stamp::CANCELED_TIME`] marks a revision retracted before commit and
/// [`Stamp::UNCOMMITTED_TIME`] marks a revision still being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    pub status: Status,
    pub time: i64,
    pub author: Nid,
    pub module: Nid,
    pub path: Nid,
}

impl Stamp {
    pub const CANCELED_TIME: i64 = i64::MIN;
    pub const UNCOMMITTED_TIME: i64 = i64::MAX;

    pub fn new(status: Status, time: i64, author: Nid, module: Nid, path: Nid) -> Self {
        Self {
            status,
            time,
            author,
            module,
            path,
        }
    }

    /// An uncommitted stamp for the given status/author/module/path.
    pub fn uncommitted(status: Status, author: Nid, module: Nid, path: Nid) -> Self {
        Self::new(status, Self::UNCOMMITTED_TIME, author, module, path)
    }

    pub fn is_canceled(&self) -> bool {
        self.time == Self::CANCELED_TIME
    }

    pub fn is_uncommitted(&self) -> bool {
        self.time == Self::UNCOMMITTED_TIME
    }

    /// Neither canceled nor uncommitted.
    pub fn is_committed(&self) -> bool {
        !self.is_canceled() && !self.is_uncommitted()
    }

    /// Copy of this stamp with a different time.
    pub fn with_time(&self, time: i64) -> Self {
        Self { time, ..*self }
    }

    pub fn position(&self) -> StampPosition {
        StampPosition::new(self.time, self.path)
    }
}
