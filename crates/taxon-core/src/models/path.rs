//! Paths (branches), their origins, and positions on them.

use serde::{Deserialize, Serialize};

use crate::ids::Nid;

/// "This path begins, for ordering purposes, at `time` on `origin_path`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathOrigin {
    pub origin_path: Nid,
    pub time: i64,
}

impl PathOrigin {
    pub fn new(origin_path: Nid, time: i64) -> Self {
        Self { origin_path, time }
    }
}

/// A path together with its full origin set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    pub path: Nid,
    pub origins: Vec<PathOrigin>,
}

impl PathRecord {
    pub fn new(path: Nid, origins: Vec<PathOrigin>) -> Self {
        Self { path, origins }
    }

    /// A root path with no origins.
    pub fn root(path: Nid) -> Self {
        Self::new(path, Vec::new())
    }

    /// The origin on `origin_path`, if this path has one.
    pub fn origin_on(&self, origin_path: Nid) -> Option<&PathOrigin> {
        self.origins.iter().find(|o| o.origin_path == origin_path)
    }
}

/// A point in version space: a time on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StampPosition {
    pub time: i64,
    pub path: Nid,
}

impl StampPosition {
    pub fn new(time: i64, path: Nid) -> Self {
        Self { time, path }
    }
}

/// Ordering between two positions that may live on different paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativePosition {
    Before,
    After,
    Equal,
    /// The paths are not in a (single-hop) ancestor relation. Not an error.
    Unreachable,
}

impl RelativePosition {
    /// The same relation seen from the other side.
    pub fn reverse(self) -> Self {
        match self {
            RelativePosition::Before => RelativePosition::After,
            RelativePosition::After => RelativePosition::Before,
            other => other,
        }
    }
}
