//! Shared builders and JSON fixtures for taxon tests.
//!
//! Well-known nids are plain constants; every nid maps to a deterministic
//! UUID through [`fixture_uuid`], so identifier services built here agree
//! across crates.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use taxon_core::models::{
    Characteristic, PathOrigin, PathRecord, Stamp, Status, VersionPayload,
};
use taxon_core::Nid;
use taxon_storage::InMemoryIdentifierService;

pub const AUTHOR: Nid = Nid(1);
pub const OTHER_AUTHOR: Nid = Nid(2);
pub const MODULE: Nid = Nid(3);
pub const OTHER_MODULE: Nid = Nid(4);
pub const MASTER_PATH: Nid = Nid(10);
pub const DEV_PATH: Nid = Nid(11);
pub const SIDE_PATH: Nid = Nid(12);
pub const IS_A: Nid = Nid(20);
pub const PART_OF: Nid = Nid(21);
pub const RELATIONSHIP_ASSEMBLAGE: Nid = Nid(30);
/// First nid used for test concepts.
pub const FIRST_CONCEPT: i32 = 1000;

/// Deterministic UUID for a fixture nid.
pub fn fixture_uuid(nid: Nid) -> Uuid {
    Uuid::from_u128(0x7a78_0000_0000_0000_0000_0000_0000_0000 | nid.get() as u32 as u128)
}

/// Identifier service with every well-known nid plus `extra` registered.
pub fn identifiers(extra: impl IntoIterator<Item = Nid>) -> InMemoryIdentifierService {
    let ids = InMemoryIdentifierService::new();
    for nid in [
        AUTHOR,
        OTHER_AUTHOR,
        MODULE,
        OTHER_MODULE,
        MASTER_PATH,
        DEV_PATH,
        SIDE_PATH,
        IS_A,
        PART_OF,
        RELATIONSHIP_ASSEMBLAGE,
    ]
    .into_iter()
    .chain(extra)
    {
        ids.register(fixture_uuid(nid), nid);
    }
    ids
}

/// Fluent STAMP builder defaulting to an active stamp by [`AUTHOR`] in
/// [`MODULE`] on [`MASTER_PATH`].
#[derive(Debug, Clone, Copy)]
pub struct StampBuilder {
    stamp: Stamp,
}

impl StampBuilder {
    pub fn at(time: i64) -> Self {
        Self {
            stamp: Stamp::new(Status::Active, time, AUTHOR, MODULE, MASTER_PATH),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.stamp.status = Status::Inactive;
        self
    }

    pub fn path(mut self, path: Nid) -> Self {
        self.stamp.path = path;
        self
    }

    pub fn module(mut self, module: Nid) -> Self {
        self.stamp.module = module;
        self
    }

    pub fn author(mut self, author: Nid) -> Self {
        self.stamp.author = author;
        self
    }

    pub fn build(self) -> Stamp {
        self.stamp
    }
}

/// Active master-path stamp at `time`.
pub fn stamp_at(time: i64) -> Stamp {
    StampBuilder::at(time).build()
}

/// Stated relationship payload.
pub fn relationship(destination: Nid, relationship_type: Nid) -> VersionPayload {
    VersionPayload::Relationship {
        destination,
        relationship_type,
        group: 0,
        characteristic: Characteristic::Stated,
    }
}

/// Stated is-a payload.
pub fn is_a(destination: Nid) -> VersionPayload {
    relationship(destination, IS_A)
}

pub fn concept(offset: i32) -> Nid {
    Nid(FIRST_CONCEPT + offset)
}

/// Master plus `DEV_PATH` branching from master at `branch_time`.
pub fn branching_paths(branch_time: i64) -> Vec<PathRecord> {
    vec![
        PathRecord::root(MASTER_PATH),
        PathRecord::new(DEV_PATH, vec![PathOrigin::new(MASTER_PATH, branch_time)]),
    ]
}

/// A path topology stored as JSON under `data/paths/`.
#[derive(Debug, Clone, Deserialize)]
pub struct PathScenario {
    pub description: String,
    pub paths: Vec<PathRecord>,
}

/// A taxonomy edge list stored as JSON under `data/taxonomy/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyScenario {
    pub description: String,
    /// (child, parent) pairs.
    pub edges: Vec<(i32, i32)>,
    pub roots: Vec<i32>,
}

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}
