//! Which STAMP fields take part in version identity.

use uuid::Uuid;

use taxon_core::models::{Status, VersionPayload};
use taxon_ibdf::{ExternalStamp, ExternalVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    pub compare_status: bool,
    pub compare_time: bool,
    pub compare_author: bool,
    pub compare_module: bool,
    pub compare_path: bool,
    /// Stamp of the inactivating version emitted for retired components.
    /// Its status is always inactive.
    pub retirement: ExternalStamp,
}

impl DiffOptions {
    /// Every field compared.
    pub fn new(retirement: ExternalStamp) -> Self {
        Self {
            compare_status: true,
            compare_time: true,
            compare_author: true,
            compare_module: true,
            compare_path: true,
            retirement: ExternalStamp {
                status: Status::Inactive,
                ..retirement
            },
        }
    }

    /// Retirement stamp at `time` with nil author, module and path.
    pub fn retiring_at(time: i64) -> Self {
        Self::new(ExternalStamp {
            status: Status::Inactive,
            time,
            author: Uuid::nil(),
            module: Uuid::nil(),
            path: Uuid::nil(),
        })
    }

    pub fn ignoring_status(mut self) -> Self {
        self.compare_status = false;
        self
    }

    pub fn ignoring_time(mut self) -> Self {
        self.compare_time = false;
        self
    }

    pub fn ignoring_author(mut self) -> Self {
        self.compare_author = false;
        self
    }

    pub fn ignoring_module(mut self) -> Self {
        self.compare_module = false;
        self
    }

    pub fn ignoring_path(mut self) -> Self {
        self.compare_path = false;
        self
    }

    pub fn stamp_key(&self, stamp: &ExternalStamp) -> StampKey {
        StampKey {
            status: self.compare_status.then_some(stamp.status),
            time: self.compare_time.then_some(stamp.time),
            author: self.compare_author.then_some(stamp.author),
            module: self.compare_module.then_some(stamp.module),
            path: self.compare_path.then_some(stamp.path),
        }
    }

    /// The identity of `version` under these options: two versions with
    /// equal keys are the same version to the differ.
    pub fn version_key(&self, version: &ExternalVersion) -> VersionKey {
        (self.stamp_key(&version.stamp), version.payload.clone())
    }
}

/// A stamp reduced to the compared fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StampKey {
    status: Option<Status>,
    time: Option<i64>,
    author: Option<Uuid>,
    module: Option<Uuid>,
    path: Option<Uuid>,
}

pub type VersionKey = (StampKey, VersionPayload);
