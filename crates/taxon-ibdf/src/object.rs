//! The external object model.
//!
//! Inside a store, stamps are process-local sequences and components are
//! nids. On the wire, stamps are spelled out as full tuples and identity is
//! carried by UUID, so a stream can be read by a different store.
//! Payload-level references stay nids, resolved through the shared
//! identifier service.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taxon_core::models::{Status, VersionPayload};

use crate::object_type::IbdfObjectType;

/// A STAMP tuple with UUID author/module/path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExternalStamp {
    pub status: Status,
    pub time: i64,
    pub author: Uuid,
    pub module: Uuid,
    pub path: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalVersion {
    pub stamp: ExternalStamp,
    pub payload: VersionPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalKind {
    Concept,
    Semantic {
        assemblage: Uuid,
        referenced_component: Uuid,
    },
}

/// A full chronicle in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalChronology {
    pub kind: ExternalKind,
    pub primordial_uuid: Uuid,
    pub additional_uuids: BTreeSet<Uuid>,
    pub versions: Vec<ExternalVersion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalStampAlias {
    pub alias: ExternalStamp,
    pub primordial: ExternalStamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalStampComment {
    pub stamp: ExternalStamp,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCommitRecord {
    pub commit_time: DateTime<Utc>,
    pub stamps: Vec<ExternalStamp>,
    pub aliases: Vec<ExternalStampAlias>,
    pub components: BTreeSet<Uuid>,
    pub comment: String,
}

/// One record of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IbdfObject {
    Concept(ExternalChronology),
    Semantic(ExternalChronology),
    CommitRecord(ExternalCommitRecord),
    StampAlias(ExternalStampAlias),
    StampComment(ExternalStampComment),
}

impl IbdfObject {
    /// Wrap a chronology in the variant its kind calls for.
    pub fn from_chronology(chronology: ExternalChronology) -> Self {
        match chronology.kind {
            ExternalKind::Concept => IbdfObject::Concept(chronology),
            ExternalKind::Semantic { .. } => IbdfObject::Semantic(chronology),
        }
    }

    pub fn object_type(&self) -> IbdfObjectType {
        match self {
            IbdfObject::Concept(_) => IbdfObjectType::Concept,
            IbdfObject::Semantic(_) => IbdfObjectType::Semantic,
            IbdfObject::CommitRecord(_) => IbdfObjectType::CommitRecord,
            IbdfObject::StampAlias(_) => IbdfObjectType::StampAlias,
            IbdfObject::StampComment(_) => IbdfObjectType::StampComment,
        }
    }

    pub fn as_chronology(&self) -> Option<&ExternalChronology> {
        match self {
            IbdfObject::Concept(c) | IbdfObject::Semantic(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_chronology(self) -> Option<ExternalChronology> {
        match self {
            IbdfObject::Concept(c) | IbdfObject::Semantic(c) => Some(c),
            _ => None,
        }
    }
}
