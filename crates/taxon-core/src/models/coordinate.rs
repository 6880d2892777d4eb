//! Caller-supplied views: which stamps and which edges are visible.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::Nid;

use super::path::StampPosition;
use super::stamp::Status;

/// How competing on-route versions are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StampPrecedence {
    /// Order by path ancestry; versions on unrelated paths contradict.
    #[default]
    Path,
    /// Order by time alone, ignoring path ancestry.
    Time,
}

/// Selects the single visible version of each chronicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampCoordinate {
    /// Statuses a latest version may carry to be returned.
    pub allowed_states: BTreeSet<Status>,
    /// Time cutoff and path of the view.
    pub position: StampPosition,
    /// Visible modules in preference order. Empty admits every module.
    pub modules: Vec<Nid>,
    /// Visible authors. Empty admits every author.
    pub authors: BTreeSet<Nid>,
    pub precedence: StampPrecedence,
}

impl StampCoordinate {
    /// Active-only view of `path` as of `time`, all modules and authors.
    pub fn latest_active(path: Nid, time: i64) -> Self {
        Self {
            allowed_states: BTreeSet::from([Status::Active]),
            position: StampPosition::new(time, path),
            modules: Vec::new(),
            authors: BTreeSet::new(),
            precedence: StampPrecedence::Path,
        }
    }

    /// View of `path` as of `time` admitting both statuses.
    pub fn latest_any(path: Nid, time: i64) -> Self {
        Self {
            allowed_states: BTreeSet::from([Status::Active, Status::Inactive]),
            ..Self::latest_active(path, time)
        }
    }

    pub fn with_modules(mut self, modules: Vec<Nid>) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_authors(mut self, authors: impl IntoIterator<Item = Nid>) -> Self {
        self.authors = authors.into_iter().collect();
        self
    }

    pub fn with_precedence(mut self, precedence: StampPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn allows_status(&self, status: Status) -> bool {
        self.allowed_states.contains(&status)
    }

    pub fn allows_module(&self, module: Nid) -> bool {
        self.modules.is_empty() || self.modules.contains(&module)
    }

    pub fn allows_author(&self, author: Nid) -> bool {
        self.authors.is_empty() || self.authors.contains(&author)
    }

    /// Rank of `module` in the preference list; unlisted modules rank last.
    pub fn module_rank(&self, module: Nid) -> usize {
        self.modules
            .iter()
            .position(|m| *m == module)
            .unwrap_or(usize::MAX)
    }
}

/// Stated (authored) or inferred (classifier output) relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiseType {
    Stated,
    Inferred,
}

/// A stamp coordinate plus the taxonomy-specific selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyCoordinate {
    pub stamp: StampCoordinate,
    pub premise: PremiseType,
    /// Relationship types treated as taxonomy (is-a) edges.
    pub taxonomy_types: Vec<Nid>,
}

impl TaxonomyCoordinate {
    pub fn new(stamp: StampCoordinate, premise: PremiseType, is_a: Nid) -> Self {
        Self {
            stamp,
            premise,
            taxonomy_types: vec![is_a],
        }
    }

    pub fn is_taxonomy_type(&self, relationship_type: Nid) -> bool {
        self.taxonomy_types.contains(&relationship_type)
    }
}
