use std::collections::HashMap;

use taxon_core::errors::{PathError, TaxonResult};
use taxon_core::models::{PathOrigin, PathRecord, RelativePosition, StampPosition};
use taxon_core::Nid;

/// Immutable view of every path and its origins.
#[derive(Debug, Default)]
pub struct PathSnapshot {
    paths: HashMap<Nid, Vec<PathOrigin>>,
}

impl PathSnapshot {
    pub fn from_records(records: Vec<PathRecord>) -> Self {
        let mut paths: HashMap<Nid, Vec<PathOrigin>> = HashMap::with_capacity(records.len());
        for record in records {
            paths.entry(record.path).or_default().extend(record.origins);
        }
        Self { paths }
    }

    pub fn exists(&self, path: Nid) -> bool {
        self.paths.contains_key(&path)
    }

    /// Origins of `path`; empty for root paths and unknown paths.
    pub fn origins(&self, path: Nid) -> &[PathOrigin] {
        self.paths.get(&path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Order `a` relative to `b`.
    pub fn relative_position(
        &self,
        a: StampPosition,
        b: StampPosition,
    ) -> TaxonResult<RelativePosition> {
        if a.path == b.path {
            for time in [a.time, b.time] {
                if time < 0 {
                    return Err(PathError::InvalidTime { path: a.path, time }.into());
                }
            }
            return Ok(match a.time.cmp(&b.time) {
                std::cmp::Ordering::Less => RelativePosition::Before,
                std::cmp::Ordering::Greater => RelativePosition::After,
                std::cmp::Ordering::Equal => RelativePosition::Equal,
            });
        }

        if self.precedes_via_origin(a, b) {
            return Ok(RelativePosition::Before);
        }
        if self.precedes_via_origin(b, a) {
            return Ok(RelativePosition::After);
        }
        Ok(RelativePosition::Unreachable)
    }

    /// True when `later.path` has an origin directly on `earlier.path` at or
    /// after `earlier.time`.
    fn precedes_via_origin(&self, earlier: StampPosition, later: StampPosition) -> bool {
        self.origins(later.path)
            .iter()
            .any(|o| o.origin_path == earlier.path && earlier.time <= o.time)
    }

    /// Whether a version at `version` is visible from a view at `view`:
    /// same path at or before the view time, or on a direct origin path at
    /// or before that origin's time.
    pub fn is_visible_from(&self, version: StampPosition, view: StampPosition) -> bool {
        if version.path == view.path {
            return version.time <= view.time;
        }
        self.origins(view.path)
            .iter()
            .any(|o| o.origin_path == version.path && version.time <= o.time)
    }
}
