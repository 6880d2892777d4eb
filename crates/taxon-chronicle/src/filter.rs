//! On-route and latest-version selection under a [`StampCoordinate`].
//!
//! A stamp is on route when it is committed, its module and author are
//! admitted, and its position is visible from the coordinate position. Among
//! on-route candidates the latest are those not preceded by any other; ties
//! fall to module preference. Winners left at one shared position are all
//! reported by [`StampFilter::select_latest_set`]; [`StampFilter::select_latest`]
//! keeps the one inserted last. Anything else is a contradiction.

use std::sync::Arc;

use taxon_core::errors::{ChronicleError, TaxonResult};
use taxon_core::models::{
    Chronicle, RelativePosition, Stamp, StampCoordinate, StampPrecedence, Version,
};
use taxon_core::{Nid, StampSequence};
use taxon_path::{PathRegistry, PathSnapshot};
use taxon_stamp::StampRegistry;

/// The winning entry of a latest selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestStamp {
    /// Index into the candidate slice.
    pub index: usize,
    pub sequence: StampSequence,
    /// The stamp that put the candidate on route: the candidate's own
    /// stamp, or one of its aliases.
    pub effective: Stamp,
}

pub struct StampFilter {
    coordinate: StampCoordinate,
    stamps: Arc<StampRegistry>,
    paths: Arc<PathSnapshot>,
}

impl StampFilter {
    pub fn new(
        coordinate: StampCoordinate,
        stamps: Arc<StampRegistry>,
        paths: &PathRegistry,
    ) -> TaxonResult<Self> {
        Ok(Self::with_snapshot(coordinate, stamps, paths.snapshot()?))
    }

    pub fn with_snapshot(
        coordinate: StampCoordinate,
        stamps: Arc<StampRegistry>,
        paths: Arc<PathSnapshot>,
    ) -> Self {
        Self {
            coordinate,
            stamps,
            paths,
        }
    }

    pub fn coordinate(&self) -> &StampCoordinate {
        &self.coordinate
    }

    fn admits(&self, stamp: &Stamp) -> bool {
        stamp.is_committed()
            && self.coordinate.allows_module(stamp.module)
            && self.coordinate.allows_author(stamp.author)
            && self
                .paths
                .is_visible_from(stamp.position(), self.coordinate.position)
    }

    /// The stamp that puts `sequence` on route, if any. A primordial stamp
    /// is on route through any of its aliases.
    pub fn on_route(&self, sequence: StampSequence) -> TaxonResult<Option<Stamp>> {
        let stamp = self.stamps.resolve(sequence)?;
        if self.admits(&stamp) {
            return Ok(Some(stamp));
        }
        for alias in self.stamps.aliases_of(sequence) {
            let alias_stamp = self.stamps.resolve(alias)?;
            if self.admits(&alias_stamp) {
                return Ok(Some(alias_stamp));
            }
        }
        Ok(None)
    }

    pub fn is_on_route(&self, sequence: StampSequence) -> TaxonResult<bool> {
        Ok(self.on_route(sequence)?.is_some())
    }

    /// Pick the latest of `candidates` regardless of status. `Ok(None)` when
    /// nothing is on route. Winners tied at one position resolve to the one
    /// inserted last.
    pub fn select_latest(
        &self,
        nid: Nid,
        candidates: &[StampSequence],
    ) -> TaxonResult<Option<LatestStamp>> {
        Ok(self.select_latest_set(nid, candidates)?.pop())
    }

    /// Every latest candidate, in candidate order. More than one entry only
    /// when the winners share a single position and module rank; callers
    /// decide how to merge them.
    pub fn select_latest_set(
        &self,
        nid: Nid,
        candidates: &[StampSequence],
    ) -> TaxonResult<Vec<LatestStamp>> {
        let mut on_route = Vec::with_capacity(candidates.len());
        for (index, sequence) in candidates.iter().enumerate() {
            if let Some(effective) = self.on_route(*sequence)? {
                on_route.push(LatestStamp {
                    index,
                    sequence: *sequence,
                    effective,
                });
            }
        }
        if on_route.len() <= 1 {
            return Ok(on_route);
        }

        let mut latest = Vec::with_capacity(on_route.len());
        for candidate in &on_route {
            if !self.is_superseded(candidate, &on_route)? {
                latest.push(*candidate);
            }
        }
        if latest.len() <= 1 {
            return Ok(latest);
        }

        if !self.coordinate.modules.is_empty() {
            let best = latest
                .iter()
                .map(|c| self.coordinate.module_rank(c.effective.module))
                .min()
                .unwrap_or(usize::MAX);
            latest.retain(|c| self.coordinate.module_rank(c.effective.module) == best);
            if latest.len() == 1 {
                return Ok(latest);
            }
        }

        let first = latest.first().map(|c| c.effective.position());
        if latest.iter().all(|c| Some(c.effective.position()) == first) {
            return Ok(latest);
        }

        tracing::debug!(%nid, candidates = latest.len(), "contradiction in latest selection");
        Err(ChronicleError::Contradiction {
            nid,
            candidates: latest.iter().map(|c| c.sequence).collect(),
        }
        .into())
    }

    fn is_superseded(&self, candidate: &LatestStamp, all: &[LatestStamp]) -> TaxonResult<bool> {
        for other in all {
            if other.index == candidate.index {
                continue;
            }
            let superseded = match self.coordinate.precedence {
                StampPrecedence::Time => candidate.effective.time < other.effective.time,
                StampPrecedence::Path => {
                    self.paths.relative_position(
                        candidate.effective.position(),
                        other.effective.position(),
                    )? == RelativePosition::Before
                }
            };
            if superseded {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The visible version of `chronicle`: its latest version, returned only
    /// when that version's status is allowed.
    pub fn latest_version(&self, chronicle: &Chronicle) -> TaxonResult<Option<Version>> {
        let stamps: Vec<StampSequence> = chronicle.versions().iter().map(|v| v.stamp).collect();
        let Some(latest) = self.select_latest(chronicle.nid, &stamps)? else {
            return Ok(None);
        };
        if !self.coordinate.allows_status(latest.effective.status) {
            return Ok(None);
        }
        Ok(chronicle.versions().get(latest.index).cloned())
    }
}
