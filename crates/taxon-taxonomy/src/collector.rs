//! Reduction of taxonomy records into a [`Tree`] under a coordinate.
//!
//! [`TreeBuilder`] is a monoid: `TreeBuilder::new()` is the identity,
//! `add` is idempotent, and `combine` is set union, so the sequential and
//! the work-stealing paths produce the same tree for any partitioning of
//! the input.

use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;

use taxon_chronicle::StampFilter;
use taxon_core::config::TaxonomyConfig;
use taxon_core::errors::{ChronicleError, TaxonError, TaxonResult};
use taxon_core::models::{Status, TaxonomyCoordinate};
use taxon_core::traits::{Cancellable, CancellationToken};
use taxon_core::{Nid, StampSequence};
use taxon_path::PathRegistry;
use taxon_stamp::StampRegistry;

use crate::flags::TaxonomyFlags;
use crate::packed::TaxonomyRecordPacked;
use crate::tree::Tree;
use crate::unpacked::TaxonomyRecordUnpacked;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeBuilder {
    nodes: BTreeSet<Nid>,
    /// (parent, child)
    edges: BTreeSet<(Nid, Nid)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Nid) {
        self.nodes.insert(node);
    }

    pub fn add(&mut self, parent: Nid, child: Nid) {
        self.nodes.insert(parent);
        self.nodes.insert(child);
        self.edges.insert((parent, child));
    }

    /// Add the record's concept and every edge `selector` keeps.
    pub fn accumulate(
        &mut self,
        record: &TaxonomyRecordPacked,
        selector: &EdgeSelector,
    ) -> TaxonResult<()> {
        let unpacked = record.unpack()?;
        let child = unpacked.concept();
        self.add_node(child);
        for parent in selector.visible_parents(&unpacked)? {
            self.add(parent, child);
        }
        Ok(())
    }

    pub fn combine(mut self, mut other: TreeBuilder) -> TreeBuilder {
        if self.edges.len() < other.edges.len() {
            std::mem::swap(&mut self, &mut other);
        }
        self.nodes.append(&mut other.nodes);
        self.edges.append(&mut other.edges);
        self
    }

    pub fn edges(&self) -> &BTreeSet<(Nid, Nid)> {
        &self.edges
    }

    pub fn build(self) -> Tree {
        Tree::from_edges(self.nodes, self.edges)
    }
}

/// Decides which edges of a record are visible.
pub struct EdgeSelector {
    filter: StampFilter,
    premise: TaxonomyFlags,
    taxonomy_types: Vec<Nid>,
}

impl EdgeSelector {
    pub fn new(coordinate: &TaxonomyCoordinate, filter: StampFilter) -> Self {
        Self {
            filter,
            premise: TaxonomyFlags::for_premise(coordinate.premise),
            taxonomy_types: coordinate.taxonomy_types.clone(),
        }
    }

    /// Destinations of taxonomy-typed edges whose latest stamp (among
    /// stamps carrying the premise flag) is visible with an allowed status.
    pub fn visible_parents(&self, record: &TaxonomyRecordUnpacked) -> TaxonResult<Vec<Nid>> {
        let mut parents = Vec::new();
        for relationship_type in &self.taxonomy_types {
            let Some(destinations) = record.destinations(*relationship_type) else {
                continue;
            };
            for (destination, stamps) in destinations {
                let candidates: Vec<(StampSequence, TaxonomyFlags)> = stamps
                    .iter()
                    .filter(|(_, flags)| flags.contains(self.premise))
                    .map(|(s, f)| (*s, *f))
                    .collect();
                if self.edge_visible(record.concept(), &candidates)? {
                    parents.push(*destination);
                }
            }
        }
        Ok(parents)
    }

    fn edge_visible(
        &self,
        concept: Nid,
        candidates: &[(StampSequence, TaxonomyFlags)],
    ) -> TaxonResult<bool> {
        if candidates.is_empty() {
            return Ok(false);
        }
        let sequences: Vec<StampSequence> = candidates.iter().map(|(s, _)| *s).collect();
        let coordinate = self.filter.coordinate();
        let keeps = |flags: TaxonomyFlags, status: Status| {
            !flags.contains(TaxonomyFlags::DETACHED) && coordinate.allows_status(status)
        };
        match self.filter.select_latest_set(concept, &sequences) {
            // Stamps tied at one position carry no order between them; the
            // edge survives when any of them keeps it.
            Ok(latest) => Ok(latest
                .iter()
                .any(|l| keeps(candidates[l.index].1, l.effective.status))),
            Err(TaxonError::Chronicle(ChronicleError::Contradiction { candidates: tied, .. })) => {
                let mut keep = false;
                for sequence in &tied {
                    let Some((_, flags)) = candidates.iter().find(|(s, _)| s == sequence) else {
                        continue;
                    };
                    let Some(stamp) = self.filter.on_route(*sequence)? else {
                        continue;
                    };
                    if keeps(*flags, stamp.status) {
                        keep = true;
                        break;
                    }
                }
                tracing::debug!(%concept, stamps = ?tied, keep, "resolved taxonomy contradiction");
                Ok(keep)
            }
            Err(e) => Err(e),
        }
    }
}

/// Sequential and parallel reduction of packed records into a [`Tree`].
pub struct TaxonomyCollector {
    selector: EdgeSelector,
    premise: taxon_core::models::PremiseType,
    batch_size: usize,
    parallel: bool,
    cancel: CancellationToken,
}

impl TaxonomyCollector {
    pub fn new(
        coordinate: &TaxonomyCoordinate,
        stamps: Arc<StampRegistry>,
        paths: &PathRegistry,
    ) -> TaxonResult<Self> {
        let filter = StampFilter::new(coordinate.stamp.clone(), stamps, paths)?;
        Ok(Self::with_filter(coordinate, filter))
    }

    pub fn with_filter(coordinate: &TaxonomyCoordinate, filter: StampFilter) -> Self {
        let defaults = TaxonomyConfig::default();
        Self {
            selector: EdgeSelector::new(coordinate, filter),
            premise: coordinate.premise,
            batch_size: defaults.batch_size,
            parallel: defaults.parallel,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: &TaxonomyConfig) -> Self {
        self.batch_size = config.batch_size.max(1);
        self.parallel = config.parallel;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn selector(&self) -> &EdgeSelector {
        &self.selector
    }

    /// Parallel or sequential according to configuration.
    pub fn run(&self, records: &[TaxonomyRecordPacked]) -> TaxonResult<Tree> {
        if self.parallel {
            self.collect_parallel(records)
        } else {
            self.collect(records)
        }
    }

    pub fn collect(&self, records: &[TaxonomyRecordPacked]) -> TaxonResult<Tree> {
        let _span = taxon_core::taxonomy_span!(records.len(), self.premise).entered();
        let mut builder = TreeBuilder::new();
        for batch in records.chunks(self.batch_size) {
            self.cancel.checkpoint()?;
            for record in batch {
                builder.accumulate(record, &self.selector)?;
            }
        }
        self.finish(builder)
    }

    pub fn collect_parallel(&self, records: &[TaxonomyRecordPacked]) -> TaxonResult<Tree> {
        let _span = taxon_core::taxonomy_span!(records.len(), self.premise).entered();
        let builder = records
            .par_chunks(self.batch_size)
            .try_fold(TreeBuilder::new, |mut builder, batch| {
                self.cancel.checkpoint()?;
                for record in batch {
                    builder.accumulate(record, &self.selector)?;
                }
                Ok::<_, TaxonError>(builder)
            })
            .try_reduce(TreeBuilder::new, |a, b| Ok(a.combine(b)))?;
        self.finish(builder)
    }

    fn finish(&self, builder: TreeBuilder) -> TaxonResult<Tree> {
        let tree = builder.build();
        tracing::info!(
            nodes = tree.node_count(),
            edges = tree.edge_count(),
            "taxonomy collected"
        );
        Ok(tree)
    }
}
