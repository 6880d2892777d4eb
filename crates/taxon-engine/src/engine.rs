//! VersioningEngine: one store's components behind a single context.

use std::sync::Arc;

use taxon_chronicle::{ChronicleStore, StampFilter};
use taxon_commit::CommitLedger;
use taxon_core::models::{PathRecord, StampCoordinate, TaxonomyCoordinate, Version};
use taxon_core::traits::{CancellationToken, IdentifierService, PathSource, PersistenceProvider};
use taxon_core::{Nid, TaxonConfig, TaxonResult};
use taxon_path::{PathRegistry, StaticPathSource};
use taxon_stamp::StampRegistry;
use taxon_storage::{InMemoryIdentifierService, MemoryPersistence, SqlitePersistence};
use taxon_taxonomy::{TaxonomyCollector, TaxonomyIndexer, TaxonomyRecordPacked, Tree};

use crate::transaction::Transaction;

pub struct VersioningEngine {
    config: TaxonConfig,
    stamps: Arc<StampRegistry>,
    paths: PathRegistry,
    chronicles: ChronicleStore,
    ledger: CommitLedger,
    ids: Arc<dyn IdentifierService>,
    persistence: Arc<dyn PersistenceProvider>,
}

impl VersioningEngine {
    pub fn new(
        config: TaxonConfig,
        ids: Arc<dyn IdentifierService>,
        persistence: Arc<dyn PersistenceProvider>,
        paths: Arc<dyn PathSource>,
    ) -> Self {
        let stamps = Arc::new(StampRegistry::with_config(&config.stamp));
        let chronicles = ChronicleStore::new(Arc::clone(&stamps), Arc::clone(&ids));
        let ledger = CommitLedger::new(
            Arc::clone(&stamps),
            Arc::clone(&ids),
            Arc::clone(&persistence),
        );
        tracing::info!(version = taxon_core::constants::VERSION, "versioning engine created");
        Self {
            config,
            stamps,
            paths: PathRegistry::new(paths),
            chronicles,
            ledger,
            ids,
            persistence,
        }
    }

    /// In-memory identifiers and persistence over a fixed path set.
    pub fn in_memory(config: TaxonConfig, paths: Vec<PathRecord>) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryIdentifierService::new()),
            Arc::new(MemoryPersistence::new()),
            Arc::new(StaticPathSource::new(paths)),
        )
    }

    /// SQLite persistence at `config.storage.db_path`.
    pub fn open_sqlite(
        config: TaxonConfig,
        ids: Arc<dyn IdentifierService>,
        paths: Arc<dyn PathSource>,
    ) -> TaxonResult<Self> {
        let persistence = Arc::new(SqlitePersistence::from_config(&config.storage)?);
        Ok(Self::new(config, ids, persistence, paths))
    }

    pub fn config(&self) -> &TaxonConfig {
        &self.config
    }

    pub fn stamps(&self) -> &Arc<StampRegistry> {
        &self.stamps
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    pub fn chronicles(&self) -> &ChronicleStore {
        &self.chronicles
    }

    pub fn ledger(&self) -> &CommitLedger {
        &self.ledger
    }

    pub fn ids(&self) -> &dyn IdentifierService {
        self.ids.as_ref()
    }

    pub fn persistence(&self) -> &dyn PersistenceProvider {
        self.persistence.as_ref()
    }

    /// Drop the cached path snapshot after the path source changed.
    pub fn invalidate_paths(&self) {
        self.paths.invalidate();
    }

    /// Open a write transaction.
    pub fn begin(&self, comment: impl Into<String>) -> Transaction<'_> {
        Transaction::new(self, comment.into())
    }

    pub fn stamp_filter(&self, coordinate: StampCoordinate) -> TaxonResult<StampFilter> {
        StampFilter::new(coordinate, Arc::clone(&self.stamps), &self.paths)
    }

    /// The version of `nid` visible at `coordinate`.
    pub fn snapshot(&self, nid: Nid, coordinate: &StampCoordinate) -> TaxonResult<Option<Version>> {
        let filter = self.stamp_filter(coordinate.clone())?;
        self.chronicles.snapshot(nid, &filter)
    }

    /// Taxonomy records for every concept currently in the store.
    pub fn taxonomy_records(&self) -> TaxonResult<Vec<TaxonomyRecordPacked>> {
        TaxonomyIndexer::index_store(&self.chronicles)
    }

    /// Re-derive the taxonomy visible at `coordinate`.
    pub fn compute_taxonomy(
        &self,
        coordinate: &TaxonomyCoordinate,
        cancel: &CancellationToken,
    ) -> TaxonResult<Tree> {
        let records = self.taxonomy_records()?;
        TaxonomyCollector::new(coordinate, Arc::clone(&self.stamps), &self.paths)?
            .with_config(&self.config.taxonomy)
            .with_cancellation(cancel.clone())
            .run(&records)
    }

    /// Write every chronicle to persistence. Returns how many were written.
    pub fn persist_chronicles(&self) -> TaxonResult<usize> {
        let nids = self.chronicles.nids();
        for nid in &nids {
            self.chronicles.persist(*nid, self.persistence.as_ref())?;
        }
        tracing::info!(chronicles = nids.len(), "chronicles persisted");
        Ok(nids.len())
    }

    /// Reload the commit history and the chronicles of `nids` from
    /// persistence. Returns (commit records, chronicles) loaded.
    pub fn restore(&self, nids: impl IntoIterator<Item = Nid>) -> TaxonResult<(usize, usize)> {
        let records = self.ledger.load_persisted()?;
        let mut chronicles = 0;
        for nid in nids {
            if self.chronicles.load(nid, self.persistence.as_ref())? {
                chronicles += 1;
            }
        }
        tracing::info!(records, chronicles, "store restored");
        Ok((records, chronicles))
    }
}
