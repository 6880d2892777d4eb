//! SQLite-backed key → bytes store.

pub mod pragmas;

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use taxon_core::config::StorageConfig;
use taxon_core::errors::TaxonResult;
use taxon_core::traits::PersistenceProvider;

use crate::to_storage_err;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS objects (
        key   INTEGER PRIMARY KEY,
        bytes BLOB NOT NULL
    );
";

/// One write connection behind a mutex. Each `put` is its own transaction.
pub struct SqlitePersistence {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqlitePersistence {
    pub fn open(path: &Path, config: &StorageConfig) -> TaxonResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(format!("open: {e}")))?;
        pragmas::apply_pragmas(&conn, config.busy_timeout_ms)?;
        Self::initialize(conn, Some(path.to_path_buf()))
    }

    /// Open at `config.db_path`.
    pub fn from_config(config: &StorageConfig) -> TaxonResult<Self> {
        Self::open(Path::new(&config.db_path), config)
    }

    pub fn open_in_memory() -> TaxonResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| to_storage_err(format!("open: {e}")))?;
        Self::initialize(conn, None)
    }

    fn initialize(conn: Connection, db_path: Option<PathBuf>) -> TaxonResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| to_storage_err(format!("schema: {e}")))?;
        tracing::info!(path = ?db_path, "sqlite persistence ready");
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn count(&self) -> TaxonResult<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM objects", [], |row| row.get(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(count as usize)
    }

    /// Every stored key, ascending.
    pub fn keys(&self) -> TaxonResult<Vec<i32>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT key FROM objects ORDER BY key")
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, i32>(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| to_storage_err(e.to_string()))
    }
}

impl PersistenceProvider for SqlitePersistence {
    fn get(&self, key: i32) -> TaxonResult<Option<Vec<u8>>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT bytes FROM objects WHERE key = ?1",
            params![key],
            |row| row.get::<_, Vec<u8>>(0),
        )
        .optional()
        .map_err(|e| to_storage_err(format!("get {key}: {e}")))
    }

    fn put(&self, key: i32, bytes: &[u8]) -> TaxonResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| to_storage_err(format!("put {key} begin: {e}")))?;
        tx.execute(
            "INSERT OR REPLACE INTO objects (key, bytes) VALUES (?1, ?2)",
            params![key, bytes],
        )
        .map_err(|e| to_storage_err(format!("put {key}: {e}")))?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("put {key} commit: {e}")))?;
        Ok(())
    }
}
