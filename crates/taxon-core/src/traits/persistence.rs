use crate::errors::TaxonResult;

/// Byte-oriented key → value store. The core is agnostic of the engine
/// behind it; a `put` either stores all bytes or fails.
pub trait PersistenceProvider: Send + Sync {
    fn get(&self, key: i32) -> TaxonResult<Option<Vec<u8>>>;
    fn put(&self, key: i32, bytes: &[u8]) -> TaxonResult<()>;
}
