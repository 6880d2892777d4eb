//! Cancellation for taxonomy collection and differ jobs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{TaxonError, TaxonResult};

/// Checked by long-running jobs between record batches, never mid-record.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    /// Ask every holder of this token to stop at its next checkpoint.
    fn cancel(&self);

    /// `Err(TaxonError::Cancelled)` once cancellation was requested.
    fn checkpoint(&self) -> TaxonResult<()> {
        if self.is_cancelled() {
            Err(TaxonError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Shared flag; clones observe the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
