//! The batch diff job.
//!
//! One reader thread per export feeds a bounded channel; the calling thread
//! builds both exports, classifies, and writes the delta through encoder
//! threads bounded by a [`WriteBudget`]. Cancellation is checked between
//! batches. When reading fails, whatever analysis was requested is written
//! on a best-effort basis before the read error is returned.

use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread::{self, ScopedJoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use taxon_core::config::DifferConfig;
use taxon_core::errors::{DifferError, IbdfError, TaxonError, TaxonResult};
use taxon_core::traits::{Cancellable, CancellationToken};
use taxon_ibdf::{IbdfObject, IbdfReader, IbdfWriter};

use crate::analysis::DiffAnalysis;
use crate::budget::WriteBudget;
use crate::delta::{DeltaSet, DeltaSummary};
use crate::diff::diff;
use crate::export::Export;
use crate::options::DiffOptions;

/// Objects per message on the read queue.
const READ_BATCH_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

enum ReadEvent {
    Batch(Side, Vec<IbdfObject>),
    Done(Side, u64),
    Failed(Side, TaxonError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub summary: DeltaSummary,
    /// Objects written to the delta file.
    pub written: u64,
    pub skipped_old: u64,
    pub skipped_new: u64,
}

pub struct DiffJob {
    config: DifferConfig,
    options: DiffOptions,
    cancel: CancellationToken,
}

impl DiffJob {
    pub fn new(config: DifferConfig, options: DiffOptions) -> Self {
        Self {
            config,
            options,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Diff `old` against `new`, write the delta to `delta_path`, and the
    /// analysis files under `analysis_dir` when given and enabled.
    pub fn run(
        &self,
        old: &Path,
        new: &Path,
        delta_path: &Path,
        analysis_dir: Option<&Path>,
    ) -> TaxonResult<DiffReport> {
        let analysis_dir = analysis_dir.filter(|_| self.config.write_analysis);
        let mut old_export = Export::new();
        let mut new_export = Export::new();

        if let Err(error) = self.read_both(old, new, &mut old_export, &mut new_export) {
            if let Some(dir) = analysis_dir {
                flush_partial(dir, &old_export, &new_export, &error);
            }
            return Err(error);
        }

        self.cancel.checkpoint()?;
        let delta = diff(&old_export, &new_export, &self.options);
        let written = self.write_delta(&delta, delta_path)?;

        if let Some(dir) = analysis_dir {
            DiffAnalysis {
                complete: true,
                error: None,
                old_objects: old_export.len(),
                new_objects: new_export.len(),
                skipped_old: old_export.skipped(),
                skipped_new: new_export.skipped(),
                summary: delta.summary(),
            }
            .write(dir, Some(&delta))?;
        }

        let report = DiffReport {
            summary: delta.summary(),
            written,
            skipped_old: old_export.skipped(),
            skipped_new: new_export.skipped(),
        };
        tracing::info!(
            written = report.written,
            delta = %delta_path.display(),
            "diff job finished"
        );
        Ok(report)
    }

    fn read_both(
        &self,
        old: &Path,
        new: &Path,
        old_export: &mut Export,
        new_export: &mut Export,
    ) -> TaxonResult<()> {
        let (tx, rx) = bounded(self.config.queue_capacity.max(1));
        thread::scope(|scope| -> TaxonResult<()> {
            let readers = [(Side::Old, old), (Side::New, new)].map(|(side, path)| {
                let tx = tx.clone();
                scope.spawn(move || read_side(side, path, &tx))
            });
            drop(tx);
            // Dropping the receiver unblocks readers stuck on a full queue.
            let outcome = self.consume(rx, old_export, new_export);
            let panicked = readers
                .into_iter()
                .map(|reader| reader.join().is_err())
                .fold(false, |a, b| a || b);
            outcome?;
            if panicked {
                return Err(DifferError::StagePanicked {
                    stage: "read".to_string(),
                }
                .into());
            }
            Ok(())
        })
    }

    fn consume(
        &self,
        rx: Receiver<ReadEvent>,
        old: &mut Export,
        new: &mut Export,
    ) -> TaxonResult<()> {
        let mut finished = 0;
        while finished < 2 {
            self.cancel.checkpoint()?;
            let event = rx.recv().map_err(|_| DifferError::StagePanicked {
                stage: "read".to_string(),
            })?;
            match event {
                ReadEvent::Batch(side, objects) => {
                    let target = match side {
                        Side::Old => &mut *old,
                        Side::New => &mut *new,
                    };
                    for object in objects {
                        target.insert(object);
                    }
                }
                ReadEvent::Done(side, skipped) => {
                    let target = match side {
                        Side::Old => &mut *old,
                        Side::New => &mut *new,
                    };
                    target.add_skipped(skipped);
                    finished += 1;
                    tracing::debug!(%side, objects = target.len(), skipped, "export read");
                }
                ReadEvent::Failed(side, error) => {
                    tracing::warn!(%side, %error, "export read failed");
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    fn write_delta(&self, delta: &DeltaSet, path: &Path) -> TaxonResult<u64> {
        let objects = delta.objects();
        let budget = WriteBudget::new(self.config.max_in_flight_writes);
        let file = File::create(path).map_err(write_failed)?;
        let mut out = BufWriter::new(file);

        thread::scope(|scope| -> TaxonResult<()> {
            let mut pending: VecDeque<ScopedJoinHandle<'_, TaxonResult<Vec<u8>>>> =
                VecDeque::new();
            for batch in objects.chunks(self.config.write_batch_size.max(1)) {
                self.cancel.checkpoint()?;
                let permit = budget.acquire();
                pending.push_back(scope.spawn(move || {
                    let _permit = permit;
                    encode_batch(batch)
                }));
                // Batches are written in order; drain the finished prefix.
                while pending.front().is_some_and(|h| h.is_finished()) {
                    if let Some(handle) = pending.pop_front() {
                        write_encoded(&mut out, handle)?;
                    }
                }
            }
            while let Some(handle) = pending.pop_front() {
                write_encoded(&mut out, handle)?;
            }
            Ok(())
        })?;

        out.flush().map_err(write_failed)?;
        Ok(objects.len() as u64)
    }
}

fn read_side(side: Side, path: &Path, tx: &Sender<ReadEvent>) {
    let failed = |e: IbdfError| {
        ReadEvent::Failed(
            side,
            DifferError::ReadFailed {
                side: side.to_string(),
                reason: e.to_string(),
            }
            .into(),
        )
    };
    let mut reader = match IbdfReader::open(path) {
        Ok(reader) => reader,
        Err(e) => {
            let _ = tx.send(failed(e));
            return;
        }
    };

    let mut batch = Vec::with_capacity(READ_BATCH_SIZE);
    loop {
        match reader.read_object() {
            Ok(Some(object)) => {
                batch.push(object);
                if batch.len() >= READ_BATCH_SIZE
                    && tx.send(ReadEvent::Batch(side, std::mem::take(&mut batch))).is_err()
                {
                    return;
                }
            }
            Ok(None) => break,
            Err(IbdfError::UnsupportedObjectType { tag }) => {
                tracing::warn!(%side, tag, "skipping unsupported ibdf record");
            }
            Err(e) => {
                // Hand over what was read so the partial analysis sees it.
                if !batch.is_empty() {
                    let _ = tx.send(ReadEvent::Batch(side, std::mem::take(&mut batch)));
                }
                let _ = tx.send(failed(e));
                return;
            }
        }
    }
    if !batch.is_empty() && tx.send(ReadEvent::Batch(side, batch)).is_err() {
        return;
    }
    let _ = tx.send(ReadEvent::Done(side, reader.skipped()));
}

fn flush_partial(dir: &Path, old: &Export, new: &Export, error: &TaxonError) {
    let analysis = DiffAnalysis {
        complete: false,
        error: Some(error.to_string()),
        old_objects: old.len(),
        new_objects: new.len(),
        skipped_old: old.skipped(),
        skipped_new: new.skipped(),
        summary: DeltaSummary::default(),
    };
    if let Err(flush_error) = analysis.write(dir, None) {
        tracing::warn!(%flush_error, "partial analysis flush failed");
    }
}

fn encode_batch(batch: &[IbdfObject]) -> TaxonResult<Vec<u8>> {
    let mut writer = IbdfWriter::new(Vec::new());
    writer.write_all(batch)?;
    Ok(writer.finish()?)
}

fn write_encoded<W: Write>(
    out: &mut W,
    handle: ScopedJoinHandle<'_, TaxonResult<Vec<u8>>>,
) -> TaxonResult<()> {
    let bytes = handle.join().map_err(|_| DifferError::StagePanicked {
        stage: "encode".to_string(),
    })??;
    out.write_all(&bytes).map_err(write_failed)?;
    Ok(())
}

fn write_failed(e: std::io::Error) -> DifferError {
    DifferError::WriteFailed {
        reason: e.to_string(),
    }
}
