//! The threaded diff job against files on disk.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use taxon_core::config::DifferConfig;
use taxon_core::errors::{DifferError, TaxonError};
use taxon_core::models::{Status, VersionPayload};
use taxon_core::traits::{Cancellable, CancellationToken};
use taxon_differ::{DiffJob, DiffOptions, Export, WriteBudget};
use taxon_ibdf::{ExternalChronology, ExternalKind, ExternalStamp, ExternalVersion, IbdfObject};

fn chronology(id: u128, values: &[i64]) -> ExternalChronology {
    ExternalChronology {
        kind: ExternalKind::Concept,
        primordial_uuid: Uuid::from_u128(id),
        additional_uuids: BTreeSet::new(),
        versions: values
            .iter()
            .map(|v| ExternalVersion {
                stamp: ExternalStamp {
                    status: Status::Active,
                    time: *v,
                    author: Uuid::from_u128(1),
                    module: Uuid::from_u128(2),
                    path: Uuid::from_u128(3),
                },
                payload: VersionPayload::Concept,
            })
            .collect(),
    }
}

fn write_export(path: &Path, chronologies: impl IntoIterator<Item = ExternalChronology>) -> Export {
    let export = Export::from_objects(chronologies.into_iter().map(IbdfObject::from_chronology));
    export.write(path).unwrap();
    export
}

fn small_batches() -> DifferConfig {
    DifferConfig {
        queue_capacity: 2,
        max_in_flight_writes: 2,
        write_batch_size: 3,
        write_analysis: true,
    }
}

#[test]
fn job_writes_importable_delta_and_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let old = write_export(&dir.path().join("old.ibdf"), (1..=600).map(|i| chronology(i, &[10])));
    let new = write_export(
        &dir.path().join("new.ibdf"),
        (5..=620).map(|i| {
            if i % 7 == 0 {
                chronology(i, &[10, 20])
            } else {
                chronology(i, &[10])
            }
        }),
    );

    let job = DiffJob::new(small_batches(), DiffOptions::retiring_at(99));
    let delta_path = dir.path().join("delta.ibdf");
    let analysis = dir.path().join("analysis");
    let report = job
        .run(
            &dir.path().join("old.ibdf"),
            &dir.path().join("new.ibdf"),
            &delta_path,
            Some(&analysis),
        )
        .unwrap();

    assert_eq!(report.summary.added, 20);
    assert_eq!(report.summary.retired, 4);
    assert_eq!(report.summary.modified, (5..=600).filter(|i| i % 7 == 0).count());
    assert_eq!(
        report.written as usize,
        report.summary.added + report.summary.retired + report.summary.modified
    );

    let delta = Export::read(&delta_path).unwrap();
    assert_eq!(delta.len(), report.written as usize);

    // Importing the delta over the old export yields the new one plus
    // retired components.
    let mut merged = old.clone();
    for chronology in delta.chronologies() {
        merged.insert(IbdfObject::from_chronology(chronology.clone()));
    }
    for chronology in new.chronologies() {
        assert_eq!(merged.get(&chronology.primordial_uuid), Some(chronology));
    }

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(analysis.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["complete"], true);
    assert_eq!(summary["summary"]["added"], 20);
    let added: Vec<Uuid> =
        serde_json::from_str(&fs::read_to_string(analysis.join("added.json")).unwrap()).unwrap();
    assert_eq!(added.len(), 20);
}

#[test]
fn read_failure_flushes_partial_analysis_then_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_export(&dir.path().join("old.ibdf"), (1..=10).map(|i| chronology(i, &[10])));
    let new_path = dir.path().join("new.ibdf");
    write_export(&new_path, (1..=10).map(|i| chronology(i, &[10])));
    // A frame header promising more bytes than follow.
    let mut file = fs::OpenOptions::new().append(true).open(&new_path).unwrap();
    file.write_all(&[1, 1, 0, 0, 0, 40, 7, 7]).unwrap();
    drop(file);

    let analysis = dir.path().join("analysis");
    let delta_path = dir.path().join("delta.ibdf");
    let job = DiffJob::new(small_batches(), DiffOptions::retiring_at(99));
    let err = job
        .run(&dir.path().join("old.ibdf"), &new_path, &delta_path, Some(&analysis))
        .unwrap_err();

    assert!(matches!(err, TaxonError::Differ(DifferError::ReadFailed { .. })));
    assert!(!delta_path.exists());
    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(analysis.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["complete"], false);
    assert!(summary["error"].as_str().unwrap().contains("new"));
    assert!(!analysis.join("added.json").exists());
}

#[test]
fn missing_input_fails_without_analysis_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = dir.path().join("analysis");
    let config = DifferConfig {
        write_analysis: false,
        ..small_batches()
    };
    let job = DiffJob::new(config, DiffOptions::retiring_at(99));
    let err = job
        .run(
            &dir.path().join("absent-old.ibdf"),
            &dir.path().join("absent-new.ibdf"),
            &dir.path().join("delta.ibdf"),
            Some(&analysis),
        )
        .unwrap_err();
    assert!(matches!(err, TaxonError::Differ(DifferError::ReadFailed { .. })));
    assert!(!analysis.exists());
}

#[test]
fn cancelled_job_stops() {
    let dir = tempfile::tempdir().unwrap();
    write_export(&dir.path().join("old.ibdf"), (1..=10).map(|i| chronology(i, &[10])));
    write_export(&dir.path().join("new.ibdf"), (1..=10).map(|i| chronology(i, &[10])));
    let token = CancellationToken::new();
    token.cancel();
    let job = DiffJob::new(small_batches(), DiffOptions::retiring_at(99)).with_cancellation(token);
    let err = job
        .run(
            &dir.path().join("old.ibdf"),
            &dir.path().join("new.ibdf"),
            &dir.path().join("delta.ibdf"),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, TaxonError::Cancelled));
}

#[test]
fn budget_bounds_concurrent_holders() {
    let budget = Arc::new(WriteBudget::new(3));
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    std::thread::scope(|scope| {
        for _ in 0..12 {
            let (budget, current, peak) = (&budget, &current, &peak);
            scope.spawn(move || {
                let _permit = budget.acquire();
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(5));
                current.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });

    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(budget.available(), 3);
}

#[test]
fn try_acquire_respects_capacity() {
    let budget = WriteBudget::new(1);
    let held = budget.try_acquire();
    assert!(held.is_some());
    assert!(budget.try_acquire().is_none());
    drop(held);
    assert!(budget.try_acquire().is_some());
    assert_eq!(WriteBudget::new(0).capacity(), 1);
}
