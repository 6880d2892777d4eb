//! Classification of every component seen in either export.

use std::collections::{BTreeSet, HashSet};

use uuid::Uuid;

use taxon_ibdf::{ExternalChronology, ExternalVersion};

use crate::delta::DeltaSet;
use crate::export::Export;
use crate::options::{DiffOptions, VersionKey};

/// Compare `old` against `new`.
///
/// Only in `new`: added. Only in `old`: retired, with an inactivating
/// version stamped by `options.retirement`. In both: modified when the
/// header or the set of versions (projected onto the compared STAMP
/// fields) differs, otherwise unchanged.
pub fn diff(old: &Export, new: &Export, options: &DiffOptions) -> DeltaSet {
    let _span = taxon_core::diff_span!(old.len(), new.len()).entered();
    let mut delta = DeltaSet::default();
    let uuids: BTreeSet<&Uuid> = old.uuids().chain(new.uuids()).collect();

    for uuid in uuids {
        match (old.get(uuid), new.get(uuid)) {
            (None, Some(added)) => delta.added.push(added.clone()),
            (Some(retired), None) => delta.retired.push(retirement(retired, options)),
            (Some(before), Some(after)) => match modification(before, after, options) {
                Some(modified) => delta.modified.push(modified),
                None => {
                    delta.unchanged.insert(*uuid);
                }
            },
            (None, None) => {}
        }
    }

    for record in new.records() {
        if !old.records().contains(record) {
            delta.records.push(record.clone());
        }
    }

    let summary = delta.summary();
    tracing::info!(
        added = summary.added,
        retired = summary.retired,
        modified = summary.modified,
        unchanged = summary.unchanged,
        records = summary.records,
        "diff classified"
    );
    delta
}

fn retirement(chronology: &ExternalChronology, options: &DiffOptions) -> ExternalChronology {
    let versions = chronology
        .versions
        .last()
        .map(|last| ExternalVersion {
            stamp: options.retirement,
            payload: last.payload.clone(),
        })
        .into_iter()
        .collect();
    ExternalChronology {
        versions,
        ..chronology.clone()
    }
}

fn modification(
    before: &ExternalChronology,
    after: &ExternalChronology,
    options: &DiffOptions,
) -> Option<ExternalChronology> {
    let old_keys: HashSet<VersionKey> = before.versions.iter().map(|v| options.version_key(v)).collect();
    let new_keys: HashSet<VersionKey> = after.versions.iter().map(|v| options.version_key(v)).collect();

    let same_header = before.kind == after.kind && before.additional_uuids == after.additional_uuids;
    if same_header && old_keys == new_keys {
        return None;
    }

    let mut seen = HashSet::new();
    let versions = after
        .versions
        .iter()
        .filter(|v| {
            let key = options.version_key(v);
            !old_keys.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect();
    tracing::debug!(uuid = %after.primordial_uuid, "component modified");
    Some(ExternalChronology {
        versions,
        ..after.clone()
    })
}
