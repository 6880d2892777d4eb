//! Path registry: relative position, snapshot lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use taxon_core::errors::{PathError, TaxonError, TaxonResult};
use taxon_core::models::{PathOrigin, PathRecord, RelativePosition, StampPosition};
use taxon_core::traits::PathSource;
use taxon_core::Nid;
use taxon_path::{PathRegistry, StaticPathSource};
use test_fixtures::{load_fixture, PathScenario, DEV_PATH, MASTER_PATH, SIDE_PATH};

fn registry(records: Vec<PathRecord>) -> PathRegistry {
    PathRegistry::new(Arc::new(StaticPathSource::new(records)))
}

fn three_paths() -> PathRegistry {
    let scenario: PathScenario = load_fixture("paths/three_paths.json");
    registry(scenario.paths)
}

fn pos(time: i64, path: Nid) -> StampPosition {
    StampPosition::new(time, path)
}

#[test]
fn version_before_branch_point_precedes_branch() {
    let p1 = Nid(1);
    let p2 = Nid(2);
    let registry = registry(vec![
        PathRecord::root(p1),
        PathRecord::new(p2, vec![PathOrigin::new(p1, 50)]),
    ]);
    let v1 = pos(40, p1);
    let v2 = pos(60, p2);
    assert_eq!(registry.relative_position(v1, v2).unwrap(), RelativePosition::Before);
    assert_eq!(registry.relative_position(v2, v1).unwrap(), RelativePosition::After);
}

#[test]
fn version_after_branch_point_is_unreachable() {
    let registry = three_paths();
    let rel = registry
        .relative_position(pos(70, MASTER_PATH), pos(60, DEV_PATH))
        .unwrap();
    assert_eq!(rel, RelativePosition::Unreachable);
}

#[test]
fn same_path_compares_time() {
    let registry = three_paths();
    let r = |a, b| registry.relative_position(pos(a, DEV_PATH), pos(b, DEV_PATH)).unwrap();
    assert_eq!(r(1, 2), RelativePosition::Before);
    assert_eq!(r(2, 1), RelativePosition::After);
    assert_eq!(r(5, 5), RelativePosition::Equal);
}

#[test]
fn negative_time_on_same_path_is_invalid() {
    let registry = three_paths();
    let err = registry
        .relative_position(pos(-5, MASTER_PATH), pos(10, MASTER_PATH))
        .unwrap_err();
    assert!(matches!(
        err,
        TaxonError::Path(PathError::InvalidTime { time: -5, .. })
    ));
}

#[test]
fn ancestry_is_single_hop() {
    // side branches from dev at 80, dev from master at 50. A master version
    // at 10 is not ordered against side because side has no origin on master.
    let registry = three_paths();
    let rel = registry
        .relative_position(pos(10, MASTER_PATH), pos(90, SIDE_PATH))
        .unwrap();
    assert_eq!(rel, RelativePosition::Unreachable);
    let rel = registry
        .relative_position(pos(70, DEV_PATH), pos(90, SIDE_PATH))
        .unwrap();
    assert_eq!(rel, RelativePosition::Before);
}

#[test]
fn exists_and_origins() {
    let registry = three_paths();
    assert!(registry.exists(MASTER_PATH).unwrap());
    assert!(!registry.exists(Nid(999)).unwrap());
    assert!(registry.origins(MASTER_PATH).unwrap().is_empty());
    assert_eq!(
        registry.origins(DEV_PATH).unwrap(),
        vec![PathOrigin::new(MASTER_PATH, 50)]
    );
}

struct CountingSource {
    inner: StaticPathSource,
    loads: AtomicUsize,
}

impl PathSource for CountingSource {
    fn load_paths(&self) -> TaxonResult<Vec<PathRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_paths()
    }
}

#[test]
fn snapshot_is_built_once_until_invalidated() {
    let source = Arc::new(CountingSource {
        inner: StaticPathSource::new(vec![PathRecord::root(MASTER_PATH)]),
        loads: AtomicUsize::new(0),
    });
    let registry = PathRegistry::new(source.clone());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = &registry;
            move || registry.exists(MASTER_PATH).unwrap()
        })
        .collect();
    std::thread::scope(|s| {
        for h in handles {
            s.spawn(h);
        }
    });
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);

    source
        .inner
        .add_path(PathRecord::new(DEV_PATH, vec![PathOrigin::new(MASTER_PATH, 5)]));
    assert!(!registry.exists(DEV_PATH).unwrap());
    registry.invalidate();
    assert!(registry.exists(DEV_PATH).unwrap());
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
}

/// Forest of paths where every non-root path has one origin on an
/// earlier-numbered path.
fn arb_paths() -> impl Strategy<Value = Vec<PathRecord>> {
    prop::collection::vec((any::<prop::sample::Index>(), 0i64..100), 1..6).prop_map(|specs| {
        let mut records = vec![PathRecord::root(Nid(0))];
        for (i, (parent, time)) in specs.into_iter().enumerate() {
            let id = i as i32 + 1;
            let origin = Nid(parent.index(id as usize) as i32);
            records.push(PathRecord::new(Nid(id), vec![PathOrigin::new(origin, time)]));
        }
        records
    })
}

proptest! {
    #[test]
    fn relative_position_is_antisymmetric(
        records in arb_paths(),
        a in (0i64..120, 0usize..8),
        b in (0i64..120, 0usize..8),
    ) {
        let n = records.len();
        let registry = registry(records);
        let pa = pos(a.0, Nid((a.1 % n) as i32));
        let pb = pos(b.0, Nid((b.1 % n) as i32));
        let ab = registry.relative_position(pa, pb).unwrap();
        let ba = registry.relative_position(pb, pa).unwrap();
        prop_assert_eq!(ab, ba.reverse());
        if ab == RelativePosition::Equal {
            prop_assert_eq!(pa, pb);
        }
    }
}
