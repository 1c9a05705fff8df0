use std::collections::BTreeSet;
use std::path::Path;

use proptest::prelude::*;

use eorwatch::fs::mock::MockFileSystem;
use eorwatch::run::{scan_runs, RunRange};

proptest! {
    #[test]
    fn scan_yields_exactly_the_open_runs_in_range(
        runs in proptest::collection::btree_set(0u64..500, 0..30),
        closed in proptest::collection::btree_set(0u64..500, 0..10),
        first in proptest::option::of(0u64..500),
        last in proptest::option::of(0u64..500),
    ) {
        let fs = MockFileSystem::new();
        fs.add_dir("/t");
        for n in &runs {
            fs.add_dir(format!("/t/run{n:06}"));
            if closed.contains(n) {
                fs.add_file(format!("/t/run{n:06}/run{n:06}_ls0000_TransferEoR_hook.jsn"), "");
            }
        }

        let range = RunRange::new(first, last);
        let found: Vec<u64> = scan_runs(&fs, Path::new("/t"), range, "hook")
            .unwrap()
            .into_iter()
            .map(|r| r.number)
            .collect();

        let expected: Vec<u64> = runs
            .iter()
            .copied()
            .filter(|n| first.is_none_or(|f| *n >= f) && last.is_none_or(|l| *n <= l))
            .filter(|n| !closed.contains(n))
            .collect();

        prop_assert_eq!(&found, &expected);
        let unique: BTreeSet<u64> = expected.iter().copied().collect();
        prop_assert_eq!(unique.len(), expected.len());
    }
}
