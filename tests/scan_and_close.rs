// tests/scan_and_close.rs

mod common;
use crate::common::builders::RunDirBuilder;
use crate::common::fakes::RecordingBookkeeper;
use crate::common::init_tracing;

use std::sync::Arc;

use eorwatch::close::{close_run, CloseOutcome};
use eorwatch::fs::{FileSystem, RealFileSystem};
use eorwatch::run::{scan_runs, RunRange};

fn numbers(runs: &[eorwatch::run::Run]) -> Vec<u64> {
    runs.iter().map(|r| r.number).collect()
}

#[test]
fn range_filter_is_inclusive_on_both_ends() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    for n in [230190, 230195, 230198, 230201, 230205] {
        RunDirBuilder::new(root.path(), n);
    }

    let runs = scan_runs(
        &RealFileSystem,
        root.path(),
        RunRange::new(Some(230195), Some(230201)),
        "hook",
    )
    .unwrap();

    assert_eq!(numbers(&runs), vec![230195, 230198, 230201]);
}

#[test]
fn non_run_entries_coexist_with_runs() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    RunDirBuilder::new(root.path(), 2);
    RunDirBuilder::new(root.path(), 1);
    std::fs::create_dir(root.path().join("transferred")).unwrap();
    std::fs::create_dir(root.path().join("runaway")).unwrap();
    std::fs::write(root.path().join("run3"), "not a directory").unwrap();

    let runs = scan_runs(&RealFileSystem, root.path(), RunRange::unbounded(), "hook").unwrap();
    assert_eq!(numbers(&runs), vec![1, 2]);
}

#[test]
fn closed_runs_are_never_yielded_again() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    RunDirBuilder::new(root.path(), 10).verdict(true).closed();
    RunDirBuilder::new(root.path(), 11).verdict(false);

    for _ in 0..3 {
        let runs =
            scan_runs(&RealFileSystem, root.path(), RunRange::unbounded(), "hook").unwrap();
        assert_eq!(numbers(&runs), vec![11]);
    }
}

#[tokio::test]
async fn closing_creates_empty_marker_and_is_idempotent() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 230195).build();
    let books = RecordingBookkeeper::new();

    let first = close_run(&RealFileSystem, &run, &books, false).await.unwrap();
    assert_eq!(first, CloseOutcome::Closed);

    let marker = run.closed_marker_path();
    assert!(marker.is_file());
    assert_eq!(std::fs::metadata(&marker).unwrap().len(), 0);
    let mtime = std::fs::metadata(&marker).unwrap().modified().unwrap();

    let second = close_run(&RealFileSystem, &run, &books, false).await.unwrap();
    assert_eq!(second, CloseOutcome::AlreadyClosed);
    assert_eq!(std::fs::metadata(&marker).unwrap().modified().unwrap(), mtime);
    assert_eq!(books.calls(), vec![(230195, false)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_closers_agree_on_one_winner() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = Arc::new(RunDirBuilder::new(root.path(), 7).build());
    let books = RecordingBookkeeper::new();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let run = Arc::clone(&run);
        let books = books.clone();
        handles.push(tokio::spawn(async move {
            close_run(&RealFileSystem, &run, &books, false).await.unwrap()
        }));
    }

    let mut closed = 0;
    for h in handles {
        if h.await.unwrap() == CloseOutcome::Closed {
            closed += 1;
        }
    }

    assert_eq!(closed, 1);
    assert_eq!(books.closed_runs(), vec![7]);
    let markers: Vec<_> = RealFileSystem
        .read_dir(&run.path)
        .unwrap()
        .into_iter()
        .filter(|p| p.to_string_lossy().contains("TransferEoR"))
        .collect();
    assert_eq!(markers.len(), 1);
}
