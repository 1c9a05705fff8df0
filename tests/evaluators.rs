// tests/evaluators.rs

mod common;
use crate::common::builders::RunDirBuilder;
use crate::common::fakes::{FakeCalculator, VerdictSink};
use crate::common::init_tracing;

use eorwatch::errors::EorError;
use eorwatch::eval::{is_complete_by_aggregate, is_complete_by_delegate, Evaluator};
use eorwatch::fs::RealFileSystem;

#[test]
fn aggregate_requires_exactly_the_expected_worker_count() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();

    let fourteen = RunDirBuilder::new(root.path(), 1).mini_eors(14, true).build();
    assert!(!is_complete_by_aggregate(&RealFileSystem, &fourteen, 15).unwrap());

    let fifteen = RunDirBuilder::new(root.path(), 2).mini_eors(15, true).build();
    assert!(is_complete_by_aggregate(&RealFileSystem, &fifteen, 15).unwrap());

    let sixteen = RunDirBuilder::new(root.path(), 3).mini_eors(16, true).build();
    assert!(!is_complete_by_aggregate(&RealFileSystem, &sixteen, 15).unwrap());
}

#[test]
fn aggregate_is_a_logical_and_over_workers() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 4)
        .mini_eors(14, true)
        .mini_eor("bu-slow", false)
        .stream_file(12, "A")
        .build();

    assert!(!is_complete_by_aggregate(&RealFileSystem, &run, 15).unwrap());
}

#[test]
fn aggregate_ignores_other_meta_files() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 5)
        .mini_eors(3, true)
        .stream_file(1, "A")
        .stream_file(2, "DQM")
        .verdict(false)
        .build();

    assert!(is_complete_by_aggregate(&RealFileSystem, &run, 3).unwrap());
}

#[cfg(unix)]
#[test]
fn aggregate_drops_unreadable_files_from_the_count() {
    use std::os::unix::fs::PermissionsExt;

    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 6).mini_eors(3, true).build();

    // A directory with a MiniEoR name is not a readable summary.
    std::fs::create_dir(run.path.join("run6_ls0000_MiniEoR_bu-dir.jsn")).unwrap();
    assert!(is_complete_by_aggregate(&RealFileSystem, &run, 3).unwrap());

    let unreadable = run.path.join("run6_ls0000_MiniEoR_bu-02.jsn");
    std::fs::set_permissions(&unreadable, std::fs::Permissions::from_mode(0o000)).unwrap();
    if std::fs::read_to_string(&unreadable).is_ok() {
        // Running as root: permissions are not enforced.
        return;
    }
    assert!(!is_complete_by_aggregate(&RealFileSystem, &run, 3).unwrap());
}

#[test]
fn aggregate_reports_malformed_summary_as_error() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 7).mini_eors(2, true).build();
    std::fs::write(run.path.join("run7_ls0000_MiniEoR_bu-01.jsn"), r#"{"eventsInput": 1}"#)
        .unwrap();

    let err = is_complete_by_aggregate(&RealFileSystem, &run, 2).unwrap_err();
    assert!(matches!(err, EorError::MissingField { field: "isRunComplete", .. }));
}

#[tokio::test]
async fn delegate_returns_the_written_verdict() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let done = RunDirBuilder::new(root.path(), 230195).build();
    let busy = RunDirBuilder::new(root.path(), 230196).build();
    let calc = FakeCalculator::new(VerdictSink::Disk)
        .verdict(230195, true)
        .verdict(230196, false);

    assert!(is_complete_by_delegate(&RealFileSystem, &calc, &done, 10, 1.0).await.unwrap());
    assert!(!is_complete_by_delegate(&RealFileSystem, &calc, &busy, 10, 1.0).await.unwrap());

    let requests = calc.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].run_dir, done.path);
    assert_eq!(requests[0].debug_level, 10);
    assert_eq!(requests[0].threshold, 1.0);
    assert_eq!(requests[0].suffix, "hook");
}

#[tokio::test]
async fn delegate_without_verdict_is_delegate_failure() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 230197).build();
    let calc = FakeCalculator::new(VerdictSink::Disk);

    let err = is_complete_by_delegate(&RealFileSystem, &calc, &run, 10, 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, EorError::DelegateFailure { run: 230197, .. }));
}

#[tokio::test]
async fn delegate_ignores_verdict_left_by_an_earlier_pass() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 230195).verdict(false).build();
    assert!(run.verdict_path().exists());
    // Exits cleanly but writes nothing for this run.
    let calc = FakeCalculator::new(VerdictSink::Disk);

    let err = is_complete_by_delegate(&RealFileSystem, &calc, &run, 10, 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, EorError::DelegateFailure { run: 230195, .. }));
    assert!(!run.verdict_path().exists());
}

#[tokio::test]
async fn delegate_reads_the_fresh_verdict_over_a_stale_one() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 230196).verdict(false).build();
    let calc = FakeCalculator::new(VerdictSink::Disk).verdict(230196, true);

    assert!(is_complete_by_delegate(&RealFileSystem, &calc, &run, 10, 1.0).await.unwrap());
}

#[tokio::test]
async fn delegate_calculator_error_is_delegate_failure() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 230198).build();
    let calc = FakeCalculator::new(VerdictSink::Disk).failing();

    let err = is_complete_by_delegate(&RealFileSystem, &calc, &run, 10, 0.9)
        .await
        .unwrap_err();
    assert!(matches!(err, EorError::DelegateFailure { run: 230198, .. }));
}

#[tokio::test]
async fn delegate_malformed_verdict_is_distinguishable() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 230199).build();
    let calc = FakeCalculator::new(VerdictSink::Disk).raw_verdict(230199, "{\"isComplete\": ");

    let err = is_complete_by_delegate(&RealFileSystem, &calc, &run, 10, 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, EorError::MalformedJson { .. }));
}

#[tokio::test]
async fn evaluator_dispatches_on_strategy() {
    init_tracing();
    let root = tempfile::tempdir().unwrap();
    let run = RunDirBuilder::new(root.path(), 8).mini_eors(2, true).build();
    let calc = FakeCalculator::new(VerdictSink::Disk).verdict(8, false);

    let aggregate = Evaluator::Aggregate { expected_workers: 2 };
    assert!(aggregate.is_complete(&RealFileSystem, &run).await.unwrap());
    assert!(calc.requests().is_empty());

    let delegate = Evaluator::Delegate {
        calculator: &calc,
        debug_level: 10,
        threshold: 1.0,
    };
    assert!(!delegate.is_complete(&RealFileSystem, &run).await.unwrap());
    assert_eq!(calc.requests().len(), 1);
}
