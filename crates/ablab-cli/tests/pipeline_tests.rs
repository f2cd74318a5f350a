//! Full pipeline against the in-memory sink.

use ablab_cli::{run_with_sink, PipelineError};
use ablab_sim::{SimulationConfig, TestKind};
use ablab_sink::{MemorySink, SqlValue};
use chrono::{TimeZone, Utc};

fn config(users: u64, seed: u64) -> SimulationConfig {
    SimulationConfig::new()
        .with_num_users(users)
        .with_duration_days(45)
        .with_seed(seed)
        .with_window_end(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())
}

#[tokio::test]
async fn end_to_end_users_1000_seed_42() {
    let sink = MemorySink::new();
    let report = run_with_sink(config(1000, 42), &sink).await.unwrap();

    assert_eq!(report.sessions_written, 1000);
    assert_eq!(report.variants_written, 10);
    assert_eq!(sink.row_count("ab_test_sessions"), Some(1000));
    assert_eq!(sink.row_count("ab_test_variants"), Some(10));

    // Summary totals cover the full run for every test.
    let summary = sink.rows("ab_test_summary").unwrap();
    assert_eq!(summary.len() as u64, report.summary_rows_written);
    for kind in TestKind::ALL {
        let total: i64 = summary
            .iter()
            .filter(|row| row[0] == SqlValue::Text(kind.test_name().to_string()))
            .map(|row| match &row[2] {
                SqlValue::Int(n) => *n,
                _ => panic!("total_users must be an integer"),
            })
            .sum();
        assert_eq!(total, 1000, "{kind:?}");
    }
}

#[tokio::test]
async fn reruns_replace_rather_than_append() {
    let sink = MemorySink::new();
    run_with_sink(config(300, 1), &sink).await.unwrap();
    run_with_sink(config(200, 2), &sink).await.unwrap();
    assert_eq!(sink.row_count("ab_test_sessions"), Some(200));
}

#[tokio::test]
async fn zero_users_fail_before_any_write() {
    let sink = MemorySink::new();
    let err = run_with_sink(config(0, 42), &sink).await.unwrap_err();
    assert!(matches!(err, PipelineError::Sim(_)));
    // Nothing was created on the sink.
    assert!(sink.table_names().is_empty());
}

#[tokio::test]
async fn identical_config_produces_identical_tables() {
    let first = MemorySink::new();
    let second = MemorySink::new();
    run_with_sink(config(500, 7), &first).await.unwrap();
    run_with_sink(config(500, 7), &second).await.unwrap();
    assert_eq!(
        first.rows("ab_test_sessions"),
        second.rows("ab_test_sessions")
    );
    assert_eq!(
        first.rows("ab_test_summary"),
        second.rows("ab_test_summary")
    );
}
