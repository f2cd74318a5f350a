//! Behavior of the in-memory sink against the `TableSink` contract.

use ablab_sink::{
    session_row, MemorySink, SinkError, SqlValue, TableSink, SESSIONS_TABLE, VARIANTS_TABLE,
};
use ablab_sim::{SimulationConfig, Simulator};

#[tokio::test]
async fn create_then_insert_then_read_back() {
    let sink = MemorySink::new();
    sink.create_or_replace(&SESSIONS_TABLE).await.unwrap();

    let config = SimulationConfig::new().with_num_users(25).with_seed(42);
    let run = Simulator::new(config).unwrap().generate().unwrap();
    let rows: Vec<_> = run.sessions.iter().map(session_row).collect();

    let written = sink.bulk_insert("ab_test_sessions", &rows).await.unwrap();
    assert_eq!(written, 25);
    assert_eq!(sink.row_count("ab_test_sessions"), Some(25));
}

#[tokio::test]
async fn recreate_replaces_prior_rows() {
    let sink = MemorySink::new();
    sink.create_or_replace(&VARIANTS_TABLE).await.unwrap();
    let row = vec![
        SqlValue::Text("icon_design_001".into()),
        SqlValue::Text("App Icon Design Test".into()),
        SqlValue::Text("control".into()),
        SqlValue::Text("Original Icon".into()),
        SqlValue::Text("Current app icon design".into()),
    ];
    sink.bulk_insert("ab_test_variants", &[row]).await.unwrap();
    assert_eq!(sink.row_count("ab_test_variants"), Some(1));

    // Full replace on the next run, no incremental update.
    sink.create_or_replace(&VARIANTS_TABLE).await.unwrap();
    assert_eq!(sink.row_count("ab_test_variants"), Some(0));
}

#[tokio::test]
async fn insert_into_missing_table_fails() {
    let sink = MemorySink::new();
    let err = sink
        .bulk_insert("ab_test_sessions", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SinkError::UnknownTable(_)));
}

#[tokio::test]
async fn row_width_mismatch_is_rejected() {
    let sink = MemorySink::new();
    sink.create_or_replace(&VARIANTS_TABLE).await.unwrap();
    let short_row = vec![SqlValue::Text("only-one-cell".into())];
    let err = sink
        .bulk_insert("ab_test_variants", &[short_row])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SinkError::RowWidth {
            expected: 5,
            got: 1,
            ..
        }
    ));
}
