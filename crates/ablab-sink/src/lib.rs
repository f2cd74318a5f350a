//! ablab-sink - Relational sink abstraction
//!
//! The simulator and aggregator depend only on the `TableSink` trait:
//! create-or-replace a table, bulk-insert rows. Any relational or
//! columnar store satisfying it is substitutable. Two implementations
//! ship here: `PostgresSink` (sqlx) and `MemorySink` (tests, dry runs).

pub mod memory;
pub mod postgres;
pub mod schema;

pub use memory::MemorySink;
pub use postgres::PostgresSink;
pub use schema::{
    session_row, summary_row, table_spec, variant_row, SESSIONS_TABLE, SUMMARY_TABLE,
    VARIANTS_TABLE,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One bound cell of an output row.
///
/// `OptFloat` exists because the sink must bind typed NULLs; rating is
/// the only nullable column family in the schema contract.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    OptFloat(Option<f64>),
}

/// A column of an output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

/// A secondary index on an output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub column: &'static str,
}

/// Schema of one output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    pub primary_key: &'static [&'static str],
    pub indexes: &'static [IndexSpec],
}

impl TableSpec {
    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

/// Errors from the sink. All are fatal to the run; there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Connection, DDL, or insert failure in the database
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert addressed a table never created on this sink
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// Row shape does not match the table schema
    #[error("row width mismatch for {table}: expected {expected} columns, got {got}")]
    RowWidth {
        table: String,
        expected: usize,
        got: usize,
    },
}

/// The injected storage capability.
///
/// Contract: `create_or_replace` drops any prior table of the same name
/// and recreates it empty; `bulk_insert` appends rows and reports how
/// many were written.
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Drop and recreate a table from its spec.
    async fn create_or_replace(&self, table: &TableSpec) -> Result<(), SinkError>;

    /// Append rows to a previously created table.
    async fn bulk_insert(&self, table: &str, rows: &[Vec<SqlValue>]) -> Result<u64, SinkError>;
}
