//! In-memory `TableSink` for tests and dry runs.

use crate::{SinkError, SqlValue, TableSink, TableSpec};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct MemoryTable {
    column_count: usize,
    rows: Vec<Vec<SqlValue>>,
}

/// Table store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: Mutex<BTreeMap<String, MemoryTable>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently held for a table, if it exists.
    #[must_use]
    pub fn rows(&self, table: &str) -> Option<Vec<Vec<SqlValue>>> {
        self.tables.lock().get(table).map(|t| t.rows.clone())
    }

    /// Row count for a table, if it exists.
    #[must_use]
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.tables.lock().get(table).map(|t| t.rows.len())
    }

    /// Names of all created tables.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl TableSink for MemorySink {
    async fn create_or_replace(&self, table: &TableSpec) -> Result<(), SinkError> {
        self.tables.lock().insert(
            table.name.to_string(),
            MemoryTable {
                column_count: table.columns.len(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    async fn bulk_insert(&self, table: &str, rows: &[Vec<SqlValue>]) -> Result<u64, SinkError> {
        let mut tables = self.tables.lock();
        let entry = tables
            .get_mut(table)
            .ok_or_else(|| SinkError::UnknownTable(table.to_string()))?;
        if let Some(bad) = rows.iter().find(|r| r.len() != entry.column_count) {
            return Err(SinkError::RowWidth {
                table: table.to_string(),
                expected: entry.column_count,
                got: bad.len(),
            });
        }
        entry.rows.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }
}
