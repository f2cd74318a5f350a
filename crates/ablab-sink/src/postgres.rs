//! PostgreSQL implementation of `TableSink`
//!
//! DDL is derived from the `TableSpec`; inserts go through sqlx's
//! `QueryBuilder` in chunks. Failures surface as `SinkError` and abort
//! the run; the operator re-runs after fixing the connection.

use crate::schema::table_spec;
use crate::{SinkError, SqlValue, TableSink, TableSpec};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

/// Rows per INSERT statement. Postgres caps bind parameters at 65535;
/// 500 rows x 15 columns stays well under it.
const INSERT_CHUNK_ROWS: usize = 500;

/// sqlx-backed PostgreSQL sink.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Connect with a small pool; the writer is single-threaded batch.
    pub async fn connect(database_url: &str) -> Result<Self, SinkError> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await?;
        info!("connected to postgres sink");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn create_table_sql(table: &TableSpec) -> String {
    let mut columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            if c.nullable {
                format!("{} {}", c.name, c.sql_type)
            } else {
                format!("{} {} NOT NULL", c.name, c.sql_type)
            }
        })
        .collect();
    if !table.primary_key.is_empty() {
        columns.push(format!("PRIMARY KEY ({})", table.primary_key.join(", ")));
    }
    format!("CREATE TABLE {} ({})", table.name, columns.join(", "))
}

fn create_index_sql(table: &TableSpec) -> Vec<String> {
    table
        .indexes
        .iter()
        .map(|idx| format!("CREATE INDEX {} ON {}({})", idx.name, table.name, idx.column))
        .collect()
}

#[async_trait]
impl TableSink for PostgresSink {
    async fn create_or_replace(&self, table: &TableSpec) -> Result<(), SinkError> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table.name))
            .execute(&self.pool)
            .await?;
        sqlx::query(&create_table_sql(table))
            .execute(&self.pool)
            .await?;
        for index_sql in create_index_sql(table) {
            sqlx::query(&index_sql).execute(&self.pool).await?;
        }
        debug!(table = table.name, "table created");
        Ok(())
    }

    async fn bulk_insert(&self, table: &str, rows: &[Vec<SqlValue>]) -> Result<u64, SinkError> {
        let spec = table_spec(table).ok_or_else(|| SinkError::UnknownTable(table.to_string()))?;
        let expected = spec.columns.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != expected) {
            return Err(SinkError::RowWidth {
                table: table.to_string(),
                expected,
                got: bad.len(),
            });
        }
        if rows.is_empty() {
            return Ok(0);
        }

        let column_list = spec.column_names().join(", ");
        let mut written = 0u64;
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<'_, Postgres> =
                QueryBuilder::new(format!("INSERT INTO {} ({}) ", spec.name, column_list));
            builder.push_values(chunk, |mut b, row| {
                for value in row {
                    match value {
                        SqlValue::Text(s) => {
                            b.push_bind(s.clone());
                        }
                        SqlValue::Int(i) => {
                            b.push_bind(*i);
                        }
                        SqlValue::Float(f) => {
                            b.push_bind(*f);
                        }
                        SqlValue::Bool(v) => {
                            b.push_bind(*v);
                        }
                        SqlValue::Timestamp(t) => {
                            b.push_bind(*t);
                        }
                        SqlValue::OptFloat(f) => {
                            b.push_bind(*f);
                        }
                    }
                }
            });
            let result = builder.build().execute(&self.pool).await?;
            written += result.rows_affected();
        }
        debug!(table, rows = written, "bulk insert complete");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SESSIONS_TABLE, SUMMARY_TABLE, VARIANTS_TABLE};

    #[test]
    fn sessions_ddl_names_every_column() {
        let sql = create_table_sql(&SESSIONS_TABLE);
        assert!(sql.starts_with("CREATE TABLE ab_test_sessions ("));
        for column in SESSIONS_TABLE.columns {
            assert!(sql.contains(column.name), "missing column {}", column.name);
        }
        assert!(sql.contains("PRIMARY KEY (session_id)"));
        // rating is the only nullable session column
        assert!(sql.contains("rating DOUBLE PRECISION"));
        assert!(!sql.contains("rating DOUBLE PRECISION NOT NULL"));
    }

    #[test]
    fn composite_primary_keys_render() {
        let sql = create_table_sql(&VARIANTS_TABLE);
        assert!(sql.contains("PRIMARY KEY (test_id, variant_key)"));
        let sql = create_table_sql(&SUMMARY_TABLE);
        assert!(sql.contains("PRIMARY KEY (test_name, variant_key)"));
    }

    #[test]
    fn session_indexes_render() {
        let stmts = create_index_sql(&SESSIONS_TABLE);
        assert_eq!(stmts.len(), 4);
        assert!(stmts[0].contains("idx_sessions_date"));
        assert!(stmts
            .iter()
            .all(|s| s.contains("ON ab_test_sessions(")));
    }

    #[test]
    fn tables_without_indexes_render_nothing() {
        assert!(create_index_sql(&VARIANTS_TABLE).is_empty());
    }
}
