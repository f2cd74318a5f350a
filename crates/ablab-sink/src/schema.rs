//! Output table contracts and row encoders
//!
//! Column names and order are a downstream contract: BI-layer SQL
//! addresses them verbatim. Do not reorder or rename without updating
//! the consumers.

use crate::{ColumnSpec, IndexSpec, SqlValue, TableSpec};
use ablab_sim::{Session, TestSummary, VariantRow};

/// `ab_test_sessions`: one row per simulated session.
pub static SESSIONS_TABLE: TableSpec = TableSpec {
    name: "ab_test_sessions",
    columns: &[
        ColumnSpec {
            name: "session_id",
            sql_type: "VARCHAR(50)",
            nullable: false,
        },
        ColumnSpec {
            name: "user_id",
            sql_type: "VARCHAR(50)",
            nullable: false,
        },
        ColumnSpec {
            name: "session_date",
            sql_type: "TIMESTAMPTZ",
            nullable: false,
        },
        ColumnSpec {
            name: "app_name",
            sql_type: "VARCHAR(200)",
            nullable: false,
        },
        ColumnSpec {
            name: "app_genre",
            sql_type: "VARCHAR(50)",
            nullable: false,
        },
        ColumnSpec {
            name: "age_group",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "device_type",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "country",
            sql_type: "VARCHAR(10)",
            nullable: false,
        },
        ColumnSpec {
            name: "icon_design_variant",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "description_variant",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "pricing_variant",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "screenshots_variant",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "time_spent_seconds",
            sql_type: "INTEGER",
            nullable: false,
        },
        ColumnSpec {
            name: "converted",
            sql_type: "BOOLEAN",
            nullable: false,
        },
        ColumnSpec {
            name: "rating",
            sql_type: "DOUBLE PRECISION",
            nullable: true,
        },
    ],
    primary_key: &["session_id"],
    indexes: &[
        IndexSpec {
            name: "idx_sessions_date",
            column: "session_date",
        },
        IndexSpec {
            name: "idx_sessions_genre",
            column: "app_genre",
        },
        IndexSpec {
            name: "idx_sessions_converted",
            column: "converted",
        },
        IndexSpec {
            name: "idx_sessions_country",
            column: "country",
        },
    ],
};

/// `ab_test_variants`: static variant definitions, 10 rows.
pub static VARIANTS_TABLE: TableSpec = TableSpec {
    name: "ab_test_variants",
    columns: &[
        ColumnSpec {
            name: "test_id",
            sql_type: "VARCHAR(50)",
            nullable: false,
        },
        ColumnSpec {
            name: "test_name",
            sql_type: "VARCHAR(200)",
            nullable: false,
        },
        ColumnSpec {
            name: "variant_key",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "variant_name",
            sql_type: "VARCHAR(100)",
            nullable: false,
        },
        ColumnSpec {
            name: "variant_description",
            sql_type: "TEXT",
            nullable: true,
        },
    ],
    primary_key: &["test_id", "variant_key"],
    indexes: &[],
};

/// `ab_test_summary`: pre-aggregated per-(test, variant) statistics.
pub static SUMMARY_TABLE: TableSpec = TableSpec {
    name: "ab_test_summary",
    columns: &[
        ColumnSpec {
            name: "test_name",
            sql_type: "VARCHAR(200)",
            nullable: false,
        },
        ColumnSpec {
            name: "variant_key",
            sql_type: "VARCHAR(20)",
            nullable: false,
        },
        ColumnSpec {
            name: "total_users",
            sql_type: "BIGINT",
            nullable: false,
        },
        ColumnSpec {
            name: "conversions",
            sql_type: "BIGINT",
            nullable: false,
        },
        ColumnSpec {
            name: "conversion_rate",
            sql_type: "DOUBLE PRECISION",
            nullable: false,
        },
        ColumnSpec {
            name: "avg_time_spent",
            sql_type: "DOUBLE PRECISION",
            nullable: false,
        },
        ColumnSpec {
            name: "avg_rating",
            sql_type: "DOUBLE PRECISION",
            nullable: true,
        },
    ],
    primary_key: &["test_name", "variant_key"],
    indexes: &[],
};

/// Look up one of the three output tables by name.
#[must_use]
pub fn table_spec(name: &str) -> Option<&'static TableSpec> {
    [&SESSIONS_TABLE, &VARIANTS_TABLE, &SUMMARY_TABLE]
        .into_iter()
        .find(|t| t.name == name)
}

/// Encode one session as an `ab_test_sessions` row.
#[must_use]
pub fn session_row(session: &Session) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(session.session_id.to_string()),
        SqlValue::Text(session.user_id.to_string()),
        SqlValue::Timestamp(session.session_date),
        SqlValue::Text(session.app_name.clone()),
        SqlValue::Text(session.app_genre.to_string()),
        SqlValue::Text(session.age_group.label().to_string()),
        SqlValue::Text(session.device_type.label().to_string()),
        SqlValue::Text(session.country.to_string()),
        SqlValue::Text(session.variants.icon_design.to_string()),
        SqlValue::Text(session.variants.description.to_string()),
        SqlValue::Text(session.variants.pricing.to_string()),
        SqlValue::Text(session.variants.screenshots.to_string()),
        SqlValue::Int(i64::from(session.time_spent_seconds)),
        SqlValue::Bool(session.converted),
        SqlValue::OptFloat(session.rating),
    ]
}

/// Encode one variant definition as an `ab_test_variants` row.
#[must_use]
pub fn variant_row(variant: &VariantRow) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(variant.test_id.to_string()),
        SqlValue::Text(variant.test_name.to_string()),
        SqlValue::Text(variant.variant_key.to_string()),
        SqlValue::Text(variant.variant_name.to_string()),
        SqlValue::Text(variant.variant_description.to_string()),
    ]
}

/// Encode one summary record as an `ab_test_summary` row.
#[must_use]
pub fn summary_row(summary: &TestSummary) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(summary.test_name.to_string()),
        SqlValue::Text(summary.variant_key.to_string()),
        SqlValue::Int(summary.total_users as i64),
        SqlValue::Int(summary.conversions as i64),
        SqlValue::Float(summary.conversion_rate),
        SqlValue::Float(summary.avg_time_spent),
        SqlValue::OptFloat(summary.avg_rating),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ablab_sim::{AgeGroup, DeviceType, VariantAssignment};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn row_widths_match_table_specs() {
        let session = Session {
            session_id: Uuid::nil(),
            user_id: Uuid::nil(),
            session_date: Utc::now(),
            app_name: "Acme Notes".to_string(),
            app_genre: "Games",
            age_group: AgeGroup::From18To24,
            device_type: DeviceType::IPhone,
            country: "US",
            variants: VariantAssignment {
                icon_design: "control",
                description: "control",
                pricing: "control",
                screenshots: "control",
            },
            time_spent_seconds: 45,
            converted: true,
            rating: Some(4.5),
        };
        assert_eq!(session_row(&session).len(), SESSIONS_TABLE.columns.len());

        let variants = ablab_sim::variant_rows();
        assert_eq!(
            variant_row(&variants[0]).len(),
            VARIANTS_TABLE.columns.len()
        );

        let summary = TestSummary {
            test_name: "App Icon Design Test",
            variant_key: "control",
            total_users: 10,
            conversions: 2,
            conversion_rate: 0.2,
            avg_time_spent: 51.3,
            avg_rating: None,
        };
        assert_eq!(summary_row(&summary).len(), SUMMARY_TABLE.columns.len());
    }

    #[test]
    fn nullable_rating_encodes_as_typed_null() {
        let summary = TestSummary {
            test_name: "Pricing Strategy Test",
            variant_key: "variant_b",
            total_users: 5,
            conversions: 0,
            conversion_rate: 0.0,
            avg_time_spent: 40.0,
            avg_rating: None,
        };
        let row = summary_row(&summary);
        assert_eq!(row[6], SqlValue::OptFloat(None));
    }

    #[test]
    fn table_lookup_by_name() {
        assert_eq!(table_spec("ab_test_sessions").unwrap().name, "ab_test_sessions");
        assert!(table_spec("nope").is_none());
    }

    #[test]
    fn sessions_table_column_order_is_the_contract() {
        let names = SESSIONS_TABLE.column_names();
        assert_eq!(names.first(), Some(&"session_id"));
        assert_eq!(names.last(), Some(&"rating"));
        assert_eq!(names.len(), 15);
    }
}
