//! Per-(test, variant) summary aggregation
//!
//! Reduces the session set to one `TestSummary` row per (test, variant)
//! pair actually present. Variants with zero sessions are omitted; that
//! omission is the explicit "insufficient data" representation, and no
//! division by zero can occur. Zero conversions report a 0.0 rate.

use crate::catalog::TestKind;
use crate::session::Session;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the `ab_test_summary` output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSummary {
    pub test_name: &'static str,
    pub variant_key: &'static str,
    pub total_users: u64,
    pub conversions: u64,
    /// conversions / total_users, in [0, 1]
    pub conversion_rate: f64,
    /// Mean time on the listing page, seconds
    pub avg_time_spent: f64,
    /// Mean rating over converted sessions; `None` when none rated
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    total: u64,
    conversions: u64,
    time_spent_sum: u64,
    rating_sum: f64,
    rating_count: u64,
}

impl Accumulator {
    fn record(&mut self, session: &Session) {
        self.total += 1;
        self.time_spent_sum += u64::from(session.time_spent_seconds);
        if session.converted {
            self.conversions += 1;
        }
        if let Some(rating) = session.rating {
            self.rating_sum += rating;
            self.rating_count += 1;
        }
    }
}

/// Aggregate the full session set into summary rows, emitted in catalog
/// order (test, then variant).
#[must_use]
pub fn summarize(sessions: &[Session]) -> Vec<TestSummary> {
    let mut acc: BTreeMap<(TestKind, &'static str), Accumulator> = BTreeMap::new();
    for session in sessions {
        for kind in TestKind::ALL {
            acc.entry((kind, session.variants.get(kind)))
                .or_default()
                .record(session);
        }
    }

    let mut rows = Vec::new();
    for kind in TestKind::ALL {
        for variant in kind.variants() {
            let Some(a) = acc.get(&(kind, variant.key)) else {
                // No sessions for this variant: insufficient data, no row.
                continue;
            };
            debug_assert!(a.total > 0);
            rows.push(TestSummary {
                test_name: kind.test_name(),
                variant_key: variant.key,
                total_users: a.total,
                conversions: a.conversions,
                conversion_rate: a.conversions as f64 / a.total as f64,
                avg_time_spent: a.time_spent_sum as f64 / a.total as f64,
                avg_rating: (a.rating_count > 0).then(|| a.rating_sum / a.rating_count as f64),
            });
        }
    }
    rows
}
