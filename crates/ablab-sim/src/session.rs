//! Session row model
//!
//! One `Session` is one simulated visit to an app store listing:
//! demographic context, one variant assignment per active test, and the
//! sampled outcome. Variant assignment is drawn once and never mutated;
//! outcome fields are computed strictly afterwards.

use crate::catalog::TestKind;
use crate::demographics::{AgeGroup, DeviceType};
use crate::error::DataIntegrityError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One variant key per active test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantAssignment {
    pub icon_design: &'static str,
    pub description: &'static str,
    pub pricing: &'static str,
    pub screenshots: &'static str,
}

impl VariantAssignment {
    /// Assigned variant key for a given test.
    #[must_use]
    pub fn get(&self, kind: TestKind) -> &'static str {
        match kind {
            TestKind::IconDesign => self.icon_design,
            TestKind::DescriptionLength => self.description,
            TestKind::Pricing => self.pricing,
            TestKind::ScreenshotCount => self.screenshots,
        }
    }
}

/// One simulated user session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Unique per session
    pub session_id: Uuid,
    /// Not unique; a user may have multiple sessions
    pub user_id: Uuid,
    pub session_date: DateTime<Utc>,
    pub app_name: String,
    pub app_genre: &'static str,
    pub age_group: AgeGroup,
    pub device_type: DeviceType,
    pub country: &'static str,
    pub variants: VariantAssignment,
    /// Seconds spent on the listing page
    pub time_spent_seconds: u32,
    /// Whether the session ended in an install
    pub converted: bool,
    /// Post-install rating; present iff `converted`
    pub rating: Option<f64>,
}

impl Session {
    /// Verify the internal invariants of a generated row.
    ///
    /// Violations indicate a bug in the composition order, not a
    /// recoverable runtime condition.
    pub fn check_consistency(&self) -> Result<(), DataIntegrityError> {
        match (self.converted, self.rating) {
            (false, Some(_)) => Err(DataIntegrityError::RatingWithoutConversion {
                session_id: self.session_id,
            }),
            (true, None) => Err(DataIntegrityError::MissingRating {
                session_id: self.session_id,
            }),
            (true, Some(r)) if !(1.0..=5.0).contains(&r) => {
                Err(DataIntegrityError::RatingOutOfRange {
                    session_id: self.session_id,
                    rating: r,
                })
            }
            _ => Ok(()),
        }
    }
}
