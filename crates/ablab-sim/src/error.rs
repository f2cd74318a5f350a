//! Error types for the simulator
//!
//! Three families, mirroring how a run can fail:
//! - `ConfigError`: rejected before any generation happens
//! - `DataIntegrityError`: a generated row contradicts itself (should
//!   never occur; surfaced as an assertion-grade failure in tests)
//! - `SimError`: top-level union

use uuid::Uuid;

/// Configuration problems detected before generation starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Session count must be at least one
    #[error("num_users must be positive (got {0})")]
    InvalidUserCount(u64),

    /// Test window must span at least one day
    #[error("test_duration_days must be positive (got {0})")]
    InvalidDuration(u32),

    /// Base rate outside the open unit interval
    #[error("base_conversion_rate must be in (0, 1) (got {0})")]
    InvalidBaseRate(f64),

    /// Clamp bounds are inverted or out of range
    #[error("conversion clamp bounds [{min}, {max}] are not a sub-interval of [0, 1]")]
    InvalidClampBounds { min: f64, max: f64 },

    /// A categorical weight table does not sum to 1.0.
    ///
    /// Weights are never renormalized silently: a bad sum is almost
    /// always an authoring mistake in the weight table.
    #[error("{dimension} weights must sum to 1.0 (got {sum:.6})")]
    MalformedWeights {
        dimension: &'static str,
        sum: f64,
    },

    /// Weight table is empty or contains negative/non-finite entries
    #[error("{dimension} weight table is empty or contains invalid entries")]
    InvalidWeightTable { dimension: &'static str },
}

/// A generated session violates its own invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataIntegrityError {
    /// Rating present although the session did not convert
    #[error("session {session_id}: rating present on non-converted session")]
    RatingWithoutConversion { session_id: Uuid },

    /// Converted session carries no rating
    #[error("session {session_id}: converted session is missing a rating")]
    MissingRating { session_id: Uuid },

    /// Rating escaped the declared range
    #[error("session {session_id}: rating {rating} outside [1.0, 5.0]")]
    RatingOutOfRange { session_id: Uuid, rating: f64 },
}

/// Top-level simulator error.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generated data failed a consistency check
    #[error("data integrity violation: {0}")]
    Integrity(#[from] DataIntegrityError),
}
