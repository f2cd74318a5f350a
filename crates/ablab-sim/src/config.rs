//! Simulation configuration
//!
//! A run is fully described by a `SimulationConfig`. Two runs with equal
//! configs (seed and window end included) produce byte-identical output.

use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of sessions to generate
    pub num_users: u64,
    /// Length of the sampling window in days
    pub test_duration_days: u32,
    /// Random seed; `None` draws entropy (non-reproducible)
    pub seed: Option<u64>,
    /// End of the sampling window; sessions fall in the
    /// `test_duration_days` preceding this instant
    pub window_end: DateTime<Utc>,
    /// Conversion probability before any variant or demographic effect
    pub base_conversion_rate: f64,
    /// Lower clamp for the composed conversion probability
    pub min_conversion_rate: f64,
    /// Upper clamp for the composed conversion probability
    pub max_conversion_rate: f64,
}

impl SimulationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With session count
    #[inline]
    #[must_use]
    pub fn with_num_users(mut self, num_users: u64) -> Self {
        self.num_users = num_users;
        self
    }

    /// With window length in days
    #[inline]
    #[must_use]
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.test_duration_days = days;
        self
    }

    /// With explicit seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// With pinned window end (tests pin this for determinism)
    #[inline]
    #[must_use]
    pub fn with_window_end(mut self, end: DateTime<Utc>) -> Self {
        self.window_end = end;
        self
    }

    /// Fail fast on configurations that must never reach generation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_users == 0 {
            return Err(ConfigError::InvalidUserCount(self.num_users));
        }
        if self.test_duration_days == 0 {
            return Err(ConfigError::InvalidDuration(self.test_duration_days));
        }
        if !self.base_conversion_rate.is_finite()
            || self.base_conversion_rate <= 0.0
            || self.base_conversion_rate >= 1.0
        {
            return Err(ConfigError::InvalidBaseRate(self.base_conversion_rate));
        }
        let (min, max) = (self.min_conversion_rate, self.max_conversion_rate);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max > 1.0 || min >= max {
            return Err(ConfigError::InvalidClampBounds { min, max });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_users: 15_000,
            test_duration_days: 45,
            seed: None,
            window_end: Utc::now(),
            base_conversion_rate: 0.15,
            min_conversion_rate: 0.01,
            max_conversion_rate: 0.95,
        }
    }
}
