//! Demographic dimensions and weighted categorical sampling
//!
//! Each dimension (age group, device type, country) carries a declared
//! weight table summing to 1.0. `WeightedPool::new` rejects malformed
//! tables instead of renormalizing; a bad sum is an authoring mistake.
//!
//! Sampling is independent across dimensions and across sessions; no
//! correlation between, say, age and device is modeled.

use crate::error::ConfigError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tolerance for weight-table sums.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Age bucket of the simulated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    Over55,
}

impl AgeGroup {
    /// All buckets, in declaration order.
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::From18To24,
        AgeGroup::From25To34,
        AgeGroup::From35To44,
        AgeGroup::From45To54,
        AgeGroup::Over55,
    ];

    /// Wire label, matching the output table values.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To34 => "25-34",
            AgeGroup::From35To44 => "35-44",
            AgeGroup::From45To54 => "45-54",
            AgeGroup::Over55 => "55+",
        }
    }

    /// Declared sampling weight.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            AgeGroup::From18To24 => 0.20,
            AgeGroup::From25To34 => 0.35,
            AgeGroup::From35To44 => 0.25,
            AgeGroup::From45To54 => 0.15,
            AgeGroup::Over55 => 0.05,
        }
    }

    /// Additive conversion delta: younger users convert more.
    #[must_use]
    pub fn conversion_delta(self) -> f64 {
        match self {
            AgeGroup::From18To24 => 0.03,
            AgeGroup::From25To34 => 0.015,
            AgeGroup::From35To44 => 0.0,
            AgeGroup::From45To54 => -0.015,
            AgeGroup::Over55 => -0.03,
        }
    }
}

/// Device the session originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "iPhone")]
    IPhone,
    #[serde(rename = "iPad")]
    IPad,
    #[serde(rename = "Apple Watch")]
    AppleWatch,
    #[serde(rename = "Mac")]
    Mac,
}

impl DeviceType {
    /// All device types, in declaration order.
    pub const ALL: [DeviceType; 4] = [
        DeviceType::IPhone,
        DeviceType::IPad,
        DeviceType::AppleWatch,
        DeviceType::Mac,
    ];

    /// Wire label, matching the output table values.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DeviceType::IPhone => "iPhone",
            DeviceType::IPad => "iPad",
            DeviceType::AppleWatch => "Apple Watch",
            DeviceType::Mac => "Mac",
        }
    }

    /// Declared sampling weight.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            DeviceType::IPhone => 0.60,
            DeviceType::IPad => 0.25,
            DeviceType::AppleWatch => 0.10,
            DeviceType::Mac => 0.05,
        }
    }

    /// Additive conversion delta: the platform's primary device
    /// converts best.
    #[must_use]
    pub fn conversion_delta(self) -> f64 {
        match self {
            DeviceType::IPhone => 0.02,
            DeviceType::IPad => 0.0,
            DeviceType::AppleWatch => -0.03,
            DeviceType::Mac => -0.045,
        }
    }
}

/// Countries with their sampling weights.
pub const COUNTRIES: [(&str, f64); 10] = [
    ("US", 0.40),
    ("UK", 0.15),
    ("CA", 0.10),
    ("AU", 0.08),
    ("DE", 0.07),
    ("FR", 0.06),
    ("JP", 0.05),
    ("IN", 0.04),
    ("BR", 0.03),
    ("MX", 0.02),
];

/// App genres from the original App Store dataset; sampled uniformly.
pub const APP_GENRES: [&str; 17] = [
    "Games",
    "Entertainment",
    "Education",
    "Photo & Video",
    "Music",
    "Social Networking",
    "Shopping",
    "Productivity",
    "Finance",
    "Sports",
    "Food & Drink",
    "Travel",
    "News",
    "Health & Fitness",
    "Utilities",
    "Weather",
    "Reference",
];

/// Word pools for synthesized app names.
pub(crate) const NAME_PREFIXES: [&str; 12] = [
    "Acme", "Nimbus", "Pixel", "Vertex", "Lumen", "Orbit", "Harbor", "Cedar", "Atlas", "Quill",
    "Ember", "Summit",
];

pub(crate) const NAME_SUFFIXES: [&str; 12] = [
    "Notes", "Tracker", "Studio", "Planner", "Scanner", "Journal", "Player", "Coach", "Vault",
    "Board", "Timer", "Lens",
];

/// A validated weighted categorical distribution.
#[derive(Debug, Clone)]
pub struct WeightedPool<T: Copy> {
    items: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedPool<T> {
    /// Build a pool, rejecting weight tables that are empty, contain
    /// invalid entries, or do not sum to 1.0 within tolerance.
    pub fn new(
        dimension: &'static str,
        items: Vec<T>,
        weights: &[f64],
    ) -> Result<Self, ConfigError> {
        if items.is_empty()
            || items.len() != weights.len()
            || weights.iter().any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(ConfigError::InvalidWeightTable { dimension });
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::MalformedWeights { dimension, sum });
        }
        let index = WeightedIndex::new(weights)
            .map_err(|_| ConfigError::InvalidWeightTable { dimension })?;
        Ok(Self { items, index })
    }

    /// Draw one item.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.items[self.index.sample(rng)]
    }
}

/// Demographic context drawn for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Demographics {
    pub age_group: AgeGroup,
    pub device_type: DeviceType,
    pub country: &'static str,
}

/// The three demographic pools used by the simulator.
#[derive(Debug, Clone)]
pub struct DemographicPools {
    age: WeightedPool<AgeGroup>,
    device: WeightedPool<DeviceType>,
    country: WeightedPool<&'static str>,
}

impl DemographicPools {
    /// Build pools from the declared weight tables.
    pub fn from_defaults() -> Result<Self, ConfigError> {
        let age = WeightedPool::new(
            "age_group",
            AgeGroup::ALL.to_vec(),
            &AgeGroup::ALL.map(AgeGroup::weight),
        )?;
        let device = WeightedPool::new(
            "device_type",
            DeviceType::ALL.to_vec(),
            &DeviceType::ALL.map(DeviceType::weight),
        )?;
        let country = WeightedPool::new(
            "country",
            COUNTRIES.iter().map(|(c, _)| *c).collect(),
            &COUNTRIES.map(|(_, w)| w),
        )?;
        Ok(Self {
            age,
            device,
            country,
        })
    }

    /// Draw one independent demographic tuple.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Demographics {
        Demographics {
            age_group: self.age.sample(rng),
            device_type: self.device.sample(rng),
            country: self.country.sample(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn declared_weights_sum_to_one() {
        assert!(DemographicPools::from_defaults().is_ok());
    }

    #[test]
    fn unnormalized_weights_rejected() {
        let err = WeightedPool::new("age_group", vec!["a", "b"], &[0.5, 0.4]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MalformedWeights {
                dimension: "age_group",
                ..
            }
        ));
    }

    #[test]
    fn negative_weight_rejected() {
        let err = WeightedPool::new("device_type", vec!["a", "b"], &[1.5, -0.5]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeightTable { .. }));
    }

    #[test]
    fn empty_table_rejected() {
        let err = WeightedPool::<&str>::new("country", vec![], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeightTable { .. }));
    }

    #[test]
    fn pool_samples_only_declared_items() {
        let pool = WeightedPool::new("age_group", vec![1u8, 2, 3], &[0.2, 0.3, 0.5]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = pool.sample(&mut rng);
            assert!((1..=3).contains(&v));
        }
    }

    #[test]
    fn labels_match_wire_values() {
        assert_eq!(AgeGroup::Over55.label(), "55+");
        assert_eq!(DeviceType::AppleWatch.label(), "Apple Watch");
    }
}
