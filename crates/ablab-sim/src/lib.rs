//! ablab-sim - Synthetic A/B-test session simulator
//!
//! Generates a statistically plausible App Store A/B-testing dataset:
//! - weighted demographic sampling (age, device, country)
//! - independent variant assignment across four concurrent tests
//! - additive conversion-probability composition with clamping
//! - outcome fields (time spent, rating) conditioned on conversion
//! - per-(test, variant) summary aggregation
//!
//! # Example
//!
//! ```rust
//! use ablab_sim::{summarize, SimulationConfig, Simulator};
//!
//! # fn example() -> Result<(), ablab_sim::SimError> {
//! let config = SimulationConfig::new().with_num_users(1000).with_seed(42);
//! let run = Simulator::new(config)?.generate()?;
//! let summary = summarize(&run.sessions);
//! assert_eq!(run.sessions.len(), 1000);
//! assert!(!summary.is_empty());
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod demographics;
pub mod error;
pub mod session;
pub mod simulator;

// Re-exports for convenience
pub use aggregate::{summarize, TestSummary};
pub use catalog::{variant_rows, TestKind, VariantDef, VariantRow};
pub use config::SimulationConfig;
pub use demographics::{AgeGroup, Demographics, DeviceType, WeightedPool};
pub use error::{ConfigError, DataIntegrityError, SimError};
pub use session::{Session, VariantAssignment};
pub use simulator::{
    assign_variants, conversion_probability, derive_outcome, SimulationRun, Simulator,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
