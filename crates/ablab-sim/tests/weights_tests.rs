//! Statistical check: sampled proportions track the declared weights.

use ablab_sim::demographics::{AgeGroup, DemographicPools, DeviceType};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

const DRAWS: usize = 100_000;
const TOLERANCE: f64 = 0.01; // +/- 1 percentage point

#[test]
fn age_group_draws_match_declared_weights() {
    let pools = DemographicPools::from_defaults().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    let mut counts: HashMap<AgeGroup, usize> = HashMap::new();
    for _ in 0..DRAWS {
        *counts.entry(pools.sample(&mut rng).age_group).or_default() += 1;
    }

    for bucket in AgeGroup::ALL {
        let observed = *counts.get(&bucket).unwrap_or(&0) as f64 / DRAWS as f64;
        let expected = bucket.weight();
        assert!(
            (observed - expected).abs() < TOLERANCE,
            "{}: observed {observed:.4}, expected {expected:.4}",
            bucket.label()
        );
    }
}

#[test]
fn device_type_draws_match_declared_weights() {
    let pools = DemographicPools::from_defaults().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5678);

    let mut counts: HashMap<DeviceType, usize> = HashMap::new();
    for _ in 0..DRAWS {
        *counts.entry(pools.sample(&mut rng).device_type).or_default() += 1;
    }

    for device in DeviceType::ALL {
        let observed = *counts.get(&device).unwrap_or(&0) as f64 / DRAWS as f64;
        let expected = device.weight();
        assert!(
            (observed - expected).abs() < TOLERANCE,
            "{}: observed {observed:.4}, expected {expected:.4}",
            device.label()
        );
    }
}
