//! Bounded mutation helpers.

use crate::config::MutationConfig;
use crate::rng::SimRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Mutation rate and strength after epigenetic stress scaling, clamped by
/// the configured ceilings.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveRates {
    pub rate: f32,
    pub strength: f32,
}

impl EffectiveRates {
    pub fn new(config: &MutationConfig, stress: f32) -> Self {
        let scale = 1.0 + stress.clamp(0.0, 1.0) * (config.stress_max_scale - 1.0);
        Self {
            rate: (config.rate * scale).min(config.max_rate).min(config.hard_cap),
            strength: config.strength * scale,
        }
    }
}

/// Zero-mean Gaussian draw with the given sigma.
pub fn gaussian_nudge(rng: &mut SimRng, sigma: f32) -> f32 {
    if sigma <= 0.0 {
        return 0.0;
    }
    let normal = Normal::new(0.0f32, sigma).expect("sigma is positive and finite");
    normal.sample(rng)
}

/// With probability `rates.rate`, nudges `value` by
/// `N(0, strength * (max - min))`; always clips to `[min, max]`.
pub fn mutate_bounded(
    value: f32,
    min: f32,
    max: f32,
    rates: &EffectiveRates,
    rng: &mut SimRng,
) -> f32 {
    let span = max - min;
    let mutated = if span > 0.0 && rng.gen_range(0.0..1.0f32) < rates.rate {
        value + gaussian_nudge(rng, rates.strength * span)
    } else {
        value
    };
    mutated.clamp(min, max)
}

/// Shortest-arc blend of two circular values in `[0, 1)`, weighted
/// uniformly at random. Hue wraps, so plain averaging would tear the color
/// wheel at 0.
pub fn blend_circular(a: f32, b: f32, rng: &mut SimRng) -> f32 {
    let mut diff = b - a;
    if diff > 0.5 {
        diff -= 1.0;
    }
    if diff < -0.5 {
        diff += 1.0;
    }
    let w = rng.gen_range(0.0..=1.0f32);
    (a + diff * w).rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_scales_up_to_configured_max() {
        let config = MutationConfig::default();
        let calm = EffectiveRates::new(&config, 0.0);
        let stressed = EffectiveRates::new(&config, 1.0);
        assert!((calm.rate - config.rate).abs() < 1e-6);
        assert!((stressed.strength - config.strength * config.stress_max_scale).abs() < 1e-6);
        // rate is capped by max_rate even under full stress
        assert!(stressed.rate <= config.max_rate);
    }

    #[test]
    fn mutate_bounded_never_escapes() {
        let config = MutationConfig {
            rate: 1.0,
            strength: 5.0,
            max_rate: 1.0,
            hard_cap: 1.0,
            ..MutationConfig::default()
        };
        let rates = EffectiveRates::new(&config, 1.0);
        let mut rng = SimRng::from_seed(1);
        for _ in 0..1000 {
            let v = mutate_bounded(0.5, 0.3, 2.5, &rates, &mut rng);
            assert!((0.3..=2.5).contains(&v));
        }
    }

    #[test]
    fn circular_blend_takes_shortest_arc() {
        let mut rng = SimRng::from_seed(2);
        for _ in 0..100 {
            // 0.95 and 0.05 are 0.1 apart across the wrap point
            let blended = blend_circular(0.95, 0.05, &mut rng);
            assert!(
                blended >= 0.95 || blended <= 0.05 + 1e-6,
                "blend {blended} left the short arc"
            );
        }
    }
}
