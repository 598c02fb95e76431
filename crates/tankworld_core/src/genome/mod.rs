//! Genome construction and crossover.
//!
//! A genome is only ever built here: uniformly at random within bounds, or
//! from two parents with config-selected inheritance modes, linked-trait
//! co-variation, and bounded mutation. Both constructors end in a bounds
//! check: a gene outside its declared range is a programming error, not a
//! phenotype.

pub mod mutation;

use crate::behavior;
use crate::config::{AppConfig, InheritanceMode};
use crate::poker::strategy;
use crate::rng::SimRng;
use mutation::{gaussian_nudge, EffectiveRates};
use rand::Rng;
use tankworld_data::{
    AlgorithmId, BehaviorGenes, Genome, PhysicalGenes, PlantGenome, PokerGenes, PokerStyle,
    GENE_MAX, GENE_MIN,
};

/// Uniform random genome within every declared bound.
pub fn random(rng: &mut SimRng, _config: &AppConfig) -> Genome {
    let physical = PhysicalGenes::from_array([
        rng.gen_range(GENE_MIN..=GENE_MAX),
        rng.gen_range(GENE_MIN..=GENE_MAX),
        rng.gen_range(GENE_MIN..=GENE_MAX),
        rng.gen_range(GENE_MIN..=GENE_MAX),
        rng.gen_range(GENE_MIN..=GENE_MAX),
        rng.gen_range(GENE_MIN..=GENE_MAX),
    ]);
    let algorithm = pick_uniform(AlgorithmId::ALL, rng);
    let params = behavior::param_schema(algorithm)
        .iter()
        .map(|p| rng.gen_range(p.min..=p.max))
        .collect();
    let style = pick_uniform(PokerStyle::ALL, rng);
    let poker_params = strategy::param_schema(style)
        .iter()
        .map(|p| rng.gen_range(p.min..=p.max))
        .collect();
    let genome = Genome {
        physical,
        behavior: BehaviorGenes {
            algorithm,
            params,
            aggression: rng.gen_range(0.0..=1.0),
            social_tendency: rng.gen_range(0.0..=1.0),
        },
        poker: PokerGenes {
            style,
            params: poker_params,
        },
        color_hue: rng.gen_range(0.0..=1.0),
        stress: 0.0,
    };
    assert_in_bounds(&genome);
    genome
}

/// Crossover of two parent genomes.
///
/// `population_stress` in `[0, 1]` is the epigenetic modifier: far from
/// carrying capacity it scales mutation rate and strength up to the
/// configured maximum; the inherited component decays 50% per generation.
pub fn from_parents(
    p1: &Genome,
    p2: &Genome,
    rng: &mut SimRng,
    config: &AppConfig,
    population_stress: f32,
) -> Genome {
    let inherited_stress = 0.5 * (p1.stress + p2.stress) * 0.5;
    let stress = population_stress.clamp(0.0, 1.0).max(inherited_stress);
    let rates = EffectiveRates::new(&config.mutation, stress);

    let physical = inherit_physical(p1, p2, config.mutation.physical_mode, &rates, rng);
    let behavior = inherit_behavior(p1, p2, config, &rates, rng);
    let poker = inherit_poker(p1, p2, config, &rates, rng);

    let hue = mutation::blend_circular(p1.color_hue, p2.color_hue, rng);
    let hue = if rng.gen_range(0.0..1.0f32) < rates.rate {
        (hue + gaussian_nudge(rng, rates.strength)).rem_euclid(1.0)
    } else {
        hue
    };

    let genome = Genome {
        physical,
        behavior,
        poker,
        color_hue: hue,
        stress,
    };
    assert_in_bounds(&genome);
    genome
}

fn inherit_physical(
    p1: &Genome,
    p2: &Genome,
    mode: InheritanceMode,
    rates: &EffectiveRates,
    rng: &mut SimRng,
) -> PhysicalGenes {
    let a = p1.physical.as_array();
    let b = p2.physical.as_array();
    // speed (0) and metabolism_rate (3) are linked: one factor drives both
    let linkage = rng.gen_range(0.0..=1.0f32);
    let linked_dominant = rng.gen_range(0.0..1.0f32);

    let mut child = [0.0f32; 6];
    for (i, slot) in child.iter_mut().enumerate() {
        let linked = i == 0 || i == 3;
        *slot = match mode {
            InheritanceMode::Averaging => (a[i] + b[i]) * 0.5,
            InheritanceMode::Recombination => {
                let w = if linked {
                    linkage
                } else {
                    rng.gen_range(0.0..=1.0f32)
                };
                a[i] * w + b[i] * (1.0 - w)
            }
            InheritanceMode::DominantRecessive => {
                let roll = if linked {
                    linked_dominant
                } else {
                    rng.gen_range(0.0..1.0f32)
                };
                // the larger expression dominates three times out of four
                let (dominant, recessive) = if a[i] >= b[i] { (a[i], b[i]) } else { (b[i], a[i]) };
                if roll < 0.75 {
                    dominant
                } else {
                    recessive
                }
            }
        };
        *slot = mutation::mutate_bounded(*slot, GENE_MIN, GENE_MAX, rates, rng);
    }
    PhysicalGenes::from_array(child)
}

fn inherit_behavior(
    p1: &Genome,
    p2: &Genome,
    config: &AppConfig,
    rates: &EffectiveRates,
    rng: &mut SimRng,
) -> BehaviorGenes {
    let from_first = rng.gen_bool(0.5);
    let inherited = if from_first {
        p1.behavior.algorithm
    } else {
        p2.behavior.algorithm
    };
    let switch_rate = config
        .mutation
        .algorithm_switch_rate
        .min(config.mutation.max_rate);
    let algorithm = if rng.gen_range(0.0..1.0f32) < switch_rate {
        pick_uniform(AlgorithmId::ALL, rng)
    } else {
        inherited
    };

    let schema = behavior::param_schema(algorithm);
    let mut params: Vec<f32> = if algorithm != inherited {
        // switched: start from the new algorithm's defaults
        schema.iter().map(|p| p.default).collect()
    } else if p1.behavior.algorithm == p2.behavior.algorithm {
        // shared algorithm: blend parameter vectors
        schema
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = p1.behavior.params.get(i).copied().unwrap_or(p.default);
                let y = p2.behavior.params.get(i).copied().unwrap_or(p.default);
                (x + y) * 0.5
            })
            .collect()
    } else {
        let donor = if from_first { p1 } else { p2 };
        schema
            .iter()
            .enumerate()
            .map(|(i, p)| donor.behavior.params.get(i).copied().unwrap_or(p.default))
            .collect()
    };
    for (value, spec) in params.iter_mut().zip(schema) {
        if rng.gen_range(0.0..1.0f32) < rates.rate {
            *value += gaussian_nudge(rng, rates.strength * (spec.max - spec.min));
        }
        *value = spec.clamp(*value);
    }

    let aggression = mutation::mutate_bounded(
        (p1.behavior.aggression + p2.behavior.aggression) * 0.5,
        0.0,
        1.0,
        rates,
        rng,
    );
    let social_tendency = mutation::mutate_bounded(
        (p1.behavior.social_tendency + p2.behavior.social_tendency) * 0.5,
        0.0,
        1.0,
        rates,
        rng,
    );

    BehaviorGenes {
        algorithm,
        params,
        aggression,
        social_tendency,
    }
}

fn inherit_poker(
    p1: &Genome,
    p2: &Genome,
    config: &AppConfig,
    rates: &EffectiveRates,
    rng: &mut SimRng,
) -> PokerGenes {
    let from_first = rng.gen_bool(0.5);
    let inherited = if from_first {
        p1.poker.style
    } else {
        p2.poker.style
    };
    let switch_rate = config
        .mutation
        .algorithm_switch_rate
        .min(config.mutation.max_rate);
    let style = if rng.gen_range(0.0..1.0f32) < switch_rate {
        pick_uniform(PokerStyle::ALL, rng)
    } else {
        inherited
    };

    let schema = strategy::param_schema(style);
    let mut params: Vec<f32> = if style != inherited {
        schema.iter().map(|p| p.default).collect()
    } else if p1.poker.style == p2.poker.style {
        schema
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = p1.poker.params.get(i).copied().unwrap_or(p.default);
                let y = p2.poker.params.get(i).copied().unwrap_or(p.default);
                (x + y) * 0.5
            })
            .collect()
    } else {
        let donor = if from_first { p1 } else { p2 };
        schema
            .iter()
            .enumerate()
            .map(|(i, p)| donor.poker.params.get(i).copied().unwrap_or(p.default))
            .collect()
    };
    for (value, spec) in params.iter_mut().zip(schema) {
        if rng.gen_range(0.0..1.0f32) < rates.rate {
            *value += gaussian_nudge(rng, rates.strength * (spec.max - spec.min));
        }
        *value = spec.clamp(*value);
    }

    PokerGenes { style, params }
}

/// Seedling genome: parent values nudged within bounds.
pub fn plant_offspring(parent: &PlantGenome, rng: &mut SimRng, config: &AppConfig) -> PlantGenome {
    let rates = EffectiveRates::new(&config.mutation, 0.0);
    let (a0, a1) = PlantGenome::BRANCH_ANGLE_BOUNDS;
    let (g0, g1) = PlantGenome::GROWTH_RATE_BOUNDS;
    let (s0, s1) = PlantGenome::SEEDLING_CHANCE_BOUNDS;
    let child = PlantGenome {
        branch_angle: mutation::mutate_bounded(parent.branch_angle, a0, a1, &rates, rng),
        growth_rate: mutation::mutate_bounded(parent.growth_rate, g0, g1, &rates, rng),
        seedling_chance: mutation::mutate_bounded(parent.seedling_chance, s0, s1, &rates, rng),
    };
    debug_assert!(child.in_bounds());
    child
}

fn pick_uniform<T: Copy>(options: &'static [T], rng: &mut SimRng) -> T {
    options[rng.gen_range(0..options.len())]
}

/// Bounds are a hard invariant. `debug_assert` in normal builds; the
/// `enforce-mutation-invariants` feature promotes it to a release check.
fn assert_in_bounds(genome: &Genome) {
    #[cfg(feature = "enforce-mutation-invariants")]
    {
        assert!(genome.scalars_in_bounds(), "gene out of bounds: {genome:?}");
        assert!(params_in_bounds(genome), "parameter out of bounds");
    }
    #[cfg(not(feature = "enforce-mutation-invariants"))]
    {
        debug_assert!(genome.scalars_in_bounds(), "gene out of bounds: {genome:?}");
        debug_assert!(params_in_bounds(genome), "parameter out of bounds");
    }
}

/// Schema-aware bounds check over both parameter vectors.
pub fn params_in_bounds(genome: &Genome) -> bool {
    let behavior_ok = genome
        .behavior
        .params
        .iter()
        .zip(behavior::param_schema(genome.behavior.algorithm))
        .all(|(v, spec)| (spec.min..=spec.max).contains(v));
    let poker_ok = genome
        .poker
        .params
        .iter()
        .zip(strategy::param_schema(genome.poker.style))
        .all(|(v, spec)| (spec.min..=spec.max).contains(v));
    behavior_ok && poker_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_genomes_stay_in_bounds() {
        let config = AppConfig::default();
        let mut rng = SimRng::from_seed(42);
        for _ in 0..200 {
            let g = random(&mut rng, &config);
            assert!(g.scalars_in_bounds());
            assert!(params_in_bounds(&g));
        }
    }

    #[test]
    fn offspring_stay_in_bounds_under_stress() {
        let config = AppConfig::default();
        let mut rng = SimRng::from_seed(7);
        let p1 = random(&mut rng, &config);
        let p2 = random(&mut rng, &config);
        for i in 0..300 {
            let stress = (i % 11) as f32 / 10.0;
            let child = from_parents(&p1, &p2, &mut rng, &config, stress);
            assert!(child.scalars_in_bounds(), "iteration {i}");
            assert!(params_in_bounds(&child), "iteration {i}");
        }
    }

    #[test]
    fn averaging_mode_averages_without_mutation() {
        let mut config = AppConfig::default();
        config.mutation.rate = 0.0;
        config.mutation.physical_mode = InheritanceMode::Averaging;
        let mut rng = SimRng::from_seed(3);
        let p1 = random(&mut rng, &config);
        let p2 = random(&mut rng, &config);
        let child = from_parents(&p1, &p2, &mut rng, &config, 0.0);
        let expected = (p1.physical.speed + p2.physical.speed) * 0.5;
        assert!((child.physical.speed - expected).abs() < 1e-6);
    }

    #[test]
    fn stress_decays_across_generations() {
        let mut config = AppConfig::default();
        config.mutation.rate = 0.0;
        let mut rng = SimRng::from_seed(5);
        let p1 = random(&mut rng, &config);
        let p2 = random(&mut rng, &config);
        let stressed = from_parents(&p1, &p2, &mut rng, &config, 1.0);
        assert!((stressed.stress - 1.0).abs() < 1e-6);
        let calm_child = from_parents(&stressed, &stressed, &mut rng, &config, 0.0);
        assert!((calm_child.stress - 0.5).abs() < 1e-6);
        let calmer = from_parents(&calm_child, &calm_child, &mut rng, &config, 0.0);
        assert!((calmer.stress - 0.25).abs() < 1e-6);
    }

    #[test]
    fn shared_algorithm_blends_params() {
        let mut config = AppConfig::default();
        config.mutation.rate = 0.0;
        config.mutation.algorithm_switch_rate = 0.0;
        let mut rng = SimRng::from_seed(11);
        let mut p1 = random(&mut rng, &config);
        let mut p2 = random(&mut rng, &config);
        p1.behavior.algorithm = AlgorithmId::NearestFood;
        p2.behavior.algorithm = AlgorithmId::NearestFood;
        p1.behavior.params = vec![100.0];
        p2.behavior.params = vec![200.0];
        let child = from_parents(&p1, &p2, &mut rng, &config, 0.0);
        assert_eq!(child.behavior.algorithm, AlgorithmId::NearestFood);
        assert!((child.behavior.params[0] - 150.0).abs() < 1e-4);
    }
}
