//! Derived reports over the tracker: stable export bundle, top-k rankings,
//! trait/fitness correlations, and evolutionary rate.

use super::ledger::EnergyLedger;
use super::{AlgorithmStats, DeathCounts, EcosystemTracker, GenerationStats, LineageEdge};
use serde::{Deserialize, Serialize};
use tankworld_data::{AlgorithmId, Fish, PhysicalGenes};

/// Full tracker dump with stable field names across versions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatsBundle {
    pub algorithms: Vec<(AlgorithmId, AlgorithmStats)>,
    pub generations: Vec<(u32, GenerationStats)>,
    pub death_causes: DeathCounts,
    pub energy: EnergyLedger,
    pub extinctions: Vec<(AlgorithmId, u64)>,
    pub lineage: Vec<LineageEdge>,
    pub total_births: u64,
    pub total_deaths: u64,
    pub house_cut_total: f64,
}

impl From<&EcosystemTracker> for StatsBundle {
    fn from(tracker: &EcosystemTracker) -> Self {
        Self {
            algorithms: tracker
                .algorithms
                .iter()
                .map(|(a, s)| (*a, s.clone()))
                .collect(),
            generations: tracker
                .generations
                .iter()
                .map(|(g, s)| (*g, s.clone()))
                .collect(),
            death_causes: tracker.death_causes,
            energy: tracker.ledger.clone(),
            extinctions: tracker.extinctions(),
            lineage: tracker.lineage.clone(),
            total_births: tracker.total_births,
            total_deaths: tracker.total_deaths,
            house_cut_total: tracker.house_cut_total,
        }
    }
}

fn top_k_by<F>(tracker: &EcosystemTracker, k: usize, score: F) -> Vec<(AlgorithmId, f64)>
where
    F: Fn(&AlgorithmStats) -> f64,
{
    let mut scored: Vec<(AlgorithmId, f64)> = tracker
        .algorithms
        .iter()
        .map(|(a, s)| (*a, score(s)))
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(k);
    scored
}

pub fn top_k_by_reproduction(tracker: &EcosystemTracker, k: usize) -> Vec<(AlgorithmId, f64)> {
    top_k_by(tracker, k, AlgorithmStats::reproduction_rate)
}

pub fn top_k_by_survival(tracker: &EcosystemTracker, k: usize) -> Vec<(AlgorithmId, f64)> {
    top_k_by(tracker, k, AlgorithmStats::survival_rate)
}

pub fn top_k_by_lifespan(tracker: &EcosystemTracker, k: usize) -> Vec<(AlgorithmId, f64)> {
    top_k_by(tracker, k, AlgorithmStats::avg_lifespan)
}

/// Pearson correlation coefficient; 0 when either side is degenerate.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return 0.0;
    }
    covariance / (var_x.sqrt() * var_y.sqrt())
}

/// Correlation of each physical trait against fitness over the living
/// population.
pub fn trait_fitness_correlations(fish: &[&Fish]) -> Vec<(&'static str, f64)> {
    let fitness: Vec<f64> = fish.iter().map(|f| f.fitness.score() as f64).collect();
    PhysicalGenes::TRAIT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<f64> = fish
                .iter()
                .map(|f| f.genome.physical.as_array()[i] as f64)
                .collect();
            (*name, pearson(&values, &fitness))
        })
        .collect()
}

/// Change in trait means between consecutive generations:
/// `(generation, delta_avg_speed, delta_avg_max_energy)`.
pub fn evolutionary_rate(tracker: &EcosystemTracker) -> Vec<(u32, f64, f64)> {
    let mut out = Vec::new();
    let mut previous: Option<(u32, f64, f64)> = None;
    for (&generation, stats) in &tracker.generations {
        if stats.births == 0 {
            continue;
        }
        let speed = stats.avg_speed();
        let max_energy = stats.avg_max_energy();
        if let Some((_, prev_speed, prev_energy)) = previous {
            out.push((generation, speed - prev_speed, max_energy - prev_energy));
        }
        previous = Some((generation, speed, max_energy));
    }
    out
}

/// Shannon diversity index over per-algorithm populations, in nats.
pub fn diversity_index(tracker: &EcosystemTracker) -> f64 {
    let total = tracker.living_population();
    if total == 0 {
        return 0.0;
    }
    let mut entropy = 0.0;
    for stats in tracker.algorithms.values() {
        if stats.current_population > 0 {
            let p = stats.current_population as f64 / total as f64;
            entropy -= p * p.ln();
        }
    }
    entropy
}
