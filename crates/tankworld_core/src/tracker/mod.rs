//! Ecosystem statistics tracker.
//!
//! Every update is O(1): systems post events and deltas as they happen and
//! the tracker folds them into flat per-algorithm, per-generation, and
//! per-cause counters. Derived reports live in [`reports`].

pub mod events;
pub mod ledger;
pub mod reports;

use crate::engine::Phase;
use crate::poker::PokerOutcome;
use events::{EventLog, SimEvent};
use ledger::EnergyLedger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tankworld_data::{AlgorithmId, DeathCause, EntityId, Fish};

/// Frames an algorithm must be absent before it counts as extinct.
pub const EXTINCTION_FRAMES: u64 = 1000;

/// Death counters split by cause.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeathCounts {
    pub starvation: u64,
    pub old_age: u64,
    pub predation: u64,
    pub poker_loss: u64,
    pub unknown: u64,
}

impl DeathCounts {
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::Starvation => self.starvation += 1,
            DeathCause::OldAge => self.old_age += 1,
            DeathCause::Predation => self.predation += 1,
            DeathCause::PokerLoss => self.poker_loss += 1,
            DeathCause::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.starvation + self.old_age + self.predation + self.poker_loss + self.unknown
    }
}

/// Flat per-algorithm performance counters.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AlgorithmStats {
    pub births: u64,
    pub deaths_by_cause: DeathCounts,
    pub current_population: u64,
    pub lifespan_sum: u64,
    pub food_eaten: u64,
    pub poker_wins: u64,
    pub poker_losses: u64,
    pub net_energy_from_poker: f64,
}

impl AlgorithmStats {
    pub fn avg_lifespan(&self) -> f64 {
        let deaths = self.deaths_by_cause.total();
        if deaths == 0 {
            0.0
        } else {
            self.lifespan_sum as f64 / deaths as f64
        }
    }

    /// Offspring produced per recorded death; a crude reproduction-rate
    /// proxy that is stable for top-k ranking.
    pub fn reproduction_rate(&self) -> f64 {
        let deaths = self.deaths_by_cause.total().max(1);
        self.births as f64 / deaths as f64
    }

    pub fn survival_rate(&self) -> f64 {
        let total = self.births.max(1);
        self.current_population as f64 / total as f64
    }
}

/// Per-generation aggregates; trait sums are taken at birth.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GenerationStats {
    pub births: u64,
    pub deaths: u64,
    pub age_at_death_sum: u64,
    pub speed_sum: f64,
    pub max_energy_sum: f64,
}

impl GenerationStats {
    pub fn avg_age_at_death(&self) -> f64 {
        if self.deaths == 0 {
            0.0
        } else {
            self.age_at_death_sum as f64 / self.deaths as f64
        }
    }

    pub fn avg_speed(&self) -> f64 {
        if self.births == 0 {
            0.0
        } else {
            self.speed_sum / self.births as f64
        }
    }

    pub fn avg_max_energy(&self) -> f64 {
        if self.births == 0 {
            0.0
        } else {
            self.max_energy_sum / self.births as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ExtinctionState {
    ever_alive: bool,
    last_alive_frame: u64,
    extinct_at: Option<u64>,
}

/// One parent->child edge for phylogenetic export.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineageEdge {
    pub parents: (EntityId, EntityId),
    pub child: EntityId,
    pub frame: u64,
}

/// The incrementally-maintained ecosystem tracker.
#[derive(Debug, Clone, Default)]
pub struct EcosystemTracker {
    pub algorithms: BTreeMap<AlgorithmId, AlgorithmStats>,
    pub generations: BTreeMap<u32, GenerationStats>,
    pub death_causes: DeathCounts,
    pub ledger: EnergyLedger,
    pub lineage: Vec<LineageEdge>,
    pub event_log: EventLog,
    events_this_tick: Vec<SimEvent>,
    extinction: BTreeMap<AlgorithmId, ExtinctionState>,
    pub total_births: u64,
    pub total_deaths: u64,
    /// Energy removed from the system by the poker house cut.
    pub house_cut_total: f64,
}

impl EcosystemTracker {
    /// Called at FRAME_START: the per-tick event window resets.
    pub fn begin_tick(&mut self) {
        self.events_this_tick.clear();
    }

    pub fn record_event(&mut self, event: SimEvent) {
        self.events_this_tick.push(event.clone());
        self.event_log.push(event);
    }

    /// Events recorded since the current tick began.
    pub fn tick_events(&self) -> &[SimEvent] {
        &self.events_this_tick
    }

    /// Registers a fish entering the world (stocked, injected, or born).
    pub fn record_entry(&mut self, fish: &Fish) {
        let stats = self.algorithms.entry(fish.genome.behavior.algorithm).or_default();
        stats.births += 1;
        stats.current_population += 1;
        self.total_births += 1;
        let generation = self.generations.entry(fish.generation).or_default();
        generation.births += 1;
        generation.speed_sum += fish.genome.physical.speed as f64;
        generation.max_energy_sum += fish.genome.physical.max_energy as f64;
    }

    /// Registers a birth (entry plus lineage edge and event).
    pub fn record_birth(&mut self, fish: &Fish, frame: u64, phase: Phase) {
        self.record_entry(fish);
        if let Some(parents) = fish.parent_ids {
            self.lineage.push(LineageEdge {
                parents,
                child: fish.id,
                frame,
            });
            self.record_event(SimEvent::Birth {
                id: fish.id,
                parents,
                generation: fish.generation,
                algorithm: fish.genome.behavior.algorithm,
                frame,
                phase,
            });
        }
    }

    pub fn record_death(&mut self, fish: &Fish, cause: DeathCause, frame: u64, phase: Phase) {
        let algorithm = fish.genome.behavior.algorithm;
        let stats = self.algorithms.entry(algorithm).or_default();
        stats.deaths_by_cause.record(cause);
        stats.current_population = stats.current_population.saturating_sub(1);
        stats.lifespan_sum += fish.age;
        self.death_causes.record(cause);
        self.total_deaths += 1;
        let generation = self.generations.entry(fish.generation).or_default();
        generation.deaths += 1;
        generation.age_at_death_sum += fish.age;
        if fish.energy > 0.0 {
            self.ledger
                .record_burn(ledger::EnergySink::DeathLoss, fish.energy);
        }
        self.record_event(SimEvent::Death {
            id: fish.id,
            cause,
            age: fish.age,
            generation: fish.generation,
            algorithm,
            frame,
            phase,
        });
    }

    pub fn record_food_eaten(&mut self, algorithm: AlgorithmId, amount: f32) {
        self.algorithms.entry(algorithm).or_default().food_eaten += 1;
        self.ledger.record_gain(ledger::EnergySource::Food, amount);
    }

    /// Folds a settled poker game into per-algorithm counters and the
    /// energy ledger. `applied_deltas` are the energy changes actually
    /// written to the fish (the raw winner delta is clamped by its energy
    /// cap); the ledger follows what really moved.
    pub fn record_poker(
        &mut self,
        outcome: &PokerOutcome,
        applied_deltas: &[(EntityId, f32)],
        styles: &[(EntityId, AlgorithmId)],
        frame: u64,
        phase: Phase,
    ) {
        for (id, delta) in applied_deltas {
            let Some((_, algorithm)) = styles.iter().find(|(sid, _)| sid == id) else {
                continue;
            };
            let stats = self.algorithms.entry(*algorithm).or_default();
            stats.net_energy_from_poker += *delta as f64;
            if *id == outcome.winner {
                stats.poker_wins += 1;
            } else if *delta < 0.0 {
                stats.poker_losses += 1;
            }
            if *delta > 0.0 {
                self.ledger
                    .record_gain(ledger::EnergySource::PokerTransfer, *delta);
            } else {
                self.ledger
                    .record_burn(ledger::EnergySink::PokerTransfer, -*delta);
            }
        }
        self.house_cut_total += outcome.house_cut as f64;
        self.record_event(SimEvent::Poker {
            outcome: outcome.clone(),
            frame,
            phase,
        });
    }

    pub fn is_extinct(&self, algorithm: AlgorithmId) -> bool {
        self.extinction
            .get(&algorithm)
            .is_some_and(|s| s.extinct_at.is_some())
    }

    pub fn extinctions(&self) -> Vec<(AlgorithmId, u64)> {
        self.extinction
            .iter()
            .filter_map(|(a, s)| s.extinct_at.map(|f| (*a, f)))
            .collect()
    }

    /// FRAME_END commit: refresh extinction clocks from current
    /// populations and emit extinction events exactly once.
    pub fn commit(&mut self, frame: u64) {
        let mut newly_extinct = Vec::new();
        for (&algorithm, stats) in &self.algorithms {
            let state = self.extinction.entry(algorithm).or_default();
            if stats.current_population > 0 {
                state.ever_alive = true;
                state.last_alive_frame = frame;
            } else if state.ever_alive
                && state.extinct_at.is_none()
                && frame.saturating_sub(state.last_alive_frame) > EXTINCTION_FRAMES
            {
                state.extinct_at = Some(frame);
                newly_extinct.push(algorithm);
            }
        }
        for algorithm in newly_extinct {
            self.record_event(SimEvent::Extinction {
                algorithm,
                frame,
                phase: Phase::FrameEnd,
            });
        }
    }

    pub fn living_population(&self) -> u64 {
        self.algorithms.values().map(|s| s.current_population).sum()
    }
}
