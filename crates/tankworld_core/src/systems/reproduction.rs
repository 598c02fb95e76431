//! REPRODUCTION: mate finding and offspring creation.
//!
//! Newborns enqueue into `pending_births` and become visible at FRAME_END.
//! The initiating fish is the mother: she pays the mating cost plus the
//! birth transfer, and the newborn appears at her position.

use crate::engine::Phase;
use crate::genome;
use crate::lifecycle;
use crate::rng::SimRng;
use crate::tracker::events::SimEvent;
use crate::tracker::ledger::{EnergySink, EnergySource};
use crate::world::World;
use rand::Rng;
use tankworld_data::{Entity, EntityId, EntityKind, Fish};

impl World {
    pub(crate) fn phase_reproduction(&mut self, frame: u64) {
        let mut rng = Phase::Reproduction.rng(self.master_seed, frame);
        let radius = self.config.reproduction.mating_radius;
        let ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Fish(_)))
            .map(|(id, _)| *id)
            .collect();

        for id in ids {
            let Some(Entity::Fish(fish)) = self.entities.get(&id) else {
                continue;
            };
            if !self.mating_ready(fish) || self.is_marked_dead(id) {
                continue;
            }
            // fertility gates the attempt, not the success
            let chance = (fish.genome.physical.fertility * 0.5).min(1.0);
            if rng.gen_range(0.0..1.0f32) >= chance {
                continue;
            }
            let pos = self.grid.position_of(id).unwrap_or(fish.pos);
            let mate = self
                .grid
                .neighbors(pos, radius, Some(EntityKind::Fish))
                .into_iter()
                .filter(|other| {
                    *other != id
                        && !self.is_marked_dead(*other)
                        && matches!(
                            self.entities.get(other),
                            Some(Entity::Fish(f)) if self.mating_ready(f)
                        )
                })
                .min_by_key(|other| {
                    let other_pos = self.grid.position_of(*other).unwrap_or(pos);
                    (other_pos.distance_squared_to(pos).to_bits(), *other)
                });
            if let Some(father) = mate {
                self.try_mate(id, father, frame, Phase::Reproduction, &mut rng);
            }
        }
    }

    pub(crate) fn mating_ready(&self, fish: &Fish) -> bool {
        let cost = self.config.energy.mating_cost + self.config.energy.birth_transfer;
        fish.life_stage.can_mate()
            && fish.mating_cooldown == 0
            && fish.energy >= self.config.reproduction.threshold.max(cost)
    }

    /// Attempts one mating. Both participants must be alive and ready; the
    /// mother pays `mating_cost + birth_transfer`, both enter cooldown, and
    /// the newborn (carrying the transfer) is enqueued for FRAME_END.
    pub(crate) fn try_mate(
        &mut self,
        mother_id: EntityId,
        father_id: EntityId,
        frame: u64,
        phase: Phase,
        rng: &mut SimRng,
    ) -> bool {
        if self.is_marked_dead(mother_id) || self.is_marked_dead(father_id) {
            return false;
        }
        let (mother_genome, mother_pos, mother_generation) = match self.entities.get(&mother_id) {
            Some(Entity::Fish(f)) if self.mating_ready(f) => {
                (f.genome.clone(), f.pos, f.generation)
            }
            _ => return false,
        };
        let (father_genome, father_generation) = match self.entities.get(&father_id) {
            Some(Entity::Fish(f)) if self.mating_ready(f) => (f.genome.clone(), f.generation),
            _ => return false,
        };

        if self.fish_count + self.pending_births.len() >= self.config.world.max_population {
            self.tracker.record_event(SimEvent::CapacityReached {
                population: self.fish_count,
                frame,
                phase,
            });
            return false;
        }

        let stress = self.population_stress();
        let mut child_genome =
            genome::from_parents(&mother_genome, &father_genome, rng, &self.config, stress);
        // an extinct algorithm stays extinct: fall back to the maternal line
        if self.tracker.is_extinct(child_genome.behavior.algorithm) {
            child_genome.behavior.algorithm = mother_genome.behavior.algorithm;
            child_genome.behavior.params = mother_genome.behavior.params.clone();
        }

        let cost = self.config.energy.mating_cost;
        let transfer = self.config.energy.birth_transfer;
        let cooldown = self.config.reproduction.cooldown;

        if let Some(Entity::Fish(mother)) = self.entities.get_mut(&mother_id) {
            mother.energy = (mother.energy - cost - transfer).max(0.0);
            mother.mating_cooldown = cooldown;
            mother.fitness.offspring_count += 1;
        }
        if let Some(Entity::Fish(father)) = self.entities.get_mut(&father_id) {
            father.mating_cooldown = cooldown;
            father.fitness.offspring_count += 1;
        }
        self.tracker.ledger.record_burn(EnergySink::MatingCost, cost);
        self.tracker
            .ledger
            .record_burn(EnergySink::BirthTransfer, transfer);
        self.tracker
            .ledger
            .record_gain(EnergySource::BirthTransfer, transfer);

        let child_id = self.alloc_id();
        let generation = mother_generation.max(father_generation) + 1;
        let child = lifecycle::newborn(
            child_id,
            child_genome,
            mother_pos,
            transfer,
            generation,
            (mother_id, father_id),
            &self.config,
        );
        self.pending_births.push(child);
        true
    }
}
