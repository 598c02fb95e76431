//! ENTITY_ACT: sense, decide, move, metabolize, age.
//!
//! Entities act in ascending id order. Sensing reads committed positions
//! from the spatial index built in the ENVIRONMENT phase, so a fish never
//! sees a neighbor's mid-tick movement.

use crate::behavior::{self, BehaviorContext, FishView, FoodView, PredatorView};
use crate::engine::Phase;
use crate::lifecycle;
use crate::rng::SimRng;
use crate::tracker::ledger::EnergySink;
use crate::world::World;
use rand::Rng;
use tankworld_data::{Crab, Entity, EntityId, Fish, LifeStage, Vec2};

/// Hue gap below which two fish count as kin (same color team).
const KIN_HUE_GAP: f32 = 0.08;

fn stage_speed_factor(stage: LifeStage) -> f32 {
    match stage {
        LifeStage::Baby => 0.5,
        LifeStage::Juvenile => 0.8,
        LifeStage::Adult => 1.0,
        LifeStage::Elder => 0.7,
    }
}

fn hue_gap(a: f32, b: f32) -> f32 {
    let gap = (a - b).abs();
    gap.min(1.0 - gap)
}

impl World {
    pub(crate) fn phase_entity_act(&mut self, frame: u64) {
        let mut rng = Phase::EntityAct.rng(self.master_seed, frame);
        let width = self.config.world.width;
        let height = self.config.world.height;
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            let Some(entity) = self.entities.remove(&id) else {
                continue;
            };
            match entity {
                Entity::Fish(mut fish) => {
                    self.act_fish(&mut fish, frame, &mut rng);
                    self.entities.insert(id, Entity::Fish(fish));
                }
                Entity::Crab(mut crab) => {
                    self.act_crab(&mut crab);
                    self.entities.insert(id, Entity::Crab(crab));
                }
                Entity::Food(mut food) => {
                    food.pos = (food.pos + food.vel).clamped(width, height);
                    if food.pos.y >= height - 0.5 {
                        // resting on the floor
                        food.vel = Vec2::default();
                    }
                    self.entities.insert(id, Entity::Food(food));
                }
                plant @ Entity::Plant(_) => {
                    self.entities.insert(id, plant);
                }
            }
        }
    }

    fn act_fish(&mut self, fish: &mut Fish, frame: u64, rng: &mut SimRng) {
        let vision = self.config.physics.base_vision * fish.genome.physical.vision_range;
        let mut food = Vec::new();
        let mut neighbors = Vec::new();
        let mut predators = Vec::new();
        for id in self.grid.neighbors(fish.pos, vision, None) {
            if id == fish.id {
                continue;
            }
            let Some(pos) = self.grid.position_of(id) else {
                continue;
            };
            match self.entities.get(&id) {
                Some(Entity::Food(item)) => food.push(FoodView {
                    id,
                    pos,
                    energy: item.energy_value,
                }),
                Some(Entity::Fish(other)) => neighbors.push(FishView {
                    id,
                    pos,
                    vel: other.vel,
                    energy_ratio: other.energy_ratio(),
                    hue: other.genome.color_hue,
                    is_kin: hue_gap(fish.genome.color_hue, other.genome.color_hue) < KIN_HUE_GAP,
                }),
                Some(Entity::Crab(crab)) => predators.push(PredatorView {
                    id,
                    pos,
                    vel: crab.vel,
                }),
                _ => {}
            }
        }

        if let Some(nearest) = food
            .iter()
            .min_by_key(|f| (f.pos.distance_squared_to(fish.pos).to_bits(), f.id))
        {
            fish.memory.remember_food(nearest.pos, frame);
        }
        if let Some(nearest) = predators
            .iter()
            .min_by_key(|p| (p.pos.distance_squared_to(fish.pos).to_bits(), p.id))
        {
            fish.memory.remember_danger(nearest.pos, frame);
            fish.predator_last_seen = Some(frame);
        }

        let algorithm = fish.genome.behavior.algorithm;
        let direction = {
            let mut ctx = BehaviorContext {
                pos: fish.pos,
                vel: fish.vel,
                energy_ratio: fish.energy_ratio(),
                life_stage: fish.life_stage,
                aggression: fish.genome.behavior.aggression,
                social_tendency: fish.genome.behavior.social_tendency,
                food: &food,
                fish: &neighbors,
                predators: &predators,
                time_of_day: self.clock.time_of_day,
                activity: self.clock.activity,
                arena: (self.config.world.width, self.config.world.height),
                frame,
                params: &fish.genome.behavior.params,
                memory: &fish.memory,
                rng: &mut *rng,
            };
            behavior::decide(algorithm, &mut ctx)
        };

        let speed = self.config.physics.base_speed
            * fish.genome.physical.speed
            * stage_speed_factor(fish.life_stage)
            * self.clock.activity;
        let inertia = self.config.physics.inertia;
        if direction.length_squared() > 1e-6 {
            fish.vel = fish.vel * inertia + direction * speed * (1.0 - inertia);
        } else {
            // no action: inertia drift, with an occasional random-walk nudge
            fish.vel = fish.vel * inertia;
            if fish.vel.length() < 0.05 * speed && rng.gen_range(0.0..1.0f32) < 0.2 {
                let heading = behavior::heading_16(rng.gen_range(0..16u8));
                fish.vel = heading * speed * 0.5;
            }
        }
        let moved = fish.vel.length();
        fish.pos = (fish.pos + fish.vel).clamped(self.config.world.width, self.config.world.height);

        // energy: metabolism first, then movement, both clamped at zero
        let burn = lifecycle::metabolism_burn(fish, &self.config).min(fish.energy);
        fish.energy -= burn;
        self.tracker.ledger.record_burn(EnergySink::Metabolism, burn);
        let move_cost = (self.config.energy.movement_cost * moved * fish.genome.physical.size)
            .min(fish.energy);
        fish.energy -= move_cost;
        self.tracker.ledger.record_burn(EnergySink::Movement, move_cost);

        fish.age += 1;
        fish.life_stage = LifeStage::from_age(fish.age, self.config.lifecycle.stage_thresholds);
        fish.fitness.frames_survived += 1;
        fish.mating_cooldown = fish.mating_cooldown.saturating_sub(1);
        fish.poker_cooldown = fish.poker_cooldown.saturating_sub(1);
    }

    fn act_crab(&mut self, crab: &mut Crab) {
        if crab.patrol.is_empty() {
            return;
        }
        let target = crab.patrol[crab.waypoint % crab.patrol.len()];
        if crab.pos.distance_to(target) < 5.0 {
            crab.waypoint = (crab.waypoint + 1) % crab.patrol.len();
        }
        let target = crab.patrol[crab.waypoint % crab.patrol.len()];
        crab.vel = (target - crab.pos).normalized() * self.config.crab.patrol_speed;
        crab.pos = (crab.pos + crab.vel).clamped(self.config.world.width, self.config.world.height);
        crab.hunt_cooldown = crab.hunt_cooldown.saturating_sub(1);
    }
}
