//! COLLISION: fish-food consumption, fish-crab predation, and fish-fish
//! poker pairing.
//!
//! Runs as two passes: a read-only pass over committed positions that
//! collects contacts in ascending fish-id order, then an apply pass. The
//! split keeps distance checks independent of any mutation made earlier in
//! the same phase.

use crate::engine::Phase;
use crate::tracker::events::SimEvent;
use crate::world::World;
use std::collections::BTreeSet;
use tankworld_data::{DeathCause, Entity, EntityId, EntityKind};

enum Contact {
    Eat { fish: EntityId, food: EntityId },
    Kill { fish: EntityId, crab: EntityId },
    Poker { a: EntityId, b: EntityId },
}

impl World {
    pub(crate) fn phase_collision(&mut self, frame: u64) {
        let pickup = self.config.physics.food_pickup_radius;
        let kill_radius = self.config.physics.crab_kill_radius;
        let contact_radius = self.config.physics.poker_contact_radius;
        let min_buy_in = self.config.poker.base_stake * self.config.poker.big_blind_fraction;

        let mut contacts = Vec::new();
        let mut claimed_food: BTreeSet<EntityId> = BTreeSet::new();
        let mut paired: BTreeSet<EntityId> = BTreeSet::new();

        for (&id, entity) in &self.entities {
            let Entity::Fish(fish) = entity else {
                continue;
            };
            if self.is_marked_dead(id) {
                continue;
            }
            let pos = self.grid.position_of(id).unwrap_or(fish.pos);

            // food: claim the nearest unclaimed item in reach
            let food_target = self
                .grid
                .neighbors(pos, pickup, Some(EntityKind::Food))
                .into_iter()
                .filter(|fid| !claimed_food.contains(fid) && self.entities.contains_key(fid))
                .min_by_key(|fid| {
                    let food_pos = self.grid.position_of(*fid).unwrap_or(pos);
                    (food_pos.distance_squared_to(pos).to_bits(), *fid)
                });
            if let Some(food) = food_target {
                claimed_food.insert(food);
                contacts.push(Contact::Eat { fish: id, food });
            }

            // predation: the lowest-id ready crab in contact strikes
            for crab_id in self.grid.neighbors(pos, kill_radius, Some(EntityKind::Crab)) {
                if let Some(Entity::Crab(crab)) = self.entities.get(&crab_id) {
                    if crab.hunt_cooldown == 0 {
                        contacts.push(Contact::Kill {
                            fish: id,
                            crab: crab_id,
                        });
                        break;
                    }
                }
            }

            // poker: pair with the nearest eligible unpaired fish
            if fish.poker_cooldown == 0 && fish.energy >= min_buy_in && !paired.contains(&id) {
                let partner = self
                    .grid
                    .neighbors(pos, contact_radius, Some(EntityKind::Fish))
                    .into_iter()
                    .filter(|other| {
                        *other != id
                            && !paired.contains(other)
                            && !self.is_marked_dead(*other)
                            && matches!(
                                self.entities.get(other),
                                Some(Entity::Fish(f))
                                    if f.poker_cooldown == 0 && f.energy >= min_buy_in
                            )
                    })
                    .min_by_key(|other| {
                        let other_pos = self.grid.position_of(*other).unwrap_or(pos);
                        (other_pos.distance_squared_to(pos).to_bits(), *other)
                    });
                if let Some(b) = partner {
                    paired.insert(id);
                    paired.insert(b);
                    contacts.push(Contact::Poker { a: id, b });
                }
            }
        }

        for contact in contacts {
            match contact {
                Contact::Eat { fish, food } => self.apply_eat(fish, food, frame),
                Contact::Kill { fish, crab } => self.apply_kill(fish, crab),
                Contact::Poker { a, b } => {
                    if !self.is_marked_dead(a) && !self.is_marked_dead(b) {
                        self.poker_queue.push((a, b));
                    }
                }
            }
        }
    }

    fn apply_eat(&mut self, fish_id: EntityId, food_id: EntityId, frame: u64) {
        let Some(Entity::Food(item)) = self.entities.remove(&food_id) else {
            return;
        };
        self.grid.remove(food_id);
        self.food_count = self.food_count.saturating_sub(1);

        let Some(Entity::Fish(fish)) = self.entities.get_mut(&fish_id) else {
            return;
        };
        let gained = item.energy_value.min(fish.max_energy - fish.energy).max(0.0);
        fish.energy += gained;
        fish.fitness.food_eaten += 1;
        let algorithm = fish.genome.behavior.algorithm;
        self.tracker.record_food_eaten(algorithm, gained);
        self.tracker.record_event(SimEvent::FoodEaten {
            id: food_id,
            by: fish_id,
            frame,
            phase: Phase::Collision,
        });
    }

    fn apply_kill(&mut self, fish_id: EntityId, crab_id: EntityId) {
        if self.is_marked_dead(fish_id) {
            return;
        }
        let cooldown = self.config.crab.hunt_cooldown;
        let Some(Entity::Crab(crab)) = self.entities.get_mut(&crab_id) else {
            return;
        };
        if crab.hunt_cooldown > 0 {
            return;
        }
        crab.hunt_cooldown = cooldown;
        self.mark_dead(fish_id, DeathCause::Predation);
    }
}
