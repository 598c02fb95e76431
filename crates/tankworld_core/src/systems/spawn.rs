//! SPAWN: plant food production, seedlings, and the automatic feeder.

use crate::engine::Phase;
use crate::genome;
use crate::lifecycle;
use crate::world::World;
use rand::Rng;
use tankworld_data::{Entity, EntityId, FoodKind, Vec2};

impl World {
    pub(crate) fn phase_spawn(&mut self, frame: u64) {
        let mut rng = Phase::Spawn.rng(self.master_seed, frame);
        let width = self.config.world.width;
        let height = self.config.world.height;

        // plants produce on their timers
        let plant_ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Plant(_)))
            .map(|(id, _)| *id)
            .collect();
        for id in plant_ids {
            let Some(Entity::Plant(mut plant)) = self.entities.remove(&id) else {
                continue;
            };
            plant.production_timer = plant.production_timer.saturating_sub(1);
            if plant.production_timer == 0 {
                plant.production_timer = lifecycle::production_interval(&plant.genome, &self.config);
                if rng.gen_range(0.0..1.0f32) < plant.genome.seedling_chance {
                    let radius = self.config.plant.seedling_radius.max(1.0);
                    let offset = Vec2::new(
                        rng.gen_range(-radius..radius),
                        rng.gen_range(-radius..radius),
                    );
                    let seedling_genome = genome::plant_offspring(&plant.genome, &mut rng, &self.config);
                    let seedling_id = self.alloc_id();
                    let seedling = lifecycle::spawn_plant(
                        seedling_id,
                        (plant.pos + offset).clamped(width, height),
                        seedling_genome,
                        &self.config,
                    );
                    self.entities.insert(seedling_id, Entity::Plant(seedling));
                } else if self.food_count < self.config.spawner.max_food {
                    let jitter = Vec2::new(rng.gen_range(-4.0..4.0f32), rng.gen_range(-4.0..4.0f32));
                    self.add_food_item(
                        plant.pos + jitter,
                        FoodKind::PlantMatter,
                        frame,
                        Phase::Spawn,
                    );
                }
            }
            self.entities.insert(id, Entity::Plant(plant));
        }

        // automatic feeder drops pellets from the surface
        let interval = self.config.spawner.auto_food_interval;
        if interval > 0 && frame % interval == 0 {
            for _ in 0..self.config.spawner.auto_food_amount {
                if self.food_count >= self.config.spawner.max_food {
                    break;
                }
                let pos = Vec2::new(rng.gen_range(0.0..width), 0.0);
                self.add_food_item(pos, FoodKind::Pellet, frame, Phase::Spawn);
            }
        }
    }
}
