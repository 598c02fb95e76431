//! FRAME_START: canonical command drain.

use crate::command::{self, Command};
use crate::engine::Phase;
use crate::genome;
use crate::lifecycle;
use crate::rng::SimRng;
use crate::tracker::events::SimEvent;
use crate::world::World;
use rand::Rng;
use tankworld_data::{Entity, FoodKind, PlantGenome, Vec2};

impl World {
    /// Drains queued commands in canonical order, so permutations of
    /// same-frame submissions produce identical worlds.
    pub(crate) fn phase_frame_start(&mut self, frame: u64) {
        let mut commands = std::mem::take(&mut self.command_queue);
        command::sort_canonically(&mut commands);
        let mut rng = Phase::FrameStart.rng(self.master_seed, frame);
        for command in commands {
            // re-read per command: a Reset earlier in the drain rewinds
            // the counter, and later commands stamp into the fresh run
            let stamp = self.frame + 1;
            self.apply_command(command, stamp, &mut rng);
        }
    }

    fn apply_command(&mut self, command: Command, frame: u64, rng: &mut SimRng) {
        let width = self.config.world.width;
        let height = self.config.world.height;
        match command {
            Command::AddFood { pos } => {
                if self.food_count >= self.config.spawner.max_food {
                    // domain event: invalid command ignored
                    return;
                }
                let pos = pos.unwrap_or_else(|| Vec2::new(rng.gen_range(0.0..width), 0.0));
                self.add_food_item(pos, FoodKind::Pellet, frame, Phase::FrameStart);
            }
            Command::SpawnFish { genome, pos } => {
                if self.fish_count >= self.config.world.max_population {
                    self.tracker.record_event(SimEvent::CapacityReached {
                        population: self.fish_count,
                        frame,
                        phase: Phase::FrameStart,
                    });
                    return;
                }
                let genome = genome.unwrap_or_else(|| genome::random(rng, &self.config));
                if !genome.scalars_in_bounds() || !genome::params_in_bounds(&genome) {
                    tracing::warn!("rejected SpawnFish: genome outside declared bounds");
                    self.tracker.record_event(SimEvent::CommandRejected {
                        reason: "genome outside declared bounds".to_string(),
                        frame,
                        phase: Phase::FrameStart,
                    });
                    return;
                }
                let pos = pos.unwrap_or_else(|| {
                    Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height))
                });
                self.add_stocked_fish(genome, pos);
            }
            Command::SpawnPlant { pos } => {
                let pos = pos
                    .unwrap_or_else(|| {
                        Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height))
                    })
                    .clamped(width, height);
                let id = self.alloc_id();
                let plant = lifecycle::spawn_plant(id, pos, PlantGenome::default(), &self.config);
                self.entities.insert(id, Entity::Plant(plant));
            }
            Command::SpawnCrab { pos } => {
                let pos = pos
                    .unwrap_or_else(|| {
                        Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height))
                    })
                    .clamped(width, height);
                let id = self.alloc_id();
                let crab = lifecycle::spawn_crab(id, pos, (width, height), rng);
                self.entities.insert(id, Entity::Crab(crab));
            }
            Command::Pause => self.paused = true,
            Command::Resume => self.paused = false,
            Command::Reset => self.reset_internal(),
            Command::SetConfig { overrides } => {
                let refs: Vec<(&str, &str)> = overrides
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                match self.config.with_overrides(&refs) {
                    Ok(config) => self.config = config,
                    Err(error) => {
                        tracing::warn!(%error, "rejected SetConfig");
                        self.tracker.record_event(SimEvent::CommandRejected {
                            reason: error.to_string(),
                            frame,
                            phase: Phase::FrameStart,
                        });
                    }
                }
            }
        }
    }
}
