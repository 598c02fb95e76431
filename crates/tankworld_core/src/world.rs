//! World façade: construction, command queue, external API.

use crate::clock::DayClock;
use crate::command::Command;
use crate::config::AppConfig;
use crate::environment::SpatialGrid;
use crate::error::SimError;
use crate::genome;
use crate::lifecycle;
use crate::rng::SimRng;
use crate::snapshot::WorldSnapshot;
use crate::tracker::reports::StatsBundle;
use crate::tracker::EcosystemTracker;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tankworld_data::{DeathCause, Entity, EntityId, Fish, Genome, Vec2};

/// One simulation instance. Owns the entity set, the RNG seed, and the
/// tracker; nothing is shared between instances, so independent worlds may
/// run on parallel threads.
pub struct World {
    pub(crate) config: AppConfig,
    pub(crate) master_seed: u64,
    pub(crate) frame: u64,
    pub(crate) paused: bool,
    pub(crate) clock: DayClock,
    pub(crate) entities: BTreeMap<EntityId, Entity>,
    pub(crate) grid: SpatialGrid,
    pub(crate) tracker: EcosystemTracker,
    pub(crate) command_queue: Vec<Command>,
    pub(crate) next_id: u64,
    pub(crate) fish_count: usize,
    pub(crate) food_count: usize,
    pub(crate) pending_births: Vec<Fish>,
    pub(crate) pending_removals: Vec<(EntityId, DeathCause)>,
    pub(crate) poker_queue: Vec<(EntityId, EntityId)>,
    cancel: Arc<AtomicBool>,
}

impl World {
    /// Validates the config and builds a world at frame 0 with
    /// `world.initial_fish` stocked adults.
    pub fn new(config: AppConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let grid = SpatialGrid::new(
            config.grid_cell_size(),
            config.world.width,
            config.world.height,
        );
        let clock = DayClock::new(&config.time);
        let mut world = Self {
            clock,
            grid,
            config,
            master_seed: seed,
            frame: 0,
            paused: false,
            entities: BTreeMap::new(),
            tracker: EcosystemTracker::default(),
            command_queue: Vec::new(),
            next_id: 1,
            fish_count: 0,
            food_count: 0,
            pending_births: Vec::new(),
            pending_removals: Vec::new(),
            poker_queue: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        };
        world.seed_initial_population();
        Ok(world)
    }

    fn seed_initial_population(&mut self) {
        let mut rng = SimRng::from_seed(self.master_seed ^ 0x7A4E_5EED);
        for _ in 0..self.config.world.initial_fish {
            let genome = genome::random(&mut rng, &self.config);
            let pos = Vec2::new(
                rng.gen_range(0.0..self.config.world.width),
                rng.gen_range(0.0..self.config.world.height),
            );
            self.add_stocked_fish(genome, pos);
        }
    }

    pub(crate) fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts a stocked adult fish immediately (construction and
    /// FRAME_START command paths).
    pub(crate) fn add_stocked_fish(&mut self, genome: Genome, pos: Vec2) -> EntityId {
        let id = self.alloc_id();
        let pos = pos.clamped(self.config.world.width, self.config.world.height);
        let fish = lifecycle::spawn_adult(id, genome, pos, &self.config);
        self.tracker.record_entry(&fish);
        self.fish_count += 1;
        self.entities.insert(id, Entity::Fish(fish));
        id
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Live fish count.
    pub fn population(&self) -> usize {
        self.fish_count
    }

    /// Token another thread may set to stop a `run_until` loop between
    /// ticks; mid-tick cancellation is not supported.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs one full phase sequence.
    pub fn tick(&mut self) {
        self.run_tick();
    }

    /// Drives `tick` in a tight loop, checking the cancellation flag
    /// between ticks.
    pub fn run_until(&mut self, frames: u64) {
        for _ in 0..frames {
            if self.cancel.load(Ordering::Relaxed) {
                break;
            }
            self.tick();
        }
    }

    // ------------------------------------------------------------------
    // Command ingestion. All of these enqueue; effects land at FRAME_START.
    // ------------------------------------------------------------------

    pub fn enqueue(&mut self, command: Command) {
        self.command_queue.push(command);
    }

    pub fn inject_food(&mut self, pos: Vec2) {
        self.enqueue(Command::AddFood { pos: Some(pos) });
    }

    pub fn inject_fish(&mut self, genome: Option<Genome>, pos: Option<Vec2>) {
        self.enqueue(Command::SpawnFish { genome, pos });
    }

    pub fn inject_plant(&mut self, pos: Option<Vec2>) {
        self.enqueue(Command::SpawnPlant { pos });
    }

    pub fn inject_crab(&mut self, pos: Option<Vec2>) {
        self.enqueue(Command::SpawnCrab { pos });
    }

    pub fn pause(&mut self) {
        self.enqueue(Command::Pause);
    }

    pub fn resume(&mut self) {
        self.enqueue(Command::Resume);
    }

    pub fn reset(&mut self) {
        self.enqueue(Command::Reset);
    }

    /// Rebuilds the world in place: same config, same seed, frame 0.
    pub(crate) fn reset_internal(&mut self) {
        self.entities.clear();
        self.grid = SpatialGrid::new(
            self.config.grid_cell_size(),
            self.config.world.width,
            self.config.world.height,
        );
        self.tracker = EcosystemTracker::default();
        self.clock = DayClock::new(&self.config.time);
        self.frame = 0;
        self.paused = false;
        self.next_id = 1;
        self.fish_count = 0;
        self.food_count = 0;
        self.pending_births.clear();
        self.pending_removals.clear();
        self.poker_queue.clear();
        self.seed_initial_population();
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Read-only structural copy at the last phase boundary.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    /// Full tracker dump.
    pub fn export_stats(&self) -> StatsBundle {
        StatsBundle::from(&self.tracker)
    }

    /// Inserts a food item immediately and records its spawn event.
    pub(crate) fn add_food_item(
        &mut self,
        pos: Vec2,
        kind: tankworld_data::FoodKind,
        frame: u64,
        phase: crate::engine::Phase,
    ) -> EntityId {
        let id = self.alloc_id();
        let pos = pos.clamped(self.config.world.width, self.config.world.height);
        let food = lifecycle::spawn_food(id, pos, kind, &self.config);
        self.food_count += 1;
        self.tracker
            .record_event(crate::tracker::events::SimEvent::FoodSpawned {
                id,
                pos,
                kind,
                frame,
                phase,
            });
        self.entities.insert(id, Entity::Food(food));
        id
    }

    pub(crate) fn is_marked_dead(&self, id: EntityId) -> bool {
        self.pending_removals.iter().any(|(rid, _)| *rid == id)
    }

    pub(crate) fn mark_dead(&mut self, id: EntityId, cause: DeathCause) {
        if !self.is_marked_dead(id) {
            self.pending_removals.push((id, cause));
        }
    }

    /// Epigenetic stress signal: 1.0 in an empty tank, 0.0 at carrying
    /// capacity.
    pub(crate) fn population_stress(&self) -> f32 {
        let capacity = self.config.world.max_population.max(1);
        1.0 - (self.fish_count as f32 / capacity as f32).clamp(0.0, 1.0)
    }
}

/// Runs two independent instances of `(config, seed)` for `frames` ticks
/// and compares their serialized snapshot streams tick by tick.
pub fn verify_determinism(config: &AppConfig, seed: u64, frames: u64) -> Result<(), SimError> {
    let mut left = World::new(config.clone(), seed)?;
    let mut right = World::new(config.clone(), seed)?;
    for _ in 0..frames {
        left.tick();
        right.tick();
        let a = serde_json::to_string(&left.snapshot()).unwrap_or_default();
        let b = serde_json::to_string(&right.snapshot()).unwrap_or_default();
        if a != b {
            return Err(SimError::Divergence {
                frame: left.frame(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_config() {
        let mut config = AppConfig::default();
        config.world.width = -1.0;
        assert!(World::new(config, 1).is_err());
    }

    #[test]
    fn initial_fish_are_seeded() {
        let mut config = AppConfig::default();
        config.world.initial_fish = 12;
        let world = World::new(config, 42).unwrap();
        assert_eq!(world.population(), 12);
        assert_eq!(world.frame(), 0);
    }

    #[test]
    fn entity_ids_are_monotonic() {
        let mut config = AppConfig::default();
        config.world.initial_fish = 5;
        let world = World::new(config, 42).unwrap();
        let ids: Vec<u64> = world.entities.keys().map(|id| id.raw()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn quick_determinism_smoke() {
        let mut config = AppConfig::default();
        config.world.initial_fish = 20;
        assert!(verify_determinism(&config, 42, 50).is_ok());
    }

    #[test]
    fn cancellation_stops_run_until() {
        let config = AppConfig::default();
        let mut world = World::new(config, 1).unwrap();
        world.cancellation_token().store(true, Ordering::Relaxed);
        world.run_until(100);
        assert_eq!(world.frame(), 0);
    }
}
