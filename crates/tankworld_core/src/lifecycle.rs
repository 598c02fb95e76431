//! Entity construction and life-stage logic.

use crate::config::AppConfig;
use crate::rng::SimRng;
use rand::Rng;
use tankworld_data::{
    Crab, EntityId, Fish, FishMemory, Fitness, FoodItem, FoodKind, Genome, LifeStage, Plant,
    PlantGenome, Vec2,
};

/// Food sinks slowly toward the floor.
pub const FOOD_SINK_SPEED: f32 = 0.3;

/// Creates a fish at the given age (stocked fish enter as adults; newborns
/// at age 0 come through [`newborn`]).
pub fn spawn_fish(
    id: EntityId,
    genome: Genome,
    pos: Vec2,
    energy: f32,
    age: u64,
    config: &AppConfig,
) -> Fish {
    let max_energy = config.energy.base_max_energy * genome.physical.max_energy;
    Fish {
        id,
        pos,
        vel: Vec2::default(),
        energy: energy.clamp(0.0, max_energy),
        max_energy,
        age,
        life_stage: LifeStage::from_age(age, config.lifecycle.stage_thresholds),
        generation: 0,
        parent_ids: None,
        genome,
        mating_cooldown: 0,
        poker_cooldown: 0,
        predator_last_seen: None,
        memory: FishMemory::new(config.lifecycle.memory_capacity),
        fitness: Fitness::default(),
    }
}

/// A stocked fish: injected and seeded fish enter the tank as adults.
pub fn spawn_adult(id: EntityId, genome: Genome, pos: Vec2, config: &AppConfig) -> Fish {
    let (_, adult_age, _) = config.lifecycle.stage_thresholds;
    spawn_fish(
        id,
        genome,
        pos,
        config.energy.initial_fish_energy,
        adult_age,
        config,
    )
}

/// A newborn produced by reproduction; receives the birth transfer and the
/// next generation number.
pub fn newborn(
    id: EntityId,
    genome: Genome,
    pos: Vec2,
    energy: f32,
    generation: u32,
    parents: (EntityId, EntityId),
    config: &AppConfig,
) -> Fish {
    let mut fish = spawn_fish(id, genome, pos, energy, 0, config);
    fish.generation = generation;
    fish.parent_ids = Some(parents);
    fish
}

pub fn spawn_plant(id: EntityId, pos: Vec2, genome: PlantGenome, config: &AppConfig) -> Plant {
    Plant {
        id,
        pos,
        genome,
        production_timer: production_interval(&genome, config),
    }
}

/// Frames until a plant's next food item, shortened by its growth gene.
pub fn production_interval(genome: &PlantGenome, config: &AppConfig) -> u32 {
    ((config.plant.production_rate as f32 / genome.growth_rate) as u32).max(1)
}

pub fn spawn_food(id: EntityId, pos: Vec2, kind: FoodKind, config: &AppConfig) -> FoodItem {
    FoodItem {
        id,
        pos,
        vel: Vec2::new(0.0, FOOD_SINK_SPEED),
        energy_value: config.energy.food_energy,
        kind,
    }
}

/// A crab with a rectangular patrol path around its spawn point, clamped
/// into the arena so every waypoint is reachable.
pub fn spawn_crab(id: EntityId, pos: Vec2, arena: (f32, f32), rng: &mut SimRng) -> Crab {
    let (width, height) = arena;
    let half = 60.0 + rng.gen_range(0.0..40.0f32);
    let patrol = vec![
        Vec2::new(pos.x - half, pos.y - half).clamped(width, height),
        Vec2::new(pos.x + half, pos.y - half).clamped(width, height),
        Vec2::new(pos.x + half, pos.y + half).clamped(width, height),
        Vec2::new(pos.x - half, pos.y + half).clamped(width, height),
    ];
    Crab {
        id,
        pos,
        vel: Vec2::default(),
        patrol,
        waypoint: 0,
        hunt_cooldown: 0,
    }
}

/// Per-frame metabolic burn for one fish: base rate scaled by the
/// metabolism gene and body size.
pub fn metabolism_burn(fish: &Fish, config: &AppConfig) -> f32 {
    config.energy.base_metabolism * fish.genome.physical.metabolism_rate * fish.genome.physical.size
}
