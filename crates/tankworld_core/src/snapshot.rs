//! Read-only world snapshots for external consumers.
//!
//! Snapshots are structural copies taken at a phase boundary; hosts may
//! serialize them freely. The determinism contract is stated over the
//! serialized snapshot stream.

use crate::tracker::events::SimEvent;
use crate::tracker::reports;
use crate::world::World;
use serde::{Deserialize, Serialize};
use tankworld_data::{Entity, EntityId, EntityKind, LifeStage, Vec2};

/// Renderer-facing hints; opaque to the core.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VisualHints {
    pub color_hue: f32,
    pub size: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: u64,
    pub energy: f32,
    pub energy_ratio: f32,
    pub genome_digest: Option<String>,
    pub life_stage: Option<LifeStage>,
    pub generation: Option<u32>,
    /// Hue bucket used by renderers to tint color teams.
    pub team: Option<u8>,
    pub visual_hints: Option<VisualHints>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSummary {
    pub population: usize,
    pub food_count: usize,
    pub plant_count: usize,
    pub crab_count: usize,
    pub max_generation: u32,
    pub total_births: u64,
    pub total_deaths: u64,
    pub diversity_index: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub frame: u64,
    pub time_of_day: f32,
    pub paused: bool,
    pub entities: Vec<EntitySnapshot>,
    /// Events recorded during the last completed tick.
    pub events: Vec<SimEvent>,
    pub stats: StatsSummary,
}

impl WorldSnapshot {
    pub(crate) fn capture(world: &World) -> Self {
        let mut entities = Vec::with_capacity(world.entities.len());
        let mut stats = StatsSummary {
            total_births: world.tracker.total_births,
            total_deaths: world.tracker.total_deaths,
            diversity_index: reports::diversity_index(&world.tracker),
            ..StatsSummary::default()
        };

        for entity in world.entities.values() {
            entities.push(snapshot_entity(entity));
            match entity {
                Entity::Fish(f) => {
                    stats.population += 1;
                    stats.max_generation = stats.max_generation.max(f.generation);
                }
                Entity::Plant(_) => stats.plant_count += 1,
                Entity::Food(_) => stats.food_count += 1,
                Entity::Crab(_) => stats.crab_count += 1,
            }
        }

        Self {
            frame: world.frame,
            time_of_day: world.clock.time_of_day,
            paused: world.paused,
            entities,
            events: world.tracker.tick_events().to_vec(),
            stats,
        }
    }
}

fn snapshot_entity(entity: &Entity) -> EntitySnapshot {
    match entity {
        Entity::Fish(f) => EntitySnapshot {
            id: f.id,
            kind: EntityKind::Fish,
            pos: f.pos,
            vel: f.vel,
            age: f.age,
            energy: f.energy,
            energy_ratio: f.energy_ratio(),
            genome_digest: Some(f.genome.digest()),
            life_stage: Some(f.life_stage),
            generation: Some(f.generation),
            team: Some((f.genome.color_hue * 8.0) as u8 % 8),
            visual_hints: Some(VisualHints {
                color_hue: f.genome.color_hue,
                size: f.genome.physical.size,
            }),
        },
        Entity::Plant(p) => EntitySnapshot {
            id: p.id,
            kind: EntityKind::Plant,
            pos: p.pos,
            vel: Vec2::default(),
            age: 0,
            energy: 0.0,
            energy_ratio: 0.0,
            genome_digest: None,
            life_stage: None,
            generation: None,
            team: None,
            visual_hints: None,
        },
        Entity::Food(f) => EntitySnapshot {
            id: f.id,
            kind: EntityKind::Food,
            pos: f.pos,
            vel: f.vel,
            age: 0,
            energy: f.energy_value,
            energy_ratio: 0.0,
            genome_digest: None,
            life_stage: None,
            generation: None,
            team: None,
            visual_hints: None,
        },
        Entity::Crab(c) => EntitySnapshot {
            id: c.id,
            kind: EntityKind::Crab,
            pos: c.pos,
            vel: c.vel,
            age: 0,
            energy: 0.0,
            energy_ratio: 0.0,
            genome_digest: None,
            life_stage: None,
            generation: None,
            team: None,
            visual_hints: None,
        },
    }
}
