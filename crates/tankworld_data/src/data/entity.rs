use super::genome::{Genome, PlantGenome};
use super::id::{EntityId, EntityKind};
use super::vector::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Discrete life stage derived from age thresholds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifeStage {
    Baby,
    Juvenile,
    Adult,
    Elder,
}

impl LifeStage {
    pub fn from_age(age: u64, thresholds: (u64, u64, u64)) -> Self {
        let (juvenile, adult, elder) = thresholds;
        if age >= elder {
            LifeStage::Elder
        } else if age >= adult {
            LifeStage::Adult
        } else if age >= juvenile {
            LifeStage::Juvenile
        } else {
            LifeStage::Baby
        }
    }

    pub fn can_mate(&self) -> bool {
        matches!(self, LifeStage::Adult | LifeStage::Elder)
    }
}

/// Why a fish left the simulation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Predation,
    PokerLoss,
    Unknown,
}

/// Tag carried by food items; opaque to movement logic, read by stats.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FoodKind {
    Pellet,
    PlantMatter,
}

/// One remembered sighting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MemoryEntry {
    pub pos: Vec2,
    pub frame: u64,
}

/// Bounded FIFO of recent food and danger sightings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FishMemory {
    pub food: VecDeque<MemoryEntry>,
    pub danger: VecDeque<MemoryEntry>,
    pub capacity: usize,
}

impl FishMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            food: VecDeque::with_capacity(capacity),
            danger: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn remember_food(&mut self, pos: Vec2, frame: u64) {
        Self::push_bounded(&mut self.food, MemoryEntry { pos, frame }, self.capacity);
    }

    pub fn remember_danger(&mut self, pos: Vec2, frame: u64) {
        Self::push_bounded(&mut self.danger, MemoryEntry { pos, frame }, self.capacity);
    }

    pub fn latest_food(&self) -> Option<MemoryEntry> {
        self.food.back().copied()
    }

    pub fn latest_danger(&self) -> Option<MemoryEntry> {
        self.danger.back().copied()
    }

    fn push_bounded(queue: &mut VecDeque<MemoryEntry>, entry: MemoryEntry, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if queue.len() == capacity {
            queue.pop_front();
        }
        queue.push_back(entry);
    }
}

/// Lifetime fitness accumulator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Fitness {
    pub food_eaten: u32,
    pub frames_survived: u64,
    pub offspring_count: u32,
}

impl Fitness {
    /// Weighted fitness score; weights follow the lifetime-score shape the
    /// tracker reports are built on.
    pub fn score(&self) -> f32 {
        self.frames_survived as f32 * 0.01
            + self.food_eaten as f32 * 2.0
            + self.offspring_count as f32 * 10.0
    }
}

/// An autonomous agent in the tank.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Fish {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub energy: f32,
    /// Effective cap: `base_max_energy * genome.physical.max_energy`.
    pub max_energy: f32,
    pub age: u64,
    pub life_stage: LifeStage,
    pub generation: u32,
    pub parent_ids: Option<(EntityId, EntityId)>,
    pub genome: Genome,
    /// Frames until this fish may mate again.
    pub mating_cooldown: u32,
    /// Frames until this fish may sit at a poker table again.
    pub poker_cooldown: u32,
    /// Frame at which a predator was last seen, if ever.
    pub predator_last_seen: Option<u64>,
    pub memory: FishMemory,
    pub fitness: Fitness,
}

impl Fish {
    pub fn energy_ratio(&self) -> f32 {
        if self.max_energy > 0.0 {
            (self.energy / self.max_energy).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A stationary food producer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Plant {
    pub id: EntityId,
    pub pos: Vec2,
    pub genome: PlantGenome,
    /// Counts down to the next food item.
    pub production_timer: u32,
}

/// A consumable energy packet. Sinks slowly; despawns when consumed or when
/// it leaves the arena.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FoodItem {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub energy_value: f32,
    pub kind: FoodKind,
}

/// A patrol predator with kill-on-contact semantics against fish.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Crab {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Patrol waypoints walked in order, wrapping around.
    pub patrol: Vec<Vec2>,
    pub waypoint: usize,
    /// Frames until the crab may kill again.
    pub hunt_cooldown: u32,
}

/// Tagged entity variant. Cross-entity references are always by `EntityId`,
/// never by holding another entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Entity {
    Fish(Fish),
    Plant(Plant),
    Food(FoodItem),
    Crab(Crab),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Fish(f) => f.id,
            Entity::Plant(p) => p.id,
            Entity::Food(f) => f.id,
            Entity::Crab(c) => c.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Fish(_) => EntityKind::Fish,
            Entity::Plant(_) => EntityKind::Plant,
            Entity::Food(_) => EntityKind::Food,
            Entity::Crab(_) => EntityKind::Crab,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Entity::Fish(f) => f.pos,
            Entity::Plant(p) => p.pos,
            Entity::Food(f) => f.pos,
            Entity::Crab(c) => c.pos,
        }
    }

    pub fn as_fish(&self) -> Option<&Fish> {
        match self {
            Entity::Fish(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_fish_mut(&mut self) -> Option<&mut Fish> {
        match self {
            Entity::Fish(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: (u64, u64, u64) = (100, 500, 2000);

    #[test]
    fn life_stage_thresholds() {
        assert_eq!(LifeStage::from_age(0, THRESHOLDS), LifeStage::Baby);
        assert_eq!(LifeStage::from_age(99, THRESHOLDS), LifeStage::Baby);
        assert_eq!(LifeStage::from_age(100, THRESHOLDS), LifeStage::Juvenile);
        assert_eq!(LifeStage::from_age(500, THRESHOLDS), LifeStage::Adult);
        assert_eq!(LifeStage::from_age(1999, THRESHOLDS), LifeStage::Adult);
        assert_eq!(LifeStage::from_age(2000, THRESHOLDS), LifeStage::Elder);
    }

    #[test]
    fn only_adults_and_elders_mate() {
        assert!(!LifeStage::Baby.can_mate());
        assert!(!LifeStage::Juvenile.can_mate());
        assert!(LifeStage::Adult.can_mate());
        assert!(LifeStage::Elder.can_mate());
    }

    #[test]
    fn memory_is_bounded_fifo() {
        let mut memory = FishMemory::new(3);
        for i in 0..5 {
            memory.remember_food(Vec2::new(i as f32, 0.0), i);
        }
        assert_eq!(memory.food.len(), 3);
        assert_eq!(memory.food.front().unwrap().frame, 2);
        assert_eq!(memory.latest_food().unwrap().frame, 4);
    }

    #[test]
    fn fitness_score_rewards_offspring_most() {
        let a = Fitness {
            food_eaten: 0,
            frames_survived: 0,
            offspring_count: 1,
        };
        let b = Fitness {
            food_eaten: 4,
            frames_survived: 100,
            offspring_count: 0,
        };
        assert!(a.score() > b.score());
    }
}
