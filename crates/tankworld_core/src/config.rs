//! Configuration management for simulation parameters.
//!
//! All tunables live in one immutable, deeply nested [`AppConfig`] with a
//! closed set of option keys. The canonical values are the `Default` impls;
//! `from_toml` overrides them from a config file, and
//! [`AppConfig::with_overrides`] produces test/benchmark variants from
//! dotted-path assignments without mutating the canonical value.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 800.0
//! height = 600.0
//! max_population = 500
//!
//! [mutation]
//! rate = 0.08
//! strength = 0.15
//! ```

use serde::{Deserialize, Serialize};

/// World-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub tick_rate: u32,
    /// Carrying capacity: hard cap on live fish, enforced in SPAWN.
    pub max_population: usize,
    /// Stocked adult fish created at construction.
    pub initial_fish: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tick_rate: 30,
            max_population: 500,
            initial_fish: 0,
        }
    }
}

/// Day/night clock configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    /// Frames per full day/night cycle.
    pub day_length: u64,
    /// Activity modifier floor reached at midnight; 1.0 at noon.
    pub night_activity: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            day_length: 1800,
            night_activity: 0.5,
        }
    }
}

/// Locomotion and contact geometry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Units per frame at speed gene 1.0.
    pub base_speed: f32,
    /// Vision radius in units at vision gene 1.0.
    pub base_vision: f32,
    /// Velocity carried over between frames, `[0, 1)`.
    pub inertia: f32,
    pub food_pickup_radius: f32,
    pub crab_kill_radius: f32,
    pub poker_contact_radius: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            base_vision: 100.0,
            inertia: 0.6,
            food_pickup_radius: 5.0,
            crab_kill_radius: 8.0,
            poker_contact_radius: 8.0,
        }
    }
}

/// Energy constants in energy units per frame unless stated otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnergyConfig {
    /// Burn per frame at metabolism gene 1.0 and size gene 1.0.
    pub base_metabolism: f32,
    /// Additional burn per unit of speed actually moved.
    pub movement_cost: f32,
    /// Energy carried by one standard food item.
    pub food_energy: f32,
    /// Starting energy of injected fish.
    pub initial_fish_energy: f32,
    /// Energy cap at max-energy gene 1.0.
    pub base_max_energy: f32,
    /// Burned by each parent on mating.
    pub mating_cost: f32,
    /// Energy transferred from mother to newborn.
    pub birth_transfer: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            base_metabolism: 0.5,
            movement_cost: 0.1,
            food_energy: 25.0,
            initial_fish_energy: 50.0,
            base_max_energy: 100.0,
            mating_cost: 10.0,
            birth_transfer: 25.0,
        }
    }
}

/// Age thresholds and lifespan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Ages at which Baby -> Juvenile -> Adult -> Elder transitions happen.
    pub stage_thresholds: (u64, u64, u64),
    pub max_age: u64,
    /// Bounded FIFO capacity of fish memory.
    pub memory_capacity: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            stage_thresholds: (100, 500, 2000),
            max_age: 6000,
            memory_capacity: 8,
        }
    }
}

/// Mate finding and offspring creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReproductionConfig {
    /// Minimum energy before a fish looks for a mate.
    pub threshold: f32,
    pub mating_radius: f32,
    /// Frames both parents wait before mating again.
    pub cooldown: u32,
    /// Allow emergency mating straight after a poker game.
    pub post_poker_mating: bool,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            mating_radius: 40.0,
            cooldown: 120,
            post_poker_mating: true,
        }
    }
}

/// How a physical trait is combined from two parents.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InheritanceMode {
    Averaging,
    #[default]
    Recombination,
    DominantRecessive,
}

/// Mutation machinery. Source material disagrees on the ceiling constant,
/// so all three candidates are exposed and validated against each other.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MutationConfig {
    /// Per-gene mutation probability.
    pub rate: f32,
    /// Gaussian sigma as a fraction of each gene's declared span.
    pub strength: f32,
    /// Ceiling applied to the rate after epigenetic stress scaling.
    pub max_rate: f32,
    /// Absolute ceiling; a configured rate above this fails validation.
    pub hard_cap: f32,
    /// Probability that a child re-draws its algorithm (and poker style)
    /// uniformly instead of inheriting.
    pub algorithm_switch_rate: f32,
    /// Maximum multiplier applied by population stress.
    pub stress_max_scale: f32,
    pub physical_mode: InheritanceMode,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            rate: 0.08,
            strength: 0.15,
            max_rate: 0.25,
            hard_cap: 0.35,
            algorithm_switch_rate: 0.08,
            stress_max_scale: 2.0,
            physical_mode: InheritanceMode::Recombination,
        }
    }
}

/// Poker table stakes and pacing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PokerConfig {
    /// Nominal buy-in per game; stakes are clamped to available energy.
    pub base_stake: f32,
    /// Fraction of the pot removed before award.
    pub house_cut: f32,
    pub small_blind_fraction: f32,
    pub big_blind_fraction: f32,
    /// Frames both players wait before sitting at a table again.
    pub cooldown: u32,
    /// Raise cap per betting round; keeps games finite.
    pub max_raises_per_round: u32,
}

impl Default for PokerConfig {
    fn default() -> Self {
        Self {
            base_stake: 20.0,
            house_cut: 0.10,
            small_blind_fraction: 0.05,
            big_blind_fraction: 0.10,
            cooldown: 90,
            max_raises_per_round: 4,
        }
    }
}

/// Plant food production.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlantConfig {
    /// Frames per produced food item at growth gene 1.0.
    pub production_rate: u32,
    /// Distance at which a seedling takes root from its parent.
    pub seedling_radius: f32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            production_rate: 120,
            seedling_radius: 30.0,
        }
    }
}

/// Predator pacing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CrabConfig {
    /// Units per frame along the patrol path.
    pub patrol_speed: f32,
    /// Frames between kills.
    pub hunt_cooldown: u32,
}

impl Default for CrabConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 0.8,
            hunt_cooldown: 60,
        }
    }
}

/// Automatic food drops.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpawnerConfig {
    /// Frames between automatic drops; 0 disables the spawner.
    pub auto_food_interval: u64,
    pub auto_food_amount: usize,
    /// Cap on live food items.
    pub max_food: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            auto_food_interval: 20,
            auto_food_amount: 1,
            max_food: 200,
        }
    }
}

/// The immutable configuration root.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub time: TimeConfig,
    pub physics: PhysicsConfig,
    pub energy: EnergyConfig,
    pub lifecycle: LifecycleConfig,
    pub reproduction: ReproductionConfig,
    pub mutation: MutationConfig,
    pub poker: PokerConfig,
    pub plant: PlantConfig,
    pub crab: CrabConfig,
    pub spawner: SpawnerConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first failure. Runs before any tick does.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0.0, "Arena width must be positive");
        anyhow::ensure!(self.world.height > 0.0, "Arena height must be positive");
        anyhow::ensure!(self.world.tick_rate > 0, "Tick rate must be positive");
        anyhow::ensure!(
            self.world.max_population > 0,
            "Carrying capacity must be positive"
        );
        anyhow::ensure!(
            self.world.initial_fish <= self.world.max_population,
            "Initial fish exceed carrying capacity"
        );

        anyhow::ensure!(self.time.day_length > 0, "Day length must be positive");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.time.night_activity),
            "Night activity must be in [0.0, 1.0]"
        );

        anyhow::ensure!(self.physics.base_speed > 0.0, "Base speed must be positive");
        anyhow::ensure!(
            self.physics.base_vision > 0.0,
            "Base vision must be positive"
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.physics.inertia),
            "Inertia must be in [0.0, 1.0)"
        );

        anyhow::ensure!(
            self.energy.base_metabolism > 0.0,
            "Base metabolism must be positive"
        );
        anyhow::ensure!(
            self.energy.movement_cost >= 0.0,
            "Movement cost must be non-negative"
        );
        anyhow::ensure!(self.energy.food_energy > 0.0, "Food energy must be positive");
        anyhow::ensure!(
            self.energy.initial_fish_energy > 0.0,
            "Initial fish energy must be positive"
        );
        anyhow::ensure!(
            self.energy.base_max_energy > 0.0,
            "Base max energy must be positive"
        );
        anyhow::ensure!(
            self.energy.mating_cost >= 0.0,
            "Mating cost must be non-negative"
        );
        anyhow::ensure!(
            self.energy.birth_transfer > 0.0,
            "Birth transfer must be positive"
        );

        let (juvenile, adult, elder) = self.lifecycle.stage_thresholds;
        anyhow::ensure!(
            juvenile < adult && adult < elder,
            "Life-stage thresholds must be strictly increasing"
        );
        anyhow::ensure!(
            self.lifecycle.max_age > elder,
            "Max age must exceed the elder threshold"
        );

        anyhow::ensure!(
            self.reproduction.threshold > 0.0,
            "Reproduction threshold must be positive"
        );
        anyhow::ensure!(
            self.reproduction.mating_radius > 0.0,
            "Mating radius must be positive"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.rate),
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.mutation.strength >= 0.0,
            "Mutation strength must be non-negative"
        );
        anyhow::ensure!(
            self.mutation.rate <= self.mutation.hard_cap,
            "Mutation rate exceeds the hard cap"
        );
        anyhow::ensure!(
            self.mutation.max_rate <= self.mutation.hard_cap,
            "Mutation max rate exceeds the hard cap"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.algorithm_switch_rate),
            "Algorithm switch rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.mutation.stress_max_scale >= 1.0,
            "Stress scale must be at least 1.0"
        );

        anyhow::ensure!(self.poker.base_stake > 0.0, "Poker stake must be positive");
        anyhow::ensure!(
            (0.0..1.0).contains(&self.poker.house_cut),
            "House cut must be in [0.0, 1.0)"
        );
        anyhow::ensure!(
            self.poker.small_blind_fraction > 0.0
                && self.poker.small_blind_fraction < self.poker.big_blind_fraction,
            "Small blind must be positive and below the big blind"
        );
        anyhow::ensure!(
            self.poker.big_blind_fraction <= 1.0,
            "Big blind fraction must not exceed 1.0"
        );
        anyhow::ensure!(
            self.poker.max_raises_per_round > 0,
            "Raise cap must be positive"
        );

        anyhow::ensure!(
            self.plant.production_rate > 0,
            "Plant production rate must be positive"
        );
        anyhow::ensure!(
            self.crab.patrol_speed > 0.0,
            "Crab patrol speed must be positive"
        );
        anyhow::ensure!(
            self.spawner.auto_food_amount > 0,
            "Auto food amount must be positive"
        );

        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Clones this config with dotted-path overrides applied, e.g.
    /// `("energy.base_metabolism", "0.25")`. Unknown paths are configuration
    /// errors: the key set is closed.
    pub fn with_overrides(&self, overrides: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut root = toml::Value::try_from(self)?;
        for (path, raw) in overrides {
            let parsed = parse_override_value(raw)
                .ok_or_else(|| anyhow::anyhow!("Unparseable override value for '{path}': {raw}"))?;
            set_dotted(&mut root, path, parsed)?;
        }
        let config: Self = root.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of every tunable, for tagging runs and snapshots.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Spatial grid cell size: half the widest possible vision radius,
    /// clamped to keep the grid useful on small arenas.
    pub fn grid_cell_size(&self) -> f32 {
        let max_vision = self.physics.base_vision * tankworld_data::GENE_MAX;
        (max_vision / 2.0).clamp(25.0, 150.0)
    }
}

fn parse_override_value(raw: &str) -> Option<toml::Value> {
    let table: toml::Table = format!("v = {raw}").parse().ok()?;
    table.get("v").cloned()
}

fn set_dotted(root: &mut toml::Value, path: &str, value: toml::Value) -> anyhow::Result<()> {
    let mut current = root;
    let segments: Vec<&str> = path.split('.').collect();
    anyhow::ensure!(!segments.is_empty(), "Empty override path");
    for segment in &segments[..segments.len() - 1] {
        current = current
            .get_mut(segment)
            .ok_or_else(|| anyhow::anyhow!("Unknown config section '{segment}' in '{path}'"))?;
    }
    let leaf = segments[segments.len() - 1];
    let table = current
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("Config path '{path}' does not name a table"))?;
    anyhow::ensure!(
        table.contains_key(leaf),
        "Unknown config key '{leaf}' in '{path}'"
    );
    table.insert(leaf.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_arena_rejected() {
        let mut config = AppConfig::default();
        config.world.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn mutation_rate_above_hard_cap_rejected() {
        let mut config = AppConfig::default();
        config.mutation.rate = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_stage_thresholds_rejected() {
        let mut config = AppConfig::default();
        config.lifecycle.stage_thresholds = (500, 100, 2000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn with_overrides_sets_leaf() {
        let config = AppConfig::default();
        let variant = config
            .with_overrides(&[("energy.base_metabolism", "0.25"), ("world.max_population", "32")])
            .unwrap();
        assert_eq!(variant.energy.base_metabolism, 0.25);
        assert_eq!(variant.world.max_population, 32);
        // canonical value untouched
        assert_eq!(config.energy.base_metabolism, 0.5);
    }

    #[test]
    fn with_overrides_rejects_unknown_key() {
        let config = AppConfig::default();
        assert!(config.with_overrides(&[("energy.warp_drive", "1.0")]).is_err());
        assert!(config.with_overrides(&[("warp.factor", "9")]).is_err());
    }

    #[test]
    fn with_overrides_validates_result() {
        let config = AppConfig::default();
        assert!(config.with_overrides(&[("mutation.rate", "0.9")]).is_err());
    }

    #[test]
    fn from_toml_round_trip() {
        let text = r#"
            [world]
            width = 400.0
            height = 300.0

            [poker]
            house_cut = 0.05
        "#;
        let config = AppConfig::from_toml(text).unwrap();
        assert_eq!(config.world.width, 400.0);
        assert_eq!(config.poker.house_cut, 0.05);
        // unspecified sections keep canonical defaults
        assert_eq!(config.energy.food_energy, 25.0);
    }

    #[test]
    fn fingerprint_consistency() {
        assert_eq!(
            AppConfig::default().fingerprint(),
            AppConfig::default().fingerprint()
        );
        let variant = AppConfig::default()
            .with_overrides(&[("poker.base_stake", "40.0")])
            .unwrap();
        assert_ne!(AppConfig::default().fingerprint(), variant.fingerprint());
    }
}
