//! # Tank World
//!
//! A deterministic, phase-ordered artificial-life simulation: autonomous
//! fish compete, reproduce, and play Texas Hold'em for energy inside a
//! bounded 2D arena.
//!
//! This crate is the public façade over the workspace:
//! - [`tankworld_data`] holds the pure data model (ids, vectors, genomes,
//!   entities)
//! - [`tankworld_core`] holds the engine (RNG, config, spatial index,
//!   behavior library, poker engine, systems, tracker, world)
//!
//! ## Quick start
//!
//! ```ignore
//! use tankworld::{AppConfig, World};
//!
//! let mut config = AppConfig::default();
//! config.world.initial_fish = 50;
//! let mut world = World::new(config, 42)?;
//! world.run_until(1000);
//! let snapshot = world.snapshot();
//! println!("{} fish alive", snapshot.stats.population);
//! ```

pub use tankworld_core::behavior;
pub use tankworld_core::clock;
pub use tankworld_core::command::{self, Command};
pub use tankworld_core::config::{self, AppConfig};
pub use tankworld_core::engine::Phase;
pub use tankworld_core::environment;
pub use tankworld_core::genome;
pub use tankworld_core::lifecycle;
pub use tankworld_core::poker;
pub use tankworld_core::snapshot::{EntitySnapshot, StatsSummary, WorldSnapshot};
pub use tankworld_core::tracker;
pub use tankworld_core::world::{verify_determinism, World};
pub use tankworld_core::{SimError, SimRng};

pub use tankworld_data as data;
