//! # Tank World Core
//!
//! The deterministic simulation engine for Tank World - a phase-ordered
//! artificial-life aquarium whose agents compete, reproduce, and play a
//! poker mini-game for energy.
//!
//! This crate contains the full engine:
//! - Seeded, splittable RNG threaded explicitly through every subsystem
//! - Spatial environment with grid-based neighbor queries
//! - Heritable genomes with crossover and bounded mutation
//! - A composable behavior library of 50 movement algorithms
//! - A complete no-limit Texas Hold'em engine with pluggable strategies
//! - Phase-ordered per-tick systems and an ecosystem tracker
//!
//! ## Determinism
//!
//! Given `(config, seed, command sequence)` two runs produce byte-identical
//! snapshot streams: phases execute in a fixed order, entities iterate in
//! ascending [`tankworld_data::EntityId`], and every randomness-consuming
//! phase draws from a child RNG derived from `(master_seed, phase, frame)`.
//! There is no global RNG and no wall-clock access anywhere in the engine.
//!
//! ## Example
//!
//! ```ignore
//! use tankworld_core::config::AppConfig;
//! use tankworld_core::world::World;
//!
//! let mut world = World::new(AppConfig::default(), 42)?;
//! world.run_until(300);
//! let snapshot = world.snapshot();
//! ```

/// Composable movement/behavior algorithm library
pub mod behavior;
/// Day/night clock and activity modifier
pub mod clock;
/// Typed commands ingested by the world façade
pub mod command;
/// Configuration management for simulation parameters
pub mod config;
/// Simulation engine: the phase-ordered tick driver
pub mod engine;
/// Bounded 2D arena with grid-based spatial queries
pub mod environment;
/// Engine error taxonomy
pub mod error;
/// Genome construction, crossover, and bounded mutation
pub mod genome;
/// Entity construction and life-stage logic
pub mod lifecycle;
/// Texas Hold'em poker engine with pluggable strategies
pub mod poker;
/// Seeded splittable RNG plumbing
pub mod rng;
/// Read-only world snapshots for external consumers
pub mod snapshot;
/// Per-phase systems operating on the entity set
pub mod systems;
/// Ecosystem statistics tracker
pub mod tracker;
/// World façade: construction, command queue, external API
pub mod world;

pub use config::AppConfig;
pub use error::SimError;
pub use rng::SimRng;
pub use snapshot::{StatsSummary, WorldSnapshot};
pub use world::World;
