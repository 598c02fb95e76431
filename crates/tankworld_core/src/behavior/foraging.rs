//! Food-seeking algorithms.

use super::{BehaviorContext, rotate_eighths};
use rand::Rng;
use tankworld_data::{ParamSpec, Vec2};

pub const NEAREST_FOOD: &[ParamSpec] = &[ParamSpec::new("give_up_range", 20.0, 400.0, 250.0)];
pub const RICHEST_PATCH: &[ParamSpec] = &[ParamSpec::new("patch_radius", 20.0, 150.0, 60.0)];
pub const ENERGY_WEIGHTED: &[ParamSpec] = &[ParamSpec::new("distance_penalty", 0.1, 4.0, 1.0)];
pub const MEMORY_FORAGER: &[ParamSpec] = &[ParamSpec::new("memory_trust", 0.0, 1.0, 0.7)];
pub const SPIRAL_SEARCH: &[ParamSpec] = &[ParamSpec::new("turn_period", 5.0, 60.0, 20.0)];
pub const DRIFT_FORAGER: &[ParamSpec] = &[ParamSpec::new("drift_bias", 0.0, 1.0, 0.5)];
pub const OPPORTUNIST: &[ParamSpec] = &[ParamSpec::new("strike_range", 10.0, 120.0, 50.0)];
pub const PLANKTON_SKIMMER: &[ParamSpec] = &[
    ParamSpec::new("surface_band", 10.0, 200.0, 80.0),
    ParamSpec::new("sweep_period", 10.0, 120.0, 40.0),
];

/// Shared food-approach move: nearest visible food, else remembered food,
/// else hold. Used by the critical-energy override and the composable
/// algorithm as well as by `NearestFood`.
pub fn food_approach(ctx: &mut BehaviorContext) -> Vec2 {
    if let Some(food) = ctx.nearest_food() {
        return ctx.toward(food.pos);
    }
    if let Some(remembered) = ctx.memory.latest_food() {
        return ctx.toward(remembered.pos);
    }
    Vec2::default()
}

pub fn nearest_food(ctx: &mut BehaviorContext) -> Vec2 {
    let give_up = ctx.param(NEAREST_FOOD, 0);
    match ctx.nearest_food() {
        Some(food) if food.pos.distance_to(ctx.pos) <= give_up => ctx.toward(food.pos),
        _ => Vec2::default(),
    }
}

/// Moves toward the visible food item with the most neighbors within
/// `patch_radius`, favoring dense patches over stragglers.
pub fn richest_patch(ctx: &mut BehaviorContext) -> Vec2 {
    let radius = ctx.param(RICHEST_PATCH, 0);
    let best = ctx.food.iter().max_by_key(|candidate| {
        let count = ctx
            .food
            .iter()
            .filter(|other| other.pos.distance_to(candidate.pos) <= radius)
            .count();
        (count, std::cmp::Reverse(candidate.id))
    });
    match best {
        Some(food) => ctx.toward(food.pos),
        None => Vec2::default(),
    }
}

/// Scores each item by `energy / distance^penalty`-shaped tradeoff.
pub fn energy_weighted(ctx: &mut BehaviorContext) -> Vec2 {
    let penalty = ctx.param(ENERGY_WEIGHTED, 0);
    let best = ctx.food.iter().max_by(|a, b| {
        let score = |f: &super::FoodView| f.energy / (1.0 + f.pos.distance_to(ctx.pos) * penalty);
        score(a)
            .partial_cmp(&score(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.id.cmp(&a.id))
    });
    match best {
        Some(food) => ctx.toward(food.pos),
        None => Vec2::default(),
    }
}

/// Trusts remembered sightings over current vision part of the time.
pub fn memory_forager(ctx: &mut BehaviorContext) -> Vec2 {
    let trust = ctx.param(MEMORY_FORAGER, 0);
    if let Some(remembered) = ctx.memory.latest_food() {
        if ctx.rng.gen_range(0.0..1.0f32) < trust {
            return ctx.toward(remembered.pos);
        }
    }
    food_approach(ctx)
}

/// Outward spiral while nothing is visible: hold heading, turning one
/// eighth every `turn_period` frames.
pub fn spiral_search(ctx: &mut BehaviorContext) -> Vec2 {
    if let Some(food) = ctx.nearest_food() {
        return ctx.toward(food.pos);
    }
    let period = ctx.param(SPIRAL_SEARCH, 0).max(1.0) as u64;
    let eighths = ((ctx.frame / period) % 8) as u8;
    let base = if ctx.vel.length_squared() > 1e-6 {
        ctx.vel.normalized()
    } else {
        Vec2::new(1.0, 0.0)
    };
    rotate_eighths(base, eighths)
}

/// Mostly drifts with current heading, biased toward food when visible.
pub fn drift_forager(ctx: &mut BehaviorContext) -> Vec2 {
    let bias = ctx.param(DRIFT_FORAGER, 0);
    let drift = if ctx.vel.length_squared() > 1e-6 {
        ctx.vel.normalized()
    } else {
        Vec2::default()
    };
    match ctx.nearest_food() {
        Some(food) => (drift * (1.0 - bias) + ctx.toward(food.pos) * bias).normalized(),
        None => drift,
    }
}

/// Only commits when food is close; otherwise conserves position.
pub fn opportunist(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(OPPORTUNIST, 0);
    match ctx.nearest_food() {
        Some(food) if food.pos.distance_to(ctx.pos) <= range => ctx.toward(food.pos),
        _ => Vec2::default(),
    }
}

/// Sweeps back and forth inside the top band of the arena, where pellets
/// enter.
pub fn plankton_skimmer(ctx: &mut BehaviorContext) -> Vec2 {
    if let Some(food) = ctx.nearest_food() {
        return ctx.toward(food.pos);
    }
    let band = ctx.param(PLANKTON_SKIMMER, 0);
    if ctx.pos.y > band {
        return Vec2::new(0.0, -1.0);
    }
    let period = ctx.param(PLANKTON_SKIMMER, 1).max(1.0) as u64;
    if (ctx.frame / period) % 2 == 0 {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(-1.0, 0.0)
    }
}
