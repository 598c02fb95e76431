//! Energy-management algorithms: trade movement against metabolism.

use super::{BehaviorContext, foraging};
use rand::Rng;
use tankworld_data::{ParamSpec, Vec2};

pub const ENERGY_CONSERVER: &[ParamSpec] = &[ParamSpec::new("move_threshold", 0.0, 1.0, 0.5)];
pub const BURST_CRUISER: &[ParamSpec] = &[
    ParamSpec::new("burst_frames", 5.0, 60.0, 20.0),
    ParamSpec::new("rest_frames", 5.0, 120.0, 40.0),
];
pub const METABOLIC_SLEEPER: &[ParamSpec] = &[ParamSpec::new("wake_ratio", 0.1, 0.9, 0.4)];
pub const DAY_SPRINTER: &[ParamSpec] = &[ParamSpec::new("day_threshold", 0.5, 1.0, 0.75)];
pub const IDLE_DRIFTER: &[ParamSpec] = &[ParamSpec::new("nudge_chance", 0.0, 0.3, 0.05)];
pub const THRESHOLD_SWITCHER: &[ParamSpec] = &[
    ParamSpec::new("forage_below", 0.1, 0.9, 0.5),
    ParamSpec::new("rest_above", 0.2, 1.0, 0.8),
];
pub const GLIDE_COASTER: &[ParamSpec] = &[ParamSpec::new("glide_frames", 2.0, 40.0, 10.0)];
pub const TORPOR_SEEKER: &[ParamSpec] = &[ParamSpec::new("torpor_ratio", 0.05, 0.6, 0.25)];

/// Only moves for food worth the trip.
pub fn energy_conserver(ctx: &mut BehaviorContext) -> Vec2 {
    let threshold = ctx.param(ENERGY_CONSERVER, 0);
    if ctx.energy_ratio < threshold {
        foraging::food_approach(ctx)
    } else {
        Vec2::default()
    }
}

/// Alternates full-speed bursts with motionless rest on a frame cycle.
pub fn burst_cruiser(ctx: &mut BehaviorContext) -> Vec2 {
    let burst = ctx.param(BURST_CRUISER, 0).max(1.0) as u64;
    let rest = ctx.param(BURST_CRUISER, 1).max(1.0) as u64;
    let cycle = burst + rest;
    if ctx.frame % cycle < burst {
        if let Some(food) = ctx.nearest_food() {
            ctx.toward(food.pos)
        } else if ctx.vel.length_squared() > 1e-6 {
            ctx.vel.normalized()
        } else {
            ctx.random_heading()
        }
    } else {
        Vec2::default()
    }
}

/// Sleeps until hungry, then forages until comfortable again.
pub fn metabolic_sleeper(ctx: &mut BehaviorContext) -> Vec2 {
    let wake = ctx.param(METABOLIC_SLEEPER, 0);
    if ctx.energy_ratio <= wake {
        foraging::food_approach(ctx)
    } else {
        Vec2::default()
    }
}

/// Active only around midday when the activity modifier peaks.
pub fn day_sprinter(ctx: &mut BehaviorContext) -> Vec2 {
    let threshold = ctx.param(DAY_SPRINTER, 0);
    if ctx.activity >= threshold {
        foraging::food_approach(ctx)
    } else {
        Vec2::default()
    }
}

/// Barely moves; occasional random nudge keeps it from total stasis.
pub fn idle_drifter(ctx: &mut BehaviorContext) -> Vec2 {
    let chance = ctx.param(IDLE_DRIFTER, 0);
    if ctx.rng.gen_range(0.0..1.0f32) < chance {
        ctx.random_heading()
    } else {
        Vec2::default()
    }
}

/// Hysteresis switch between foraging and resting.
pub fn threshold_switcher(ctx: &mut BehaviorContext) -> Vec2 {
    let forage_below = ctx.param(THRESHOLD_SWITCHER, 0);
    let rest_above = ctx.param(THRESHOLD_SWITCHER, 1);
    if ctx.energy_ratio < forage_below {
        foraging::food_approach(ctx)
    } else if ctx.energy_ratio > rest_above {
        Vec2::default()
    } else if ctx.vel.length_squared() > 1e-6 {
        // keep doing whatever the previous frame decided
        ctx.vel.normalized() * 0.5
    } else {
        Vec2::default()
    }
}

/// One stroke, then glide on inertia for a few frames.
pub fn glide_coaster(ctx: &mut BehaviorContext) -> Vec2 {
    let glide = ctx.param(GLIDE_COASTER, 0).max(1.0) as u64;
    if ctx.frame % (glide + 1) == 0 {
        if let Some(food) = ctx.nearest_food() {
            ctx.toward(food.pos)
        } else {
            ctx.random_heading()
        }
    } else {
        Vec2::default()
    }
}

/// Near-shutdown below a deep reserve ratio; drifts to the quiet bottom.
pub fn torpor_seeker(ctx: &mut BehaviorContext) -> Vec2 {
    let torpor = ctx.param(TORPOR_SEEKER, 0);
    if ctx.energy_ratio < torpor {
        // critical-energy override handles true starvation; here just sink
        Vec2::new(0.0, 1.0) * 0.3
    } else {
        foraging::food_approach(ctx) * 0.5
    }
}
