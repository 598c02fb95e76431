//! Predator-avoidance algorithms.
//!
//! These return the zero vector when no threat is present; the caller's
//! inertia/random-walk fallback covers idle movement.

use super::{BehaviorContext, rotate_eighths};
use tankworld_data::{ParamSpec, Vec2};

pub const DIRECT_FLEE: &[ParamSpec] = &[ParamSpec::new("panic_range", 20.0, 300.0, 120.0)];
pub const ZIGZAG_FLEE: &[ParamSpec] = &[
    ParamSpec::new("panic_range", 20.0, 300.0, 120.0),
    ParamSpec::new("zig_period", 2.0, 30.0, 8.0),
];
pub const FREEZE_RESPONSE: &[ParamSpec] = &[
    ParamSpec::new("freeze_range", 40.0, 300.0, 150.0),
    ParamSpec::new("bolt_range", 10.0, 80.0, 40.0),
];
pub const WALL_HUGGER: &[ParamSpec] = &[ParamSpec::new("wall_margin", 5.0, 100.0, 25.0)];
pub const SCHOOL_REFUGE: &[ParamSpec] = &[ParamSpec::new("panic_range", 20.0, 300.0, 140.0)];
pub const PERPENDICULAR_ESCAPE: &[ParamSpec] =
    &[ParamSpec::new("panic_range", 20.0, 300.0, 120.0)];
pub const DANGER_MEMORY_AVOIDER: &[ParamSpec] =
    &[ParamSpec::new("avoid_radius", 20.0, 250.0, 100.0)];
pub const CORNER_CAMPER: &[ParamSpec] = &[ParamSpec::new("camp_radius", 10.0, 120.0, 40.0)];

pub fn direct_flee(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(DIRECT_FLEE, 0);
    match ctx.nearest_predator() {
        Some(p) if p.pos.distance_to(ctx.pos) <= range => ctx.away_from(p.pos),
        _ => Vec2::default(),
    }
}

/// Flees while alternating the escape heading left/right of the direct
/// line every `zig_period` frames.
pub fn zigzag_flee(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(ZIGZAG_FLEE, 0);
    let Some(p) = ctx.nearest_predator() else {
        return Vec2::default();
    };
    if p.pos.distance_to(ctx.pos) > range {
        return Vec2::default();
    }
    let away = ctx.away_from(p.pos);
    let period = ctx.param(ZIGZAG_FLEE, 1).max(1.0) as u64;
    let eighths = if (ctx.frame / period) % 2 == 0 { 1 } else { 7 };
    rotate_eighths(away, eighths)
}

/// Holds still while watched, bolts when the predator closes in.
pub fn freeze_response(ctx: &mut BehaviorContext) -> Vec2 {
    let freeze = ctx.param(FREEZE_RESPONSE, 0);
    let bolt = ctx.param(FREEZE_RESPONSE, 1);
    let Some(p) = ctx.nearest_predator() else {
        return Vec2::default();
    };
    let dist = p.pos.distance_to(ctx.pos);
    if dist <= bolt {
        ctx.away_from(p.pos)
    } else if dist <= freeze {
        // cancel current drift by steering against it
        -ctx.vel.normalized()
    } else {
        Vec2::default()
    }
}

/// Stays close to the nearest wall where open-water predators do not press.
pub fn wall_hugger(ctx: &mut BehaviorContext) -> Vec2 {
    let margin = ctx.param(WALL_HUGGER, 0);
    let (w, h) = ctx.arena;
    let to_left = ctx.pos.x;
    let to_right = w - ctx.pos.x;
    let to_top = ctx.pos.y;
    let to_bottom = h - ctx.pos.y;
    let min_dist = to_left.min(to_right).min(to_top).min(to_bottom);
    if min_dist <= margin {
        // already hugging; slide along the wall away from any predator
        if let Some(p) = ctx.nearest_predator() {
            let away = ctx.away_from(p.pos);
            return if to_left == min_dist || to_right == min_dist {
                Vec2::new(0.0, away.y).normalized()
            } else {
                Vec2::new(away.x, 0.0).normalized()
            };
        }
        return Vec2::default();
    }
    if to_left == min_dist {
        Vec2::new(-1.0, 0.0)
    } else if to_right == min_dist {
        Vec2::new(1.0, 0.0)
    } else if to_top == min_dist {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::new(0.0, 1.0)
    }
}

/// Runs for the densest visible group of fish when threatened.
pub fn school_refuge(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(SCHOOL_REFUGE, 0);
    let Some(p) = ctx.nearest_predator() else {
        return Vec2::default();
    };
    if p.pos.distance_to(ctx.pos) > range {
        return Vec2::default();
    }
    if ctx.fish.is_empty() {
        return ctx.away_from(p.pos);
    }
    let mut center = Vec2::default();
    for f in ctx.fish {
        center += f.pos;
    }
    center = center * (1.0 / ctx.fish.len() as f32);
    ctx.toward(center)
}

/// Escapes at right angles to the predator's approach vector.
pub fn perpendicular_escape(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(PERPENDICULAR_ESCAPE, 0);
    let Some(p) = ctx.nearest_predator() else {
        return Vec2::default();
    };
    if p.pos.distance_to(ctx.pos) > range {
        return Vec2::default();
    }
    let approach = if p.vel.length_squared() > 1e-6 {
        p.vel.normalized()
    } else {
        (ctx.pos - p.pos).normalized()
    };
    let side = approach.perpendicular();
    // pick the side pointing away from the predator
    if side.dot(ctx.pos - p.pos) >= 0.0 {
        side
    } else {
        -side
    }
}

/// Steers away from remembered danger sites even when nothing is visible.
pub fn danger_memory_avoider(ctx: &mut BehaviorContext) -> Vec2 {
    if let Some(p) = ctx.nearest_predator() {
        return ctx.away_from(p.pos);
    }
    let radius = ctx.param(DANGER_MEMORY_AVOIDER, 0);
    match ctx.memory.latest_danger() {
        Some(site) if site.pos.distance_to(ctx.pos) <= radius => ctx.away_from(site.pos),
        _ => Vec2::default(),
    }
}

/// Retreats to the arena corner farthest from the nearest predator.
pub fn corner_camper(ctx: &mut BehaviorContext) -> Vec2 {
    let radius = ctx.param(CORNER_CAMPER, 0);
    let (w, h) = ctx.arena;
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(w, 0.0),
        Vec2::new(0.0, h),
        Vec2::new(w, h),
    ];
    let target = match ctx.nearest_predator() {
        Some(p) => corners
            .iter()
            .copied()
            .max_by_key(|c| c.distance_squared_to(p.pos).to_bits())
            .unwrap_or(corners[0]),
        None => corners
            .iter()
            .copied()
            .min_by_key(|c| c.distance_squared_to(ctx.pos).to_bits())
            .unwrap_or(corners[0]),
    };
    if target.distance_to(ctx.pos) <= radius {
        Vec2::default()
    } else {
        ctx.toward(target)
    }
}
