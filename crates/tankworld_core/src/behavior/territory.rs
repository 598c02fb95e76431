//! Territory algorithms: hold, patrol, and defend a region of the arena.
//!
//! Territories are derived from stable inputs (arena geometry, the fish's
//! own id-independent anchors) rather than stored state, so the functions
//! stay pure.

use super::BehaviorContext;
use tankworld_data::{ParamSpec, Vec2};

pub const CENTER_HOLDER: &[ParamSpec] = &[ParamSpec::new("hold_radius", 10.0, 200.0, 60.0)];
pub const CORNER_CLAIMANT: &[ParamSpec] = &[
    ParamSpec::new("corner_index", 0.0, 3.99, 0.0),
    ParamSpec::new("hold_radius", 10.0, 150.0, 50.0),
];
pub const PERIMETER_PATROLLER: &[ParamSpec] = &[ParamSpec::new("margin", 10.0, 150.0, 40.0)];
pub const HOME_RANGER: &[ParamSpec] = &[
    ParamSpec::new("home_x", 0.0, 1.0, 0.5),
    ParamSpec::new("home_y", 0.0, 1.0, 0.5),
    ParamSpec::new("range", 20.0, 300.0, 100.0),
];
pub const FOOD_GUARD: &[ParamSpec] = &[ParamSpec::new("guard_radius", 10.0, 150.0, 60.0)];
pub const DRIFT_TERRITORIST: &[ParamSpec] = &[ParamSpec::new("drift_period", 60.0, 1800.0, 600.0)];
pub const SHADOW_LURKER: &[ParamSpec] = &[ParamSpec::new("depth_band", 0.5, 1.0, 0.85)];
pub const BORDER_PATROLLER: &[ParamSpec] = &[ParamSpec::new("wall_index", 0.0, 3.99, 0.0)];

pub fn center_holder(ctx: &mut BehaviorContext) -> Vec2 {
    let radius = ctx.param(CENTER_HOLDER, 0);
    let center = ctx.arena_center();
    if ctx.pos.distance_to(center) > radius {
        ctx.toward(center)
    } else {
        Vec2::default()
    }
}

pub fn corner_claimant(ctx: &mut BehaviorContext) -> Vec2 {
    let corner_index = ctx.param(CORNER_CLAIMANT, 0) as usize;
    let radius = ctx.param(CORNER_CLAIMANT, 1);
    let (w, h) = ctx.arena;
    let corners = [
        Vec2::new(w * 0.1, h * 0.1),
        Vec2::new(w * 0.9, h * 0.1),
        Vec2::new(w * 0.1, h * 0.9),
        Vec2::new(w * 0.9, h * 0.9),
    ];
    let target = corners[corner_index.min(3)];
    if ctx.pos.distance_to(target) > radius {
        ctx.toward(target)
    } else {
        Vec2::default()
    }
}

/// Walks the arena boundary clockwise inside a margin band.
pub fn perimeter_patroller(ctx: &mut BehaviorContext) -> Vec2 {
    let margin = ctx.param(PERIMETER_PATROLLER, 0);
    let (w, h) = ctx.arena;
    let near_left = ctx.pos.x <= margin;
    let near_right = ctx.pos.x >= w - margin;
    let near_top = ctx.pos.y <= margin;
    let near_bottom = ctx.pos.y >= h - margin;
    match (near_left, near_right, near_top, near_bottom) {
        (true, _, _, _) if !near_top => Vec2::new(0.0, -1.0),
        (_, true, _, _) if !near_bottom => Vec2::new(0.0, 1.0),
        (_, _, true, _) => Vec2::new(1.0, 0.0),
        (_, _, _, true) => Vec2::new(-1.0, 0.0),
        _ => {
            // not on the perimeter yet; head for the closest wall
            let candidates = [
                (ctx.pos.x, Vec2::new(-1.0, 0.0)),
                (w - ctx.pos.x, Vec2::new(1.0, 0.0)),
                (ctx.pos.y, Vec2::new(0.0, -1.0)),
                (h - ctx.pos.y, Vec2::new(0.0, 1.0)),
            ];
            candidates
                .iter()
                .min_by_key(|(d, _)| d.to_bits())
                .map(|(_, dir)| *dir)
                .unwrap_or_default()
        }
    }
}

/// Genome-anchored home point with a bounded roaming range.
pub fn home_ranger(ctx: &mut BehaviorContext) -> Vec2 {
    let home = Vec2::new(
        ctx.param(HOME_RANGER, 0) * ctx.arena.0,
        ctx.param(HOME_RANGER, 1) * ctx.arena.1,
    );
    let range = ctx.param(HOME_RANGER, 2);
    if ctx.pos.distance_to(home) > range {
        ctx.toward(home)
    } else {
        Vec2::default()
    }
}

/// Camps the densest food patch in sight and chases off nothing - it just
/// refuses to leave while food remains.
pub fn food_guard(ctx: &mut BehaviorContext) -> Vec2 {
    let radius = ctx.param(FOOD_GUARD, 0);
    match ctx.nearest_food() {
        Some(food) => {
            let dist = food.pos.distance_to(ctx.pos);
            if dist > radius {
                ctx.toward(food.pos)
            } else {
                Vec2::default()
            }
        }
        None => Vec2::default(),
    }
}

/// Territory center slowly drifts around the arena over a long period.
pub fn drift_territorist(ctx: &mut BehaviorContext) -> Vec2 {
    let period = ctx.param(DRIFT_TERRITORIST, 0).max(1.0) as u64;
    let step = (ctx.frame / period) % 4;
    let (w, h) = ctx.arena;
    let anchors = [
        Vec2::new(w * 0.25, h * 0.25),
        Vec2::new(w * 0.75, h * 0.25),
        Vec2::new(w * 0.75, h * 0.75),
        Vec2::new(w * 0.25, h * 0.75),
    ];
    let target = anchors[step as usize];
    if ctx.pos.distance_to(target) > 30.0 {
        ctx.toward(target)
    } else {
        Vec2::default()
    }
}

/// Lurks in the deep band near the floor, rising only for food.
pub fn shadow_lurker(ctx: &mut BehaviorContext) -> Vec2 {
    let band = ctx.param(SHADOW_LURKER, 0);
    let floor_y = ctx.arena.1 * band;
    if let Some(food) = ctx.nearest_food() {
        return ctx.toward(food.pos);
    }
    if ctx.pos.y < floor_y {
        Vec2::new(0.0, 1.0)
    } else {
        Vec2::default()
    }
}

/// Paces back and forth along one configured wall.
pub fn border_patroller(ctx: &mut BehaviorContext) -> Vec2 {
    let wall = ctx.param(BORDER_PATROLLER, 0) as usize;
    let (w, h) = ctx.arena;
    let (anchor, axis) = match wall.min(3) {
        0 => (Vec2::new(ctx.pos.x, h * 0.05), Vec2::new(1.0, 0.0)),
        1 => (Vec2::new(ctx.pos.x, h * 0.95), Vec2::new(1.0, 0.0)),
        2 => (Vec2::new(w * 0.05, ctx.pos.y), Vec2::new(0.0, 1.0)),
        _ => (Vec2::new(w * 0.95, ctx.pos.y), Vec2::new(0.0, 1.0)),
    };
    if ctx.pos.distance_to(anchor) > 15.0 {
        return ctx.toward(anchor);
    }
    // sweep direction flips every 300 frames
    if (ctx.frame / 300) % 2 == 0 {
        axis
    } else {
        -axis
    }
}
