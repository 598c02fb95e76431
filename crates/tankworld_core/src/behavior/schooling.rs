//! Schooling and social algorithms: boids-style cohesion/alignment/
//! separation blends over the visible fish set.

use super::{BehaviorContext, FishView};
use tankworld_data::{ParamSpec, Vec2};

pub const TIGHT_SCHOOLER: &[ParamSpec] = &[
    ParamSpec::new("separation", 2.0, 40.0, 10.0),
    ParamSpec::new("cohesion_weight", 0.0, 2.0, 1.2),
];
pub const LOOSE_SCHOOLER: &[ParamSpec] = &[
    ParamSpec::new("separation", 10.0, 80.0, 30.0),
    ParamSpec::new("cohesion_weight", 0.0, 2.0, 0.5),
];
pub const KIN_SCHOOLER: &[ParamSpec] = &[ParamSpec::new("separation", 2.0, 60.0, 15.0)];
pub const LEADER_FOLLOWER: &[ParamSpec] = &[ParamSpec::new("follow_range", 20.0, 300.0, 150.0)];
pub const EDGE_RIDER: &[ParamSpec] = &[ParamSpec::new("edge_margin", 10.0, 120.0, 50.0)];
pub const MIRROR_NEIGHBOR: &[ParamSpec] = &[ParamSpec::new("mirror_range", 10.0, 200.0, 80.0)];
pub const SWIRL_SCHOOLER: &[ParamSpec] = &[ParamSpec::new("swirl_radius", 20.0, 200.0, 80.0)];
pub const SPACED_SCHOOLER: &[ParamSpec] = &[
    ParamSpec::new("spacing", 10.0, 100.0, 40.0),
    ParamSpec::new("tolerance", 2.0, 30.0, 10.0),
];

fn flock_center(fish: &[FishView]) -> Option<Vec2> {
    if fish.is_empty() {
        return None;
    }
    let mut center = Vec2::default();
    for f in fish {
        center += f.pos;
    }
    Some(center * (1.0 / fish.len() as f32))
}

fn mean_heading(fish: &[FishView]) -> Vec2 {
    let mut heading = Vec2::default();
    for f in fish {
        heading += f.vel.normalized();
    }
    heading.normalized()
}

fn boids(ctx: &BehaviorContext, fish: &[FishView], separation: f32, cohesion_weight: f32) -> Vec2 {
    let Some(center) = flock_center(fish) else {
        return Vec2::default();
    };
    let cohesion = (center - ctx.pos).normalized() * cohesion_weight;
    let alignment = mean_heading(fish);
    let mut separate = Vec2::default();
    for f in fish {
        let d = f.pos.distance_to(ctx.pos);
        if d < separation && d > f32::EPSILON {
            separate += (ctx.pos - f.pos) * (1.0 / d);
        }
    }
    (cohesion + alignment + separate * 1.5).normalized()
}

pub fn tight_schooler(ctx: &mut BehaviorContext) -> Vec2 {
    let separation = ctx.param(TIGHT_SCHOOLER, 0);
    let cohesion = ctx.param(TIGHT_SCHOOLER, 1);
    boids(ctx, ctx.fish, separation, cohesion)
}

pub fn loose_schooler(ctx: &mut BehaviorContext) -> Vec2 {
    let separation = ctx.param(LOOSE_SCHOOLER, 0);
    let cohesion = ctx.param(LOOSE_SCHOOLER, 1);
    boids(ctx, ctx.fish, separation, cohesion)
}

/// Schools only with hue-kin; strangers are treated as obstacles.
pub fn kin_schooler(ctx: &mut BehaviorContext) -> Vec2 {
    let separation = ctx.param(KIN_SCHOOLER, 0);
    let kin: Vec<FishView> = ctx.fish.iter().copied().filter(|f| f.is_kin).collect();
    if kin.is_empty() {
        return Vec2::default();
    }
    boids(ctx, &kin, separation, 1.0)
}

/// Follows the lowest-id visible fish (stable "leader" under the ordering
/// contract).
pub fn leader_follower(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(LEADER_FOLLOWER, 0);
    let leader = ctx
        .fish
        .iter()
        .filter(|f| f.pos.distance_to(ctx.pos) <= range)
        .min_by_key(|f| f.id);
    match leader {
        Some(f) => ctx.toward(f.pos),
        None => Vec2::default(),
    }
}

/// Schools along the arena boundary band.
pub fn edge_rider(ctx: &mut BehaviorContext) -> Vec2 {
    let margin = ctx.param(EDGE_RIDER, 0);
    let (w, h) = ctx.arena;
    let to_left = ctx.pos.x;
    let to_right = w - ctx.pos.x;
    let to_top = ctx.pos.y;
    let to_bottom = h - ctx.pos.y;
    let min_dist = to_left.min(to_right).min(to_top).min(to_bottom);
    if min_dist > margin {
        // head for the closest wall
        return if to_left == min_dist {
            Vec2::new(-1.0, 0.0)
        } else if to_right == min_dist {
            Vec2::new(1.0, 0.0)
        } else if to_top == min_dist {
            Vec2::new(0.0, -1.0)
        } else {
            Vec2::new(0.0, 1.0)
        };
    }
    // ride clockwise along the nearest wall
    if to_left == min_dist {
        Vec2::new(0.0, -1.0)
    } else if to_right == min_dist {
        Vec2::new(0.0, 1.0)
    } else if to_top == min_dist {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(-1.0, 0.0)
    }
}

/// Copies the nearest neighbor's heading.
pub fn mirror_neighbor(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(MIRROR_NEIGHBOR, 0);
    match ctx.nearest_fish() {
        Some(f) if f.pos.distance_to(ctx.pos) <= range => f.vel.normalized(),
        _ => Vec2::default(),
    }
}

/// Orbits the flock center tangentially, producing a milling swirl.
pub fn swirl_schooler(ctx: &mut BehaviorContext) -> Vec2 {
    let radius = ctx.param(SWIRL_SCHOOLER, 0);
    let Some(center) = flock_center(ctx.fish) else {
        return Vec2::default();
    };
    let offset = ctx.pos - center;
    let dist = offset.length();
    if dist < f32::EPSILON {
        return Vec2::default();
    }
    let tangent = offset.perpendicular().normalized();
    let radial = if dist > radius {
        (center - ctx.pos).normalized() * 0.5
    } else {
        (ctx.pos - center).normalized() * 0.2
    };
    (tangent + radial).normalized()
}

/// Keeps a fixed distance band to the nearest neighbor.
pub fn spaced_schooler(ctx: &mut BehaviorContext) -> Vec2 {
    let spacing = ctx.param(SPACED_SCHOOLER, 0);
    let tolerance = ctx.param(SPACED_SCHOOLER, 1);
    let Some(f) = ctx.nearest_fish() else {
        return Vec2::default();
    };
    let dist = f.pos.distance_to(ctx.pos);
    if dist + tolerance < spacing {
        ctx.away_from(f.pos)
    } else if dist - tolerance > spacing {
        ctx.toward(f.pos)
    } else {
        f.vel.normalized()
    }
}
