//! The composable algorithm: one parametric policy assembled from five
//! discrete sub-behaviors, each chosen by a selector parameter. With 5-4-4-
//! 4-4 options across the selectors the genome space holds over a thousand
//! distinct phenotypes before the continuous weights even vary.

use super::{avoidance, foraging, poker_seek, schooling, BehaviorContext};
use rand::Rng;
use tankworld_data::{ParamSpec, Vec2};

pub const SCHEMA: &[ParamSpec] = &[
    // discrete selectors, floored into an option index
    ParamSpec::new("threat_response", 0.0, 0.999, 0.0),
    ParamSpec::new("food_approach", 0.0, 0.999, 0.0),
    ParamSpec::new("social_mode", 0.0, 0.999, 0.0),
    ParamSpec::new("exploration", 0.0, 0.999, 0.0),
    ParamSpec::new("poker_engagement", 0.0, 0.999, 0.0),
    // continuous thresholds and weights
    ParamSpec::new("hunger_threshold", 0.1, 0.9, 0.5),
    ParamSpec::new("threat_range", 20.0, 300.0, 130.0),
    ParamSpec::new("poker_reserve", 0.0, 1.0, 0.55),
    ParamSpec::new("social_weight", 0.0, 1.0, 0.5),
    ParamSpec::new("explore_weight", 0.0, 1.0, 0.5),
];

fn select(value: f32, options: usize) -> usize {
    ((value * options as f32) as usize).min(options - 1)
}

/// Runs a legacy sub-behavior with an empty parameter vector so it reads
/// its own schema defaults instead of the composable parameter slots.
fn with_default_params<'a, F>(ctx: &mut BehaviorContext<'a>, f: F) -> Vec2
where
    F: FnOnce(&mut BehaviorContext<'a>) -> Vec2,
{
    let saved = std::mem::replace(&mut ctx.params, &[]);
    let out = f(ctx);
    ctx.params = saved;
    out
}

pub fn execute(ctx: &mut BehaviorContext) -> Vec2 {
    let threat_sel = select(ctx.param(SCHEMA, 0), 5);
    let food_sel = select(ctx.param(SCHEMA, 1), 4);
    let social_sel = select(ctx.param(SCHEMA, 2), 4);
    let explore_sel = select(ctx.param(SCHEMA, 3), 4);
    let poker_sel = select(ctx.param(SCHEMA, 4), 4);
    let hunger = ctx.param(SCHEMA, 5);
    let threat_range = ctx.param(SCHEMA, 6);
    let poker_reserve = ctx.param(SCHEMA, 7);
    let social_weight = ctx.param(SCHEMA, 8);
    let explore_weight = ctx.param(SCHEMA, 9);

    // priority ladder: threat > hunger > poker > social/exploration blend
    if let Some(p) = ctx.nearest_predator() {
        if p.pos.distance_to(ctx.pos) <= threat_range {
            return threat_response(ctx, threat_sel);
        }
    }
    if ctx.energy_ratio < hunger && !ctx.food.is_empty() {
        return food_move(ctx, food_sel);
    }
    if ctx.energy_ratio >= poker_reserve {
        let engagement = poker_move(ctx, poker_sel);
        if engagement.length_squared() > 1e-6 {
            return engagement;
        }
    }
    let social = social_move(ctx, social_sel) * (social_weight * ctx.social_tendency);
    let explore = explore_move(ctx, explore_sel) * explore_weight;
    (social + explore).normalized()
}

fn threat_response(ctx: &mut BehaviorContext, selector: usize) -> Vec2 {
    with_default_params(ctx, |ctx| match selector {
        0 => avoidance::direct_flee(ctx),
        1 => avoidance::zigzag_flee(ctx),
        2 => avoidance::freeze_response(ctx),
        3 => avoidance::school_refuge(ctx),
        _ => avoidance::perpendicular_escape(ctx),
    })
}

fn food_move(ctx: &mut BehaviorContext, selector: usize) -> Vec2 {
    with_default_params(ctx, |ctx| match selector {
        0 => foraging::food_approach(ctx),
        1 => foraging::richest_patch(ctx),
        2 => foraging::energy_weighted(ctx),
        _ => foraging::memory_forager(ctx),
    })
}

fn social_move(ctx: &mut BehaviorContext, selector: usize) -> Vec2 {
    with_default_params(ctx, |ctx| match selector {
        0 => Vec2::default(),
        1 => schooling::tight_schooler(ctx),
        2 => schooling::loose_schooler(ctx),
        _ => schooling::kin_schooler(ctx),
    })
}

fn explore_move(ctx: &mut BehaviorContext, selector: usize) -> Vec2 {
    match selector {
        0 => {
            if ctx.rng.gen_range(0.0..1.0f32) < 0.1 || ctx.vel.length_squared() < 1e-6 {
                ctx.random_heading()
            } else {
                ctx.vel.normalized()
            }
        }
        1 => with_default_params(ctx, foraging::spiral_search),
        2 => {
            let center = ctx.arena_center();
            if ctx.pos.distance_to(center) > 60.0 {
                ctx.toward(center)
            } else {
                Vec2::default()
            }
        }
        _ => with_default_params(ctx, super::territory::perimeter_patroller),
    }
}

fn poker_move(ctx: &mut BehaviorContext, selector: usize) -> Vec2 {
    with_default_params(ctx, |ctx| match selector {
        0 => Vec2::default(),
        1 => poker_seek::poker_seeker(ctx),
        2 => poker_seek::poker_avoider(ctx),
        _ => poker_seek::poker_opportunist(ctx),
    })
}
