//! Poker-interaction movement algorithms: steer toward or away from
//! potential opponents. Actual games are resolved by the INTERACTION
//! system; these only shape who collides with whom.

use super::{BehaviorContext, FishView};
use tankworld_data::{ParamSpec, Vec2};

pub const POKER_SEEKER: &[ParamSpec] = &[ParamSpec::new("min_energy_ratio", 0.0, 1.0, 0.4)];
pub const POKER_AVOIDER: &[ParamSpec] = &[ParamSpec::new("avoid_range", 10.0, 300.0, 120.0)];
pub const RICH_TARGET_HUNTER: &[ParamSpec] = &[ParamSpec::new("min_target_ratio", 0.0, 1.0, 0.6)];
pub const WEAK_TARGET_HUNTER: &[ParamSpec] = &[ParamSpec::new("max_target_ratio", 0.0, 1.0, 0.4)];
pub const POKER_OPPORTUNIST: &[ParamSpec] = &[
    ParamSpec::new("min_energy_ratio", 0.0, 1.0, 0.5),
    ParamSpec::new("strike_range", 10.0, 200.0, 60.0),
];
pub const SHOWDOWN_CHASER: &[ParamSpec] = &[ParamSpec::new("chase_range", 20.0, 300.0, 200.0)];
pub const BANKROLL_GUARD: &[ParamSpec] = &[ParamSpec::new("bankroll_floor", 0.0, 1.0, 0.7)];
pub const TABLE_HOPPER: &[ParamSpec] = &[ParamSpec::new("hop_period", 30.0, 600.0, 150.0)];

fn closest(ctx: &BehaviorContext, candidates: impl Iterator<Item = FishView>) -> Option<FishView> {
    candidates.min_by_key(|f| (f.pos.distance_squared_to(ctx.pos).to_bits(), f.id))
}

/// Seeks any opponent while holding a reserve.
pub fn poker_seeker(ctx: &mut BehaviorContext) -> Vec2 {
    let reserve = ctx.param(POKER_SEEKER, 0);
    if ctx.energy_ratio < reserve {
        return Vec2::default();
    }
    match ctx.nearest_fish() {
        Some(f) => ctx.toward(f.pos),
        None => Vec2::default(),
    }
}

/// Keeps distance from every fish, refusing games.
pub fn poker_avoider(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(POKER_AVOIDER, 0);
    match ctx.nearest_fish() {
        Some(f) if f.pos.distance_to(ctx.pos) <= range => ctx.away_from(f.pos),
        _ => Vec2::default(),
    }
}

/// Hunts deep-stacked opponents for bigger pots.
pub fn rich_target_hunter(ctx: &mut BehaviorContext) -> Vec2 {
    let floor = ctx.param(RICH_TARGET_HUNTER, 0);
    let target = closest(
        ctx,
        ctx.fish.iter().copied().filter(|f| f.energy_ratio >= floor),
    );
    match target {
        Some(f) => ctx.toward(f.pos),
        None => Vec2::default(),
    }
}

/// Hunts short stacks that fold or bust quickly.
pub fn weak_target_hunter(ctx: &mut BehaviorContext) -> Vec2 {
    let ceiling = ctx.param(WEAK_TARGET_HUNTER, 0);
    let target = closest(
        ctx,
        ctx.fish.iter().copied().filter(|f| f.energy_ratio <= ceiling),
    );
    match target {
        Some(f) => ctx.toward(f.pos),
        None => Vec2::default(),
    }
}

/// Only engages when an opponent is already close and the stack is healthy.
pub fn poker_opportunist(ctx: &mut BehaviorContext) -> Vec2 {
    let reserve = ctx.param(POKER_OPPORTUNIST, 0);
    let range = ctx.param(POKER_OPPORTUNIST, 1);
    if ctx.energy_ratio < reserve {
        return Vec2::default();
    }
    match ctx.nearest_fish() {
        Some(f) if f.pos.distance_to(ctx.pos) <= range => ctx.toward(f.pos),
        _ => Vec2::default(),
    }
}

/// Relentlessly chases the single nearest fish across the arena.
pub fn showdown_chaser(ctx: &mut BehaviorContext) -> Vec2 {
    let range = ctx.param(SHOWDOWN_CHASER, 0);
    match ctx.nearest_fish() {
        Some(f) if f.pos.distance_to(ctx.pos) <= range => ctx.toward(f.pos),
        _ => Vec2::default(),
    }
}

/// Plays only above a bankroll floor; below it, avoids all contact.
pub fn bankroll_guard(ctx: &mut BehaviorContext) -> Vec2 {
    let floor = ctx.param(BANKROLL_GUARD, 0);
    if ctx.energy_ratio >= floor {
        match ctx.nearest_fish() {
            Some(f) => ctx.toward(f.pos),
            None => Vec2::default(),
        }
    } else {
        match ctx.nearest_fish() {
            Some(f) => ctx.away_from(f.pos),
            None => Vec2::default(),
        }
    }
}

/// Rotates between opponents: chases the k-th nearest fish, advancing k on
/// a frame cycle so it never camps one table.
pub fn table_hopper(ctx: &mut BehaviorContext) -> Vec2 {
    let period = ctx.param(TABLE_HOPPER, 0).max(1.0) as u64;
    if ctx.fish.is_empty() {
        return Vec2::default();
    }
    let mut sorted: Vec<&FishView> = ctx.fish.iter().collect();
    sorted.sort_by_key(|f| (f.pos.distance_squared_to(ctx.pos).to_bits(), f.id));
    let k = ((ctx.frame / period) as usize) % sorted.len();
    ctx.toward(sorted[k].pos)
}
