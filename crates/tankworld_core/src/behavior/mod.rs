//! Composable movement/behavior algorithm library.
//!
//! Every algorithm is a pure function `fn(&mut BehaviorContext) -> Vec2`
//! returning a unit-length (or zero) desired direction; the ENTITY_ACT
//! system multiplies it by the fish's speed and applies inertia. Algorithms
//! never mutate entities - their only output is the returned vector.
//!
//! The parameter schema of each algorithm is declared statically here and
//! drives both mutation bounds and default parameter vectors.

pub mod avoidance;
pub mod composable;
pub mod energy;
pub mod foraging;
pub mod poker_seek;
pub mod schooling;
pub mod territory;

use crate::rng::SimRng;
use rand::Rng;
use tankworld_data::{AlgorithmId, EntityId, FishMemory, LifeStage, ParamSpec, Vec2};

/// Below this energy ratio the dispatcher forces food approach regardless of
/// algorithm or parameters.
pub const CRITICAL_ENERGY: f32 = 0.15;

/// A fish as seen by another fish.
#[derive(Debug, Clone, Copy)]
pub struct FishView {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub energy_ratio: f32,
    pub hue: f32,
    /// Hue-proximity kinship: same color team.
    pub is_kin: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FoodView {
    pub id: EntityId,
    pub pos: Vec2,
    pub energy: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct PredatorView {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Everything one fish can sense when deciding a move.
pub struct BehaviorContext<'a> {
    pub pos: Vec2,
    pub vel: Vec2,
    pub energy_ratio: f32,
    pub life_stage: LifeStage,
    pub aggression: f32,
    pub social_tendency: f32,
    pub food: &'a [FoodView],
    pub fish: &'a [FishView],
    pub predators: &'a [PredatorView],
    pub time_of_day: f32,
    pub activity: f32,
    pub arena: (f32, f32),
    pub frame: u64,
    pub params: &'a [f32],
    pub memory: &'a FishMemory,
    pub rng: &'a mut SimRng,
}

impl BehaviorContext<'_> {
    /// Parameter by index, falling back to the schema default when the
    /// vector is short (older genomes after an algorithm switch).
    pub fn param(&self, schema: &'static [ParamSpec], index: usize) -> f32 {
        self.params
            .get(index)
            .copied()
            .unwrap_or_else(|| schema[index].default)
    }

    pub fn toward(&self, target: Vec2) -> Vec2 {
        (target - self.pos).normalized()
    }

    pub fn away_from(&self, threat: Vec2) -> Vec2 {
        (self.pos - threat).normalized()
    }

    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.arena.0 / 2.0, self.arena.1 / 2.0)
    }

    pub fn nearest_food(&self) -> Option<&FoodView> {
        self.food.iter().min_by_key(|f| {
            (
                f.pos.distance_squared_to(self.pos).to_bits(),
                f.id,
            )
        })
    }

    pub fn nearest_predator(&self) -> Option<&PredatorView> {
        self.predators.iter().min_by_key(|p| {
            (
                p.pos.distance_squared_to(self.pos).to_bits(),
                p.id,
            )
        })
    }

    pub fn nearest_fish(&self) -> Option<&FishView> {
        self.fish.iter().min_by_key(|f| {
            (
                f.pos.distance_squared_to(self.pos).to_bits(),
                f.id,
            )
        })
    }

    /// Uniform unit direction, quantized to sixteen headings so no
    /// transcendental functions run per decision.
    pub fn random_heading(&mut self) -> Vec2 {
        let o = self.rng.gen_range(0..16u8);
        heading_16(o)
    }
}

/// One of sixteen unit headings, counter-clockwise from +x.
pub fn heading_16(index: u8) -> Vec2 {
    // sin/cos of k*22.5 degrees, precomputed to keep decisions free of
    // platform-dependent transcendentals.
    const TABLE: [(f32, f32); 16] = [
        (1.0, 0.0),
        (0.923_879_5, 0.382_683_43),
        (0.707_106_77, 0.707_106_77),
        (0.382_683_43, 0.923_879_5),
        (0.0, 1.0),
        (-0.382_683_43, 0.923_879_5),
        (-0.707_106_77, 0.707_106_77),
        (-0.923_879_5, 0.382_683_43),
        (-1.0, 0.0),
        (-0.923_879_5, -0.382_683_43),
        (-0.707_106_77, -0.707_106_77),
        (-0.382_683_43, -0.923_879_5),
        (0.0, -1.0),
        (0.382_683_43, -0.923_879_5),
        (0.707_106_77, -0.707_106_77),
        (0.923_879_5, -0.382_683_43),
    ];
    let (x, y) = TABLE[(index % 16) as usize];
    Vec2::new(x, y)
}

/// Rotate a unit vector by `eighths` of a turn (multiples of 45 degrees).
pub fn rotate_eighths(v: Vec2, eighths: u8) -> Vec2 {
    const COS_SIN: [(f32, f32); 8] = [
        (1.0, 0.0),
        (0.707_106_77, 0.707_106_77),
        (0.0, 1.0),
        (-0.707_106_77, 0.707_106_77),
        (-1.0, 0.0),
        (-0.707_106_77, -0.707_106_77),
        (0.0, -1.0),
        (0.707_106_77, -0.707_106_77),
    ];
    let (c, s) = COS_SIN[(eighths % 8) as usize];
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Desired direction for one fish. Applies the critical-energy override,
/// then dispatches to the algorithm.
pub fn decide(algorithm: AlgorithmId, ctx: &mut BehaviorContext) -> Vec2 {
    if ctx.energy_ratio < CRITICAL_ENERGY {
        return foraging::food_approach(ctx);
    }
    dispatch(algorithm, ctx)
}

fn dispatch(algorithm: AlgorithmId, ctx: &mut BehaviorContext) -> Vec2 {
    use AlgorithmId::*;
    match algorithm {
        Composable => composable::execute(ctx),
        RandomWalk => random_walk(ctx),

        NearestFood => foraging::nearest_food(ctx),
        RichestPatch => foraging::richest_patch(ctx),
        EnergyWeightedForage => foraging::energy_weighted(ctx),
        MemoryForager => foraging::memory_forager(ctx),
        SpiralSearch => foraging::spiral_search(ctx),
        DriftForager => foraging::drift_forager(ctx),
        Opportunist => foraging::opportunist(ctx),
        PlanktonSkimmer => foraging::plankton_skimmer(ctx),

        DirectFlee => avoidance::direct_flee(ctx),
        ZigzagFlee => avoidance::zigzag_flee(ctx),
        FreezeResponse => avoidance::freeze_response(ctx),
        WallHugger => avoidance::wall_hugger(ctx),
        SchoolRefuge => avoidance::school_refuge(ctx),
        PerpendicularEscape => avoidance::perpendicular_escape(ctx),
        DangerMemoryAvoider => avoidance::danger_memory_avoider(ctx),
        CornerCamper => avoidance::corner_camper(ctx),

        TightSchooler => schooling::tight_schooler(ctx),
        LooseSchooler => schooling::loose_schooler(ctx),
        KinSchooler => schooling::kin_schooler(ctx),
        LeaderFollower => schooling::leader_follower(ctx),
        EdgeRider => schooling::edge_rider(ctx),
        MirrorNeighbor => schooling::mirror_neighbor(ctx),
        SwirlSchooler => schooling::swirl_schooler(ctx),
        SpacedSchooler => schooling::spaced_schooler(ctx),

        EnergyConserver => energy::energy_conserver(ctx),
        BurstCruiser => energy::burst_cruiser(ctx),
        MetabolicSleeper => energy::metabolic_sleeper(ctx),
        DaySprinter => energy::day_sprinter(ctx),
        IdleDrifter => energy::idle_drifter(ctx),
        ThresholdSwitcher => energy::threshold_switcher(ctx),
        GlideCoaster => energy::glide_coaster(ctx),
        TorporSeeker => energy::torpor_seeker(ctx),

        CenterHolder => territory::center_holder(ctx),
        CornerClaimant => territory::corner_claimant(ctx),
        PerimeterPatroller => territory::perimeter_patroller(ctx),
        HomeRanger => territory::home_ranger(ctx),
        FoodGuard => territory::food_guard(ctx),
        DriftTerritorist => territory::drift_territorist(ctx),
        ShadowLurker => territory::shadow_lurker(ctx),
        BorderPatroller => territory::border_patroller(ctx),

        PokerSeeker => poker_seek::poker_seeker(ctx),
        PokerAvoider => poker_seek::poker_avoider(ctx),
        RichTargetHunter => poker_seek::rich_target_hunter(ctx),
        WeakTargetHunter => poker_seek::weak_target_hunter(ctx),
        PokerOpportunist => poker_seek::poker_opportunist(ctx),
        ShowdownChaser => poker_seek::showdown_chaser(ctx),
        BankrollGuard => poker_seek::bankroll_guard(ctx),
        TableHopper => poker_seek::table_hopper(ctx),
    }
}

fn random_walk(ctx: &mut BehaviorContext) -> Vec2 {
    let schema = param_schema(AlgorithmId::RandomWalk);
    let turn_chance = ctx.param(schema, 0);
    if ctx.rng.gen_range(0.0..1.0f32) < turn_chance || ctx.vel.length_squared() < 1e-6 {
        ctx.random_heading()
    } else {
        ctx.vel.normalized()
    }
}

/// Static parameter declarations per algorithm, `(name, min, max, default)`.
pub fn param_schema(algorithm: AlgorithmId) -> &'static [ParamSpec] {
    use AlgorithmId::*;
    match algorithm {
        Composable => composable::SCHEMA,
        RandomWalk => {
            const RANDOM_WALK: [ParamSpec; 1] = [ParamSpec::new("turn_chance", 0.01, 0.5, 0.1)];
            &RANDOM_WALK
        }

        NearestFood => foraging::NEAREST_FOOD,
        RichestPatch => foraging::RICHEST_PATCH,
        EnergyWeightedForage => foraging::ENERGY_WEIGHTED,
        MemoryForager => foraging::MEMORY_FORAGER,
        SpiralSearch => foraging::SPIRAL_SEARCH,
        DriftForager => foraging::DRIFT_FORAGER,
        Opportunist => foraging::OPPORTUNIST,
        PlanktonSkimmer => foraging::PLANKTON_SKIMMER,

        DirectFlee => avoidance::DIRECT_FLEE,
        ZigzagFlee => avoidance::ZIGZAG_FLEE,
        FreezeResponse => avoidance::FREEZE_RESPONSE,
        WallHugger => avoidance::WALL_HUGGER,
        SchoolRefuge => avoidance::SCHOOL_REFUGE,
        PerpendicularEscape => avoidance::PERPENDICULAR_ESCAPE,
        DangerMemoryAvoider => avoidance::DANGER_MEMORY_AVOIDER,
        CornerCamper => avoidance::CORNER_CAMPER,

        TightSchooler => schooling::TIGHT_SCHOOLER,
        LooseSchooler => schooling::LOOSE_SCHOOLER,
        KinSchooler => schooling::KIN_SCHOOLER,
        LeaderFollower => schooling::LEADER_FOLLOWER,
        EdgeRider => schooling::EDGE_RIDER,
        MirrorNeighbor => schooling::MIRROR_NEIGHBOR,
        SwirlSchooler => schooling::SWIRL_SCHOOLER,
        SpacedSchooler => schooling::SPACED_SCHOOLER,

        EnergyConserver => energy::ENERGY_CONSERVER,
        BurstCruiser => energy::BURST_CRUISER,
        MetabolicSleeper => energy::METABOLIC_SLEEPER,
        DaySprinter => energy::DAY_SPRINTER,
        IdleDrifter => energy::IDLE_DRIFTER,
        ThresholdSwitcher => energy::THRESHOLD_SWITCHER,
        GlideCoaster => energy::GLIDE_COASTER,
        TorporSeeker => energy::TORPOR_SEEKER,

        CenterHolder => territory::CENTER_HOLDER,
        CornerClaimant => territory::CORNER_CLAIMANT,
        PerimeterPatroller => territory::PERIMETER_PATROLLER,
        HomeRanger => territory::HOME_RANGER,
        FoodGuard => territory::FOOD_GUARD,
        DriftTerritorist => territory::DRIFT_TERRITORIST,
        ShadowLurker => territory::SHADOW_LURKER,
        BorderPatroller => territory::BORDER_PATROLLER,

        PokerSeeker => poker_seek::POKER_SEEKER,
        PokerAvoider => poker_seek::POKER_AVOIDER,
        RichTargetHunter => poker_seek::RICH_TARGET_HUNTER,
        WeakTargetHunter => poker_seek::WEAK_TARGET_HUNTER,
        PokerOpportunist => poker_seek::POKER_OPPORTUNIST,
        ShowdownChaser => poker_seek::SHOWDOWN_CHASER,
        BankrollGuard => poker_seek::BANKROLL_GUARD,
        TableHopper => poker_seek::TABLE_HOPPER,
    }
}

/// Default parameter vector for an algorithm.
pub fn default_params(algorithm: AlgorithmId) -> Vec<f32> {
    param_schema(algorithm).iter().map(|p| p.default).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tankworld_data::FishMemory;

    fn empty_ctx<'a>(rng: &'a mut SimRng, memory: &'a FishMemory) -> BehaviorContext<'a> {
        BehaviorContext {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(1.0, 0.0),
            energy_ratio: 0.8,
            life_stage: LifeStage::Adult,
            aggression: 0.5,
            social_tendency: 0.5,
            food: &[],
            fish: &[],
            predators: &[],
            time_of_day: 0.5,
            activity: 1.0,
            arena: (800.0, 600.0),
            frame: 100,
            params: &[],
            memory,
            rng,
        }
    }

    #[test]
    fn every_algorithm_has_a_schema_and_runs() {
        for &algorithm in AlgorithmId::ALL {
            let schema = param_schema(algorithm);
            for spec in schema {
                assert!(spec.min <= spec.default && spec.default <= spec.max, "{}", spec.name);
            }
            let params = default_params(algorithm);
            let mut rng = SimRng::from_seed(7);
            let memory = FishMemory::new(4);
            let mut ctx = empty_ctx(&mut rng, &memory);
            ctx.params = &params;
            let dir = decide(algorithm, &mut ctx);
            let len = dir.length();
            assert!(
                len < 1.0 + 1e-4,
                "{algorithm:?} returned an over-unit direction: {len}"
            );
            assert!(dir.is_finite(), "{algorithm:?} returned non-finite");
        }
    }

    #[test]
    fn critical_energy_forces_food_approach() {
        let mut rng = SimRng::from_seed(7);
        let memory = FishMemory::new(4);
        let food = [FoodView {
            id: EntityId(9),
            pos: Vec2::new(500.0, 300.0),
            energy: 25.0,
        }];
        let mut ctx = empty_ctx(&mut rng, &memory);
        ctx.energy_ratio = 0.05;
        ctx.food = &food;
        // an algorithm that would otherwise flee from the arena center
        let dir = decide(AlgorithmId::CornerCamper, &mut ctx);
        assert!(dir.x > 0.9, "expected a move toward food, got {dir:?}");
    }

    #[test]
    fn headings_are_unit_length() {
        for i in 0..16 {
            assert!((heading_16(i).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn rotate_eighths_quarter_turn() {
        let v = rotate_eighths(Vec2::new(1.0, 0.0), 2);
        assert!((v.x).abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6);
    }
}
