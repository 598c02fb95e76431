use serde::{Deserialize, Serialize};

/// Inclusive bounds for every physical trait multiplier.
pub const GENE_MIN: f32 = 0.3;
pub const GENE_MAX: f32 = 2.5;

/// Declaration of one behavior/poker parameter: name and inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamSpec {
    pub const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Behavior algorithm family, used for grouping in stats and reports.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlgorithmCategory {
    Composable,
    Foraging,
    Avoidance,
    Schooling,
    EnergyManagement,
    Territory,
    PokerInteraction,
    Wander,
}

macro_rules! algorithms {
    ($( $variant:ident => ($category:ident, $label:literal) ),+ $(,)?) => {
        /// Discrete id of a movement algorithm.
        ///
        /// `Composable` is the recommended parametric algorithm; the rest are
        /// the legacy monolithic library kept behind the same interface.
        #[derive(
            Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        pub enum AlgorithmId {
            $( $variant, )+
        }

        impl AlgorithmId {
            pub const ALL: &'static [AlgorithmId] = &[ $( AlgorithmId::$variant, )+ ];

            pub fn category(&self) -> AlgorithmCategory {
                match self {
                    $( AlgorithmId::$variant => AlgorithmCategory::$category, )+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( AlgorithmId::$variant => $label, )+
                }
            }
        }
    };
}

algorithms! {
    Composable => (Composable, "composable"),
    RandomWalk => (Wander, "random_walk"),

    NearestFood => (Foraging, "nearest_food"),
    RichestPatch => (Foraging, "richest_patch"),
    EnergyWeightedForage => (Foraging, "energy_weighted_forage"),
    MemoryForager => (Foraging, "memory_forager"),
    SpiralSearch => (Foraging, "spiral_search"),
    DriftForager => (Foraging, "drift_forager"),
    Opportunist => (Foraging, "opportunist"),
    PlanktonSkimmer => (Foraging, "plankton_skimmer"),

    DirectFlee => (Avoidance, "direct_flee"),
    ZigzagFlee => (Avoidance, "zigzag_flee"),
    FreezeResponse => (Avoidance, "freeze_response"),
    WallHugger => (Avoidance, "wall_hugger"),
    SchoolRefuge => (Avoidance, "school_refuge"),
    PerpendicularEscape => (Avoidance, "perpendicular_escape"),
    DangerMemoryAvoider => (Avoidance, "danger_memory_avoider"),
    CornerCamper => (Avoidance, "corner_camper"),

    TightSchooler => (Schooling, "tight_schooler"),
    LooseSchooler => (Schooling, "loose_schooler"),
    KinSchooler => (Schooling, "kin_schooler"),
    LeaderFollower => (Schooling, "leader_follower"),
    EdgeRider => (Schooling, "edge_rider"),
    MirrorNeighbor => (Schooling, "mirror_neighbor"),
    SwirlSchooler => (Schooling, "swirl_schooler"),
    SpacedSchooler => (Schooling, "spaced_schooler"),

    EnergyConserver => (EnergyManagement, "energy_conserver"),
    BurstCruiser => (EnergyManagement, "burst_cruiser"),
    MetabolicSleeper => (EnergyManagement, "metabolic_sleeper"),
    DaySprinter => (EnergyManagement, "day_sprinter"),
    IdleDrifter => (EnergyManagement, "idle_drifter"),
    ThresholdSwitcher => (EnergyManagement, "threshold_switcher"),
    GlideCoaster => (EnergyManagement, "glide_coaster"),
    TorporSeeker => (EnergyManagement, "torpor_seeker"),

    CenterHolder => (Territory, "center_holder"),
    CornerClaimant => (Territory, "corner_claimant"),
    PerimeterPatroller => (Territory, "perimeter_patroller"),
    HomeRanger => (Territory, "home_ranger"),
    FoodGuard => (Territory, "food_guard"),
    DriftTerritorist => (Territory, "drift_territorist"),
    ShadowLurker => (Territory, "shadow_lurker"),
    BorderPatroller => (Territory, "border_patroller"),

    PokerSeeker => (PokerInteraction, "poker_seeker"),
    PokerAvoider => (PokerInteraction, "poker_avoider"),
    RichTargetHunter => (PokerInteraction, "rich_target_hunter"),
    WeakTargetHunter => (PokerInteraction, "weak_target_hunter"),
    PokerOpportunist => (PokerInteraction, "poker_opportunist"),
    ShowdownChaser => (PokerInteraction, "showdown_chaser"),
    BankrollGuard => (PokerInteraction, "bankroll_guard"),
    TableHopper => (PokerInteraction, "table_hopper"),
}

/// Poker table persona. Strategy-specific parameters live in
/// [`PokerGenes::params`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PokerStyle {
    TightPassive,
    LoosePassive,
    TightAggressive,
    LooseAggressive,
    Balanced,
    Maniac,
    GtoExpert,
    AlwaysFold,
    Random,
}

impl PokerStyle {
    pub const ALL: &'static [PokerStyle] = &[
        PokerStyle::TightPassive,
        PokerStyle::LoosePassive,
        PokerStyle::TightAggressive,
        PokerStyle::LooseAggressive,
        PokerStyle::Balanced,
        PokerStyle::Maniac,
        PokerStyle::GtoExpert,
        PokerStyle::AlwaysFold,
        PokerStyle::Random,
    ];
}

/// Heritable physical trait multipliers, each bounded to
/// `[GENE_MIN, GENE_MAX]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhysicalGenes {
    pub speed: f32,
    pub size: f32,
    pub vision_range: f32,
    pub metabolism_rate: f32,
    pub max_energy: f32,
    pub fertility: f32,
}

impl PhysicalGenes {
    pub const TRAIT_NAMES: [&'static str; 6] = [
        "speed",
        "size",
        "vision_range",
        "metabolism_rate",
        "max_energy",
        "fertility",
    ];

    pub fn neutral() -> Self {
        Self {
            speed: 1.0,
            size: 1.0,
            vision_range: 1.0,
            metabolism_rate: 1.0,
            max_energy: 1.0,
            fertility: 1.0,
        }
    }

    pub fn as_array(&self) -> [f32; 6] {
        [
            self.speed,
            self.size,
            self.vision_range,
            self.metabolism_rate,
            self.max_energy,
            self.fertility,
        ]
    }

    pub fn from_array(values: [f32; 6]) -> Self {
        Self {
            speed: values[0],
            size: values[1],
            vision_range: values[2],
            metabolism_rate: values[3],
            max_energy: values[4],
            fertility: values[5],
        }
    }

    pub fn in_bounds(&self) -> bool {
        self.as_array()
            .iter()
            .all(|v| (GENE_MIN..=GENE_MAX).contains(v))
    }
}

/// Heritable movement behavior: algorithm id plus its parameter vector.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BehaviorGenes {
    pub algorithm: AlgorithmId,
    pub params: Vec<f32>,
    pub aggression: f32,
    pub social_tendency: f32,
}

impl BehaviorGenes {
    pub fn in_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.aggression) && (0.0..=1.0).contains(&self.social_tendency)
    }
}

/// Heritable poker persona: style plus its parameter vector.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PokerGenes {
    pub style: PokerStyle,
    pub params: Vec<f32>,
}

/// The heritable, bounded parameter bundle of a fish.
///
/// A `Genome` is an immutable value: reproduction constructs a fresh
/// instance, nothing mutates one in place. `stress` is the epigenetic
/// modifier inherited at half strength each generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Genome {
    pub physical: PhysicalGenes,
    pub behavior: BehaviorGenes,
    pub poker: PokerGenes,
    /// Opaque to core logic; read only by external renderers.
    pub color_hue: f32,
    pub stress: f32,
}

impl Genome {
    /// Short stable digest of the full genome for snapshots.
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        let json = serde_json::to_string(self).unwrap_or_default();
        hasher.update(json.as_bytes());
        hex::encode(&hasher.finalize()[..8])
    }

    /// Bounds check over every scalar gene. Parameter-vector bounds are
    /// schema-dependent and checked by the engine's registry.
    pub fn scalars_in_bounds(&self) -> bool {
        self.physical.in_bounds()
            && self.behavior.in_bounds()
            && (0.0..=1.0).contains(&self.color_hue)
            && (0.0..=1.0).contains(&self.stress)
    }
}

/// L-system growth parameters carried by plants; mutated when a plant
/// spawns a seedling.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PlantGenome {
    /// Branching angle in degrees, `[10, 80]`.
    pub branch_angle: f32,
    /// Growth multiplier applied to the production counter, `[0.5, 2.0]`.
    pub growth_rate: f32,
    /// Chance per produced food that a seedling spawns instead, `[0, 0.1]`.
    pub seedling_chance: f32,
}

impl PlantGenome {
    pub const BRANCH_ANGLE_BOUNDS: (f32, f32) = (10.0, 80.0);
    pub const GROWTH_RATE_BOUNDS: (f32, f32) = (0.5, 2.0);
    pub const SEEDLING_CHANCE_BOUNDS: (f32, f32) = (0.0, 0.1);

    pub fn in_bounds(&self) -> bool {
        let (a0, a1) = Self::BRANCH_ANGLE_BOUNDS;
        let (g0, g1) = Self::GROWTH_RATE_BOUNDS;
        let (s0, s1) = Self::SEEDLING_CHANCE_BOUNDS;
        (a0..=a1).contains(&self.branch_angle)
            && (g0..=g1).contains(&self.growth_rate)
            && (s0..=s1).contains(&self.seedling_chance)
    }
}

impl Default for PlantGenome {
    fn default() -> Self {
        Self {
            branch_angle: 35.0,
            growth_rate: 1.0,
            seedling_chance: 0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_registry_is_complete() {
        assert!(AlgorithmId::ALL.len() >= 50);
        assert_eq!(
            AlgorithmId::ALL.first().copied(),
            Some(AlgorithmId::Composable)
        );
    }

    #[test]
    fn algorithm_categories_have_eight_legacy_members() {
        for category in [
            AlgorithmCategory::Foraging,
            AlgorithmCategory::Avoidance,
            AlgorithmCategory::Schooling,
            AlgorithmCategory::EnergyManagement,
            AlgorithmCategory::Territory,
            AlgorithmCategory::PokerInteraction,
        ] {
            let count = AlgorithmId::ALL
                .iter()
                .filter(|a| a.category() == category)
                .count();
            assert_eq!(count, 8, "category {category:?}");
        }
    }

    #[test]
    fn digest_is_stable_and_short() {
        let g = Genome {
            physical: PhysicalGenes::neutral(),
            behavior: BehaviorGenes {
                algorithm: AlgorithmId::Composable,
                params: vec![0.5; 10],
                aggression: 0.5,
                social_tendency: 0.5,
            },
            poker: PokerGenes {
                style: PokerStyle::Balanced,
                params: vec![0.5; 4],
            },
            color_hue: 0.25,
            stress: 0.0,
        };
        assert_eq!(g.digest(), g.clone().digest());
        assert_eq!(g.digest().len(), 16);
    }
}
