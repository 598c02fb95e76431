//! Pluggable poker strategies.
//!
//! Each strategy is a pure function of `(PokerView, rng)` returning the
//! action it wants. The betting engine legalizes the result, so strategies
//! may express intent freely; an illegal action costs them the hand, not
//! the tick.

use super::card::{Card, Rank};
use super::evaluator::Evaluator;
use super::game::Street;
use super::hand::Hand;
use super::ranking::Ranking;
use crate::rng::SimRng;
use rand::Rng;
use tankworld_data::{ParamSpec, PokerStyle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PokerAction {
    Fold,
    Check,
    Call,
    /// Raise by this much over the call amount.
    Raise(f32),
}

/// What one player can see when acting.
pub struct PokerView<'a> {
    pub hole: [Card; 2],
    pub community: &'a [Card],
    pub street: Street,
    pub pot: f32,
    pub to_call: f32,
    pub stack: f32,
    pub min_raise: f32,
    pub seat: usize,
    pub button_seat: usize,
    /// Actions taken so far this game, `(seat, action)` in order.
    pub history: &'a [(usize, PokerAction)],
    pub params: &'a [f32],
}

impl PokerView<'_> {
    pub fn pot_odds(&self) -> f32 {
        if self.to_call <= 0.0 {
            0.0
        } else {
            self.to_call / (self.pot + self.to_call)
        }
    }

    /// Has any opponent raised this game?
    pub fn facing_aggression(&self) -> bool {
        self.history
            .iter()
            .any(|(seat, action)| *seat != self.seat && matches!(action, PokerAction::Raise(_)))
    }

    fn param(&self, schema: &'static [ParamSpec], index: usize) -> f32 {
        self.params
            .get(index)
            .copied()
            .unwrap_or_else(|| schema[index].default)
    }
}

/// Rough equity estimate in `[0, 1]` for the current street.
pub fn hand_strength(hole: [Card; 2], community: &[Card]) -> f32 {
    if community.is_empty() {
        preflop_strength(hole)
    } else {
        let hand: Hand = hole.iter().copied().chain(community.iter().copied()).collect();
        postflop_strength(Evaluator::from(hand).find_ranking())
    }
}

fn preflop_strength(hole: [Card; 2]) -> f32 {
    let (hi, lo) = if hole[0].rank() >= hole[1].rank() {
        (hole[0].rank(), hole[1].rank())
    } else {
        (hole[1].rank(), hole[0].rank())
    };
    if hi == lo {
        // pairs: 22 = 0.50 up to AA = 1.0
        return 0.5 + (hi as u8 as f32 / 12.0) * 0.5;
    }
    let mut score = (hi as u8 as f32 / 12.0) * 0.38 + (lo as u8 as f32 / 12.0) * 0.17;
    if hole[0].suit() == hole[1].suit() {
        score += 0.08;
    }
    let gap = hi as u8 - lo as u8;
    if gap == 1 {
        score += 0.06;
    } else if gap == 2 {
        score += 0.03;
    }
    if lo >= Rank::Ten {
        score += 0.05;
    }
    score.min(0.99)
}

fn postflop_strength(ranking: Ranking) -> f32 {
    let top = |r: Rank| r as u8 as f32 / 12.0;
    match ranking {
        Ranking::HighCard(r) => 0.08 + top(r) * 0.10,
        Ranking::OnePair(r) => 0.25 + top(r) * 0.15,
        Ranking::TwoPair(r, _) => 0.45 + top(r) * 0.08,
        Ranking::ThreeOfAKind(r) => 0.56 + top(r) * 0.06,
        Ranking::Straight(r) => 0.66 + top(r) * 0.04,
        Ranking::Flush(r) => 0.74 + top(r) * 0.04,
        Ranking::FullHouse(r, _) => 0.84 + top(r) * 0.04,
        Ranking::FourOfAKind(r) => 0.92 + top(r) * 0.03,
        Ranking::StraightFlush(_) => 1.0,
    }
}

pub const TIGHT_PASSIVE: &[ParamSpec] = &[
    ParamSpec::new("play_threshold", 0.3, 0.9, 0.55),
    ParamSpec::new("call_cap", 0.05, 0.6, 0.3),
];
pub const LOOSE_PASSIVE: &[ParamSpec] = &[ParamSpec::new("play_threshold", 0.05, 0.6, 0.2)];
pub const TIGHT_AGGRESSIVE: &[ParamSpec] = &[
    ParamSpec::new("play_threshold", 0.3, 0.9, 0.55),
    ParamSpec::new("raise_pot_fraction", 0.25, 2.0, 1.0),
];
pub const LOOSE_AGGRESSIVE: &[ParamSpec] = &[
    ParamSpec::new("play_threshold", 0.1, 0.7, 0.3),
    ParamSpec::new("raise_pot_fraction", 0.25, 2.0, 0.75),
    ParamSpec::new("bluff_frequency", 0.0, 0.5, 0.15),
];
pub const BALANCED: &[ParamSpec] = &[
    ParamSpec::new("aggression", 0.0, 1.0, 0.5),
    ParamSpec::new("bluff_frequency", 0.0, 0.4, 0.1),
];
pub const MANIAC: &[ParamSpec] = &[
    ParamSpec::new("raise_frequency", 0.3, 1.0, 0.7),
    ParamSpec::new("raise_pot_fraction", 0.5, 3.0, 1.5),
];
pub const GTO_EXPERT: &[ParamSpec] = &[
    ParamSpec::new("premium_threshold", 0.5, 0.8, 0.62),
    ParamSpec::new("cbet_frequency", 0.3, 0.9, 0.65),
];
pub const ALWAYS_FOLD: &[ParamSpec] = &[];
pub const RANDOM: &[ParamSpec] = &[];

pub fn param_schema(style: PokerStyle) -> &'static [ParamSpec] {
    match style {
        PokerStyle::TightPassive => TIGHT_PASSIVE,
        PokerStyle::LoosePassive => LOOSE_PASSIVE,
        PokerStyle::TightAggressive => TIGHT_AGGRESSIVE,
        PokerStyle::LooseAggressive => LOOSE_AGGRESSIVE,
        PokerStyle::Balanced => BALANCED,
        PokerStyle::Maniac => MANIAC,
        PokerStyle::GtoExpert => GTO_EXPERT,
        PokerStyle::AlwaysFold => ALWAYS_FOLD,
        PokerStyle::Random => RANDOM,
    }
}

pub fn default_params(style: PokerStyle) -> Vec<f32> {
    param_schema(style).iter().map(|p| p.default).collect()
}

/// Strategy dispatch.
pub fn decide(style: PokerStyle, view: &PokerView, rng: &mut SimRng) -> PokerAction {
    match style {
        PokerStyle::TightPassive => tight_passive(view),
        PokerStyle::LoosePassive => loose_passive(view),
        PokerStyle::TightAggressive => tight_aggressive(view),
        PokerStyle::LooseAggressive => loose_aggressive(view, rng),
        PokerStyle::Balanced => balanced(view, rng),
        PokerStyle::Maniac => maniac(view, rng),
        PokerStyle::GtoExpert => gto_expert(view, rng),
        PokerStyle::AlwaysFold => PokerAction::Fold,
        PokerStyle::Random => random(view, rng),
    }
}

fn check_or_fold(view: &PokerView) -> PokerAction {
    if view.to_call <= 0.0 {
        PokerAction::Check
    } else {
        PokerAction::Fold
    }
}

fn tight_passive(view: &PokerView) -> PokerAction {
    let threshold = view.param(TIGHT_PASSIVE, 0);
    let call_cap = view.param(TIGHT_PASSIVE, 1);
    let strength = hand_strength(view.hole, view.community);
    if strength < threshold {
        return check_or_fold(view);
    }
    if view.to_call <= 0.0 {
        PokerAction::Check
    } else if view.pot_odds() <= call_cap || strength > 0.8 {
        PokerAction::Call
    } else {
        PokerAction::Fold
    }
}

fn loose_passive(view: &PokerView) -> PokerAction {
    let threshold = view.param(LOOSE_PASSIVE, 0);
    let strength = hand_strength(view.hole, view.community);
    if view.to_call <= 0.0 {
        PokerAction::Check
    } else if strength >= threshold {
        PokerAction::Call
    } else {
        PokerAction::Fold
    }
}

fn tight_aggressive(view: &PokerView) -> PokerAction {
    let threshold = view.param(TIGHT_AGGRESSIVE, 0);
    let pot_fraction = view.param(TIGHT_AGGRESSIVE, 1);
    let strength = hand_strength(view.hole, view.community);
    if strength < threshold {
        return check_or_fold(view);
    }
    if strength > threshold + 0.1 {
        PokerAction::Raise((view.pot * pot_fraction).max(view.min_raise))
    } else if view.to_call <= 0.0 {
        PokerAction::Check
    } else {
        PokerAction::Call
    }
}

fn loose_aggressive(view: &PokerView, rng: &mut SimRng) -> PokerAction {
    let threshold = view.param(LOOSE_AGGRESSIVE, 0);
    let pot_fraction = view.param(LOOSE_AGGRESSIVE, 1);
    let bluff = view.param(LOOSE_AGGRESSIVE, 2);
    let strength = hand_strength(view.hole, view.community);
    if strength >= threshold + 0.15 {
        return PokerAction::Raise((view.pot * pot_fraction).max(view.min_raise));
    }
    if strength >= threshold {
        return if view.to_call <= 0.0 {
            PokerAction::Check
        } else {
            PokerAction::Call
        };
    }
    if rng.gen_range(0.0..1.0f32) < bluff {
        return PokerAction::Raise(view.min_raise.max(view.pot * 0.5));
    }
    check_or_fold(view)
}

fn balanced(view: &PokerView, rng: &mut SimRng) -> PokerAction {
    let aggression = view.param(BALANCED, 0);
    let bluff = view.param(BALANCED, 1);
    let strength = hand_strength(view.hole, view.community);
    let equity_edge = strength - view.pot_odds();
    if strength > 0.65 && rng.gen_range(0.0..1.0f32) < aggression {
        return PokerAction::Raise(view.min_raise.max(view.pot * 0.75));
    }
    if equity_edge > 0.0 {
        return if view.to_call <= 0.0 {
            PokerAction::Check
        } else {
            PokerAction::Call
        };
    }
    if rng.gen_range(0.0..1.0f32) < bluff {
        return PokerAction::Raise(view.min_raise);
    }
    check_or_fold(view)
}

fn maniac(view: &PokerView, rng: &mut SimRng) -> PokerAction {
    let frequency = view.param(MANIAC, 0);
    let pot_fraction = view.param(MANIAC, 1);
    if rng.gen_range(0.0..1.0f32) < frequency {
        PokerAction::Raise((view.pot * pot_fraction).max(view.min_raise))
    } else if view.to_call <= 0.0 {
        PokerAction::Check
    } else {
        PokerAction::Call
    }
}

/// Scripted GTO approximation: open-raise premium, 3-bet the top of the
/// range, fold to aggression without equity, and bluff at a frequency that
/// keeps opponents indifferent given the pot odds they are offered.
fn gto_expert(view: &PokerView, rng: &mut SimRng) -> PokerAction {
    let premium = view.param(GTO_EXPERT, 0);
    let cbet = view.param(GTO_EXPERT, 1);
    let strength = hand_strength(view.hole, view.community);

    if view.street == Street::Preflop {
        if strength >= premium + 0.15 {
            // top of range: 3-bet over any action
            return PokerAction::Raise((view.pot * 1.5).max(view.min_raise));
        }
        if strength >= premium {
            return if view.facing_aggression() {
                PokerAction::Call
            } else {
                PokerAction::Raise((view.pot).max(view.min_raise))
            };
        }
        if view.facing_aggression() {
            return check_or_fold(view);
        }
        return if view.to_call <= 0.0 {
            PokerAction::Check
        } else if strength >= view.pot_odds() {
            PokerAction::Call
        } else {
            PokerAction::Fold
        };
    }

    // postflop
    let equity_edge = strength - view.pot_odds();
    if strength >= 0.7 {
        return PokerAction::Raise((view.pot * 0.75).max(view.min_raise));
    }
    if view.facing_aggression() && equity_edge < 0.0 {
        return check_or_fold(view);
    }
    if view.to_call <= 0.0 {
        // continuation bet / balanced bluff: frequency keeps a caller
        // indifferent at the pot odds a 3/4-pot bet offers
        let bet = view.pot * 0.75;
        let indifference = bet / (view.pot + 2.0 * bet);
        let frequency = if strength >= 0.4 { cbet } else { indifference };
        if rng.gen_range(0.0..1.0f32) < frequency {
            return PokerAction::Raise(bet.max(view.min_raise));
        }
        return PokerAction::Check;
    }
    if equity_edge > 0.0 {
        PokerAction::Call
    } else {
        PokerAction::Fold
    }
}

fn random(view: &PokerView, rng: &mut SimRng) -> PokerAction {
    match rng.gen_range(0..4u8) {
        0 => PokerAction::Fold,
        1 => {
            if view.to_call <= 0.0 {
                PokerAction::Check
            } else {
                PokerAction::Call
            }
        }
        2 => PokerAction::Call,
        _ => PokerAction::Raise(view.min_raise),
    }
}
