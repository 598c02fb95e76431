//! The betting state machine.
//!
//! One [`PokerGame`] resolves one multi-round no-limit hold'em game to
//! completion: `Dealing -> Preflop -> Flop -> Turn -> River -> Showdown ->
//! Settled`. Stakes are pre-clamped to each player's energy, so losing a
//! game can never take a fish below zero.

use super::card::Card;
use super::deck::Deck;
use super::evaluator::Evaluator;
use super::hand::Hand;
use super::ranking::{Ranking, Strength};
use super::strategy::{self, PokerAction, PokerView};
use crate::config::PokerConfig;
use crate::rng::SimRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tankworld_data::{EntityId, PokerStyle};

/// Betting street used by strategy views.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

/// Explicit game state; phases advance strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Dealing,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Settled,
}

/// Monetary table parameters derived from [`PokerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct TableStakes {
    pub base_stake: f32,
    pub house_cut: f32,
    pub small_blind: f32,
    pub big_blind: f32,
    pub max_raises_per_round: u32,
}

impl From<&PokerConfig> for TableStakes {
    fn from(config: &PokerConfig) -> Self {
        Self {
            base_stake: config.base_stake,
            house_cut: config.house_cut,
            small_blind: config.base_stake * config.small_blind_fraction,
            big_blind: config.base_stake * config.big_blind_fraction,
            max_raises_per_round: config.max_raises_per_round,
        }
    }
}

/// One participant entering a game.
#[derive(Debug, Clone)]
pub struct Entrant {
    pub id: EntityId,
    pub style: PokerStyle,
    pub params: Vec<f32>,
    /// Energy available; the buy-in is clamped to this.
    pub energy: f32,
}

#[derive(Debug, Clone)]
struct Seat {
    id: EntityId,
    style: PokerStyle,
    params: Vec<f32>,
    stack: f32,
    committed: f32,
    street_committed: f32,
    hole: [Card; 2],
    folded: bool,
    all_in: bool,
    bluffed: bool,
}

/// Result of one settled game, consumed by the tracker and by post-poker
/// emergency mating.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PokerOutcome {
    pub winner: EntityId,
    pub pot: f32,
    pub house_cut: f32,
    pub energy_delta_per_player: Vec<(EntityId, f32)>,
    pub hand_ranks: Vec<(EntityId, Option<Ranking>)>,
    pub bluff_flags: Vec<(EntityId, bool)>,
    pub button_seat: usize,
}

pub struct PokerGame {
    stakes: TableStakes,
    seats: Vec<Seat>,
    button: usize,
    deck: Deck,
    community: Vec<Card>,
    pot: f32,
    state: GameState,
    history: Vec<(usize, PokerAction)>,
}

impl PokerGame {
    /// Seats the entrants, randomizes the button with the poker RNG, and
    /// shuffles. At least two entrants are required.
    pub fn new(entrants: Vec<Entrant>, stakes: TableStakes, rng: &mut SimRng) -> Self {
        debug_assert!(entrants.len() >= 2, "poker needs at least two players");
        let button = rng.gen_range(0..entrants.len());
        let deck = Deck::shuffled(rng);
        let seats = entrants
            .into_iter()
            .map(|e| Seat {
                id: e.id,
                style: e.style,
                params: e.params,
                stack: e.energy.min(stakes.base_stake).max(0.0),
                committed: 0.0,
                street_committed: 0.0,
                hole: [Card::from(0u8); 2],
                folded: false,
                all_in: false,
                bluffed: false,
            })
            .collect();
        Self {
            stakes,
            seats,
            button,
            deck,
            community: Vec::with_capacity(5),
            pot: 0.0,
            state: GameState::Dealing,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn button(&self) -> usize {
        self.button
    }

    /// Drives the state machine to completion.
    pub fn run(&mut self, rng: &mut SimRng) -> PokerOutcome {
        while self.state != GameState::Settled {
            self.step(rng);
        }
        self.settle()
    }

    /// One state transition.
    pub fn step(&mut self, rng: &mut SimRng) {
        match self.state {
            GameState::Dealing => {
                self.post_blinds();
                self.deal_hole_cards();
                self.state = GameState::Preflop;
            }
            GameState::Preflop => {
                self.betting_round(Street::Preflop, rng);
                self.state = self.next_or_showdown(GameState::Flop);
            }
            GameState::Flop => {
                for _ in 0..3 {
                    let card = self.deck.draw();
                    self.community.push(card);
                }
                self.betting_round(Street::Flop, rng);
                self.state = self.next_or_showdown(GameState::Turn);
            }
            GameState::Turn => {
                let card = self.deck.draw();
                self.community.push(card);
                self.betting_round(Street::Turn, rng);
                self.state = self.next_or_showdown(GameState::River);
            }
            GameState::River => {
                let card = self.deck.draw();
                self.community.push(card);
                self.betting_round(Street::River, rng);
                self.state = GameState::Showdown;
            }
            GameState::Showdown => {
                self.state = GameState::Settled;
            }
            GameState::Settled => {}
        }
    }

    fn active_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.folded).count()
    }

    fn next_or_showdown(&self, next: GameState) -> GameState {
        if self.active_count() <= 1 {
            GameState::Showdown
        } else {
            next
        }
    }

    fn post_blinds(&mut self) {
        let n = self.seats.len();
        let sb_seat = (self.button + 1) % n;
        let bb_seat = (self.button + 2) % n;
        let sb = self.stakes.small_blind;
        let bb = self.stakes.big_blind;
        self.commit(sb_seat, sb);
        self.commit(bb_seat, bb);
    }

    fn deal_hole_cards(&mut self) {
        let n = self.seats.len();
        // two passes starting left of the button
        for round in 0..2 {
            for offset in 1..=n {
                let seat = (self.button + offset) % n;
                let card = self.deck.draw();
                self.seats[seat].hole[round] = card;
            }
        }
    }

    /// Commits up to `amount` from the seat's stack into the pot.
    fn commit(&mut self, seat: usize, amount: f32) -> f32 {
        let s = &mut self.seats[seat];
        let paid = amount.min(s.stack);
        s.stack -= paid;
        s.committed += paid;
        s.street_committed += paid;
        if s.stack <= f32::EPSILON {
            s.all_in = true;
        }
        self.pot += paid;
        paid
    }

    fn betting_round(&mut self, street: Street, rng: &mut SimRng) {
        let n = self.seats.len();
        let mut current_bet = if street == Street::Preflop {
            // blinds are already in; the big blind sets the price
            self.seats
                .iter()
                .map(|s| s.street_committed)
                .fold(0.0, f32::max)
        } else {
            for s in &mut self.seats {
                s.street_committed = 0.0;
            }
            0.0
        };

        let mut raises_left = self.stakes.max_raises_per_round;
        let can_act = |s: &Seat| !s.folded && !s.all_in;
        let mut pending: usize = self.seats.iter().filter(|s| can_act(s)).count();
        let mut position = self.button + 1; // left of the button, both pre- and postflop

        while pending > 0 && self.active_count() > 1 {
            let seat_index = position % n;
            position += 1;
            if !can_act(&self.seats[seat_index]) {
                continue;
            }

            let to_call = (current_bet - self.seats[seat_index].street_committed).max(0.0);
            let action = self.decide_for(seat_index, street, to_call, rng);
            let action = self.legalize(seat_index, action, to_call, raises_left);
            self.history.push((seat_index, action));

            match action {
                PokerAction::Fold => {
                    self.seats[seat_index].folded = true;
                    pending -= 1;
                }
                PokerAction::Check => {
                    pending -= 1;
                }
                PokerAction::Call => {
                    self.commit(seat_index, to_call);
                    pending -= 1;
                }
                PokerAction::Raise(amount) => {
                    self.commit(seat_index, to_call + amount);
                    current_bet = current_bet.max(self.seats[seat_index].street_committed);
                    raises_left = raises_left.saturating_sub(1);
                    // everyone still standing must respond to the raise
                    pending = self
                        .seats
                        .iter()
                        .enumerate()
                        .filter(|(i, s)| *i != seat_index && can_act(s))
                        .count();
                }
            }
        }
    }

    fn decide_for(
        &mut self,
        seat_index: usize,
        street: Street,
        to_call: f32,
        rng: &mut SimRng,
    ) -> PokerAction {
        let seat = &self.seats[seat_index];
        let view = PokerView {
            hole: seat.hole,
            community: &self.community,
            street,
            pot: self.pot,
            to_call,
            stack: seat.stack,
            min_raise: self.stakes.big_blind,
            seat: seat_index,
            button_seat: self.button,
            history: &self.history,
            params: &seat.params,
        };
        let action = strategy::decide(seat.style, &view, rng);
        if matches!(action, PokerAction::Raise(_)) {
            let strength = strategy::hand_strength(seat.hole, &self.community);
            if strength < 0.35 {
                self.seats[seat_index].bluffed = true;
            }
        }
        action
    }

    /// Downgrades illegal actions instead of failing the game: a check into
    /// a live bet becomes a fold; raises degrade to calls once the raise cap
    /// is spent or the stack cannot cover a legal raise.
    fn legalize(
        &self,
        seat_index: usize,
        action: PokerAction,
        to_call: f32,
        raises_left: u32,
    ) -> PokerAction {
        let seat = &self.seats[seat_index];
        match action {
            PokerAction::Fold => PokerAction::Fold,
            PokerAction::Check => {
                if to_call > 0.0 {
                    tracing::warn!(
                        seat = seat_index,
                        style = ?seat.style,
                        "illegal check facing a bet; downgraded to fold"
                    );
                    PokerAction::Fold
                } else {
                    PokerAction::Check
                }
            }
            PokerAction::Call => {
                if to_call <= 0.0 {
                    PokerAction::Check
                } else {
                    PokerAction::Call
                }
            }
            PokerAction::Raise(amount) => {
                if raises_left == 0 {
                    return if to_call > 0.0 {
                        PokerAction::Call
                    } else {
                        PokerAction::Check
                    };
                }
                let headroom = seat.stack - to_call;
                if headroom <= 0.0 {
                    return if to_call > 0.0 {
                        PokerAction::Call
                    } else {
                        PokerAction::Check
                    };
                }
                let clamped = amount.clamp(self.stakes.big_blind.min(headroom), headroom);
                PokerAction::Raise(clamped)
            }
        }
    }

    fn settle(&mut self) -> PokerOutcome {
        let showdown = self.active_count() > 1;
        let strengths: Vec<Option<Strength>> = self
            .seats
            .iter()
            .map(|s| {
                if s.folded {
                    None
                } else if showdown {
                    let hand: Hand = s
                        .hole
                        .iter()
                        .copied()
                        .chain(self.community.iter().copied())
                        .collect();
                    Some(Evaluator::from(hand).strength())
                } else {
                    None
                }
            })
            .collect();

        // winners: all non-folded seats tied at the best strength; a lone
        // survivor wins without showing
        let winners: Vec<usize> = if showdown {
            let best = strengths.iter().flatten().max().copied();
            strengths
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_some() && **s == best)
                .map(|(i, _)| i)
                .collect()
        } else {
            self.seats
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.folded)
                .map(|(i, _)| i)
                .collect()
        };
        debug_assert!(!winners.is_empty(), "settlement with no surviving seat");

        // the house cut is charged once on the pot, ties included
        let cut = self.pot * self.stakes.house_cut;
        let award = (self.pot - cut) / winners.len() as f32;

        let mut deltas = Vec::with_capacity(self.seats.len());
        for (i, seat) in self.seats.iter().enumerate() {
            let received = if winners.contains(&i) { award } else { 0.0 };
            deltas.push((seat.id, received - seat.committed));
        }

        let winner = winners
            .iter()
            .map(|&i| self.seats[i].id)
            .min()
            .unwrap_or(self.seats[0].id);

        let hand_ranks = self
            .seats
            .iter()
            .zip(&strengths)
            .map(|(seat, strength)| (seat.id, strength.map(|s| s.ranking)))
            .collect();
        let bluff_flags = self.seats.iter().map(|s| (s.id, s.bluffed)).collect();

        PokerOutcome {
            winner,
            pot: self.pot,
            house_cut: cut,
            energy_delta_per_player: deltas,
            hand_ranks,
            bluff_flags,
            button_seat: self.button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stakes() -> TableStakes {
        TableStakes::from(&PokerConfig::default())
    }

    fn entrant(id: u64, style: PokerStyle, energy: f32) -> Entrant {
        Entrant {
            id: EntityId(id),
            style,
            params: strategy::default_params(style),
            energy,
        }
    }

    #[test]
    fn always_fold_surrenders_its_small_blind() {
        // seat 0 always-folds; whenever seat 0 posts the small blind
        // (button on seat 1) it acts first, folds, and seat 1 collects the
        // blinds minus the house cut. That line is fully deterministic.
        let stakes = stakes();
        let mut saw_fold_first = false;
        for seed in 0..64u64 {
            let mut rng = SimRng::from_seed(seed);
            let mut game = PokerGame::new(
                vec![
                    entrant(1, PokerStyle::AlwaysFold, 100.0),
                    entrant(2, PokerStyle::TightAggressive, 100.0),
                ],
                stakes,
                &mut rng,
            );
            let outcome = game.run(&mut rng);
            let total: f32 = outcome.energy_delta_per_player.iter().map(|(_, d)| d).sum();
            assert!((total + outcome.house_cut).abs() < 1e-3, "seed {seed}");
            if outcome.button_seat == 1 {
                saw_fold_first = true;
                assert_eq!(outcome.winner, EntityId(2), "seed {seed}");
                let fold_delta = outcome
                    .energy_delta_per_player
                    .iter()
                    .find(|(id, _)| *id == EntityId(1))
                    .unwrap()
                    .1;
                let tag_delta = outcome
                    .energy_delta_per_player
                    .iter()
                    .find(|(id, _)| *id == EntityId(2))
                    .unwrap()
                    .1;
                // pot is the two blinds; winner takes it minus the cut
                assert!((fold_delta + stakes.small_blind).abs() < 1e-4, "seed {seed}");
                let pot = stakes.small_blind + stakes.big_blind;
                let expected = (pot - pot * stakes.house_cut) - stakes.big_blind;
                assert!((tag_delta - expected).abs() < 1e-4, "seed {seed}");
            }
        }
        assert!(saw_fold_first);
    }

    #[test]
    fn losses_never_exceed_the_clamped_stake() {
        for seed in 0..50u64 {
            let mut game_rng = SimRng::from_seed(seed.wrapping_mul(0x9E37) ^ 7);
            let mut game = PokerGame::new(
                vec![
                    entrant(1, PokerStyle::Maniac, 3.0),
                    entrant(2, PokerStyle::LooseAggressive, 100.0),
                ],
                stakes(),
                &mut game_rng,
            );
            let outcome = game.run(&mut game_rng);
            let short_delta = outcome
                .energy_delta_per_player
                .iter()
                .find(|(id, _)| *id == EntityId(1))
                .unwrap()
                .1;
            // the short stack bought in for only 3.0 energy
            assert!(short_delta >= -3.0 - 1e-3, "lost {short_delta}");
        }
    }

    #[test]
    fn game_reaches_settled_state() {
        let mut rng = SimRng::from_seed(11);
        let mut game = PokerGame::new(
            vec![
                entrant(1, PokerStyle::Balanced, 100.0),
                entrant(2, PokerStyle::LoosePassive, 100.0),
                entrant(3, PokerStyle::TightPassive, 100.0),
            ],
            stakes(),
            &mut rng,
        );
        let outcome = game.run(&mut rng);
        assert_eq!(game.state(), GameState::Settled);
        assert_eq!(outcome.hand_ranks.len(), 3);
        assert!(outcome.pot > 0.0);
        assert!(outcome.button_seat < 3);
    }

    #[test]
    fn button_frequency_is_fair() {
        let stakes = stakes();
        let games = 9000usize;
        let mut counts = [0usize; 3];
        for i in 0..games {
            let mut rng = SimRng::for_phase(42, 7, i as u64);
            let game = PokerGame::new(
                vec![
                    entrant(1, PokerStyle::AlwaysFold, 100.0),
                    entrant(2, PokerStyle::AlwaysFold, 100.0),
                    entrant(3, PokerStyle::AlwaysFold, 100.0),
                ],
                stakes,
                &mut rng,
            );
            counts[game.button()] += 1;
        }
        for &count in &counts {
            let frequency = count as f64 / games as f64;
            assert!(
                (frequency - 1.0 / 3.0).abs() < 0.02,
                "seat frequency {frequency} outside 1/3 +/- 0.02"
            );
        }
    }

    #[test]
    fn settlement_conserves_energy_minus_cut() {
        for seed in 0..40u64 {
            let mut rng = SimRng::from_seed(seed);
            let mut game = PokerGame::new(
                vec![
                    entrant(1, PokerStyle::Maniac, 50.0),
                    entrant(2, PokerStyle::GtoExpert, 80.0),
                    entrant(3, PokerStyle::Random, 60.0),
                ],
                stakes(),
                &mut rng,
            );
            let outcome = game.run(&mut rng);
            let total: f32 = outcome.energy_delta_per_player.iter().map(|(_, d)| d).sum();
            assert!(
                (total + outcome.house_cut).abs() < 1e-2,
                "seed {seed}: deltas {total} vs cut {}",
                outcome.house_cut
            );
        }
    }
}
