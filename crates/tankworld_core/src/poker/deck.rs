use super::card::Card;
use crate::rng::SimRng;
use rand::seq::SliceRandom;

/// A 52-card deck, shuffled with the poker phase RNG.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Fisher-Yates shuffle driven by the caller's RNG; there is no other
    /// way to construct a deck.
    pub fn shuffled(rng: &mut SimRng) -> Deck {
        let mut cards: Vec<Card> = (0..52).map(Card::from).collect();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// Dealing from an empty deck is a programming error: the engine deals
    /// at most `2n + 5` of 52 cards per game.
    pub fn draw(&mut self) -> Card {
        debug_assert!(!self.cards.is_empty(), "dealt from an empty deck");
        self.cards.pop().unwrap_or_else(|| Card::from(0u8))
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}
