use super::card::Rank;
use super::hand::Hand;
use super::ranking::{Kickers, Ranking, Strength};

const WHEEL: u16 = 0b1_0000_0000_1111;

/// Bitwise 5-to-7-card hand evaluator.
///
/// Works entirely on the packed `u64` hand: per-rank nibble counts and
/// per-suit rank masks, O(1) per evaluation with no table lookups.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(hand: Hand) -> Self {
        Self(hand)
    }
}

impl Evaluator {
    pub fn strength(&self) -> Strength {
        let ranking = self.find_ranking();
        let kickers = self.find_kickers(ranking);
        Strength::new(ranking, kickers)
    }

    pub fn find_ranking(&self) -> Ranking {
        debug_assert!(!self.0.is_empty(), "evaluating an empty hand");
        None.or_else(|| self.find_straight_flush())
            .or_else(|| self.find_four_of_a_kind())
            .or_else(|| self.find_full_house())
            .or_else(|| self.find_flush())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_three_of_a_kind())
            .or_else(|| self.find_two_pair())
            .or_else(|| self.find_one_pair())
            .map_or_else(|| Ranking::HighCard(top_rank(self.rank_mask())), |r| r)
    }

    pub fn find_kickers(&self, ranking: Ranking) -> Kickers {
        let n = ranking.kicker_count();
        if n == 0 {
            return Kickers(0);
        }
        let available = match ranking {
            Ranking::Flush(hi) => {
                let suit = self
                    .flush_suit()
                    .expect("flush ranking implies a flush suit");
                self.suit_masks()[suit] & !hi.mask()
            }
            _ => self.rank_mask() & !ranking.used_mask(),
        };
        Kickers(keep_top_bits(available, n))
    }

    fn find_straight_flush(&self) -> Option<Ranking> {
        let masks = self.suit_masks();
        // at most one suit can hold five of seven cards
        masks
            .iter()
            .filter(|m| m.count_ones() >= 5)
            .find_map(|m| straight_high(*m))
            .map(Ranking::StraightFlush)
    }

    fn find_four_of_a_kind(&self) -> Option<Ranking> {
        self.highest_rank_with_count(4, None)
            .map(Ranking::FourOfAKind)
    }

    fn find_full_house(&self) -> Option<Ranking> {
        let trips = self.highest_rank_with_count(3, None)?;
        let pair = self.highest_rank_with_count(2, Some(trips))?;
        Some(Ranking::FullHouse(trips, pair))
    }

    fn find_flush(&self) -> Option<Ranking> {
        let suit = self.flush_suit()?;
        Some(Ranking::Flush(top_rank(self.suit_masks()[suit])))
    }

    fn find_straight(&self) -> Option<Ranking> {
        straight_high(self.rank_mask()).map(Ranking::Straight)
    }

    fn find_three_of_a_kind(&self) -> Option<Ranking> {
        self.highest_rank_with_count(3, None)
            .map(Ranking::ThreeOfAKind)
    }

    fn find_two_pair(&self) -> Option<Ranking> {
        let hi = self.highest_rank_with_count(2, None)?;
        let lo = self.highest_rank_with_count(2, Some(hi))?;
        Some(Ranking::TwoPair(hi, lo))
    }

    fn find_one_pair(&self) -> Option<Ranking> {
        self.highest_rank_with_count(2, None).map(Ranking::OnePair)
    }

    /// Highest rank held at least `count` times, skipping `exclude`.
    fn highest_rank_with_count(&self, count: u32, exclude: Option<Rank>) -> Option<Rank> {
        let bits = self.0.bits();
        for r in (0..13u8).rev() {
            if exclude == Some(Rank::from(r)) {
                continue;
            }
            let nibble = (bits >> (r * 4)) & 0xF;
            if nibble.count_ones() >= count {
                return Some(Rank::from(r));
            }
        }
        None
    }

    fn flush_suit(&self) -> Option<usize> {
        self.suit_masks().iter().position(|m| m.count_ones() >= 5)
    }

    /// Which ranks are present, neglecting suit.
    fn rank_mask(&self) -> u16 {
        let bits = self.0.bits();
        let mut mask = 0u16;
        for r in 0..13u8 {
            if (bits >> (r * 4)) & 0xF != 0 {
                mask |= 1 << r;
            }
        }
        mask
    }

    /// Which ranks are present, per suit.
    fn suit_masks(&self) -> [u16; 4] {
        let bits = self.0.bits();
        let mut masks = [0u16; 4];
        for r in 0..13u8 {
            let nibble = (bits >> (r * 4)) & 0xF;
            for (s, mask) in masks.iter_mut().enumerate() {
                if nibble & (1 << s) != 0 {
                    *mask |= 1 << r;
                }
            }
        }
        masks
    }
}

fn top_rank(mask: u16) -> Rank {
    debug_assert!(mask != 0);
    Rank::from(15 - mask.leading_zeros() as u8)
}

fn straight_high(mask: u16) -> Option<Rank> {
    let runs = mask & (mask << 1) & (mask << 2) & (mask << 3) & (mask << 4);
    if runs != 0 {
        Some(top_rank(runs))
    } else if mask & WHEEL == WHEEL {
        Some(Rank::Five)
    } else {
        None
    }
}

fn keep_top_bits(mask: u16, n: usize) -> u16 {
    let mut bits = mask;
    while bits.count_ones() as usize > n {
        bits &= bits - 1; // clears the lowest set bit
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::card::{Card, Suit};

    fn ranking_of(cards: Vec<(Rank, Suit)>) -> Ranking {
        let hand: Hand = cards.into_iter().map(|(r, s)| Card::new(r, s)).collect();
        Evaluator::from(hand).find_ranking()
    }

    fn strength_of(cards: Vec<(Rank, Suit)>) -> Strength {
        let hand: Hand = cards.into_iter().map(|(r, s)| Card::new(r, s)).collect();
        Evaluator::from(hand).strength()
    }

    #[test]
    fn high_card() {
        let hand = vec![
            (Rank::King, Suit::Diamond),
            (Rank::Jack, Suit::Spade),
            (Rank::Nine, Suit::Heart),
            (Rank::Six, Suit::Club),
            (Rank::Three, Suit::Spade),
        ];
        assert_eq!(ranking_of(hand), Ranking::HighCard(Rank::King));
    }

    #[test]
    fn one_pair() {
        let hand = vec![
            (Rank::Seven, Suit::Spade),
            (Rank::Seven, Suit::Diamond),
            (Rank::Queen, Suit::Heart),
            (Rank::Nine, Suit::Club),
            (Rank::Four, Suit::Spade),
        ];
        assert_eq!(ranking_of(hand), Ranking::OnePair(Rank::Seven));
    }

    #[test]
    fn two_pair() {
        let hand = vec![
            (Rank::Jack, Suit::Club),
            (Rank::Jack, Suit::Heart),
            (Rank::Four, Suit::Spade),
            (Rank::Four, Suit::Diamond),
            (Rank::Eight, Suit::Heart),
        ];
        assert_eq!(ranking_of(hand), Ranking::TwoPair(Rank::Jack, Rank::Four));
    }

    #[test]
    fn three_of_a_kind() {
        let hand = vec![
            (Rank::Six, Suit::Spade),
            (Rank::Six, Suit::Heart),
            (Rank::Six, Suit::Club),
            (Rank::King, Suit::Diamond),
            (Rank::Two, Suit::Spade),
        ];
        assert_eq!(ranking_of(hand), Ranking::ThreeOfAKind(Rank::Six));
    }

    #[test]
    fn straight() {
        let hand = vec![
            (Rank::Five, Suit::Club),
            (Rank::Six, Suit::Diamond),
            (Rank::Seven, Suit::Heart),
            (Rank::Eight, Suit::Spade),
            (Rank::Nine, Suit::Diamond),
        ];
        assert_eq!(ranking_of(hand), Ranking::Straight(Rank::Nine));
    }

    #[test]
    fn wheel_straight() {
        let hand = vec![
            (Rank::Ace, Suit::Diamond),
            (Rank::Two, Suit::Club),
            (Rank::Three, Suit::Spade),
            (Rank::Four, Suit::Heart),
            (Rank::Five, Suit::Diamond),
        ];
        assert_eq!(ranking_of(hand), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn seven_cards_prefer_the_higher_straight() {
        // the wheel is present, but 3-to-7 outranks it
        let hand = vec![
            (Rank::Ace, Suit::Club),
            (Rank::Two, Suit::Diamond),
            (Rank::Three, Suit::Heart),
            (Rank::Four, Suit::Spade),
            (Rank::Five, Suit::Club),
            (Rank::Six, Suit::Diamond),
            (Rank::Seven, Suit::Heart),
        ];
        assert_eq!(ranking_of(hand), Ranking::Straight(Rank::Seven));
    }

    #[test]
    fn flush() {
        let hand = vec![
            (Rank::King, Suit::Heart),
            (Rank::Ten, Suit::Heart),
            (Rank::Eight, Suit::Heart),
            (Rank::Five, Suit::Heart),
            (Rank::Two, Suit::Heart),
        ];
        assert_eq!(ranking_of(hand), Ranking::Flush(Rank::King));
    }

    #[test]
    fn flush_beats_straight_in_seven_cards() {
        // queen-high straight on the board, but five clubs in the hand
        let hand = vec![
            (Rank::Eight, Suit::Spade),
            (Rank::Nine, Suit::Club),
            (Rank::Ten, Suit::Club),
            (Rank::Jack, Suit::Club),
            (Rank::Queen, Suit::Spade),
            (Rank::Two, Suit::Club),
            (Rank::Six, Suit::Club),
        ];
        assert_eq!(ranking_of(hand), Ranking::Flush(Rank::Jack));
    }

    #[test]
    fn full_house() {
        let hand = vec![
            (Rank::Nine, Suit::Spade),
            (Rank::Nine, Suit::Heart),
            (Rank::Nine, Suit::Diamond),
            (Rank::Queen, Suit::Club),
            (Rank::Queen, Suit::Spade),
        ];
        assert_eq!(ranking_of(hand), Ranking::FullHouse(Rank::Nine, Rank::Queen));
    }

    #[test]
    fn double_trips_is_full_house() {
        let hand = vec![
            (Rank::Eight, Suit::Spade),
            (Rank::Eight, Suit::Heart),
            (Rank::Eight, Suit::Diamond),
            (Rank::Five, Suit::Club),
            (Rank::Five, Suit::Spade),
            (Rank::Five, Suit::Heart),
            (Rank::Jack, Suit::Diamond),
        ];
        assert_eq!(ranking_of(hand), Ranking::FullHouse(Rank::Eight, Rank::Five));
    }

    #[test]
    fn four_of_a_kind() {
        let hand = vec![
            (Rank::Three, Suit::Spade),
            (Rank::Three, Suit::Heart),
            (Rank::Three, Suit::Diamond),
            (Rank::Three, Suit::Club),
            (Rank::Ace, Suit::Spade),
        ];
        assert_eq!(ranking_of(hand), Ranking::FourOfAKind(Rank::Three));
    }

    #[test]
    fn straight_flush() {
        let hand = vec![
            (Rank::Five, Suit::Diamond),
            (Rank::Six, Suit::Diamond),
            (Rank::Seven, Suit::Diamond),
            (Rank::Eight, Suit::Diamond),
            (Rank::Nine, Suit::Diamond),
        ];
        assert_eq!(ranking_of(hand), Ranking::StraightFlush(Rank::Nine));
    }

    #[test]
    fn straight_flush_beats_trips_on_the_side() {
        let hand = vec![
            (Rank::Nine, Suit::Club),
            (Rank::Ten, Suit::Club),
            (Rank::Jack, Suit::Club),
            (Rank::Queen, Suit::Club),
            (Rank::King, Suit::Club),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
        ];
        assert_eq!(ranking_of(hand), Ranking::StraightFlush(Rank::King));
    }

    #[test]
    fn singleton_outranks_the_third_pair_as_kicker() {
        let strength = strength_of(vec![
            (Rank::Queen, Suit::Spade),
            (Rank::Queen, Suit::Heart),
            (Rank::Nine, Suit::Diamond),
            (Rank::Nine, Suit::Club),
            (Rank::Six, Suit::Spade),
            (Rank::Six, Suit::Heart),
            (Rank::King, Suit::Diamond),
        ]);
        assert_eq!(strength.ranking, Ranking::TwoPair(Rank::Queen, Rank::Nine));
        assert_eq!(strength.kickers, Kickers(Rank::King.mask()));
    }

    #[test]
    fn third_pair_rank_serves_as_kicker() {
        let strength = strength_of(vec![
            (Rank::Jack, Suit::Spade),
            (Rank::Jack, Suit::Heart),
            (Rank::Eight, Suit::Diamond),
            (Rank::Eight, Suit::Club),
            (Rank::Five, Suit::Spade),
            (Rank::Five, Suit::Heart),
            (Rank::Two, Suit::Diamond),
        ]);
        assert_eq!(strength.ranking, Ranking::TwoPair(Rank::Jack, Rank::Eight));
        assert_eq!(strength.kickers, Kickers(Rank::Five.mask()));
    }

    #[test]
    fn kicker_breaks_pair_tie() {
        let better = strength_of(vec![
            (Rank::Nine, Suit::Spade),
            (Rank::Nine, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::Seven, Suit::Club),
            (Rank::Two, Suit::Spade),
        ]);
        let worse = strength_of(vec![
            (Rank::Nine, Suit::Diamond),
            (Rank::Nine, Suit::Club),
            (Rank::King, Suit::Heart),
            (Rank::Seven, Suit::Spade),
            (Rank::Two, Suit::Heart),
        ]);
        assert!(better > worse);
    }

    #[test]
    fn exact_tie_across_suits() {
        let a = strength_of(vec![
            (Rank::Nine, Suit::Spade),
            (Rank::Nine, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::Seven, Suit::Club),
            (Rank::Two, Suit::Spade),
        ]);
        let b = strength_of(vec![
            (Rank::Nine, Suit::Diamond),
            (Rank::Nine, Suit::Club),
            (Rank::Ace, Suit::Heart),
            (Rank::Seven, Suit::Diamond),
            (Rank::Two, Suit::Heart),
        ]);
        assert_eq!(a, b);
    }
}
