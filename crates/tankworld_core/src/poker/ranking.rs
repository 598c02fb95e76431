use super::card::Rank;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A hand's category and its defining rank(s).
///
/// Declaration order is strength order, so the derived `Ord` compares
/// categories correctly; kicker cards break ties within a category.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Ranking {
    HighCard(Rank),
    OnePair(Rank),
    TwoPair(Rank, Rank),
    ThreeOfAKind(Rank),
    Straight(Rank),
    Flush(Rank),
    FullHouse(Rank, Rank),
    FourOfAKind(Rank),
    StraightFlush(Rank),
}

impl Ranking {
    /// How many kicker cards complete the 5-card hand.
    pub fn kicker_count(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOfAKind(_) => 2,
            Ranking::TwoPair(_, _) | Ranking::FourOfAKind(_) => 1,
            Ranking::Flush(_) => 4,
            _ => 0,
        }
    }

    /// Rank-mask of the cards already consumed by the category.
    pub fn used_mask(&self) -> u16 {
        match *self {
            Ranking::TwoPair(hi, lo) | Ranking::FullHouse(hi, lo) => hi.mask() | lo.mask(),
            Ranking::HighCard(r)
            | Ranking::OnePair(r)
            | Ranking::ThreeOfAKind(r)
            | Ranking::Straight(r)
            | Ranking::Flush(r)
            | Ranking::FourOfAKind(r)
            | Ranking::StraightFlush(r) => r.mask(),
        }
    }
}

impl Display for Ranking {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "HighCard      {r}"),
            Ranking::OnePair(r) => write!(f, "OnePair       {r}"),
            Ranking::TwoPair(a, b) => write!(f, "TwoPair       {a}{b}"),
            Ranking::ThreeOfAKind(r) => write!(f, "ThreeOfAKind  {r}"),
            Ranking::Straight(r) => write!(f, "Straight      {r}"),
            Ranking::Flush(r) => write!(f, "Flush         {r}"),
            Ranking::FullHouse(a, b) => write!(f, "FullHouse     {a}{b}"),
            Ranking::FourOfAKind(r) => write!(f, "FourOfAKind   {r}"),
            Ranking::StraightFlush(r) => write!(f, "StraightFlush {r}"),
        }
    }
}

/// Kicker cards as a 13-bit rank mask. Higher mask compares higher because
/// high-rank bits dominate, which matches card-by-card comparison of
/// equally-sized kicker sets.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Kickers(pub u16);

impl Display for Kickers {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mut bits = self.0;
        while bits != 0 {
            let top = 15 - bits.leading_zeros() as u8;
            write!(f, "{}", Rank::from(top))?;
            bits &= !(1 << top);
        }
        Ok(())
    }
}

/// Total hand strength: category plus kickers. Derived `Ord` compares the
/// category first, then the kicker mask; exact ties are real and explicit.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Strength {
    pub ranking: Ranking,
    pub kickers: Kickers,
}

impl Strength {
    pub fn new(ranking: Ranking, kickers: Kickers) -> Self {
        Self { ranking, kickers }
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:<18}{}", self.ranking, self.kickers)
    }
}
