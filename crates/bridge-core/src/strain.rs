use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bidding denomination: one of the four suits or no-trump.
/// Ordered clubs < diamonds < hearts < spades < no-trump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strain {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

const SYMBOLS: [char; 5] = ['C', 'D', 'H', 'S', 'N'];

impl Strain {
    pub const ALL: [Strain; 5] = [
        Strain::Clubs,
        Strain::Diamonds,
        Strain::Hearts,
        Strain::Spades,
        Strain::NoTrump,
    ];

    /// Position in bidding order, 0 for clubs through 4 for no-trump.
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn to_char(self) -> char {
        SYMBOLS[self.idx()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        SYMBOLS
            .iter()
            .position(|&s| s == c)
            .map(|i| Strain::ALL[i])
    }

    pub fn from_suit(suit: Suit) -> Self {
        Strain::ALL[suit.idx()]
    }

    /// The trump suit a contract in this strain would have.
    pub fn to_suit(self) -> Option<Suit> {
        Suit::ALL.get(self.idx()).copied()
    }

    pub fn is_major(self) -> bool {
        matches!(self, Strain::Hearts | Strain::Spades)
    }

    pub fn is_minor(self) -> bool {
        matches!(self, Strain::Clubs | Strain::Diamonds)
    }

    /// Lowest level at which a contract in this strain scores game.
    pub fn game_level(self) -> u8 {
        match self {
            Strain::NoTrump => 3,
            Strain::Hearts | Strain::Spades => 4,
            Strain::Clubs | Strain::Diamonds => 5,
        }
    }
}

impl From<Suit> for Strain {
    fn from(suit: Suit) -> Self {
        Strain::from_suit(suit)
    }
}

impl FromStr for Strain {
    type Err = ();

    /// Accepts a single letter or "NT".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("NT") {
            return Ok(Strain::NoTrump);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Strain::from_char(c).ok_or(()),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_nt() {
        assert_eq!(Strain::from_char('s'), Some(Strain::Spades));
        assert_eq!(Strain::from_char('N'), Some(Strain::NoTrump));
        assert_eq!(Strain::from_char('x'), None);
        assert_eq!("nt".parse::<Strain>(), Ok(Strain::NoTrump));
        assert_eq!("H".parse::<Strain>(), Ok(Strain::Hearts));
        assert!("HS".parse::<Strain>().is_err());
    }

    #[test]
    fn test_suit_conversions_agree() {
        for suit in Suit::ALL {
            assert_eq!(Strain::from(suit).to_suit(), Some(suit));
        }
        assert_eq!(Strain::NoTrump.to_suit(), None);
    }

    #[test]
    fn test_bidding_order() {
        assert!(Strain::Clubs < Strain::Diamonds);
        assert!(Strain::Spades < Strain::NoTrump);
        assert_eq!(Strain::NoTrump.idx(), 4);
    }

    #[test]
    fn test_game_level() {
        assert_eq!(Strain::NoTrump.game_level(), 3);
        assert_eq!(Strain::Hearts.game_level(), 4);
        assert_eq!(Strain::Clubs.game_level(), 5);
    }
}
