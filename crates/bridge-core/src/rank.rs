use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

const SYMBOLS: &[u8; 13] = b"23456789TJQKA";

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    pub fn to_char(self) -> char {
        char::from(SYMBOLS[self as usize - 2])
    }

    /// Single-character form. `T` and `0` both mean the ten.
    pub fn from_char(c: char) -> Option<Self> {
        let c = match c.to_ascii_uppercase() {
            '0' => 'T',
            other => other,
        };
        SYMBOLS
            .iter()
            .position(|&s| char::from(s) == c)
            .map(|i| Rank::ALL[i])
    }

    /// Milton Work count: A=4, K=3, Q=2, J=1.
    pub fn hcp(self) -> u8 {
        (self as u8).saturating_sub(10)
    }

    pub fn is_honor(self) -> bool {
        self >= Rank::Ten
    }
}

impl FromStr for Rank {
    type Err = ();

    /// Accepts the single-character form and the spelled-out "10".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "10" {
            return Ok(Rank::Ten);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::from_char(c).ok_or(()),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
