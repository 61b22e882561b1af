use crate::board::{Partnership, Position};
use crate::strain::Strain;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DoubleStatus {
    #[default]
    Undoubled,
    Doubled,
    Redoubled,
}

impl DoubleStatus {
    pub fn suffix(self) -> &'static str {
        match self {
            DoubleStatus::Undoubled => "",
            DoubleStatus::Doubled => "X",
            DoubleStatus::Redoubled => "XX",
        }
    }
}

/// The final contract of a completed auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    pub level: u8,
    pub strain: Strain,
    pub double_status: DoubleStatus,
    pub declarer: Position,
}

impl Contract {
    pub fn dummy(&self) -> Position {
        self.declarer.partner()
    }

    pub fn opening_leader(&self) -> Position {
        self.declarer.lho()
    }

    pub fn declaring_side(&self) -> Partnership {
        self.declarer.partnership()
    }

    pub fn trump(&self) -> Option<Suit> {
        self.strain.to_suit()
    }

    pub fn required_tricks(&self) -> u8 {
        self.level + 6
    }

    pub fn is_game(&self) -> bool {
        crate::scoring::trick_score(self.level, self.strain, self.double_status) >= 100
    }

    pub fn is_slam(&self) -> bool {
        self.level >= 6
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} by {}",
            self.level,
            self.strain,
            self.double_status.suffix(),
            self.declarer
        )
    }
}
