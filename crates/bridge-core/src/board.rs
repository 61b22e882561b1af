use crate::deal::Deal;
use crate::hand::Hand;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Position {
    #[default]
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partnership {
    NS,
    EW,
}

const SEAT_LETTERS: [char; 4] = ['N', 'E', 'S', 'W'];

impl Position {
    pub const ALL: [Position; 4] = [
        Position::North,
        Position::East,
        Position::South,
        Position::West,
    ];

    /// Seats are numbered clockwise from North.
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn partnership(self) -> Partnership {
        if self.idx() % 2 == 0 {
            Partnership::NS
        } else {
            Partnership::EW
        }
    }

    /// The seat `steps` places clockwise.
    pub fn rotate(self, steps: usize) -> Self {
        Position::ALL[(self.idx() + steps) % 4]
    }

    pub fn next(self) -> Self {
        self.rotate(1)
    }

    pub fn partner(self) -> Self {
        self.rotate(2)
    }

    /// Left-hand opponent (next in clockwise order).
    pub fn lho(self) -> Self {
        self.next()
    }

    /// Right-hand opponent (previous in clockwise order).
    pub fn rho(self) -> Self {
        self.rotate(3)
    }

    pub fn is_opponent_of(self, other: Position) -> bool {
        self.partnership() != other.partnership()
    }

    pub fn to_char(self) -> char {
        SEAT_LETTERS[self.idx()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        SEAT_LETTERS
            .iter()
            .position(|&l| l == c)
            .map(|i| Position::ALL[i])
    }

    /// Board 1 is dealt by North, board 2 by East, and so on.
    pub fn dealer_from_board_number(board_number: u32) -> Self {
        Position::North.rotate((board_number as usize + 3) % 4)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Vulnerability {
    #[default]
    None,
    NS,
    EW,
    Both,
}

impl Vulnerability {
    pub fn is_vulnerable(self, pos: Position) -> bool {
        match self {
            Vulnerability::None => false,
            Vulnerability::NS => pos.partnership() == Partnership::NS,
            Vulnerability::EW => pos.partnership() == Partnership::EW,
            Vulnerability::Both => true,
        }
    }

    /// Standard 16-board rotation.
    pub fn from_board_number(board_number: u32) -> Self {
        match board_number % 16 {
            1 | 8 | 11 | 14 => Vulnerability::None,
            2 | 5 | 12 | 15 => Vulnerability::NS,
            3 | 6 | 9 | 0 => Vulnerability::EW,
            _ => Vulnerability::Both,
        }
    }
}

/// One board: who deals, who is vulnerable, and the four hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub number: u32,
    pub dealer: Position,
    pub vulnerability: Vulnerability,
    pub deal: Deal,
}

impl Board {
    pub fn new(number: u32, deal: Deal) -> Self {
        Self {
            number,
            dealer: Position::dealer_from_board_number(number),
            vulnerability: Vulnerability::from_board_number(number),
            deal,
        }
    }

    pub fn hand(&self, pos: Position) -> &Hand {
        self.deal.hand(pos)
    }
}
