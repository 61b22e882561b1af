//! Duplicate bridge scoring.

use crate::contract::{Contract, DoubleStatus};
use crate::strain::Strain;

fn multiplier(double_status: DoubleStatus) -> i32 {
    match double_status {
        DoubleStatus::Undoubled => 1,
        DoubleStatus::Doubled => 2,
        DoubleStatus::Redoubled => 4,
    }
}

/// Below-the-line value of the contracted tricks.
pub fn trick_score(level: u8, strain: Strain, double_status: DoubleStatus) -> i32 {
    let level = level as i32;
    let base = match strain {
        Strain::NoTrump => 40 + (level - 1) * 30,
        Strain::Hearts | Strain::Spades => level * 30,
        Strain::Clubs | Strain::Diamonds => level * 20,
    };
    base * multiplier(double_status)
}

fn made_score(contract: &Contract, overtricks: i32, vulnerable: bool) -> i32 {
    let tricks = trick_score(contract.level, contract.strain, contract.double_status);

    let game_bonus = match (tricks >= 100, vulnerable) {
        (true, true) => 500,
        (true, false) => 300,
        (false, _) => 50,
    };

    let slam_bonus = match (contract.level, vulnerable) {
        (6, false) => 500,
        (6, true) => 750,
        (7, false) => 1000,
        (7, true) => 1500,
        _ => 0,
    };

    let overtrick_value = match contract.double_status {
        DoubleStatus::Undoubled => match contract.strain {
            Strain::Clubs | Strain::Diamonds => 20,
            _ => 30,
        },
        DoubleStatus::Doubled => {
            if vulnerable {
                200
            } else {
                100
            }
        }
        DoubleStatus::Redoubled => {
            if vulnerable {
                400
            } else {
                200
            }
        }
    };

    let insult = match contract.double_status {
        DoubleStatus::Undoubled => 0,
        DoubleStatus::Doubled => 50,
        DoubleStatus::Redoubled => 100,
    };

    tricks + game_bonus + slam_bonus + overtricks * overtrick_value + insult
}

fn penalty(double_status: DoubleStatus, undertricks: i32, vulnerable: bool) -> i32 {
    if double_status == DoubleStatus::Undoubled {
        return undertricks * if vulnerable { 100 } else { 50 };
    }
    // Doubled schedule; redoubled is twice this.
    let mut total = 0;
    for n in 1..=undertricks {
        total += match (vulnerable, n) {
            (true, 1) => 200,
            (true, _) => 300,
            (false, 1) => 100,
            (false, 2 | 3) => 200,
            (false, _) => 300,
        };
    }
    total * multiplier(double_status) / 2
}

/// Score for the declaring side given the tricks declarer took. Negative when
/// the contract fails.
pub fn duplicate_score(contract: &Contract, declarer_tricks: u8, vulnerable: bool) -> i32 {
    let diff = declarer_tricks as i32 - contract.required_tricks() as i32;
    if diff >= 0 {
        made_score(contract, diff, vulnerable)
    } else {
        -penalty(contract.double_status, -diff, vulnerable)
    }
}
