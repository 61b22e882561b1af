use crate::board::Position;
use crate::call::Call;
use crate::card::Card;
use crate::suit::Suit;
use serde::Serialize;
use thiserror::Error;

/// Broad grouping of rejection reasons, useful to a caller choosing how to
/// report a rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    Turn,
    Auction,
    Card,
}

/// Why a bid or card was refused. The state it was offered to is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("{actual} acted out of turn, {expected} is to act")]
    OutOfTurn {
        expected: Position,
        actual: Position,
    },
    #[error("the auction is already over")]
    AuctionClosed,
    #[error("{call} does not exceed the standing bid {standing}")]
    InsufficientBid { call: Call, standing: Call },
    #[error("bid level {0} is outside 1..=7")]
    InvalidLevel(u8),
    #[error("double is only allowed over an opponent's undoubled bid")]
    DoubleNotAllowed,
    #[error("redouble is only allowed over an opponent's double")]
    RedoubleNotAllowed,
    #[error("{seat} does not hold {card}")]
    CardNotHeld { seat: Position, card: Card },
    #[error("must follow suit in {0}")]
    MustFollowSuit(Suit),
    #[error("all thirteen tricks have been played")]
    BoardComplete,
}

impl IllegalAction {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            IllegalAction::OutOfTurn { .. } => "out_of_turn",
            IllegalAction::AuctionClosed => "auction_closed",
            IllegalAction::InsufficientBid { .. } => "insufficient_bid",
            IllegalAction::InvalidLevel(_) => "invalid_level",
            IllegalAction::DoubleNotAllowed => "double_not_allowed",
            IllegalAction::RedoubleNotAllowed => "redouble_not_allowed",
            IllegalAction::CardNotHeld { .. } => "card_not_held",
            IllegalAction::MustFollowSuit(_) => "must_follow_suit",
            IllegalAction::BoardComplete => "board_complete",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            IllegalAction::OutOfTurn { .. } => ErrorCategory::Turn,
            IllegalAction::AuctionClosed
            | IllegalAction::InsufficientBid { .. }
            | IllegalAction::InvalidLevel(_)
            | IllegalAction::DoubleNotAllowed
            | IllegalAction::RedoubleNotAllowed => ErrorCategory::Auction,
            IllegalAction::CardNotHeld { .. }
            | IllegalAction::MustFollowSuit(_)
            | IllegalAction::BoardComplete => ErrorCategory::Card,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("{seat} holds {count} cards, expected 13")]
    WrongHandSize { seat: Position, count: usize },
    #[error("a card appears in more than one place")]
    DuplicateCard,
    #[error("card index {0} is not dealt to anyone")]
    MissingCard(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;

    #[test]
    fn test_codes_and_categories() {
        let err = IllegalAction::OutOfTurn {
            expected: Position::North,
            actual: Position::East,
        };
        assert_eq!(err.code(), "out_of_turn");
        assert_eq!(err.category(), ErrorCategory::Turn);
        assert_eq!(err.to_string(), "E acted out of turn, N is to act");

        assert_eq!(IllegalAction::DoubleNotAllowed.category(), ErrorCategory::Auction);
        let err = IllegalAction::CardNotHeld {
            seat: Position::West,
            card: Card::new(Suit::Hearts, Rank::Ten),
        };
        assert_eq!(err.category(), ErrorCategory::Card);
        assert_eq!(err.to_string(), "W does not hold HT");
    }
}
