use crate::board::{Partnership, Position, Vulnerability};
use crate::card::Card;
use crate::contract::Contract;
use crate::deal::Deal;
use crate::error::IllegalAction;
use crate::hand::Hand;
use crate::scoring::duplicate_score;
use crate::suit::Suit;
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const TRICKS_PER_BOARD: u8 = 13;

/// Whether `a` beats `b` in a trick led in `lead` with the given trump suit.
pub fn card_beats(a: Card, b: Card, lead: Suit, trump: Option<Suit>) -> bool {
    if let Some(trump) = trump {
        match (a.suit == trump, b.suit == trump) {
            (true, false) => return true,
            (false, true) => return false,
            (true, true) => return a.rank > b.rank,
            (false, false) => {}
        }
    }
    match (a.suit == lead, b.suit == lead) {
        (true, false) => true,
        (true, true) => a.rank > b.rank,
        _ => false,
    }
}

/// Up to four cards, in play order, starting with the leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub leader: Position,
    pub plays: Vec<(Position, Card)>,
}

impl Trick {
    pub fn new(leader: Position) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.plays.first().map(|(_, card)| card.suit)
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// The seat currently holding the trick. `None` before the lead.
    pub fn winning_play(&self, trump: Option<Suit>) -> Option<(Position, Card)> {
        let lead = self.led_suit()?;
        let mut best = self.plays[0];
        for &play in &self.plays[1..] {
            if card_beats(play.1, best.1, lead, trump) {
                best = play;
            }
        }
        Some(best)
    }

    /// Winner of a complete trick.
    pub fn winner(&self, trump: Option<Suit>) -> Option<Position> {
        if !self.is_complete() {
            return None;
        }
        self.winning_play(trump).map(|(pos, _)| pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractResult {
    Made { overtricks: u8 },
    Defeated { undertricks: u8 },
}

/// Fixed once the thirteenth trick is quitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardResult {
    pub contract: Contract,
    pub declarer_tricks: u8,
    pub defender_tricks: u8,
    pub result: ContractResult,
    /// Duplicate score for the declaring side.
    pub score: i32,
}

impl BoardResult {
    pub fn new(contract: Contract, declarer_tricks: u8, vulnerability: Vulnerability) -> Self {
        let required = contract.required_tricks();
        let result = if declarer_tricks >= required {
            ContractResult::Made {
                overtricks: declarer_tricks - required,
            }
        } else {
            ContractResult::Defeated {
                undertricks: required - declarer_tricks,
            }
        };
        let vulnerable = vulnerability.is_vulnerable(contract.declarer);
        Self {
            contract,
            declarer_tricks,
            defender_tricks: TRICKS_PER_BOARD - declarer_tricks,
            result,
            score: duplicate_score(&contract, declarer_tricks, vulnerable),
        }
    }

    pub fn score_for(&self, side: Partnership) -> i32 {
        if side == self.contract.declaring_side() {
            self.score
        } else {
            -self.score
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// Card accepted, trick still open.
    Played { next: Position },
    TrickComplete { winner: Position, tricks_played: u8 },
    BoardComplete(BoardResult),
}

/// Card play for one board. Dummy's cards are played by submitting the dummy
/// seat when it is dummy's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayState {
    contract: Contract,
    vulnerability: Vulnerability,
    hands: Deal,
    to_act: Position,
    current: Trick,
    completed: Vec<(Trick, Position)>,
    declarer_tricks: u8,
    defender_tricks: u8,
    result: Option<BoardResult>,
}

impl PlayState {
    pub fn new(contract: Contract, deal: Deal, vulnerability: Vulnerability) -> Self {
        let leader = contract.opening_leader();
        info!("play of {contract} begins, {leader} on lead");
        Self {
            contract,
            vulnerability,
            hands: deal,
            to_act: leader,
            current: Trick::new(leader),
            completed: Vec::with_capacity(TRICKS_PER_BOARD as usize),
            declarer_tricks: 0,
            defender_tricks: 0,
            result: None,
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn vulnerability(&self) -> Vulnerability {
        self.vulnerability
    }

    pub fn trump(&self) -> Option<Suit> {
        self.contract.trump()
    }

    pub fn to_act(&self) -> Position {
        self.to_act
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current
    }

    /// Quitted tricks with their winners, oldest first.
    pub fn completed_tricks(&self) -> &[(Trick, Position)] {
        &self.completed
    }

    pub fn tricks_played(&self) -> u8 {
        self.completed.len() as u8
    }

    pub fn declarer_tricks(&self) -> u8 {
        self.declarer_tricks
    }

    pub fn defender_tricks(&self) -> u8 {
        self.defender_tricks
    }

    /// Remaining cards of a seat.
    pub fn hand(&self, seat: Position) -> &Hand {
        self.hands.hand(seat)
    }

    pub fn dummy_exposed(&self) -> bool {
        !self.completed.is_empty() || !self.current.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&BoardResult> {
        self.result.as_ref()
    }

    /// Cards `seat` may play into the current trick.
    pub fn legal_cards(&self, seat: Position) -> Vec<Card> {
        if self.is_complete() {
            return Vec::new();
        }
        let hand = self.hands.hand(seat);
        if let Some(lead) = self.current.led_suit() {
            if hand.has_suit(lead) {
                return hand.cards_in(lead).collect();
            }
        }
        hand.cards.clone()
    }

    /// Validates and plays one card. A rejected play leaves the state untouched.
    pub fn apply_play(&mut self, seat: Position, card: Card) -> Result<PlayOutcome, IllegalAction> {
        if self.is_complete() {
            return Err(IllegalAction::BoardComplete);
        }
        if seat != self.to_act {
            return Err(IllegalAction::OutOfTurn {
                expected: self.to_act,
                actual: seat,
            });
        }
        let hand = self.hands.hand(seat);
        if !hand.contains(card) {
            return Err(IllegalAction::CardNotHeld { seat, card });
        }
        if let Some(lead) = self.current.led_suit() {
            if card.suit != lead && hand.has_suit(lead) {
                return Err(IllegalAction::MustFollowSuit(lead));
            }
        }

        self.hands.hand_mut(seat).remove(card);
        self.current.plays.push((seat, card));
        debug!("{seat} plays {card}");

        let Some(winner) = self.current.winner(self.trump()) else {
            self.to_act = seat.next();
            return Ok(PlayOutcome::Played { next: self.to_act });
        };

        if winner.partnership() == self.contract.declaring_side() {
            self.declarer_tricks += 1;
        } else {
            self.defender_tricks += 1;
        }
        let finished = std::mem::replace(&mut self.current, Trick::new(winner));
        self.completed.push((finished, winner));
        self.to_act = winner;
        let tricks_played = self.tricks_played();
        debug!("trick {tricks_played} won by {winner}");

        if tricks_played < TRICKS_PER_BOARD {
            return Ok(PlayOutcome::TrickComplete {
                winner,
                tricks_played,
            });
        }

        let result = BoardResult::new(self.contract, self.declarer_tricks, self.vulnerability);
        info!(
            "{} finished with {} tricks, score {}",
            self.contract, self.declarer_tricks, result.score
        );
        self.result = Some(result);
        Ok(PlayOutcome::BoardComplete(result))
    }
}
