use crate::board::Position;
use crate::card::Card;
use crate::error::DealError;
use crate::hand::Hand;
use crate::rank::Rank;
use crate::suit::Suit;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const HAND_SIZE: usize = 13;

/// The 52 cards in index order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::new(suit, rank));
        }
    }
    deck
}

/// Cards of the deck not present in `held`.
pub fn remaining_cards(held: &Hand) -> Vec<Card> {
    let mut seen = [false; 52];
    for card in &held.cards {
        seen[card.index()] = true;
    }
    full_deck()
        .into_iter()
        .filter(|c| !seen[c.index()])
        .collect()
}

/// Four hands indexed by [`Position::idx`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Deal {
    pub hands: [Hand; 4],
}

impl Deal {
    pub fn new(hands: [Hand; 4]) -> Self {
        Self { hands }
    }

    pub fn hand(&self, pos: Position) -> &Hand {
        &self.hands[pos.idx()]
    }

    pub fn hand_mut(&mut self, pos: Position) -> &mut Hand {
        &mut self.hands[pos.idx()]
    }

    /// Shuffles a fresh deck and deals 13 cards to each seat, north first.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut deck = full_deck();
        deck.shuffle(rng);
        Self::from_deck(&deck)
    }

    /// Keeps `known` at `seat` and deals the other 39 cards uniformly to the
    /// remaining seats.
    pub fn complete(known: &Hand, seat: Position, rng: &mut impl Rng) -> Result<Self, DealError> {
        if known.len() != HAND_SIZE {
            return Err(DealError::WrongHandSize {
                seat,
                count: known.len(),
            });
        }
        let mut rest = remaining_cards(known);
        if rest.len() != 52 - HAND_SIZE {
            return Err(DealError::DuplicateCard);
        }
        rest.shuffle(rng);

        let mut deal = Deal::default();
        deal.hands[seat.idx()] = known.clone();
        let mut chunks = rest.chunks(HAND_SIZE);
        let mut pos = seat.next();
        while pos != seat {
            if let Some(chunk) = chunks.next() {
                deal.hands[pos.idx()] = Hand::new(chunk.to_vec());
            }
            pos = pos.next();
        }
        Ok(deal)
    }

    fn from_deck(deck: &[Card]) -> Self {
        let mut deal = Deal::default();
        for (i, chunk) in deck.chunks(HAND_SIZE).enumerate().take(4) {
            deal.hands[i] = Hand::new(chunk.to_vec());
        }
        deal
    }

    /// Checks the four hands partition the deck exactly.
    pub fn validate(&self) -> Result<(), DealError> {
        let mut seen = [false; 52];
        for pos in Position::ALL {
            let hand = self.hand(pos);
            if hand.len() != HAND_SIZE {
                return Err(DealError::WrongHandSize {
                    seat: pos,
                    count: hand.len(),
                });
            }
            for card in &hand.cards {
                let i = card.index();
                if seen[i] {
                    return Err(DealError::DuplicateCard);
                }
                seen[i] = true;
            }
        }
        match seen.iter().position(|s| !s) {
            Some(i) => Err(DealError::MissingCard(i)),
            None => Ok(()),
        }
    }

    pub fn holder_of(&self, card: Card) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|&pos| self.hand(pos).contains(card))
    }
}
