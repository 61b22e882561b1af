use crate::card::Card;
use crate::hand::Hand;
use crate::rank::Rank;
use crate::suit::Suit;

/// Parses a hand string in the format "Clubs.Diamonds.Hearts.Spades".
///
/// This is the suit order used by the heuristic test vectors. Use
/// [`crate::io::pbn::import_hand`] for the usual spades-first order.
pub fn parse_hand(s: &str) -> Option<Hand> {
    let suits: Vec<&str> = s.trim().split('.').collect();
    if suits.len() != 4 {
        return None;
    }
    let mut hand = Hand::default();
    for (suit, run) in Suit::ALL.into_iter().zip(suits) {
        for c in run.chars() {
            let rank = Rank::from_char(c)?;
            if !hand.insert(Card::new(suit, rank)) {
                return None;
            }
        }
    }
    Some(hand)
}
