use crate::card::Card;
use crate::rank::Rank;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    /// No singletons, no voids, max one doubleton (4-3-3-3, 4-4-3-2, 5-3-3-2)
    Balanced,
    /// One singleton OR two doubletons, no voids (5-4-2-2, 6-3-2-2)
    SemiBalanced,
    /// Everything else (contains singletons/voids beyond SemiBalanced)
    Unbalanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Distribution {
    pub spades: u8,
    pub hearts: u8,
    pub diamonds: u8,
    pub clubs: u8,
}

impl Distribution {
    pub fn length(&self, suit: Suit) -> u8 {
        match suit {
            Suit::Spades => self.spades,
            Suit::Hearts => self.hearts,
            Suit::Diamonds => self.diamonds,
            Suit::Clubs => self.clubs,
        }
    }

    pub fn sorted_lengths(&self) -> [u8; 4] {
        let mut d = [self.spades, self.hearts, self.diamonds, self.clubs];
        d.sort_by(|a, b| b.cmp(a));
        d
    }
}

/// A player's holding. Cards are unique; order is not significant until
/// [`Hand::sort`] is called.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Adds a card, returning false (and leaving the hand unchanged) if the
    /// card is already held.
    pub fn insert(&mut self, card: Card) -> bool {
        if self.contains(card) {
            return false;
        }
        self.cards.push(card);
        self.sort();
        true
    }

    /// Removes a card, returning whether it was held.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Ranks held in a suit, strongest first.
    pub fn ranks_in(&self, suit: Suit) -> Vec<Rank> {
        let mut ranks: Vec<Rank> = self
            .cards
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.rank)
            .collect();
        ranks.sort_by(|a, b| b.cmp(a));
        ranks
    }

    pub fn cards_in(&self, suit: Suit) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied().filter(move |c| c.suit == suit)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    pub fn hcp(&self) -> u8 {
        self.cards.iter().map(|c| c.rank.hcp()).sum()
    }

    pub fn hcp_in(&self, suit: Suit) -> u8 {
        self.cards_in(suit).map(|c| c.rank.hcp()).sum()
    }

    pub fn length(&self, suit: Suit) -> u8 {
        self.cards.iter().filter(|c| c.suit == suit).count() as u8
    }

    pub fn aces(&self) -> u8 {
        self.cards.iter().filter(|c| c.rank == Rank::Ace).count() as u8
    }

    pub fn distribution(&self) -> Distribution {
        Distribution {
            spades: self.length(Suit::Spades),
            hearts: self.length(Suit::Hearts),
            diamonds: self.length(Suit::Diamonds),
            clubs: self.length(Suit::Clubs),
        }
    }

    /// Spades first, then by rank descending within each suit.
    pub fn sort(&mut self) {
        self.cards.sort_by(|a, b| b.cmp(a));
    }

    pub fn points(&self, trump: Option<Suit>) -> u8 {
        let hcp = self.hcp();
        if let Some(t) = trump {
            // Dummy points: HCP + shortness
            let mut shortness = 0;
            for s in Suit::ALL {
                if s == t {
                    continue;
                }
                let l = self.length(s);
                if l == 0 {
                    shortness += 5;
                } else if l == 1 {
                    shortness += 3;
                } else if l == 2 {
                    shortness += 1;
                }
            }
            hcp + shortness
        } else {
            // Length points: HCP + cards > 4
            let mut length_pts = 0;
            for s in Suit::ALL {
                let l = self.length(s);
                if l > 4 {
                    length_pts += l - 4;
                }
            }
            hcp + length_pts
        }
    }

    /// Returns the shape classification of this hand
    pub fn shape(&self) -> Shape {
        let sorted_lengths = self.distribution().sorted_lengths();

        let longest = sorted_lengths[0];
        let doubleton_count = sorted_lengths.iter().filter(|&&l| l == 2).count();
        let singleton_count = sorted_lengths.iter().filter(|&&l| l == 1).count();
        let void_count = sorted_lengths.iter().filter(|&&l| l == 0).count();

        if singleton_count == 0 && void_count == 0 && doubleton_count <= 1 {
            Shape::Balanced
        } else if longest <= 6 && void_count == 0 && (singleton_count == 1 || doubleton_count == 2)
        {
            Shape::SemiBalanced
        } else {
            Shape::Unbalanced
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self.shape(), Shape::Balanced)
    }

    /// Rule of 20: HCP plus the two longest suit lengths reaches 20.
    pub fn rule_of_twenty(&self) -> bool {
        let lengths = self.distribution().sorted_lengths();
        self.hcp() + lengths[0] + lengths[1] >= 20
    }

    /// Rule of 15 (fourth seat): HCP plus spade length reaches 15.
    pub fn rule_of_fifteen(&self) -> bool {
        self.hcp() + self.length(Suit::Spades) >= 15
    }

    /// Returns the longest suit in the hand; ties go to the higher-ranking suit.
    pub fn longest_suit(&self) -> Suit {
        let mut max_len = 0;
        let mut longest = Suit::Spades;

        for suit in Suit::DESCENDING {
            let len = self.length(suit);
            if len > max_len {
                max_len = len;
                longest = suit;
            }
        }

        longest
    }

    /// Returns all suits that are tied for the longest length
    pub fn longest_suits(&self) -> Vec<Suit> {
        let lengths: Vec<_> = Suit::ALL.iter().map(|&s| self.length(s)).collect();
        let max_len = *lengths.iter().max().unwrap_or(&0);

        Suit::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| lengths[*i] == max_len)
            .map(|(_, &suit)| suit)
            .collect()
    }

    /// A stopper: the ace, the king guarded once, or the queen guarded twice.
    pub fn has_stopper(&self, suit: Suit) -> bool {
        let ranks = self.ranks_in(suit);
        let len = ranks.len();
        ranks.contains(&Rank::Ace)
            || (ranks.contains(&Rank::King) && len >= 2)
            || (ranks.contains(&Rank::Queen) && len >= 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::pbn::import_hand;

    fn hand(s: &str) -> Hand {
        import_hand(s).unwrap()
    }

    #[test]
    fn test_hcp_calculation() {
        let hand = Hand::new(vec![
            Card::new(Suit::Spades, Rank::Ace),
            Card::new(Suit::Hearts, Rank::King),
            Card::new(Suit::Diamonds, Rank::Queen),
            Card::new(Suit::Clubs, Rank::Jack),
            Card::new(Suit::Spades, Rank::Two),
        ]);
        assert_eq!(hand.hcp(), 10);
    }

    #[test]
    fn test_distribution() {
        let hand = hand("AK.Q..");
        let dist = hand.distribution();
        assert_eq!(dist.spades, 2);
        assert_eq!(dist.hearts, 1);
        assert_eq!(dist.clubs, 0);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut hand = Hand::default();
        assert!(hand.insert(Card::new(Suit::Hearts, Rank::Ten)));
        assert!(!hand.insert(Card::new(Suit::Hearts, Rank::Ten)));
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn test_ranks_descending() {
        let hand = Hand::new(vec![
            Card::new(Suit::Clubs, Rank::Two),
            Card::new(Suit::Clubs, Rank::Ace),
            Card::new(Suit::Clubs, Rank::Ten),
        ]);
        assert_eq!(
            hand.ranks_in(Suit::Clubs),
            vec![Rank::Ace, Rank::Ten, Rank::Two]
        );
        assert!(hand.ranks_in(Suit::Hearts).is_empty());
    }

    #[test]
    fn test_hand_sorting() {
        let mut hand = Hand {
            cards: vec![
                Card::new(Suit::Clubs, Rank::Ace),
                Card::new(Suit::Spades, Rank::Two),
            ],
        };
        hand.sort();
        assert_eq!(hand.cards[0].suit, Suit::Spades);
        assert_eq!(hand.cards[1].suit, Suit::Clubs);
    }

    #[test]
    fn test_balanced_shapes() {
        assert_eq!(hand("AKQJ.AKQ.AKQ.AKQ").shape(), Shape::Balanced);
        assert_eq!(hand("AKQJ.AKQJ.AKQ.AK").shape(), Shape::Balanced);
        assert_eq!(hand("AKQJT.AKQ.AKQ.AK").shape(), Shape::Balanced);
    }

    #[test]
    fn test_semi_balanced_shapes() {
        assert_eq!(hand("AKQJT.AKQJ.AK.AK").shape(), Shape::SemiBalanced);
        assert_eq!(hand("AKQJT9.AKQ.AK.AK").shape(), Shape::SemiBalanced);
        assert_eq!(hand("AKQJT.AKQJ.AKQ.A").shape(), Shape::SemiBalanced);
    }

    #[test]
    fn test_unbalanced_shapes() {
        assert_eq!(hand("AKQJT.AKQJ.AKQJ.").shape(), Shape::Unbalanced);
        assert_eq!(hand("AKQJT98.AKQ.AK.A").shape(), Shape::Unbalanced);
    }

    #[test]
    fn test_longest_suit() {
        assert_eq!(hand("AKQJT.AK.A.").longest_suit(), Suit::Spades);
        assert_eq!(hand("AKQJT.AKQJT.AK.A").longest_suit(), Suit::Spades);
        assert_eq!(hand("AKQJT.AKQJT.AK.A").longest_suits().len(), 2);
    }

    #[test]
    fn test_rules_of_twenty_and_fifteen() {
        // 11 HCP, 5-4 shape: 11 + 5 + 4 = 20
        let h = hand("AQ875.KJ64.J3.82");
        assert_eq!(h.hcp(), 11);
        assert!(h.rule_of_twenty());
        // 11 HCP + 5 spades = 16
        assert!(h.rule_of_fifteen());
    }

    #[test]
    fn test_stoppers() {
        let h = hand("A.K2.Q32.Q2");
        assert!(h.has_stopper(Suit::Spades));
        assert!(h.has_stopper(Suit::Hearts));
        assert!(h.has_stopper(Suit::Diamonds));
        assert!(!h.has_stopper(Suit::Clubs));
    }
}
