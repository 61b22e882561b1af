//! Fast-path decisions that need no simulation: openings and fixed
//! conventional sequences from a YAML rule system, plus rule-of-thumb card
//! play.

use crate::constraints::HandPredicate;
use crate::error::EngineError;
use crate::schema::{System, Variant};
use bridge_core::auction::Auction;
use bridge_core::board::Position;
use bridge_core::call::Call;
use bridge_core::card::Card;
use bridge_core::hand::Hand;
use bridge_core::play::{card_beats, PlayState, Trick};
use bridge_core::rank::Rank;
use bridge_core::suit::Suit;
use log::debug;

const NATURAL_RULES: &str = include_str!("rules/natural.yaml");

/// A call paired with the rule name and description from the bidding system.
pub struct Interpretation {
    pub call: Call,
    pub rule_name: String,
    pub description: String,
}

/// A heuristic bid. `variant` is `None` for the default opening pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub call: Call,
    pub variant: Option<Variant>,
}

pub struct HeuristicSelector {
    system: System,
}

impl HeuristicSelector {
    pub fn new(system: System) -> Self {
        Self { system }
    }

    /// The embedded natural system.
    pub fn natural() -> Result<Self, EngineError> {
        Ok(Self::new(System::from_yaml(NATURAL_RULES)?))
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    /// Return interpretations for all legal next calls given the current auction.
    pub fn interpretations(&self, auction: &Auction) -> Vec<Interpretation> {
        let rules = self.system.rules_for(auction);
        auction
            .legal_calls()
            .into_iter()
            .map(|call| {
                let best = rules
                    .iter()
                    .find(|r| r.parsed_call() == Some(call))
                    .and_then(|r| r.variants.iter().max_by_key(|v| v.priority));
                match best {
                    Some(v) => Interpretation {
                        call,
                        rule_name: v.name.clone(),
                        description: v.description.clone(),
                    },
                    None => Interpretation {
                        call,
                        rule_name: match call {
                            Call::Pass => "Pass".into(),
                            _ => String::new(),
                        },
                        description: String::new(),
                    },
                }
            })
            .collect()
    }

    /// Bid for `hand` at the current turn of `auction`, or `None` when the
    /// situation is not one the system covers. An unopened auction always
    /// gets a decision: the best opening or a pass.
    pub fn choose_call(&self, hand: &Hand, auction: &Auction) -> Option<Decision> {
        if auction.is_finished() {
            return None;
        }
        let seat_number = (auction.len() % 4) as u8 + 1;
        let mut best: Option<(Call, &Variant)> = None;

        for rule in self.system.rules_for(auction) {
            let Some(call) = rule.parsed_call() else {
                continue;
            };
            if !auction.is_legal(call) {
                continue;
            }
            for variant in &rule.variants {
                if !variant.holds(hand, seat_number) {
                    continue;
                }
                let is_better = match best {
                    Some((_, current)) => variant.priority > current.priority,
                    None => true,
                };
                if is_better {
                    best = Some((call, variant));
                }
            }
        }

        match best {
            Some((call, variant)) => {
                debug!("heuristic: {} ({})", call, variant.name);
                Some(Decision {
                    call,
                    variant: Some(variant.clone()),
                })
            }
            None if !auction.is_open() => {
                debug!("heuristic: no opening, pass");
                Some(Decision {
                    call: Call::Pass,
                    variant: None,
                })
            }
            None => None,
        }
    }

    /// What `call`, made after `prefix`, shows about the caller's hand.
    /// `None` when the system assigns the call no meaning there.
    pub fn rule_constraints(&self, prefix: &Auction, call: Call) -> Option<HandPredicate> {
        if prefix.is_finished() {
            return None;
        }
        if !prefix.is_open() && call == Call::Pass {
            let openings: Vec<Variant> = self
                .system
                .opening
                .iter()
                .flat_map(|r| r.variants.iter().cloned())
                .collect();
            return (!openings.is_empty()).then_some(HandPredicate::Denies(openings));
        }
        self.system
            .rules_for(prefix)
            .iter()
            .find(|r| r.parsed_call() == Some(call))
            .filter(|r| !r.variants.is_empty())
            .map(|r| HandPredicate::Shows(r.variants.clone()))
    }
}

/// A legal card for `seat` (which may be dummy) by simple rules of thumb.
/// `None` only when `seat` has nothing legal to play.
pub fn choose_card(state: &PlayState, seat: Position) -> Option<Card> {
    let legal = state.legal_cards(seat);
    if legal.len() <= 1 {
        return legal.first().copied();
    }
    let hand = state.hand(seat);
    let trump = state.trump();
    let trick = state.current_trick();

    let card = if !trick.is_empty() {
        follow(trick, seat, &legal, hand, trump)
    } else if state.tricks_played() == 0 {
        opening_lead(hand, trump)
    } else {
        let played: Vec<Card> = state
            .completed_tricks()
            .iter()
            .flat_map(|(t, _)| t.plays.iter().map(|&(_, c)| c))
            .collect();
        master_card(hand, &played, trump).or_else(|| low_from_length(hand, trump))
    };
    debug!("card play: {seat} chooses {card:?}");
    card.filter(|c| legal.contains(c))
        .or_else(|| legal.first().copied())
}

/// Top of a touching honour sequence, else fourth best, from the longest
/// side suit.
fn opening_lead(hand: &Hand, trump: Option<Suit>) -> Option<Card> {
    let suit = longest_suit_excluding(hand, trump).or(trump)?;
    let ranks = hand.ranks_in(suit);
    let rank = match ranks.as_slice() {
        [] => return None,
        [top, next, ..] if *top >= Rank::Ten && *top as u8 == *next as u8 + 1 => *top,
        [_, _, _, fourth, ..] => *fourth,
        [top, _] => *top,
        [.., last] => *last,
    };
    Some(Card::new(suit, rank))
}

/// A card no outstanding card of its suit can beat, side suits first.
fn master_card(hand: &Hand, played: &[Card], trump: Option<Suit>) -> Option<Card> {
    let is_master = |card: Card| {
        Rank::ALL
            .iter()
            .filter(|&&r| r > card.rank)
            .map(|&r| Card::new(card.suit, r))
            .all(|higher| hand.contains(higher) || played.contains(&higher))
    };
    let side = Suit::DESCENDING.into_iter().filter(|&s| Some(s) != trump);
    side.chain(trump)
        .filter_map(|suit| hand.cards_in(suit).max_by_key(|c| c.rank))
        .find(|&card| is_master(card))
}

fn low_from_length(hand: &Hand, trump: Option<Suit>) -> Option<Card> {
    let suit = longest_suit_excluding(hand, trump).or(trump)?;
    hand.cards_in(suit).min_by_key(|c| c.rank)
}

fn longest_suit_excluding(hand: &Hand, excluded: Option<Suit>) -> Option<Suit> {
    let mut best: Option<(Suit, u8)> = None;
    for suit in Suit::DESCENDING {
        if Some(suit) == excluded {
            continue;
        }
        let len = hand.length(suit);
        if len > 0 && best.map_or(true, |(_, l)| len > l) {
            best = Some((suit, len));
        }
    }
    best.map(|(s, _)| s)
}

fn lowest(cards: impl Iterator<Item = Card>) -> Option<Card> {
    cards.min_by_key(|c| c.rank)
}

fn follow(
    trick: &Trick,
    seat: Position,
    legal: &[Card],
    hand: &Hand,
    trump: Option<Suit>,
) -> Option<Card> {
    let lead = trick.led_suit()?;
    let (winning_seat, winning_card) = trick.winning_play(trump)?;
    let partner_winning = winning_seat == seat.partner();
    let beats = |c: &Card| card_beats(*c, winning_card, lead, trump);

    if legal.iter().all(|c| c.suit == lead) {
        if partner_winning {
            return lowest(legal.iter().copied());
        }
        return lowest(legal.iter().copied().filter(beats))
            .or_else(|| lowest(legal.iter().copied()));
    }

    if !partner_winning {
        let ruff = lowest(
            legal
                .iter()
                .copied()
                .filter(|c| Some(c.suit) == trump)
                .filter(beats),
        );
        if ruff.is_some() {
            return ruff;
        }
    }
    discard(hand, legal, trump)
}

/// Lowest card of the side suit with the fewest high-card points.
fn discard(hand: &Hand, legal: &[Card], trump: Option<Suit>) -> Option<Card> {
    let weakest = Suit::ALL
        .into_iter()
        .filter(|&s| Some(s) != trump && legal.iter().any(|c| c.suit == s))
        .min_by_key(|&s| hand.hcp_in(s));
    match weakest {
        Some(suit) => lowest(legal.iter().copied().filter(|c| c.suit == suit)),
        None => lowest(legal.iter().copied()),
    }
}
