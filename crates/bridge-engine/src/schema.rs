use bridge_core::auction::Auction;
use bridge_core::call::Call;
use bridge_core::hand::Hand;
use bridge_core::suit::Suit;
use serde::{Deserialize, Serialize};

/// A bidding system: opening rules plus rules keyed by auction pattern.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct System {
    #[serde(default)]
    pub opening: Vec<BidRule>,
    #[serde(default)]
    pub responses: Vec<Situation>,
}

impl System {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// The rules that apply to the next call of `auction`.
    pub fn rules_for(&self, auction: &Auction) -> &[BidRule] {
        if !auction.is_open() {
            return &self.opening;
        }
        self.responses
            .iter()
            .find(|s| s.matches(auction))
            .map(|s| s.rules.as_slice())
            .unwrap_or(&[])
    }
}

/// Rules that apply after a particular sequence of calls.
///
/// The pattern is a space-separated call list. It must equal the auction
/// with leading passes removed, or, when it starts with `*`, the auction's
/// last calls.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Situation {
    pub pattern: String,
    pub rules: Vec<BidRule>,
}

impl Situation {
    pub fn matches(&self, auction: &Auction) -> bool {
        let mut tokens = self.pattern.split_whitespace().peekable();
        let suffix_only = tokens.peek() == Some(&"*");
        if suffix_only {
            tokens.next();
        }
        let Some(pattern) = tokens
            .map(|t| t.parse::<Call>().ok())
            .collect::<Option<Vec<Call>>>()
        else {
            return false;
        };

        let calls = auction.calls();
        if suffix_only {
            return calls.ends_with(&pattern);
        }
        let first_action = calls
            .iter()
            .position(|c| *c != Call::Pass)
            .unwrap_or(calls.len());
        calls[first_action..] == pattern[..]
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BidRule {
    pub call: String,
    pub variants: Vec<Variant>,
}

impl BidRule {
    pub fn parsed_call(&self) -> Option<Call> {
        self.call.parse().ok()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub priority: u8,
    pub description: String,
    pub constraints: Vec<Constraint>,
}

impl Variant {
    pub fn holds(&self, hand: &Hand, seat: u8) -> bool {
        self.constraints.iter().all(|c| c.holds(hand, seat))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Constraint {
    MinHCP { min: u8 },
    MaxHCP { max: u8 },
    MinLength { suit: Suit, count: u8 },
    MaxLength { suit: Suit, count: u8 },
    ExactLength { suit: Suit, count: u8 },
    IsBalanced { balanced: bool },
    RuleOfTwenty { met: bool },
    RuleOfFifteen { met: bool },
    /// Seat relative to the dealer, 1 to 4.
    Seat { min: u8, max: u8 },
    /// The suit is one of the longest (ties count).
    IsLongest { suit: Suit },
    AceCount { counts: Vec<u8> },
    AnyOf { any: Vec<Constraint> },
}

impl Constraint {
    pub fn holds(&self, hand: &Hand, seat: u8) -> bool {
        match self {
            Constraint::MinHCP { min } => hand.hcp() >= *min,
            Constraint::MaxHCP { max } => hand.hcp() <= *max,
            Constraint::MinLength { suit, count } => hand.length(*suit) >= *count,
            Constraint::MaxLength { suit, count } => hand.length(*suit) <= *count,
            Constraint::ExactLength { suit, count } => hand.length(*suit) == *count,
            Constraint::IsBalanced { balanced } => hand.is_balanced() == *balanced,
            Constraint::RuleOfTwenty { met } => hand.rule_of_twenty() == *met,
            Constraint::RuleOfFifteen { met } => hand.rule_of_fifteen() == *met,
            Constraint::Seat { min, max } => (*min..=*max).contains(&seat),
            Constraint::IsLongest { suit } => hand.longest_suits().contains(suit),
            Constraint::AceCount { counts } => counts.contains(&hand.aces()),
            Constraint::AnyOf { any } => any.iter().any(|c| c.holds(hand, seat)),
        }
    }
}
