use crate::heuristic::HeuristicSelector;
use crate::schema::Variant;
use bridge_core::auction::Auction;
use bridge_core::board::Position;
use bridge_core::deal::Deal;
use bridge_core::hand::Hand;

/// What a single call tells the table about the caller's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandPredicate {
    /// The hand satisfies at least one of these variants.
    Shows(Vec<Variant>),
    /// The hand satisfies none of these variants (a pass where an opening
    /// was available).
    Denies(Vec<Variant>),
}

impl HandPredicate {
    pub fn holds(&self, hand: &Hand, seat_number: u8) -> bool {
        match self {
            HandPredicate::Shows(variants) => variants.iter().any(|v| v.holds(hand, seat_number)),
            HandPredicate::Denies(variants) => !variants.iter().any(|v| v.holds(hand, seat_number)),
        }
    }
}

/// An accept-or-discard filter on a sampled deal, derived from one prior call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealConstraint {
    pub seat: Position,
    /// Seat relative to the dealer, 1 to 4.
    pub seat_number: u8,
    pub predicate: HandPredicate,
}

impl DealConstraint {
    pub fn accepts(&self, deal: &Deal) -> bool {
        self.predicate.holds(deal.hand(self.seat), self.seat_number)
    }
}

/// Constraints implied by every call of `auction`, skipping calls made by
/// `observer`, whose hand is known.
pub fn constraints_for(
    selector: &HeuristicSelector,
    auction: &Auction,
    observer: Position,
) -> Vec<DealConstraint> {
    let mut prefix = Auction::new(auction.dealer);
    let mut constraints = Vec::new();
    for (i, &call) in auction.calls().iter().enumerate() {
        let seat = prefix.current_player();
        if seat != observer {
            if let Some(predicate) = selector.rule_constraints(&prefix, call) {
                constraints.push(DealConstraint {
                    seat,
                    seat_number: (i % 4) as u8 + 1,
                    predicate,
                });
            }
        }
        if prefix.apply_bid(seat, call).is_err() {
            break;
        }
    }
    constraints
}

pub fn accepts_all(constraints: &[DealConstraint], deal: &Deal) -> bool {
    constraints.iter().all(|c| c.accepts(deal))
}
