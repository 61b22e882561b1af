use bridge_core::auction::Auction;
use bridge_core::board::Position;
use bridge_core::call::Call;
use bridge_core::hand::Hand;
use bridge_core::strain::Strain;

/// Points credited to partner from their first bid.
fn partner_strength(auction: &Auction, partner: Position) -> u8 {
    let opener = auction.opener();
    let first_bid = auction
        .iter()
        .find(|(pos, call)| *pos == partner && call.is_bid())
        .map(|(_, call)| *call);
    match first_bid {
        None => 0,
        Some(Call::Bid { level: 2, strain: Strain::Clubs }) if opener == Some(partner) => 22,
        Some(Call::Bid { level: 2, strain: Strain::NoTrump }) if opener == Some(partner) => 20,
        Some(Call::Bid { level: 1, strain: Strain::NoTrump }) if opener == Some(partner) => 16,
        Some(Call::Bid { level: 1, .. }) if opener == Some(partner) => 13,
        // Two-level suit openings are weak; responses are credited alike.
        Some(_) => 8,
    }
}

/// The suit partner bid most recently, if any.
fn partner_suit(auction: &Auction, partner: Position) -> Option<Strain> {
    auction
        .iter()
        .filter(|(pos, _)| *pos == partner)
        .filter_map(|(_, call)| call.strain())
        .filter(|s| *s != Strain::NoTrump)
        .last()
}

fn bid_if_legal(auction: &Auction, call: Call) -> Option<Call> {
    auction.is_legal(call).then_some(call)
}

/// A cheap natural bidder for simulated continuations: raise partner with
/// support, show a long suit with opening values, bid 3NT with a balanced
/// game-going hand opposite an opener, otherwise pass.
pub fn proxy_call(hand: &Hand, auction: &Auction) -> Call {
    let seat = auction.current_player();
    let partner = seat.partner();
    let strength = partner_strength(auction, partner);

    if let Some(strain) = partner_suit(auction, partner) {
        if let Some(suit) = strain.to_suit() {
            if hand.length(suit) >= 3 {
                let combined = hand.points(Some(suit)) + strength;
                let game = strain.game_level();
                let target = match combined {
                    26.. => Some(game),
                    23..=25 => Some(game - 1),
                    18..=22 => auction.minimum_bid_in(strain).and_then(|c| c.level()),
                    _ => None,
                };
                let minimum = auction.minimum_bid_in(strain).and_then(|c| c.level());
                if let (Some(target), Some(minimum)) = (target, minimum) {
                    if minimum <= target {
                        if let Some(call) = bid_if_legal(auction, Call::bid(target, strain)) {
                            return call;
                        }
                    }
                }
                return Call::Pass;
            }
        }
    }

    if strength >= 13 && hand.is_balanced() && hand.hcp() + strength >= 25 {
        if let Some(call) = bid_if_legal(auction, Call::bid(3, Strain::NoTrump)) {
            return call;
        }
    }

    let suit = hand.longest_suit();
    let strain = Strain::from_suit(suit);
    let already_shown = auction
        .iter()
        .any(|(pos, call)| pos == seat && call.strain() == Some(strain));
    if hand.length(suit) >= 5 && hand.hcp() >= 10 && !already_shown {
        if let Some(call) = auction.minimum_bid_in(strain) {
            if call.level().is_some_and(|l| l <= 2) {
                return call;
            }
        }
    }
    Call::Pass
}
