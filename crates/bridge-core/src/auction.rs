use crate::board::Position;
use crate::call::Call;
use crate::contract::{Contract, DoubleStatus};
use crate::error::IllegalAction;
use crate::strain::Strain;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AuctionStatus {
    #[default]
    Open,
    /// Four passes and no bid; the board should be redealt.
    PassedOut,
    /// Three passes after a bid; the contract is fixed.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionOutcome {
    PassedOut,
    Contract(Contract),
}

/// The highest bid so far and who made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingBid {
    pub level: u8,
    pub strain: Strain,
    pub bidder: Position,
}

impl StandingBid {
    pub fn call(&self) -> Call {
        Call::Bid {
            level: self.level,
            strain: self.strain,
        }
    }
}

/// An auction in progress or finished. Calls are only ever appended through
/// [`Auction::apply_bid`], so the derived fields always agree with `calls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Auction {
    pub dealer: Position,
    calls: Vec<Call>,
    standing: Option<StandingBid>,
    double_status: DoubleStatus,
    consecutive_passes: u8,
    status: AuctionStatus,
}

impl Auction {
    pub fn new(dealer: Position) -> Self {
        Self {
            dealer,
            ..Default::default()
        }
    }

    /// Build an auction from space-separated calls like "P 1C P 2C".
    /// Panics on invalid or illegal input; use for tests and known-good data only.
    pub fn bidding(dealer: Position, calls: &str) -> Self {
        let mut auction = Self::new(dealer);
        auction.bids(calls);
        auction
    }

    /// Parse and apply space-separated calls for whoever is to act.
    /// Panics on invalid or illegal input; use for tests and known-good data only.
    pub fn bids(&mut self, calls: &str) {
        for token in calls.split_whitespace() {
            let call: Call = token
                .parse()
                .unwrap_or_else(|_| panic!("invalid call {token:?}"));
            let seat = self.current_player();
            if let Err(err) = self.apply_bid(seat, call) {
                panic!("illegal call {token}: {err}");
            }
        }
    }

    /// Parse space-separated calls, applying each one for the seat to act.
    pub fn parse(dealer: Position, calls: &str) -> Result<Self, String> {
        let mut auction = Self::new(dealer);
        for token in calls.split_whitespace() {
            let call: Call = token
                .parse()
                .map_err(|_| format!("invalid call {token:?}"))?;
            let seat = auction.current_player();
            auction
                .apply_bid(seat, call)
                .map_err(|err| format!("illegal call {token}: {err}"))?;
        }
        Ok(auction)
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn status(&self) -> AuctionStatus {
        self.status
    }

    pub fn standing_bid(&self) -> Option<StandingBid> {
        self.standing
    }

    pub fn double_status(&self) -> DoubleStatus {
        self.double_status
    }

    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Call)> {
        let mut p = self.dealer;
        self.calls.iter().map(move |call| {
            let pos = p;
            p = p.next();
            (pos, call)
        })
    }

    pub fn current_player(&self) -> Position {
        let mut p = self.dealer;
        for _ in 0..self.calls.len() % 4 {
            p = p.next();
        }
        p
    }

    pub fn is_finished(&self) -> bool {
        self.status != AuctionStatus::Open
    }

    pub fn is_open(&self) -> bool {
        self.standing.is_some()
    }

    /// Validates and appends one call. A rejected call leaves the auction
    /// untouched.
    pub fn apply_bid(
        &mut self,
        seat: Position,
        call: Call,
    ) -> Result<AuctionStatus, IllegalAction> {
        self.check(seat, call)?;

        self.calls.push(call);
        match call {
            Call::Pass => self.consecutive_passes += 1,
            Call::Bid { level, strain } => {
                self.standing = Some(StandingBid {
                    level,
                    strain,
                    bidder: seat,
                });
                self.double_status = DoubleStatus::Undoubled;
                self.consecutive_passes = 0;
            }
            Call::Double => {
                self.double_status = DoubleStatus::Doubled;
                self.consecutive_passes = 0;
            }
            Call::Redouble => {
                self.double_status = DoubleStatus::Redoubled;
                self.consecutive_passes = 0;
            }
        }
        debug!("{seat} calls {call}");

        self.status = match (self.standing, self.consecutive_passes) {
            (None, 4) => AuctionStatus::PassedOut,
            (Some(_), 3) => AuctionStatus::Completed,
            _ => AuctionStatus::Open,
        };
        if self.status != AuctionStatus::Open {
            info!("auction finished: {}", self.render());
        }
        Ok(self.status)
    }

    fn check(&self, seat: Position, call: Call) -> Result<(), IllegalAction> {
        if self.is_finished() {
            return Err(IllegalAction::AuctionClosed);
        }
        let expected = self.current_player();
        if seat != expected {
            return Err(IllegalAction::OutOfTurn {
                expected,
                actual: seat,
            });
        }
        match call {
            Call::Pass => Ok(()),
            Call::Bid { level, .. } => {
                if !(1..=7).contains(&level) {
                    return Err(IllegalAction::InvalidLevel(level));
                }
                match self.standing {
                    Some(standing) if !call.outranks(standing.call()) => {
                        Err(IllegalAction::InsufficientBid {
                            call,
                            standing: standing.call(),
                        })
                    }
                    _ => Ok(()),
                }
            }
            Call::Double => match self.standing {
                Some(standing)
                    if self.double_status == DoubleStatus::Undoubled
                        && standing.bidder.is_opponent_of(seat) =>
                {
                    Ok(())
                }
                _ => Err(IllegalAction::DoubleNotAllowed),
            },
            Call::Redouble => match self.standing {
                Some(standing)
                    if self.double_status == DoubleStatus::Doubled
                        && !standing.bidder.is_opponent_of(seat) =>
                {
                    Ok(())
                }
                _ => Err(IllegalAction::RedoubleNotAllowed),
            },
        }
    }

    /// Whether `call` would be accepted from the player to act.
    pub fn is_legal(&self, call: Call) -> bool {
        self.check(self.current_player(), call).is_ok()
    }

    /// Return all calls that would be legal as the next call in this auction.
    pub fn legal_calls(&self) -> Vec<Call> {
        if self.is_finished() {
            return Vec::new();
        }
        let mut result = vec![Call::Pass];
        for level in 1..=7u8 {
            for strain in Strain::ALL {
                let call = Call::Bid { level, strain };
                if self.is_legal(call) {
                    result.push(call);
                }
            }
        }
        for call in [Call::Double, Call::Redouble] {
            if self.is_legal(call) {
                result.push(call);
            }
        }
        result
    }

    pub fn opener(&self) -> Option<Position> {
        self.iter()
            .find(|(_, call)| call.is_bid())
            .map(|(position, _)| position)
    }

    /// Returns the minimum legal bid for the given strain.
    pub fn minimum_bid_in(&self, strain: Strain) -> Option<Call> {
        if self.is_finished() {
            return None;
        }
        let Some(standing) = self.standing else {
            return Some(Call::Bid { level: 1, strain });
        };
        let min_level = if strain > standing.strain {
            standing.level
        } else {
            standing.level + 1
        };
        (min_level <= 7).then_some(Call::Bid {
            level: min_level,
            strain,
        })
    }

    /// The contract that would stand if everyone passed now. Declarer is the
    /// first player of the bidding side to have named the strain.
    pub fn current_contract(&self) -> Option<Contract> {
        let standing = self.standing?;
        let side = standing.bidder.partnership();
        let declarer = self
            .iter()
            .find(|(pos, call)| pos.partnership() == side && call.strain() == Some(standing.strain))
            .map(|(pos, _)| pos)
            .unwrap_or(standing.bidder);
        Some(Contract {
            level: standing.level,
            strain: standing.strain,
            double_status: self.double_status,
            declarer,
        })
    }

    /// `None` while the auction is still open.
    pub fn outcome(&self) -> Option<AuctionOutcome> {
        match self.status {
            AuctionStatus::Open => None,
            AuctionStatus::PassedOut => Some(AuctionOutcome::PassedOut),
            AuctionStatus::Completed => self.current_contract().map(AuctionOutcome::Contract),
        }
    }

    pub fn final_contract(&self) -> Option<Contract> {
        match self.outcome() {
            Some(AuctionOutcome::Contract(contract)) => Some(contract),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        self.calls
            .iter()
            .map(|c| c.render())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
