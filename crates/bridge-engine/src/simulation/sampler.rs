use crate::constraints::{accepts_all, DealConstraint};
use bridge_core::board::Position;
use bridge_core::deal::Deal;
use bridge_core::error::DealError;
use bridge_core::hand::Hand;
use log::trace;
use rand::Rng;

/// A completed deal. `relaxed` is set when no sample met the constraints
/// within the resample limit and the last draw was taken unfiltered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub deal: Deal,
    pub relaxed: bool,
}

/// Deals the 39 unseen cards around a known hand, rejecting deals that
/// contradict the auction.
pub struct DealSampler<'a> {
    known: &'a Hand,
    seat: Position,
    constraints: &'a [DealConstraint],
    resample_limit: u32,
}

impl<'a> DealSampler<'a> {
    pub fn new(
        known: &'a Hand,
        seat: Position,
        constraints: &'a [DealConstraint],
        resample_limit: u32,
    ) -> Self {
        Self {
            known,
            seat,
            constraints,
            resample_limit,
        }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Result<Sample, DealError> {
        for attempt in 0..=self.resample_limit {
            let deal = Deal::complete(self.known, self.seat, rng)?;
            if accepts_all(self.constraints, &deal) {
                if attempt > 0 {
                    trace!("sample accepted after {attempt} rejections");
                }
                return Ok(Sample {
                    deal,
                    relaxed: false,
                });
            }
        }
        Ok(Sample {
            deal: Deal::complete(self.known, self.seat, rng)?,
            relaxed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{constraints_for, HandPredicate};
    use crate::heuristic::HeuristicSelector;
    use bridge_core::auction::Auction;
    use bridge_core::io::pbn::import_hand;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_respect_opening_constraint() {
        let selector = HeuristicSelector::natural().unwrap();
        let auction = Auction::bidding(Position::North, "1N P");
        let constraints = constraints_for(&selector, &auction, Position::South);
        let known = import_hand("T93.KJ84.A32.J92").unwrap();
        let sampler = DealSampler::new(&known, Position::South, &constraints, 10_000);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let sample = sampler.sample(&mut rng).unwrap();
            assert!(!sample.relaxed);
            sample.deal.validate().unwrap();
            assert_eq!(sample.deal.hand(Position::South), &known);
            let north = sample.deal.hand(Position::North);
            assert!((15..=17).contains(&north.hcp()));
            assert!(north.is_balanced());
        }
    }

    #[test]
    fn test_impossible_constraint_relaxes() {
        let known = import_hand("AKQJ.AKQ.AKQ.AKQ").unwrap();
        let impossible = vec![DealConstraint {
            seat: Position::North,
            seat_number: 1,
            predicate: HandPredicate::Shows(Vec::new()),
        }];
        let sampler = DealSampler::new(&known, Position::South, &impossible, 5);
        let mut rng = StdRng::seed_from_u64(9);
        let sample = sampler.sample(&mut rng).unwrap();
        assert!(sample.relaxed);
        sample.deal.validate().unwrap();
    }

    #[test]
    fn test_short_hand_is_an_error() {
        let known = import_hand("AKQJ.AKQ.AKQ.AK").unwrap();
        let sampler = DealSampler::new(&known, Position::South, &[], 5);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sampler.sample(&mut rng),
            Err(DealError::WrongHandSize { .. })
        ));
    }
}
