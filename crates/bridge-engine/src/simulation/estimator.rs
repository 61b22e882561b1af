use bridge_core::contract::Contract;
use bridge_core::deal::Deal;
use bridge_core::play::TRICKS_PER_BOARD;
use bridge_core::suit::Suit;
use rand::{Rng, RngCore};

/// Predicts declarer's trick count for a contract on a full deal.
///
/// The evaluator only sees this trait, so a double-dummy solver can replace
/// the default point-count rule without touching the sampling loop.
pub trait TrickEstimator: Send + Sync {
    fn estimate(&self, deal: &Deal, contract: &Contract, rng: &mut dyn RngCore) -> u8;
}

/// Combined high-card points, trump fit and ruffing shortness, plus uniform
/// noise. Not a play analysis: treat its output as a rough guide only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCountEstimator {
    /// Half-width of the noise added before rounding.
    pub noise: f64,
}

impl Default for PointCountEstimator {
    fn default() -> Self {
        Self { noise: 1.0 }
    }
}

impl PointCountEstimator {
    pub fn new(noise: f64) -> Self {
        Self { noise }
    }

    /// The estimate before noise and rounding.
    pub fn expected_tricks(&self, deal: &Deal, contract: &Contract) -> f64 {
        let declarer = deal.hand(contract.declarer);
        let dummy = deal.hand(contract.dummy());
        let hcp = f64::from(declarer.hcp() + dummy.hcp());
        let mut tricks = 6.5 + (hcp - 20.0) * 0.4;

        match contract.trump() {
            Some(trump) => {
                let fit = declarer.length(trump) + dummy.length(trump);
                tricks += (f64::from(fit) - 7.0) * 0.5;
                // Shortness only scores in the hand with fewer trumps.
                let short_hand = if declarer.length(trump) >= dummy.length(trump) {
                    dummy
                } else {
                    declarer
                };
                for suit in Suit::ALL.into_iter().filter(|&s| s != trump) {
                    tricks += match short_hand.length(suit) {
                        0 => 1.0,
                        1 => 0.6,
                        2 => 0.3,
                        _ => 0.0,
                    };
                }
            }
            None => {
                let longest = Suit::ALL
                    .into_iter()
                    .map(|s| declarer.length(s) + dummy.length(s))
                    .max()
                    .unwrap_or(0);
                tricks += f64::from(longest.saturating_sub(8)) * 0.5;
            }
        }
        tricks
    }
}

impl TrickEstimator for PointCountEstimator {
    fn estimate(&self, deal: &Deal, contract: &Contract, rng: &mut dyn RngCore) -> u8 {
        let mut tricks = self.expected_tricks(deal, contract);
        if self.noise > 0.0 {
            tricks += rng.gen_range(-self.noise..=self.noise);
        }
        tricks.round().clamp(0.0, f64::from(TRICKS_PER_BOARD)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::board::Position;
    use bridge_core::contract::DoubleStatus;
    use bridge_core::io::pbn::import_deal;
    use bridge_core::strain::Strain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contract(level: u8, strain: Strain) -> Contract {
        Contract {
            level,
            strain,
            double_status: DoubleStatus::Undoubled,
            declarer: Position::South,
        }
    }

    // North and South hold all the high cards.
    const STRONG_NS: &str =
        "N:AKQJ.AKQ.AKQ.AKQ 5432.5432.543.32 T987.JT9.JT9.JT9 6.876.8762.87654";

    #[test]
    fn test_strong_hands_take_more_tricks() {
        let deal = import_deal(STRONG_NS).unwrap();
        let estimator = PointCountEstimator::new(0.0);
        let ns = estimator.expected_tricks(&deal, &contract(3, Strain::NoTrump));
        let mut ew = contract(3, Strain::NoTrump);
        ew.declarer = Position::East;
        let ew = estimator.expected_tricks(&deal, &ew);
        assert!(ns > ew);
    }

    #[test]
    fn test_estimate_is_clamped() {
        let deal = import_deal(STRONG_NS).unwrap();
        let estimator = PointCountEstimator::new(3.0);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let tricks = estimator.estimate(&deal, &contract(7, Strain::Spades), &mut rng);
            assert!(tricks <= 13);
        }
        let mut weak = contract(1, Strain::Clubs);
        weak.declarer = Position::West;
        for _ in 0..50 {
            let tricks = estimator.estimate(&deal, &weak, &mut rng);
            assert!(tricks <= 13);
        }
    }

    #[test]
    fn test_zero_noise_is_deterministic() {
        let deal = import_deal(STRONG_NS).unwrap();
        let estimator = PointCountEstimator::new(0.0);
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let c = contract(4, Strain::Spades);
        assert_eq!(
            estimator.estimate(&deal, &c, &mut a),
            estimator.estimate(&deal, &c, &mut b)
        );
    }
}
