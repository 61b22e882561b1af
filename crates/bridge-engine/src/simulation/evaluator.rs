use super::estimator::{PointCountEstimator, TrickEstimator};
use super::proxy::proxy_call;
use super::sampler::DealSampler;
use super::derive_trial_seed;
use crate::config::MonteCarloConfig;
use crate::constraints::{constraints_for, DealConstraint};
use crate::error::{EngineError, SimulationFailure};
use crate::heuristic::HeuristicSelector;
use bridge_core::auction::{Auction, AuctionOutcome};
use bridge_core::board::{Position, Vulnerability};
use bridge_core::call::Call;
use bridge_core::hand::Hand;
use bridge_core::scoring::duplicate_score;
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;

/// Mean score given to a candidate none of whose trials completed.
pub const FAILURE_SENTINEL: f64 = -1_000_000.0;

/// Per-candidate accumulator. Integer sums keep the reduction associative
/// and commutative, so trial order and thread count cannot change it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BidStats {
    pub trials: u32,
    pub failures: u32,
    pub relaxed: u32,
    pub sum: i64,
    pub sum_sq: i128,
}

impl BidStats {
    pub fn from_score(score: i32) -> Self {
        Self {
            trials: 1,
            sum: i64::from(score),
            sum_sq: i128::from(score) * i128::from(score),
            ..Self::default()
        }
    }

    pub fn failure() -> Self {
        Self {
            failures: 1,
            ..Self::default()
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            trials: self.trials + other.trials,
            failures: self.failures + other.failures,
            relaxed: self.relaxed + other.relaxed,
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }

    pub fn mean(&self) -> f64 {
        if self.trials == 0 {
            return FAILURE_SENTINEL;
        }
        self.sum as f64 / f64::from(self.trials)
    }

    /// Population standard deviation of the valid trials.
    pub fn std_dev(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let n = i128::from(self.trials);
        let sum = i128::from(self.sum);
        // n^2 * variance, exact in integers
        let scaled = (n * self.sum_sq - sum * sum).max(0);
        (scaled as f64).sqrt() / f64::from(self.trials)
    }

    /// `1 / (1 + sigma / scale)` in [0, 1]; zero when no trial completed.
    pub fn confidence(&self, scale: f64) -> f64 {
        if self.trials == 0 || scale <= 0.0 {
            return 0.0;
        }
        (1.0 / (1.0 + self.std_dev() / scale)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub call: Call,
    pub stats: BidStats,
    pub mean: f64,
    pub std_dev: f64,
    pub confidence: f64,
}

impl CandidateResult {
    pub fn new(call: Call, stats: BidStats, confidence_scale: f64) -> Self {
        Self {
            call,
            stats,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            confidence: stats.confidence(confidence_scale),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub best: Call,
    /// Candidates ranked by mean score, best first.
    pub ranked: Vec<CandidateResult>,
}

/// A bid at game level or above, or more than one level above the standing
/// bid (an opening counts from level zero).
pub fn is_aggressive(call: Call, auction: &Auction) -> bool {
    let Call::Bid { level, strain } = call else {
        return false;
    };
    let standing = auction.standing_bid().map_or(0, |b| b.level);
    level >= strain.game_level() || level > standing + 1
}

/// Ranks by mean and applies the safety policy: an aggressive leader below
/// `threshold` confidence yields to the best candidate that is either not
/// aggressive or confident enough. Returns `None` only for an empty slice.
pub fn select(ranked: &[CandidateResult], auction: &Auction, threshold: f64) -> Option<Call> {
    let mut ranked: Vec<&CandidateResult> = ranked.iter().collect();
    ranked.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    let top = ranked.first()?;
    if !is_aggressive(top.call, auction) || top.confidence >= threshold {
        return Some(top.call);
    }
    let safer = ranked
        .iter()
        .find(|r| !is_aggressive(r.call, auction) || r.confidence >= threshold);
    match safer {
        Some(r) => {
            debug!(
                "{} has confidence {:.2}, preferring {}",
                top.call, top.confidence, r.call
            );
            Some(r.call)
        }
        None => Some(top.call),
    }
}

/// Scores candidate calls by bidding out and estimating sampled deals.
pub struct MonteCarloEvaluator {
    config: MonteCarloConfig,
    selector: Arc<HeuristicSelector>,
    estimator: Arc<dyn TrickEstimator>,
    vulnerability: Vulnerability,
    seed: u64,
}

impl MonteCarloEvaluator {
    pub fn new(config: MonteCarloConfig, selector: Arc<HeuristicSelector>) -> Self {
        let estimator = Arc::new(PointCountEstimator::new(config.noise));
        Self {
            config,
            selector,
            estimator,
            vulnerability: Vulnerability::None,
            seed: 0,
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TrickEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_vulnerability(mut self, vulnerability: Vulnerability) -> Self {
        self.vulnerability = vulnerability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        known_hand: &Hand,
        seat: Position,
        candidates: &[Call],
        auction: &Auction,
    ) -> Result<Evaluation, EngineError> {
        let constraints = constraints_for(&self.selector, auction, seat);
        let mut results = Vec::with_capacity(candidates.len());

        for (index, &call) in candidates.iter().enumerate() {
            if !auction.is_legal(call) {
                warn!("skipping illegal candidate {call}");
                continue;
            }
            let stats = self.run_candidate(known_hand, seat, index, call, auction, &constraints);
            if stats.relaxed > 0 {
                warn!(
                    "{call}: {} of {} samples ignored the auction constraints",
                    stats.relaxed, stats.trials
                );
            }
            let result = CandidateResult::new(call, stats, self.config.confidence_scale);
            debug!(
                "{call}: mean {:.1}, sd {:.1}, confidence {:.2} ({} trials, {} failed)",
                result.mean, result.std_dev, result.confidence, stats.trials, stats.failures
            );
            results.push(result);
        }

        results.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
        let Some(best) = select(&results, auction, self.config.confidence_threshold) else {
            error!("no legal candidate to evaluate for {seat}");
            return Err(EngineError::ExhaustedOptions { seat });
        };
        info!("monte carlo chose {best} for {seat}");
        Ok(Evaluation {
            best,
            ranked: results,
        })
    }

    fn run_candidate(
        &self,
        known_hand: &Hand,
        seat: Position,
        index: usize,
        call: Call,
        auction: &Auction,
        constraints: &[DealConstraint],
    ) -> BidStats {
        let trial = |t: u32| {
            let seed = derive_trial_seed(self.seed, index, t);
            match self.run_trial(known_hand, seat, call, auction, constraints, seed) {
                Ok((score, relaxed)) => BidStats {
                    relaxed: u32::from(relaxed),
                    ..BidStats::from_score(score)
                },
                Err(failure) => {
                    debug!("trial {t} for {call} failed: {failure}");
                    BidStats::failure()
                }
            }
        };
        if self.config.parallel {
            (0..self.config.trials)
                .into_par_iter()
                .map(trial)
                .reduce(BidStats::default, BidStats::merge)
        } else {
            (0..self.config.trials)
                .map(trial)
                .fold(BidStats::default(), BidStats::merge)
        }
    }

    /// One trial: sample, bid out from `call`, estimate and score from
    /// `seat`'s side.
    fn run_trial(
        &self,
        known_hand: &Hand,
        seat: Position,
        call: Call,
        auction: &Auction,
        constraints: &[DealConstraint],
        seed: u64,
    ) -> Result<(i32, bool), SimulationFailure> {
        let mut rng = StdRng::seed_from_u64(seed);
        let sampler = DealSampler::new(known_hand, seat, constraints, self.config.resample_limit);
        let sample = sampler.sample(&mut rng)?;

        let mut bidding = auction.clone();
        bidding
            .apply_bid(seat, call)
            .map_err(SimulationFailure::IllegalContinuation)?;
        let mut continuation = 0;
        while !bidding.is_finished() {
            if continuation >= self.config.round_cap {
                return Err(SimulationFailure::RoundCapExceeded {
                    cap: self.config.round_cap,
                });
            }
            let next = bidding.current_player();
            let hand = sample.deal.hand(next);
            let next_call = match self.selector.choose_call(hand, &bidding) {
                Some(decision) => decision.call,
                None => proxy_call(hand, &bidding),
            };
            bidding
                .apply_bid(next, next_call)
                .map_err(SimulationFailure::IllegalContinuation)?;
            continuation += 1;
        }

        let score = match bidding.outcome() {
            Some(AuctionOutcome::Contract(contract)) => {
                let tricks = self.estimator.estimate(&sample.deal, &contract, &mut rng);
                let vulnerable = self.vulnerability.is_vulnerable(contract.declarer);
                let score = duplicate_score(&contract, tricks, vulnerable);
                if contract.declaring_side() == seat.partnership() {
                    score
                } else {
                    -score
                }
            }
            _ => 0,
        };
        Ok((score, sample.relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::strain::Strain;

    fn result(call: Call, mean: f64, confidence: f64) -> CandidateResult {
        CandidateResult {
            call,
            stats: BidStats::default(),
            mean,
            std_dev: 0.0,
            confidence,
        }
    }

    #[test]
    fn test_stats_moments() {
        let stats = [100, 200, 300]
            .into_iter()
            .map(BidStats::from_score)
            .fold(BidStats::default(), BidStats::merge);
        assert_eq!(stats.trials, 3);
        assert_eq!(stats.mean(), 200.0);
        let expected = (20000.0_f64 / 3.0).sqrt();
        assert!((stats.std_dev() - expected).abs() < 1e-9);
        assert!((stats.confidence(200.0) - 1.0 / (1.0 + expected / 200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_all_failed_scores_sentinel() {
        let stats = BidStats::failure().merge(BidStats::failure());
        assert_eq!(stats.mean(), FAILURE_SENTINEL);
        assert_eq!(stats.confidence(200.0), 0.0);
    }

    #[test]
    fn test_constant_scores_are_fully_confident() {
        let stats = BidStats::from_score(-50).merge(BidStats::from_score(-50));
        assert_eq!(stats.std_dev(), 0.0);
        assert_eq!(stats.confidence(200.0), 1.0);
    }

    #[test]
    fn test_aggressive_bids() {
        let opened = Auction::bidding(Position::North, "1S P");
        assert!(is_aggressive(Call::bid(4, Strain::Spades), &opened));
        assert!(is_aggressive(Call::bid(3, Strain::Hearts), &opened));
        assert!(!is_aggressive(Call::bid(2, Strain::Spades), &opened));
        assert!(!is_aggressive(Call::Pass, &opened));
        assert!(is_aggressive(Call::bid(3, Strain::NoTrump), &opened));
        let fresh = Auction::new(Position::North);
        assert!(!is_aggressive(Call::bid(1, Strain::Clubs), &fresh));
        assert!(is_aggressive(Call::bid(2, Strain::Hearts), &fresh));
    }

    #[test]
    fn test_confident_aggressive_bid_is_kept() {
        let auction = Auction::bidding(Position::North, "1S P");
        let ranked = vec![
            result(Call::bid(4, Strain::Spades), 420.0, 0.7),
            result(Call::bid(2, Strain::Spades), 140.0, 0.9),
        ];
        assert_eq!(select(&ranked, &auction, 0.6), Some(Call::bid(4, Strain::Spades)));
    }

    #[test]
    fn test_no_safe_alternative_keeps_top() {
        let auction = Auction::bidding(Position::North, "1S P");
        let ranked = vec![
            result(Call::bid(4, Strain::Spades), 420.0, 0.3),
            result(Call::bid(3, Strain::NoTrump), 400.0, 0.2),
        ];
        assert_eq!(select(&ranked, &auction, 0.6), Some(Call::bid(4, Strain::Spades)));
        assert_eq!(select(&[], &auction, 0.6), None);
    }
}
