//! Monte-Carlo bid evaluation: sample deals consistent with the known hand
//! and the auction, bid them out, estimate the play and score the result.

mod estimator;
mod evaluator;
mod proxy;
mod sampler;

pub use estimator::{PointCountEstimator, TrickEstimator};
pub use evaluator::{
    is_aggressive, select, BidStats, CandidateResult, Evaluation, MonteCarloEvaluator,
    FAILURE_SENTINEL,
};
pub use proxy::proxy_call;
pub use sampler::{DealSampler, Sample};

/// Seed for one trial, unique per (candidate, trial) pair for any trial count
/// below 2^32.
pub fn derive_trial_seed(base: u64, candidate: usize, trial: u32) -> u64 {
    base.wrapping_add((candidate as u64).wrapping_mul(1 << 32))
        .wrapping_add(trial as u64)
}
