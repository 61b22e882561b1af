use bridge_core::auction::Auction;
use bridge_core::board::{Position, Vulnerability};
use bridge_core::call::Call;
use bridge_core::contract::Contract;
use bridge_core::deal::Deal;
use bridge_core::io::pbn::import_hand;
use bridge_core::strain::Strain;
use bridge_engine::config::MonteCarloConfig;
use bridge_engine::heuristic::HeuristicSelector;
use bridge_engine::simulation::{
    select, BidStats, CandidateResult, MonteCarloEvaluator, TrickEstimator, FAILURE_SENTINEL,
};
use proptest::prelude::*;
use rand::RngCore;
use std::sync::Arc;

fn candidate(call: Call, mean: f64, confidence: f64) -> CandidateResult {
    CandidateResult {
        call,
        stats: BidStats::default(),
        mean,
        std_dev: 0.0,
        confidence,
    }
}

fn config(trials: u32, parallel: bool) -> MonteCarloConfig {
    MonteCarloConfig {
        trials,
        parallel,
        ..MonteCarloConfig::default()
    }
}

fn evaluator(config: MonteCarloConfig) -> MonteCarloEvaluator {
    let selector = Arc::new(HeuristicSelector::natural().unwrap());
    MonteCarloEvaluator::new(config, selector)
        .with_vulnerability(Vulnerability::None)
        .with_seed(2024)
}

#[test]
fn scenario_6_low_confidence_game_jump_yields_safer_bid() {
    let auction = Auction::bidding(Position::North, "1S P");
    let ranked = vec![
        candidate(Call::bid(4, Strain::Spades), 310.0, 0.3),
        candidate(Call::bid(2, Strain::Spades), 140.0, 0.8),
        candidate(Call::Pass, 80.0, 0.9),
    ];
    let chosen = select(&ranked, &auction, 0.6).unwrap();
    assert_ne!(chosen, Call::bid(4, Strain::Spades));
    assert_eq!(chosen, Call::bid(2, Strain::Spades));
}

#[test]
fn select_ranks_by_mean_regardless_of_input_order() {
    let auction = Auction::bidding(Position::North, "1S P");
    let ranked = vec![
        candidate(Call::Pass, 80.0, 0.9),
        candidate(Call::bid(2, Strain::Spades), 140.0, 0.8),
    ];
    assert_eq!(select(&ranked, &auction, 0.6), Some(Call::bid(2, Strain::Spades)));
}

#[test]
fn parallel_and_serial_evaluation_agree() {
    let hand = import_hand("K432.A2.KQ32.Q32").unwrap();
    let auction = Auction::bidding(Position::North, "1S P");
    let candidates = [
        Call::Pass,
        Call::bid(2, Strain::Spades),
        Call::bid(4, Strain::Spades),
    ];
    let serial = evaluator(config(40, false))
        .evaluate(&hand, Position::South, &candidates, &auction)
        .unwrap();
    let parallel = evaluator(config(40, true))
        .evaluate(&hand, Position::South, &candidates, &auction)
        .unwrap();
    assert_eq!(serial, parallel);
    assert_eq!(serial.ranked.len(), 3);
    for result in &serial.ranked {
        assert_eq!(result.stats.trials + result.stats.failures, 40);
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}

#[test]
fn same_seed_same_evaluation() {
    let hand = import_hand("AQ8765.K2.K32.32").unwrap();
    let auction = Auction::new(Position::North);
    let candidates = [Call::Pass, Call::bid(1, Strain::Spades), Call::bid(2, Strain::Spades)];
    let a = evaluator(config(25, true))
        .evaluate(&hand, Position::North, &candidates, &auction)
        .unwrap();
    let b = evaluator(config(25, true))
        .evaluate(&hand, Position::North, &candidates, &auction)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn failed_trials_score_the_sentinel() {
    let hand = import_hand("AQ8765.K2.K32.32").unwrap();
    let auction = Auction::new(Position::North);
    let config = MonteCarloConfig {
        round_cap: 0,
        ..config(10, false)
    };
    let evaluation = evaluator(config)
        .evaluate(&hand, Position::North, &[Call::bid(1, Strain::Spades)], &auction)
        .unwrap();
    let result = &evaluation.ranked[0];
    assert_eq!(result.stats.trials, 0);
    assert_eq!(result.stats.failures, 10);
    assert_eq!(result.mean, FAILURE_SENTINEL);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(evaluation.best, Call::bid(1, Strain::Spades));
}

/// Declarer always takes exactly the tricks needed.
struct JustMaking;

impl TrickEstimator for JustMaking {
    fn estimate(&self, _deal: &Deal, contract: &Contract, _rng: &mut dyn RngCore) -> u8 {
        contract.required_tricks()
    }
}

#[test]
fn custom_estimator_is_used() {
    let hand = import_hand("AKQJT98.AK2.A2.2").unwrap();
    let auction = Auction::new(Position::North);
    let evaluation = evaluator(config(20, false))
        .with_estimator(Arc::new(JustMaking))
        .evaluate(&hand, Position::North, &[Call::Pass, Call::bid(4, Strain::Spades)], &auction)
        .unwrap();
    // Passing lets the opponents buy the hand; bidding game makes it.
    assert_eq!(evaluation.best, Call::bid(4, Strain::Spades));
    let game = evaluation
        .ranked
        .iter()
        .find(|r| r.call == Call::bid(4, Strain::Spades))
        .unwrap();
    assert!(game.mean >= 420.0);
}

#[test]
fn illegal_candidates_are_skipped() {
    let hand = import_hand("32.K2.K32.AQ8765").unwrap();
    let auction = Auction::bidding(Position::North, "2S");
    let evaluation = evaluator(config(5, false))
        .evaluate(&hand, Position::East, &[Call::bid(1, Strain::Clubs), Call::Pass], &auction)
        .unwrap();
    assert_eq!(evaluation.ranked.len(), 1);
    assert_eq!(evaluation.best, Call::Pass);
}

proptest! {
    #[test]
    fn aggregation_is_order_independent(
        scores in prop::collection::vec(-7600i32..7600, 1..200),
        split in 0usize..200,
    ) {
        let forward = scores
            .iter()
            .map(|&s| BidStats::from_score(s))
            .fold(BidStats::default(), BidStats::merge);
        let backward = scores
            .iter()
            .rev()
            .map(|&s| BidStats::from_score(s))
            .fold(BidStats::default(), BidStats::merge);
        let cut = split.min(scores.len());
        let (left, right) = scores.split_at(cut);
        let halves = right
            .iter()
            .map(|&s| BidStats::from_score(s))
            .fold(BidStats::default(), BidStats::merge)
            .merge(
                left.iter()
                    .map(|&s| BidStats::from_score(s))
                    .fold(BidStats::default(), BidStats::merge),
            );

        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward, halves);
        prop_assert_eq!(forward.mean(), backward.mean());
        prop_assert_eq!(forward.confidence(200.0), halves.confidence(200.0));
    }

    #[test]
    fn selection_is_order_independent(
        means in prop::collection::vec(-1000i32..1000, 2..6),
        confidences in prop::collection::vec(0u32..=100, 6),
    ) {
        let auction = Auction::bidding(Position::North, "1S P");
        let calls = [
            Call::Pass,
            Call::bid(2, Strain::Spades),
            Call::bid(3, Strain::Spades),
            Call::bid(4, Strain::Spades),
            Call::bid(3, Strain::NoTrump),
            Call::bid(2, Strain::Hearts),
        ];
        // Distinct means, so the ranking has no ties.
        let ranked: Vec<CandidateResult> = means
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let mean = f64::from(m) * 10.0 + i as f64;
                candidate(calls[i], mean, f64::from(confidences[i]) / 100.0)
            })
            .collect();
        let mut reversed = ranked.clone();
        reversed.reverse();
        prop_assert_eq!(select(&ranked, &auction, 0.6), select(&reversed, &auction, 0.6));
    }
}
