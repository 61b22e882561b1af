//! Entry points for a session layer: pure auction and play transitions, and
//! the AI move pipeline (advisor, then heuristic, then Monte Carlo).

use crate::advisor::{Advisor, AdvisorRequest};
use crate::config::EngineConfig;
use crate::error::{AdvisorError, EngineError};
use crate::heuristic::{choose_card, HeuristicSelector};
use crate::simulation::{MonteCarloEvaluator, TrickEstimator};
use bridge_core::auction::Auction;
use bridge_core::board::{Position, Vulnerability};
use bridge_core::call::Call;
use bridge_core::card::Card;
use bridge_core::contract::Contract;
use bridge_core::deal::Deal;
use bridge_core::error::{DealError, IllegalAction};
use bridge_core::hand::Hand;
use bridge_core::play::PlayState;
use bridge_core::strain::Strain;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Call(Call),
    Card(Card),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Call(call) => write!(f, "{call}"),
            Move::Card(card) => write!(f, "{card}"),
        }
    }
}

pub fn start_auction(dealer: Position) -> Auction {
    Auction::new(dealer)
}

/// The auction after `seat` calls `call`. The input is left untouched.
pub fn submit_bid(
    auction: &Auction,
    seat: Position,
    call: Call,
) -> Result<Auction, IllegalAction> {
    let mut next = auction.clone();
    next.apply_bid(seat, call)?;
    Ok(next)
}

/// Opens the play phase. The deal must be an exact partition of the deck.
pub fn start_play(
    contract: Contract,
    deal: Deal,
    vulnerability: Vulnerability,
) -> Result<PlayState, DealError> {
    deal.validate()?;
    Ok(PlayState::new(contract, deal, vulnerability))
}

/// The play state after `seat` plays `card`. Dummy's cards are played as
/// the dummy seat.
pub fn submit_card(
    state: &PlayState,
    seat: Position,
    card: Card,
) -> Result<PlayState, IllegalAction> {
    let mut next = state.clone();
    next.apply_play(seat, card)?;
    Ok(next)
}

/// What an AI seat sees when asked for a move.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    /// Hand of the seat owing the move (dummy's hand when dummy is to play).
    pub hand: &'a Hand,
    pub vulnerability: Vulnerability,
    pub auction: &'a Auction,
    /// Present once the auction has produced a contract.
    pub play: Option<&'a PlayState>,
    /// Moves already made on the board; varies the simulation seed per turn.
    pub move_number: u64,
}

pub trait AiPlayer: Send + Sync {
    fn request_move(&self, seat: Position, ctx: &MoveContext) -> Result<Move, EngineError>;
}

/// The full decision pipeline.
pub struct EnginePlayer {
    config: EngineConfig,
    selector: Arc<HeuristicSelector>,
    advisor: Option<Advisor>,
    estimator: Option<Arc<dyn TrickEstimator>>,
    seed: u64,
}

impl EnginePlayer {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let selector = Arc::new(HeuristicSelector::natural()?);
        let advisor = Advisor::from_config(&config.advisor)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            selector,
            advisor,
            estimator: None,
            seed,
        })
    }

    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TrickEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn selector(&self) -> &HeuristicSelector {
        &self.selector
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self, vulnerability: Vulnerability, move_number: u64) -> MonteCarloEvaluator {
        let seed = self.seed.wrapping_add(move_number.wrapping_mul(1 << 40));
        let evaluator =
            MonteCarloEvaluator::new(self.config.monte_carlo.clone(), self.selector.clone())
                .with_vulnerability(vulnerability)
                .with_seed(seed);
        match &self.estimator {
            Some(estimator) => evaluator.with_estimator(estimator.clone()),
            None => evaluator,
        }
    }

    fn consult_advisor(&self, seat: Position, ctx: &MoveContext) -> Option<Move> {
        let advisor = self.advisor.as_ref()?;
        let request = advisor_request(&self.config.advisor.scoring, seat, ctx);
        let advice = advisor
            .ask(&request)
            .and_then(|mv| check_advice(mv, seat, ctx));
        match advice {
            Ok(mv) => Some(mv),
            Err(err) => {
                warn!("advisor unavailable for {seat}: {err}");
                None
            }
        }
    }

    fn choose_bid(&self, seat: Position, ctx: &MoveContext) -> Result<Call, EngineError> {
        if let Some(decision) = self.selector.choose_call(ctx.hand, ctx.auction) {
            return Ok(decision.call);
        }
        let candidates = candidate_calls(ctx.auction);
        debug!("simulating {} candidates for {seat}", candidates.len());
        let evaluation = self
            .evaluator(ctx.vulnerability, ctx.move_number)
            .evaluate(ctx.hand, seat, &candidates, ctx.auction)?;
        Ok(evaluation.best)
    }
}

impl AiPlayer for EnginePlayer {
    fn request_move(&self, seat: Position, ctx: &MoveContext) -> Result<Move, EngineError> {
        if let Some(state) = ctx.play {
            if state.is_complete() {
                return Err(EngineError::WrongPhase("the board is complete".into()));
            }
            if let Some(mv) = self.consult_advisor(seat, ctx) {
                return Ok(mv);
            }
            return match choose_card(state, seat) {
                Some(card) => Ok(Move::Card(card)),
                None => {
                    error!("{seat} holds no legal card");
                    Err(EngineError::ExhaustedOptions { seat })
                }
            };
        }

        if ctx.auction.is_finished() {
            return Err(EngineError::WrongPhase("the auction is over".into()));
        }
        if let Some(mv) = self.consult_advisor(seat, ctx) {
            return Ok(mv);
        }
        self.choose_bid(seat, ctx).map(Move::Call)
    }
}

/// Rejects advice that is not a legal move for `seat` right now.
pub fn check_advice(mv: Move, seat: Position, ctx: &MoveContext) -> Result<Move, AdvisorError> {
    let legal = match (mv, ctx.play) {
        (Move::Card(card), Some(state)) => {
            state.to_act() == seat && state.legal_cards(seat).contains(&card)
        }
        (Move::Call(call), None) => {
            ctx.auction.current_player() == seat && ctx.auction.is_legal(call)
        }
        _ => false,
    };
    if legal {
        Ok(mv)
    } else {
        Err(AdvisorError::IllegalAdvice(mv.to_string()))
    }
}

/// The query for `seat`'s move. Dummy's cards are asked for from declarer's
/// point of view, with both declaring hands shown.
fn advisor_request(scoring: &str, seat: Position, ctx: &MoveContext) -> AdvisorRequest {
    let mut hands: [Option<Hand>; 4] = Default::default();
    hands[seat.idx()] = Some(ctx.hand.clone());
    let mut pov = seat;
    let mut plays = Vec::new();
    if let Some(state) = ctx.play {
        let contract = state.contract();
        let dummy = contract.dummy();
        if seat == dummy {
            pov = contract.declarer;
            hands[pov.idx()] = Some(state.hand(pov).clone());
        } else if state.dummy_exposed() {
            hands[dummy.idx()] = Some(state.hand(dummy).clone());
        }
        for (trick, _) in state.completed_tricks() {
            plays.extend(trick.plays.iter().map(|&(_, card)| card));
        }
        plays.extend(state.current_trick().plays.iter().map(|&(_, card)| card));
    }
    AdvisorRequest {
        scoring: scoring.to_string(),
        pov,
        dealer: ctx.auction.dealer,
        vulnerability: ctx.vulnerability,
        hands,
        calls: ctx.auction.calls().to_vec(),
        plays,
    }
}

/// A short list of plausible calls to simulate: pass, any double, and in each
/// strain the cheapest bid, a single jump and game.
pub fn candidate_calls(auction: &Auction) -> Vec<Call> {
    let mut candidates = vec![Call::Pass];
    for call in [Call::Double, Call::Redouble] {
        if auction.is_legal(call) {
            candidates.push(call);
        }
    }
    for strain in Strain::ALL {
        let Some(level) = auction.minimum_bid_in(strain).and_then(|c| c.level()) else {
            continue;
        };
        let mut levels = vec![level, level + 1, strain.game_level()];
        levels.retain(|&l| l >= level && l <= 7);
        levels.dedup();
        for l in levels {
            let call = Call::bid(l, strain);
            if !candidates.contains(&call) {
                candidates.push(call);
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::AdvisorTransport;
    use bridge_core::io::pbn::{import_deal, import_hand};
    use std::sync::Mutex;

    struct Fixed(&'static str);

    /// Records every query it is sent and then fails.
    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<Vec<(&'static str, String)>>>>);

    impl AdvisorTransport for Recording {
        fn fetch(&self, params: &[(&'static str, String)]) -> Result<String, AdvisorError> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(params.to_vec());
            }
            Err(AdvisorError::Timeout)
        }
    }

    impl Recording {
        fn last(&self) -> Vec<(&'static str, String)> {
            self.0.lock().unwrap().last().cloned().unwrap()
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    const FULL_DEAL: &str =
        "N:AKQJ.AKQ.AKQ.AKQ 5432.5432.543.32 T987.JT9.JT9.JT9 6.876.8762.87654";

    impl AdvisorTransport for Fixed {
        fn fetch(&self, _params: &[(&'static str, String)]) -> Result<String, AdvisorError> {
            Ok(self.0.to_string())
        }
    }

    fn quick_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.seed = Some(7);
        config.monte_carlo.trials = 20;
        config.monte_carlo.parallel = false;
        config
    }

    #[test]
    fn test_pure_transitions() {
        let auction = start_auction(Position::South);
        let next = submit_bid(&auction, Position::South, Call::bid(1, Strain::Spades)).unwrap();
        assert!(auction.is_empty());
        assert_eq!(next.len(), 1);
        assert!(matches!(
            submit_bid(&next, Position::North, Call::Pass),
            Err(IllegalAction::OutOfTurn { .. })
        ));
    }

    #[test]
    fn test_opening_comes_from_heuristic() {
        let player = EnginePlayer::new(quick_config()).unwrap();
        let hand = import_hand("AK3.KJ4.Q832.QJ2").unwrap();
        let auction = Auction::new(Position::North);
        let ctx = MoveContext {
            hand: &hand,
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: None,
            move_number: 0,
        };
        assert_eq!(
            player.request_move(Position::North, &ctx).unwrap(),
            Move::Call(Call::bid(1, Strain::NoTrump))
        );
    }

    #[test]
    fn test_illegal_advice_falls_back() {
        // The advisor suggests a card during the auction.
        let player = EnginePlayer::new(quick_config())
            .unwrap()
            .with_advisor(Advisor::new(Box::new(Fixed("card=SA"))));
        let hand = import_hand("98765.432.432.32").unwrap();
        let auction = Auction::new(Position::North);
        let ctx = MoveContext {
            hand: &hand,
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: None,
            move_number: 0,
        };
        assert_eq!(
            player.request_move(Position::North, &ctx).unwrap(),
            Move::Call(Call::Pass)
        );
    }

    #[test]
    fn test_legal_advice_is_used() {
        let player = EnginePlayer::new(quick_config())
            .unwrap()
            .with_advisor(Advisor::new(Box::new(Fixed("bid=3C"))));
        let hand = import_hand("98765.432.432.32").unwrap();
        let auction = Auction::new(Position::North);
        let ctx = MoveContext {
            hand: &hand,
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: None,
            move_number: 0,
        };
        assert_eq!(
            player.request_move(Position::North, &ctx).unwrap(),
            Move::Call(Call::bid(3, Strain::Clubs))
        );
    }

    #[test]
    fn test_card_request_returns_legal_card() {
        let deal = import_deal(FULL_DEAL).unwrap();
        let auction = Auction::bidding(Position::North, "2C P 2D P 7N P P P");
        let contract = auction.final_contract().unwrap();
        let state = start_play(contract, deal, Vulnerability::None).unwrap();
        let leader = state.to_act();
        let player = EnginePlayer::new(quick_config()).unwrap();
        let ctx = MoveContext {
            hand: state.hand(leader),
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: Some(&state),
            move_number: 8,
        };
        let Move::Card(card) = player.request_move(leader, &ctx).unwrap() else {
            panic!("expected a card");
        };
        assert!(state.legal_cards(leader).contains(&card));
    }

    #[test]
    fn test_advisor_timeout_falls_back_to_heuristic() {
        let transport = Recording::default();
        let player = EnginePlayer::new(quick_config())
            .unwrap()
            .with_advisor(Advisor::new(Box::new(transport.clone())));
        let hand = import_hand("AK3.KJ4.Q832.QJ2").unwrap();
        let auction = Auction::new(Position::North);
        let ctx = MoveContext {
            hand: &hand,
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: None,
            move_number: 0,
        };
        assert_eq!(
            player.request_move(Position::North, &ctx).unwrap(),
            Move::Call(Call::bid(1, Strain::NoTrump))
        );
        assert_eq!(param(&transport.last(), "pov"), Some("N"));
    }

    #[test]
    fn test_dummy_card_is_asked_from_declarer() {
        let deal = import_deal(FULL_DEAL).unwrap();
        let auction = Auction::bidding(Position::North, "1N P P P");
        let contract = auction.final_contract().unwrap();
        let mut state = start_play(contract, deal, Vulnerability::None).unwrap();
        let lead = choose_card(&state, Position::East).unwrap();
        state.apply_play(Position::East, lead).unwrap();
        assert_eq!(state.to_act(), Position::South);

        let transport = Recording::default();
        let player = EnginePlayer::new(quick_config())
            .unwrap()
            .with_advisor(Advisor::new(Box::new(transport.clone())));
        let ctx = MoveContext {
            hand: state.hand(Position::South),
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: Some(&state),
            move_number: 5,
        };
        let Move::Card(card) = player.request_move(Position::South, &ctx).unwrap() else {
            panic!("expected a card");
        };
        assert!(state.legal_cards(Position::South).contains(&card));

        let params = transport.last();
        assert_eq!(param(&params, "pov"), Some("N"));
        assert_eq!(param(&params, "n"), Some("AKQJ.AKQ.AKQ.AKQ"));
        assert_eq!(param(&params, "s"), Some("T987.JT9.JT9.JT9"));
        assert_eq!(param(&params, "e"), None);
    }

    #[test]
    fn test_start_play_rejects_a_corrupt_deal() {
        let mut deal = import_deal(FULL_DEAL).unwrap();
        let card = deal.hand(Position::North).cards[0];
        deal.hand_mut(Position::North).remove(card);
        deal.hand_mut(Position::East).insert(card);
        let contract = Auction::bidding(Position::North, "1N P P P")
            .final_contract()
            .unwrap();
        assert!(start_play(contract, deal, Vulnerability::None).is_err());
    }

    #[test]
    fn test_finished_auction_owes_nothing() {
        let player = EnginePlayer::new(quick_config()).unwrap();
        let hand = import_hand("98765.432.432.32").unwrap();
        let auction = Auction::bidding(Position::North, "P P P P");
        let ctx = MoveContext {
            hand: &hand,
            vulnerability: Vulnerability::None,
            auction: &auction,
            play: None,
            move_number: 4,
        };
        assert!(matches!(
            player.request_move(Position::North, &ctx),
            Err(EngineError::WrongPhase(_))
        ));
    }

    #[test]
    fn test_candidate_calls() {
        let auction = Auction::bidding(Position::North, "1S");
        let calls = candidate_calls(&auction);
        assert_eq!(calls[0], Call::Pass);
        assert!(calls.contains(&Call::Double));
        assert!(!calls.contains(&Call::Redouble));
        assert!(calls.contains(&Call::bid(2, Strain::Hearts)));
        assert!(calls.contains(&Call::bid(3, Strain::Hearts)));
        assert!(calls.contains(&Call::bid(4, Strain::Hearts)));
        assert!(calls.contains(&Call::bid(1, Strain::NoTrump)));
        assert!(calls.iter().all(|&c| auction.is_legal(c)));
    }
}
