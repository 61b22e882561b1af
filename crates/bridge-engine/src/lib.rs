pub mod advisor;
pub mod config;
pub mod constraints;
pub mod error;
pub mod heuristic;
pub mod scheduler;
pub mod schema;
pub mod session;
pub mod simulation;

pub use advisor::{Advisor, AdvisorRequest, AdvisorTransport, HttpTransport};
pub use config::{AdvisorConfig, EngineConfig, MonteCarloConfig};
pub use error::{AdvisorError, EngineError, SimulationFailure};
pub use heuristic::{choose_card, Decision, HeuristicSelector};
pub use scheduler::{Scheduler, Table, TablePhase, TableResult};
pub use session::{
    start_auction, start_play, submit_bid, submit_card, AiPlayer, EnginePlayer, Move, MoveContext,
};
pub use simulation::{Evaluation, MonteCarloEvaluator, PointCountEstimator, TrickEstimator};
