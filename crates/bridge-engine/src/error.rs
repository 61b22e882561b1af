use bridge_core::board::Position;
use bridge_core::error::{DealError, IllegalAction};
use thiserror::Error;

/// Why one Monte-Carlo trial produced no score. Failed trials are counted and
/// dropped, never surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationFailure {
    #[error("auction continuation exceeded {cap} calls")]
    RoundCapExceeded { cap: usize },
    #[error("continuation produced an illegal call: {0}")]
    IllegalContinuation(IllegalAction),
    #[error("could not complete the deal: {0}")]
    Deal(#[from] DealError),
}

/// The remote advisor could not supply a usable move. Always recovered from by
/// falling back to the local selectors.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor request timed out")]
    Timeout,
    #[error("advisor transport failed: {0}")]
    Transport(String),
    #[error("advisor reported error code {0}")]
    ErrorCode(i64),
    #[error("malformed advisor response: {0}")]
    Malformed(String),
    #[error("advisor response names both a bid and a card")]
    Ambiguous,
    #[error("advisor suggested an illegal move: {0}")]
    IllegalAdvice(String),
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdvisorError::Timeout
        } else {
            AdvisorError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Illegal(#[from] IllegalAction),
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
    #[error(transparent)]
    Simulation(#[from] SimulationFailure),
    #[error(transparent)]
    Deal(#[from] DealError),
    /// No selector produced a legal move. Indicates a bug, since Pass and
    /// some held card are always available.
    #[error("no legal move could be produced for {seat}")]
    ExhaustedOptions { seat: Position },
    #[error("no move is owed: {0}")]
    WrongPhase(String),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}
