use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine settings. Every field has a default, so an empty YAML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Base seed for all engine randomness. `None` draws one from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub monte_carlo: MonteCarloConfig,
    pub advisor: AdvisorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Trials per candidate bid.
    pub trials: u32,
    /// Aggressive bids below this confidence are passed over.
    pub confidence_threshold: f64,
    /// Standard deviation (in points) at which confidence drops to one half.
    pub confidence_scale: f64,
    /// Maximum calls simulated after the candidate before a trial is abandoned.
    pub round_cap: usize,
    /// Rejected samples tolerated before the deal filter is dropped.
    pub resample_limit: u32,
    /// Half-width of the uniform noise added to trick estimates.
    pub noise: f64,
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            confidence_threshold: 0.6,
            confidence_scale: 200.0,
            round_cap: 32,
            resample_limit: 200,
            noise: 1.0,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_ms: u64,
    /// Scoring mode sent as `sc`, e.g. "IMP" or "MP".
    pub scoring: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:8080/advice".to_string(),
            timeout_ms: 2000,
            scoring: "IMP".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
