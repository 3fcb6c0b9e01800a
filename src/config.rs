use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DaedalusError, Result};
use crate::exploration::NoveltyMetric;
use crate::replay_buffer::DEFAULT_CAPACITY;

/// Hyperparameters for [`InformedDqnAgent`](crate::agent::InformedDqnAgent).
///
/// The defaults reproduce the reference configuration: epsilon decays
/// geometrically from 1.0 to a 0.01 floor, the target network hard-syncs
/// every 8 updates, and the dynamics model fits every 25 updates on batches
/// of 64 and is scored every 500 updates on batches of 32.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Discount factor for TD targets.
    pub gamma: f32,
    /// Initial exploration rate.
    pub epsilon: f32,
    /// Lower bound for the decayed exploration rate.
    pub epsilon_min: f32,
    /// Geometric decay applied to epsilon on every action request.
    pub epsilon_decay: f32,
    /// Learning rate shared by the value and dynamics networks.
    pub learning_rate: f32,
    /// Hard-sync the target network every this many updates.
    pub target_sync_interval: usize,
    /// Actions taken before greedy exploitation is allowed at all.
    pub initial_random_steps: usize,
    /// Bounded capacity of the replay memory.
    pub memory_capacity: usize,
    /// Fit the dynamics model every this many updates.
    pub dynamics_fit_interval: usize,
    /// Batch size for dynamics-model fits.
    pub dynamics_fit_batch: usize,
    /// Score the dynamics model every this many updates.
    pub dynamics_eval_interval: usize,
    /// Batch size for dynamics-model scoring.
    pub dynamics_eval_batch: usize,
    /// MSE below which the dynamics model counts as converged.
    pub convergence_threshold: f32,
    /// How many recent states the novelty scan compares against.
    pub novelty_samples: usize,
    /// Bandwidth of the Gaussian novelty kernel.
    pub novelty_sigma: f32,
    /// Margin subtracted from squared distances before clamping.
    pub novelty_margin: f32,
    /// Novelty score used by informed exploration.
    pub novelty_metric: NoveltyMetric,
    /// Clamp the TD error to [-1, 1] before applying it.
    pub clip_errors: bool,
    /// Width of the two hidden layers in both networks.
    pub hidden_width: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            gamma: 0.99,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.9995,
            learning_rate: 0.05,
            target_sync_interval: 8,
            initial_random_steps: 100_000,
            memory_capacity: DEFAULT_CAPACITY,
            dynamics_fit_interval: 25,
            dynamics_fit_batch: 64,
            dynamics_eval_interval: 500,
            dynamics_eval_batch: 32,
            convergence_threshold: 3.0e-4,
            novelty_samples: 50,
            novelty_sigma: 100.0,
            novelty_margin: 0.0,
            novelty_metric: NoveltyMetric::Gaussian,
            clip_errors: true,
            hidden_width: 24,
        }
    }
}

impl AgentConfig {
    /// Check the configuration for values the agent cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DaedalusError::invalid_parameter("gamma", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(DaedalusError::invalid_parameter("epsilon", "must be in [0, 1]"));
        }
        if self.epsilon_min > self.epsilon {
            return Err(DaedalusError::invalid_parameter(
                "epsilon_min",
                "must not exceed the initial epsilon",
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return Err(DaedalusError::invalid_parameter(
                "epsilon_decay",
                "must be in [0, 1]",
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(DaedalusError::invalid_parameter(
                "learning_rate",
                "must be positive",
            ));
        }
        if self.target_sync_interval == 0 {
            return Err(DaedalusError::invalid_parameter(
                "target_sync_interval",
                "must be at least 1",
            ));
        }
        if self.memory_capacity == 0 {
            return Err(DaedalusError::invalid_parameter(
                "memory_capacity",
                "must be at least 1",
            ));
        }
        if self.dynamics_fit_interval == 0 || self.dynamics_eval_interval == 0 {
            return Err(DaedalusError::invalid_parameter(
                "dynamics intervals",
                "must be at least 1",
            ));
        }
        if self.dynamics_fit_batch == 0 || self.dynamics_eval_batch == 0 {
            return Err(DaedalusError::invalid_parameter(
                "dynamics batch sizes",
                "must be at least 1",
            ));
        }
        if self.novelty_sigma <= 0.0 {
            return Err(DaedalusError::invalid_parameter(
                "novelty_sigma",
                "must be positive",
            ));
        }
        if self.hidden_width == 0 {
            return Err(DaedalusError::invalid_parameter(
                "hidden_width",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: AgentConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
