use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::config::AgentConfig;
use crate::network::NeuralNetwork;
use crate::optimizer::OptimizerWrapper;
use crate::replay_buffer::{ReplayBuffer, Transition};

/// Learned forward model predicting the next state from a state and a
/// discrete action.
///
/// The action index is appended to the state vector as one extra input
/// feature, so the network maps `R^{D+1}` to `R^D`. A held-out scoring pass
/// flips the `converged` flag once the prediction error drops below the
/// configured threshold; the flag is one-way and never resets.
#[derive(Serialize, Deserialize, Clone)]
pub struct DynamicsModel {
    pub network: NeuralNetwork,
    state_dim: usize,
    learning_rate: f32,
    fit_batch_size: usize,
    eval_batch_size: usize,
    convergence_threshold: f32,
    converged: bool,
    fit_invocations: usize,
    eval_invocations: usize,
}

impl DynamicsModel {
    pub fn new(state_dim: usize, config: &AgentConfig, optimizer: OptimizerWrapper) -> Self {
        let layer_sizes = [
            state_dim + 1,
            config.hidden_width,
            config.hidden_width,
            state_dim,
        ];
        let activations = [Activation::Relu, Activation::Relu, Activation::Linear];
        DynamicsModel {
            network: NeuralNetwork::new(&layer_sizes, &activations, optimizer),
            state_dim,
            learning_rate: config.learning_rate,
            fit_batch_size: config.dynamics_fit_batch,
            eval_batch_size: config.dynamics_eval_batch,
            convergence_threshold: config.convergence_threshold,
            converged: false,
            fit_invocations: 0,
            eval_invocations: 0,
        }
    }

    /// Predict the next state for taking `action` in `state`.
    pub fn predict(&mut self, state: ArrayView1<f32>, action: usize) -> Array1<f32> {
        let mut input = Array1::zeros(self.state_dim + 1);
        input.slice_mut(ndarray::s![..self.state_dim]).assign(&state);
        input[self.state_dim] = action as f32;
        self.network.forward(input.view())
    }

    /// Train one epoch on a random batch of stored transitions, regressing
    /// next states from (state, action) inputs. Silently skips when fewer
    /// transitions are stored than the batch needs.
    pub fn fit(&mut self, buffer: &ReplayBuffer) {
        self.fit_invocations += 1;
        let batch = match buffer.sample(self.fit_batch_size) {
            Ok(batch) => batch,
            Err(_) => {
                log::debug!(
                    "dynamics fit skipped: {} of {} transitions stored",
                    buffer.len(),
                    self.fit_batch_size
                );
                return;
            }
        };
        let (inputs, targets) = self.batch_arrays(&batch);
        self.network
            .train_minibatch(inputs.view(), targets.view(), self.learning_rate);
    }

    /// Score the model on a fresh random batch and feed the result through
    /// the convergence gate. Returns the MSE, or `None` when too few
    /// transitions are stored to score.
    pub fn evaluate(&mut self, buffer: &ReplayBuffer) -> Option<f32> {
        self.eval_invocations += 1;
        let batch = match buffer.sample(self.eval_batch_size) {
            Ok(batch) => batch,
            Err(_) => {
                log::debug!(
                    "dynamics eval skipped: {} of {} transitions stored",
                    buffer.len(),
                    self.eval_batch_size
                );
                return None;
            }
        };
        let (inputs, targets) = self.batch_arrays(&batch);
        let score = self.network.mse(inputs.view(), targets.view());
        self.note_score(score);
        Some(score)
    }

    /// Apply the convergence gate to a held-out score. The flag is one-way:
    /// once set it stays set regardless of later scores.
    pub fn note_score(&mut self, score: f32) {
        if !self.converged && score < self.convergence_threshold {
            self.converged = true;
            log::info!("dynamics model converged (mse {:.6})", score);
        }
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Scheduled fit calls so far, insufficient-data no-ops included.
    pub fn fit_invocations(&self) -> usize {
        self.fit_invocations
    }

    /// Scheduled evaluation calls so far, insufficient-data no-ops included.
    pub fn eval_invocations(&self) -> usize {
        self.eval_invocations
    }

    fn batch_arrays(&self, batch: &[&Transition]) -> (Array2<f32>, Array2<f32>) {
        let mut inputs = Array2::zeros((batch.len(), self.state_dim + 1));
        let mut targets = Array2::zeros((batch.len(), self.state_dim));
        for (i, transition) in batch.iter().enumerate() {
            inputs
                .row_mut(i)
                .slice_mut(ndarray::s![..self.state_dim])
                .assign(&transition.state);
            inputs[[i, self.state_dim]] = transition.action as f32;
            targets.row_mut(i).assign(&transition.next_state);
        }
        (inputs, targets)
    }
}
