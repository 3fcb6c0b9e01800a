//! Exploration control: the epsilon schedule and the novelty scores used
//! once the dynamics model is trusted.

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dynamics::DynamicsModel;

/// How a predicted next-state is scored against recently visited states.
/// Higher scores mean less similar, so the maximizing action leads somewhere
/// under-visited.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub enum NoveltyMetric {
    /// Clamped squared per-dimension differences under a fixed bandwidth.
    #[default]
    Gaussian,
    /// Mean Euclidean distance to the recent states.
    MeanDistance,
    /// Maximum Euclidean distance to any recent state.
    MaxDistance,
}

impl NoveltyMetric {
    /// Score `predicted` against the recent states. `sigma` and `margin`
    /// only affect the Gaussian kernel.
    pub fn score(
        &self,
        predicted: ArrayView1<f32>,
        recent: &[&Array1<f32>],
        sigma: f32,
        margin: f32,
    ) -> f32 {
        match self {
            NoveltyMetric::Gaussian => {
                let mut total = 0.0;
                for state in recent {
                    let mut e = 0.0;
                    for (p, s) in predicted.iter().zip(state.iter()) {
                        let d2 = (p - s) * (p - s);
                        e += (d2 - margin).clamp(0.0, 1.0) / sigma;
                    }
                    total += e;
                }
                total
            }
            NoveltyMetric::MeanDistance => {
                if recent.is_empty() {
                    return 0.0;
                }
                let sum: f32 = recent
                    .iter()
                    .map(|state| euclidean_distance(predicted, state.view()))
                    .sum();
                sum / recent.len() as f32
            }
            NoveltyMetric::MaxDistance => recent
                .iter()
                .map(|state| euclidean_distance(predicted, state.view()))
                .fold(0.0, f32::max),
        }
    }
}

fn euclidean_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Pick the action whose predicted next-state scores as most novel relative
/// to the recent states.
///
/// Ties break to the first action encountered: a stable left-to-right scan
/// that only replaces the incumbent on a strictly greater score.
pub fn most_novel_action(
    dynamics: &mut DynamicsModel,
    state: ArrayView1<f32>,
    recent_states: &[&Array1<f32>],
    num_actions: usize,
    metric: NoveltyMetric,
    sigma: f32,
    margin: f32,
) -> usize {
    let mut best_score = f32::NEG_INFINITY;
    let mut best_action = 0;
    for action in 0..num_actions {
        let predicted = dynamics.predict(state, action);
        let score = metric.score(predicted.view(), recent_states, sigma, margin);
        if score > best_score {
            best_score = score;
            best_action = action;
        }
    }
    best_action
}

/// Mutable exploration state: the decaying epsilon and the monotonic action
/// counter that gates the initial pure-exploration phase.
///
/// Lives for the agent's whole lifetime; the counters never reset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    epsilon: f32,
    epsilon_min: f32,
    epsilon_decay: f32,
    initial_random_steps: usize,
    actions_count: usize,
}

impl ExplorationSchedule {
    pub fn new(
        epsilon: f32,
        epsilon_min: f32,
        epsilon_decay: f32,
        initial_random_steps: usize,
    ) -> Self {
        ExplorationSchedule {
            epsilon,
            epsilon_min,
            epsilon_decay,
            initial_random_steps,
            actions_count: 0,
        }
    }

    /// Advance the schedule by one action request: increment the action
    /// counter and decay epsilon toward its floor.
    pub fn advance(&mut self) {
        self.actions_count += 1;
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
    }

    /// Whether this action request explores. True on an epsilon draw or
    /// while still inside the initial random phase.
    pub fn should_explore<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen::<f32>() < self.epsilon || self.actions_count < self.initial_random_steps
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn actions_count(&self) -> usize {
        self.actions_count
    }
}
