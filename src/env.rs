use ndarray::Array1;
use rand::Rng;

use crate::error::Result;

/// Count of discrete actions an environment accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpace {
    pub n: usize,
}

impl ActionSpace {
    pub fn new(n: usize) -> Self {
        ActionSpace { n }
    }

    /// Draw a uniformly random legal action.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }

    pub fn contains(&self, action: usize) -> bool {
        action < self.n
    }
}

/// Dimensionality of the observation vectors an environment emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservationSpace {
    pub dim: usize,
}

impl ObservationSpace {
    pub fn new(dim: usize) -> Self {
        ObservationSpace { dim }
    }
}

/// Result of advancing an environment by one action.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// The environment collaborator the agent is driven by.
///
/// Consumed, not implemented, by this crate: the agent is constructed from
/// the two space descriptors and an external loop feeds observations in via
/// `act` / `update_model`.
pub trait Environment {
    /// Reset to an initial state and return its observation.
    fn reset(&mut self) -> Array1<f32>;

    /// Apply one action.
    fn step(&mut self, action: usize) -> Result<StepOutcome>;

    fn action_space(&self) -> ActionSpace;

    fn observation_space(&self) -> ObservationSpace;
}
