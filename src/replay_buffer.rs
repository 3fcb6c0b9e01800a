use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{DaedalusError, Result};

/// Default bounded capacity of the replay memory.
pub const DEFAULT_CAPACITY: usize = 200_000;

/// One (state, action, reward, next_state, done) tuple. Immutable once
/// stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Bounded FIFO store of transitions.
///
/// At capacity the oldest entry is evicted, so `len() <= capacity` always
/// holds and insertion order is preserved for recency-based access.
/// Single-writer/single-reader use only.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest when at capacity.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Sample `batch_size` transitions uniformly at random without
    /// replacement. Fails when fewer transitions are stored.
    pub fn sample(&self, batch_size: usize) -> Result<Vec<&Transition>> {
        if self.buffer.len() < batch_size {
            return Err(DaedalusError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }
        let mut rng = thread_rng();
        let mut indices = (0..self.buffer.len()).collect::<Vec<usize>>();
        indices.shuffle(&mut rng);
        indices.truncate(batch_size);
        Ok(indices.into_iter().map(|i| &self.buffer[i]).collect())
    }

    /// The `count` most recently appended transitions in insertion order.
    /// Returns all stored transitions when fewer than `count` exist.
    pub fn recent(&self, count: usize) -> Vec<&Transition> {
        let skip = self.buffer.len().saturating_sub(count);
        self.buffer.iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
