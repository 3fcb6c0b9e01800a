use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded-history record of the training signals the agent emits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsTracker {
    history_size: usize,

    /// Value-network loss per update.
    losses: VecDeque<f32>,
    /// Epsilon after each action request.
    epsilons: VecDeque<f32>,
    /// Held-out dynamics-model scores, in evaluation order.
    dynamics_scores: VecDeque<f32>,
    /// Total reward per finished episode.
    episode_rewards: VecDeque<f32>,
    /// Steps per finished episode.
    episode_lengths: VecDeque<usize>,

    current_episode_reward: f32,
    current_episode_length: usize,
    episode_count: usize,
    total_steps: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            history_size,
            losses: VecDeque::with_capacity(history_size),
            epsilons: VecDeque::with_capacity(history_size),
            dynamics_scores: VecDeque::with_capacity(history_size),
            episode_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            current_episode_reward: 0.0,
            current_episode_length: 0,
            episode_count: 0,
            total_steps: 0,
        }
    }

    pub fn record_loss(&mut self, loss: f32) {
        push_bounded(&mut self.losses, loss, self.history_size);
    }

    pub fn record_epsilon(&mut self, epsilon: f32) {
        push_bounded(&mut self.epsilons, epsilon, self.history_size);
    }

    pub fn record_dynamics_score(&mut self, score: f32) {
        push_bounded(&mut self.dynamics_scores, score, self.history_size);
    }

    /// Record one environment step's reward for the running episode.
    pub fn record_step(&mut self, reward: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
        self.total_steps += 1;
    }

    /// Close out the running episode and fold it into the histories.
    pub fn end_episode(&mut self) {
        push_bounded(
            &mut self.episode_rewards,
            self.current_episode_reward,
            self.history_size,
        );
        push_bounded(
            &mut self.episode_lengths,
            self.current_episode_length,
            self.history_size,
        );
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
        self.episode_count += 1;
    }

    pub fn losses(&self) -> &VecDeque<f32> {
        &self.losses
    }

    pub fn epsilons(&self) -> &VecDeque<f32> {
        &self.epsilons
    }

    pub fn dynamics_scores(&self) -> &VecDeque<f32> {
        &self.dynamics_scores
    }

    pub fn episode_rewards(&self) -> &VecDeque<f32> {
        &self.episode_rewards
    }

    pub fn episode_lengths(&self) -> &VecDeque<usize> {
        &self.episode_lengths
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn mean_recent_loss(&self) -> Option<f32> {
        if self.losses.is_empty() {
            return None;
        }
        Some(self.losses.iter().sum::<f32>() / self.losses.len() as f32)
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}

fn push_bounded<T>(history: &mut VecDeque<T>, value: T, limit: usize) {
    if history.len() >= limit {
        history.pop_front();
    }
    history.push_back(value);
}
