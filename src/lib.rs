//! # Daedalus - DQN with Model-Based Informed Exploration
//!
//! Daedalus is a Rust reinforcement-learning agent that learns a control
//! policy for discrete-action environments via Q-learning with function
//! approximation. Alongside the value network it trains a forward-dynamics
//! model; once that model proves accurate on held-out samples, exploratory
//! actions stop being uniformly random and instead seek out states the
//! dynamics model predicts to be novel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daedalus::agent::InformedDqnAgentBuilder;
//! use ndarray::array;
//!
//! let mut agent = InformedDqnAgentBuilder::new()
//!     .observation_dim(4)
//!     .num_actions(2)
//!     .build()
//!     .unwrap();
//!
//! let state = array![0.0, 0.0, 0.0, 0.0];
//! let action = agent.act(state.view()).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions for network layers
//! - [`agent`] - The informed-exploration DQN agent and its builder
//! - [`config`] - Agent hyperparameters with JSON round-trips
//! - [`dynamics`] - Learned forward model with its convergence gate
//! - [`env`] - Environment collaborator contract (consumed, not implemented)
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Epsilon schedule and novelty scoring
//! - [`metrics`] - Training metrics with bounded histories
//! - [`network`] - Feed-forward network substrate
//! - [`optimizer`] - SGD and Adam update rules
//! - [`replay_buffer`] - Bounded FIFO experience store

pub mod activations;
pub mod agent;
pub mod config;
pub mod dynamics;
pub mod env;
pub mod error;
pub mod exploration;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;

#[cfg(test)]
mod tests;
