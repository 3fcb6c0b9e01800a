use ndarray::{ArrayView1, Axis};
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::config::AgentConfig;
use crate::dynamics::DynamicsModel;
use crate::env::{ActionSpace, ObservationSpace};
use crate::error::{DaedalusError, Result};
use crate::exploration::{self, ExplorationSchedule, NoveltyMetric};
use crate::metrics::MetricsTracker;
use crate::network::NeuralNetwork;
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::replay_buffer::{ReplayBuffer, Transition};

/// Q-learning agent with a learned forward-dynamics model driving
/// exploration.
///
/// The agent acts epsilon-greedily against its value network, but every
/// exploratory action consults the dynamics model once that model has
/// passed its convergence gate: instead of acting at random, the agent
/// picks the action whose predicted next-state looks most novel relative
/// to recent experience.
///
/// # Example
///
/// ```rust,no_run
/// use daedalus::agent::InformedDqnAgentBuilder;
/// use ndarray::array;
///
/// // Agent for a CartPole-like task (4 state dimensions, 2 actions)
/// let mut agent = InformedDqnAgentBuilder::new()
///     .observation_dim(4)
///     .num_actions(2)
///     .build()
///     .unwrap();
///
/// let state = array![0.1, -0.2, 0.3, -0.1];
/// let action = agent.act(state.view()).unwrap();
///
/// // After the environment step...
/// let next_state = array![0.15, -0.25, 0.35, -0.05];
/// agent
///     .update_model(state.view(), action, 1.0, next_state.view(), false)
///     .unwrap();
/// ```
#[derive(Serialize, Deserialize)]
pub struct InformedDqnAgent {
    /// Value network driving greedy action selection.
    pub q_network: NeuralNetwork,

    /// Point-in-time copy of the value network, hard-synced on a fixed
    /// cadence and never gradient-updated directly.
    pub target_network: NeuralNetwork,

    /// Forward model consulted by informed exploration.
    pub dynamics_model: DynamicsModel,

    #[serde(skip)]
    replay_buffer: ReplayBuffer,

    schedule: ExplorationSchedule,
    update_count: usize,
    state_dim: usize,
    num_actions: usize,
    config: AgentConfig,
    metrics: MetricsTracker,

    #[serde(skip)]
    rng: ThreadRng,
}

impl InformedDqnAgent {
    /// Create an agent for the given spaces with the default Adam optimizer.
    pub fn new(
        observation_space: ObservationSpace,
        action_space: ActionSpace,
        config: AgentConfig,
    ) -> Result<Self> {
        let optimizer = OptimizerWrapper::Adam(Adam::default());
        Self::with_optimizer(observation_space, action_space, config, optimizer)
    }

    /// Create an agent with an explicit optimizer shared by both networks.
    pub fn with_optimizer(
        observation_space: ObservationSpace,
        action_space: ActionSpace,
        config: AgentConfig,
        optimizer: OptimizerWrapper,
    ) -> Result<Self> {
        config.validate()?;
        if observation_space.dim == 0 {
            return Err(DaedalusError::invalid_parameter(
                "observation_space",
                "must have at least one dimension",
            ));
        }
        if action_space.n == 0 {
            return Err(DaedalusError::invalid_parameter(
                "action_space",
                "must have at least one action",
            ));
        }

        let layer_sizes = [
            observation_space.dim,
            config.hidden_width,
            config.hidden_width,
            action_space.n,
        ];
        let activations = [Activation::Relu, Activation::Relu, Activation::Linear];

        let q_network = NeuralNetwork::new(&layer_sizes, &activations, optimizer.clone());
        let target_network = NeuralNetwork::new(&layer_sizes, &activations, optimizer.clone());
        let dynamics_model = DynamicsModel::new(observation_space.dim, &config, optimizer);
        let schedule = ExplorationSchedule::new(
            config.epsilon,
            config.epsilon_min,
            config.epsilon_decay,
            config.initial_random_steps,
        );

        Ok(InformedDqnAgent {
            q_network,
            target_network,
            dynamics_model,
            replay_buffer: ReplayBuffer::new(config.memory_capacity),
            schedule,
            update_count: 0,
            state_dim: observation_space.dim,
            num_actions: action_space.n,
            config,
            metrics: MetricsTracker::default(),
            rng: rand::thread_rng(),
        })
    }

    /// Select an action for `state`.
    ///
    /// Advances the epsilon schedule, then either exploits greedily or
    /// hands off to the exploration branch: uniformly random while the
    /// dynamics model is untrusted, novelty-seeking once it has converged.
    pub fn act(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        self.check_state_shape(state)?;

        self.schedule.advance();
        self.metrics.record_epsilon(self.schedule.epsilon());

        if self.schedule.should_explore(&mut self.rng) {
            return self.explore(state);
        }

        let q_values = self.q_network.forward(state);
        q_values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .ok_or_else(|| DaedalusError::NumericalError("no Q-values to maximize".to_string()))
    }

    fn explore(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        if !self.dynamics_model.converged() {
            return Ok(self.rng.gen_range(0..self.num_actions));
        }

        let recent = self.replay_buffer.recent(self.config.novelty_samples);
        if recent.is_empty() {
            return Ok(self.rng.gen_range(0..self.num_actions));
        }
        let recent_states: Vec<_> = recent.iter().map(|t| &t.state).collect();

        Ok(exploration::most_novel_action(
            &mut self.dynamics_model,
            state,
            &recent_states,
            self.num_actions,
            self.config.novelty_metric,
            self.config.novelty_sigma,
            self.config.novelty_margin,
        ))
    }

    /// Fold one transition into the agent.
    ///
    /// The transition is stored before any training so scheduled dynamics
    /// fits and evaluations can sample it. The value network then trains on
    /// this step's TD target, the target network hard-syncs on its cadence,
    /// and the dynamics model fits/evaluates on its own intervals.
    pub fn update_model(
        &mut self,
        state: ArrayView1<f32>,
        action: usize,
        reward: f32,
        next_state: ArrayView1<f32>,
        done: bool,
    ) -> Result<()> {
        self.check_state_shape(state)?;
        self.check_state_shape(next_state)?;
        if action >= self.num_actions {
            return Err(DaedalusError::DegenerateAction {
                action,
                num_actions: self.num_actions,
            });
        }

        self.replay_buffer.push(Transition {
            state: state.to_owned(),
            action,
            reward,
            next_state: next_state.to_owned(),
            done,
        });

        self.train_value_network(state, action, reward, next_state, done);

        self.update_count += 1;

        if self.update_count % self.config.target_sync_interval == 0 {
            self.target_network = self.q_network.clone();
            log::debug!("target network synced at update {}", self.update_count);
        }
        if self.update_count % self.config.dynamics_fit_interval == 0 {
            self.dynamics_model.fit(&self.replay_buffer);
        }
        if self.update_count % self.config.dynamics_eval_interval == 0 {
            if let Some(score) = self.dynamics_model.evaluate(&self.replay_buffer) {
                self.metrics.record_dynamics_score(score);
            }
        }

        Ok(())
    }

    /// One TD step on the current transition. Fixed batching policy: the
    /// value network always trains on the newest transition only; batched
    /// replay is the dynamics model's concern.
    fn train_value_network(
        &mut self,
        state: ArrayView1<f32>,
        action: usize,
        reward: f32,
        next_state: ArrayView1<f32>,
        done: bool,
    ) {
        let mut target = self.q_network.forward(state);

        let td_target = if done {
            reward
        } else {
            let next_q = self.target_network.forward(next_state);
            let max_next = next_q.iter().fold(f32::NEG_INFINITY, |max, &v| max.max(v));
            reward + self.config.gamma * max_next
        };

        let predicted = target[action];
        let td_error = td_target - predicted;
        target[action] = if self.config.clip_errors {
            predicted + td_error.clamp(-1.0, 1.0)
        } else {
            td_target
        };

        self.q_network.train_minibatch(
            state.insert_axis(Axis(0)),
            target.view().insert_axis(Axis(0)),
            self.config.learning_rate,
        );

        self.metrics.record_loss(td_error * td_error);
    }

    fn check_state_shape(&self, state: ArrayView1<f32>) -> Result<()> {
        if state.len() != self.state_dim {
            return Err(DaedalusError::InvalidStateShape {
                expected: self.state_dim,
                actual: state.len(),
            });
        }
        Ok(())
    }

    pub fn epsilon(&self) -> f32 {
        self.schedule.epsilon()
    }

    pub fn actions_count(&self) -> usize {
        self.schedule.actions_count()
    }

    pub fn update_count(&self) -> usize {
        self.update_count
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn replay_buffer(&self) -> &ReplayBuffer {
        &self.replay_buffer
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    /// Mutable metrics access for the environment loop (episode bookkeeping).
    pub fn metrics_mut(&mut self) -> &mut MetricsTracker {
        &mut self.metrics
    }

    /// Serialize the agent's learned state to disk. Checkpoints carry the
    /// networks, counters, and config; stored experience is not persisted.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load an agent checkpoint. The replay buffer restarts empty at the
    /// configured capacity.
    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read(path)?;
        let mut agent: Self = bincode::deserialize(&data)?;
        agent.rng = rand::thread_rng();
        agent.replay_buffer = ReplayBuffer::new(agent.config.memory_capacity);
        Ok(agent)
    }
}

/// Builder for [`InformedDqnAgent`].
pub struct InformedDqnAgentBuilder {
    observation_dim: Option<usize>,
    num_actions: Option<usize>,
    config: AgentConfig,
    optimizer: Option<OptimizerWrapper>,
}

impl InformedDqnAgentBuilder {
    pub fn new() -> Self {
        InformedDqnAgentBuilder {
            observation_dim: None,
            num_actions: None,
            config: AgentConfig::default(),
            optimizer: None,
        }
    }

    pub fn observation_dim(mut self, dim: usize) -> Self {
        self.observation_dim = Some(dim);
        self
    }

    pub fn num_actions(mut self, n: usize) -> Self {
        self.num_actions = Some(n);
        self
    }

    /// Replace the entire configuration. Field setters applied afterwards
    /// still take effect.
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn memory_capacity(mut self, capacity: usize) -> Self {
        self.config.memory_capacity = capacity;
        self
    }

    pub fn initial_random_steps(mut self, steps: usize) -> Self {
        self.config.initial_random_steps = steps;
        self
    }

    pub fn clip_errors(mut self, clip: bool) -> Self {
        self.config.clip_errors = clip;
        self
    }

    pub fn novelty_metric(mut self, metric: NoveltyMetric) -> Self {
        self.config.novelty_metric = metric;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerWrapper) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn build(self) -> Result<InformedDqnAgent> {
        let observation_dim = self.observation_dim.ok_or_else(|| {
            DaedalusError::invalid_parameter("observation_dim", "must be specified")
        })?;
        let num_actions = self
            .num_actions
            .ok_or_else(|| DaedalusError::invalid_parameter("num_actions", "must be specified"))?;

        let optimizer = self
            .optimizer
            .unwrap_or_else(|| OptimizerWrapper::Adam(Adam::default()));

        InformedDqnAgent::with_optimizer(
            ObservationSpace::new(observation_dim),
            ActionSpace::new(num_actions),
            self.config,
            optimizer,
        )
    }
}

impl Default for InformedDqnAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
