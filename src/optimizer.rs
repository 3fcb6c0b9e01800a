use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Interface for weight and bias update rules.
///
/// `layer_idx` identifies which layer's parameters are being updated so
/// stateful optimizers can keep separate moment estimates per layer.
pub trait Optimizer {
    fn update_weights(
        &mut self,
        layer_idx: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    );

    fn update_biases(
        &mut self,
        layer_idx: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    );
}

/// Serde-friendly static dispatch over the available optimizers.
#[derive(Serialize, Deserialize, Clone)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(
        &mut self,
        layer_idx: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    ) {
        match self {
            OptimizerWrapper::SGD(optimizer) => {
                optimizer.update_weights(layer_idx, weights, gradients, learning_rate)
            }
            OptimizerWrapper::Adam(optimizer) => {
                optimizer.update_weights(layer_idx, weights, gradients, learning_rate)
            }
        }
    }

    fn update_biases(
        &mut self,
        layer_idx: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        match self {
            OptimizerWrapper::SGD(optimizer) => {
                optimizer.update_biases(layer_idx, biases, gradients, learning_rate)
            }
            OptimizerWrapper::Adam(optimizer) => {
                optimizer.update_biases(layer_idx, biases, gradients, learning_rate)
            }
        }
    }
}

/// Plain stochastic gradient descent.
#[derive(Serialize, Deserialize, Clone)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(
        &mut self,
        _layer_idx: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    ) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(
        &mut self,
        _layer_idx: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Per-layer first/second moment estimates for Adam.
#[derive(Serialize, Deserialize, Clone, Default)]
struct Moments {
    m_weights: Option<Array2<f32>>,
    v_weights: Option<Array2<f32>>,
    m_biases: Option<Array1<f32>>,
    v_biases: Option<Array1<f32>>,
    t_weights: usize,
    t_biases: usize,
}

/// Adam optimizer with bias-corrected moment estimates.
///
/// Moment buffers are allocated lazily on the first update of each layer,
/// so networks of any depth can share one `Adam` value.
#[derive(Serialize, Deserialize, Clone)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    moments: Vec<Moments>,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            moments: Vec::new(),
        }
    }

    fn moments_mut(&mut self, layer_idx: usize) -> &mut Moments {
        if layer_idx >= self.moments.len() {
            self.moments.resize_with(layer_idx + 1, Moments::default);
        }
        &mut self.moments[layer_idx]
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update_weights(
        &mut self,
        layer_idx: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    ) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let state = self.moments_mut(layer_idx);
        let m = state
            .m_weights
            .get_or_insert_with(|| Array2::zeros(gradients.dim()));
        let v = state
            .v_weights
            .get_or_insert_with(|| Array2::zeros(gradients.dim()));
        state.t_weights += 1;
        let t = state.t_weights as i32;

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let m_hat = m.mapv(|x| x / (1.0 - beta1.powi(t)));
        let v_hat = v.mapv(|x| x / (1.0 - beta2.powi(t)));

        *weights -= &((&m_hat / (v_hat.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }

    fn update_biases(
        &mut self,
        layer_idx: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let state = self.moments_mut(layer_idx);
        let m = state
            .m_biases
            .get_or_insert_with(|| Array1::zeros(gradients.dim()));
        let v = state
            .v_biases
            .get_or_insert_with(|| Array1::zeros(gradients.dim()));
        state.t_biases += 1;
        let t = state.t_biases as i32;

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let m_hat = m.mapv(|x| x / (1.0 - beta1.powi(t)));
        let v_hat = v.mapv(|x| x / (1.0 - beta2.powi(t)));

        *biases -= &((&m_hat / (v_hat.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }
}
