use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};

/// A single fully connected unit.
///
/// Besides its parameters a neuron keeps the values produced by the most
/// recent forward and backward pass: `last_z`, `last_activation`, `delta`
/// and the gradients. They are overwritten on every pass, so anything that
/// needs the previous step's values must read them before the next call.
///
/// `weights.len() == grad_weights.len()` holds for the whole lifetime.
#[derive(Debug, Clone)]
pub struct Neuron {
    weights: Vec<f64>,
    bias: f64,
    activator: ActivationFunction,
    last_z: f64,
    last_activation: f64,
    delta: f64,
    grad_weights: Vec<f64>,
    grad_bias: f64,
}

impl Neuron {
    /// Weights and bias drawn uniformly from [-1, 1).
    pub fn new<R: Rng>(input_size: usize, activation: ActivationFunction, rng: &mut R) -> Neuron {
        let weights = (0..input_size).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
        let bias = rng.gen::<f64>() * 2.0 - 1.0;
        Neuron::with_parameters(weights, bias, activation)
    }

    pub fn with_parameters(weights: Vec<f64>, bias: f64, activation: ActivationFunction) -> Neuron {
        let grad_weights = vec![0.0; weights.len()];
        Neuron {
            weights,
            bias,
            activator: activation,
            last_z: 0.0,
            last_activation: 0.0,
            delta: 0.0,
            grad_weights,
            grad_bias: 0.0,
        }
    }

    /// Pre-activation and activation for `inputs`, without touching the caches.
    pub fn activate(&self, inputs: &[f64]) -> Result<(f64, f64)> {
        if inputs.len() != self.weights.len() {
            return Err(NnError::shape("neuron input", self.weights.len(), inputs.len()));
        }
        let z = self.weights.iter()
            .zip(inputs.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>() + self.bias;
        Ok((z, self.activator.function(z)))
    }

    /// Forward pass for one neuron; caches `last_z` and `last_activation`.
    pub fn compute_output(&mut self, inputs: &[f64]) -> Result<f64> {
        let (z, a) = self.activate(inputs)?;
        self.last_z = z;
        self.last_activation = a;
        Ok(a)
    }

    /// Stores the error signal and derives the gradients from the activation
    /// vector that fed this neuron on the forward pass.
    pub(crate) fn set_delta(&mut self, delta: f64, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.grad_weights.len() {
            return Err(NnError::shape("gradient input", self.grad_weights.len(), inputs.len()));
        }
        self.delta = delta;
        self.grad_bias = delta;
        for (g, x) in self.grad_weights.iter_mut().zip(inputs.iter()) {
            *g = delta * x;
        }
        Ok(())
    }

    /// Plain gradient-descent step using the stored gradients.
    pub(crate) fn apply_gradients(&mut self, lr: f64) {
        self.bias -= lr * self.grad_bias;
        for (w, g) in self.weights.iter_mut().zip(self.grad_weights.iter()) {
            *w -= lr * g;
        }
    }

    pub fn weights(&self) -> &[f64] { &self.weights }
    pub fn bias(&self) -> f64 { self.bias }
    pub fn activation(&self) -> ActivationFunction { self.activator }
    pub fn input_size(&self) -> usize { self.weights.len() }
    pub fn last_z(&self) -> f64 { self.last_z }
    pub fn last_activation(&self) -> f64 { self.last_activation }
    pub fn delta(&self) -> f64 { self.delta }
    pub fn grad_weights(&self) -> &[f64] { &self.grad_weights }
    pub fn grad_bias(&self) -> f64 { self.grad_bias }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn sigmoid_neuron_on_zero_input() {
        let mut n = Neuron::with_parameters(vec![1.0, 1.0], 0.0, ActivationFunction::Sigmoid);
        let out = n.compute_output(&[0.0, 0.0]).unwrap();
        assert_eq!(n.last_z(), 0.0);
        assert_abs_diff_eq!(out, 0.5);
        assert_abs_diff_eq!(n.last_activation(), 0.5);
    }

    #[test]
    fn compute_output_is_idempotent() {
        let mut n = Neuron::with_parameters(vec![0.3, -0.7, 1.1], 0.2, ActivationFunction::ReLU);
        let inputs = [1.0, 0.5, 2.0];
        let first = n.compute_output(&inputs).unwrap();
        let (z1, a1) = (n.last_z(), n.last_activation());
        let second = n.compute_output(&inputs).unwrap();
        assert_eq!(first, second);
        assert_eq!(z1, n.last_z());
        assert_eq!(a1, n.last_activation());
    }

    #[test]
    fn wrong_input_width_is_shape_mismatch() {
        let mut n = Neuron::with_parameters(vec![1.0, 1.0], 0.0, ActivationFunction::ReLU);
        let err = n.compute_output(&[1.0]).unwrap_err();
        assert!(err.is_shape_mismatch());
        // Caches stay untouched on failure.
        assert_eq!(n.last_z(), 0.0);
    }

    #[test]
    fn random_init_is_uniform_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = Neuron::new(5, ActivationFunction::ReLU, &mut rng);
            assert_eq!(n.weights().len(), 5);
            assert_eq!(n.grad_weights().len(), 5);
            assert!(n.weights().iter().all(|w| (-1.0..1.0).contains(w)));
            assert!((-1.0..1.0).contains(&n.bias()));
        }
    }

    #[test]
    fn gradients_follow_delta_and_inputs() {
        let mut n = Neuron::with_parameters(vec![0.5, -0.5], 0.1, ActivationFunction::Sigmoid);
        n.set_delta(0.2, &[1.0, 3.0]).unwrap();
        assert_eq!(n.delta(), 0.2);
        assert_eq!(n.grad_bias(), 0.2);
        assert_abs_diff_eq!(n.grad_weights()[0], 0.2);
        assert_abs_diff_eq!(n.grad_weights()[1], 0.6, epsilon = 1e-12);

        n.apply_gradients(0.5);
        assert_abs_diff_eq!(n.bias(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.weights()[0], 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(n.weights()[1], -0.8, epsilon = 1e-12);
    }
}
