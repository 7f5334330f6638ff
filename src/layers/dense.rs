use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::neuron::neuron::Neuron;

/// Fully connected layer: every neuron sees the same input vector and shares
/// one activation function.
#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub activator: ActivationFunction,
    neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new<R: Rng>(size: usize, input_size: usize, activation: ActivationFunction, rng: &mut R) -> Layer {
        let neurons = (0..size)
            .map(|_| Neuron::new(input_size, activation, rng))
            .collect();

        Layer {
            size,
            input_size,
            activator: activation,
            neurons,
        }
    }

    /// Builds a layer from explicit (weights, bias) pairs, one per neuron.
    /// All weight vectors must have the same length.
    pub fn from_parameters(params: Vec<(Vec<f64>, f64)>, activation: ActivationFunction) -> Result<Layer> {
        let input_size = params.first().map(|(w, _)| w.len()).unwrap_or(0);
        let mut neurons = Vec::with_capacity(params.len());
        for (weights, bias) in params {
            if weights.len() != input_size {
                return Err(NnError::shape("layer weight width", input_size, weights.len()));
            }
            neurons.push(Neuron::with_parameters(weights, bias, activation));
        }

        Ok(Layer {
            size: neurons.len(),
            input_size,
            activator: activation,
            neurons,
        })
    }

    /// Runs every neuron on `input` in order; caches are refreshed on each.
    pub fn feed_from(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.neurons.iter_mut()
            .map(|neuron| neuron.compute_output(input))
            .collect()
    }

    /// Same outputs as `feed_from`, leaving the neuron caches alone.
    pub fn infer(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.neurons.iter()
            .map(|neuron| neuron.activate(input).map(|(_, a)| a))
            .collect()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    pub(crate) fn apply_gradients(&mut self, lr: f64) {
        for neuron in &mut self.neurons {
            neuron.apply_gradients(lr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn new_layer_has_uniform_input_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Layer::new(6, 4, ActivationFunction::ReLU, &mut rng);
        assert_eq!(layer.neurons().len(), 6);
        assert!(layer.neurons().iter().all(|n| n.input_size() == 4));
        assert!(layer.neurons().iter().all(|n| n.activation() == ActivationFunction::ReLU));
    }

    #[test]
    fn feed_from_returns_one_output_per_neuron_in_order() {
        let mut layer = Layer::from_parameters(
            vec![(vec![1.0, 0.0], 0.0), (vec![0.0, 1.0], 0.0), (vec![1.0, 1.0], -10.0)],
            ActivationFunction::ReLU,
        ).unwrap();
        let out = layer.feed_from(&[2.0, 3.0]).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 0.0]);
        assert_eq!(layer.neurons()[2].last_z(), -5.0);
    }

    #[test]
    fn ragged_parameters_are_rejected() {
        let err = Layer::from_parameters(
            vec![(vec![1.0, 0.0], 0.0), (vec![1.0], 0.0)],
            ActivationFunction::Sigmoid,
        ).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn neuron_shape_error_propagates() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut layer = Layer::new(3, 2, ActivationFunction::Sigmoid, &mut rng);
        assert!(layer.feed_from(&[1.0, 2.0, 3.0]).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn infer_matches_feed_from_without_caching() {
        let mut layer = Layer::from_parameters(
            vec![(vec![0.5, -1.0], 0.25)],
            ActivationFunction::Sigmoid,
        ).unwrap();
        let pure = layer.infer(&[1.0, 1.0]).unwrap();
        assert_eq!(layer.neurons()[0].last_z(), 0.0);
        let cached = layer.feed_from(&[1.0, 1.0]).unwrap();
        assert_eq!(pure, cached);
        assert_eq!(layer.neurons()[0].last_z(), -0.25);
    }
}
