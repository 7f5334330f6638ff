use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::dense::Layer;
use crate::loss::mse::MseLoss;
use crate::network::spec::NetworkSpec;

/// Which activation derivative backpropagation applies to each layer.
///
/// - `Positional`: Sigmoid (on the cached output) for the output layer and
///   ReLU (on the cached pre-activation) for every hidden layer, regardless
///   of how the layers were configured.
/// - `PerLayer`  : each layer's own configured activation decides.
///
/// The two agree for the usual ReLU-hidden / Sigmoid-output stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeMode {
    #[default]
    Positional,
    PerLayer,
}

/// Result of a caching forward pass.
///
/// `activation_history[0]` is a copy of the raw input and
/// `activation_history[i + 1]` is the output of layer `i`, so the vector that
/// fed layer `i` is always `activation_history[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub final_output: Vec<f64>,
    pub activation_history: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    ///
    /// Every layer after the first must declare an input width equal to the
    /// previous layer's size.
    pub fn new<R: Rng>(layer_specs: Vec<(usize, usize, ActivationFunction)>, rng: &mut R) -> Result<Network> {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation, rng))
            .collect();
        Network::from_layers(layers)
    }

    pub fn from_spec<R: Rng>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        Network::new(spec.resolve()?, rng)
    }

    /// Builds a network with fixed parameters: one entry per layer, holding
    /// the activation and a `(weights, bias)` pair per neuron.
    pub fn from_parameters(layers: Vec<(ActivationFunction, Vec<(Vec<f64>, f64)>)>) -> Result<Network> {
        let layers = layers.into_iter()
            .map(|(activation, params)| Layer::from_parameters(params, activation))
            .collect::<Result<Vec<_>>>()?;
        Network::from_layers(layers)
    }

    fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        if layers.is_empty() {
            return Err(NnError::InvalidConfig("network needs at least one layer".into()));
        }
        for pair in layers.windows(2) {
            if pair[1].input_size != pair[0].size {
                return Err(NnError::shape("layer input width", pair[0].size, pair[1].input_size));
            }
        }
        Ok(Network { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size
    }

    /// Forward pass; refreshes every neuron's caches and records the
    /// per-layer activations needed by `backpropagate`.
    pub fn predict(&mut self, input: &[f64]) -> Result<Prediction> {
        let mut activation_history = Vec::with_capacity(self.layers.len() + 1);
        activation_history.push(input.to_vec());
        for layer in &mut self.layers {
            let previous = &activation_history[activation_history.len() - 1];
            let output = layer.feed_from(previous)?;
            activation_history.push(output);
        }
        let final_output = activation_history[activation_history.len() - 1].clone();
        Ok(Prediction { final_output, activation_history })
    }

    /// Forward pass that leaves all neuron caches untouched.
    pub fn infer(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.infer(&current)?;
        }
        Ok(current)
    }

    /// Computes deltas and gradients for every neuron from `targets` and the
    /// history returned by the matching `predict` call.
    ///
    /// The output layer uses `prediction - target` as the error term. Hidden
    /// layers are visited from the second-to-last down to the first, each
    /// neuron `k` collecting `Σ next.weights[k] * next.delta` from the layer
    /// above it.
    pub fn backpropagate(
        &mut self,
        targets: &[f64],
        activation_history: &[Vec<f64>],
        mode: DerivativeMode,
    ) -> Result<()> {
        let n_layers = self.layers.len();
        if activation_history.len() != n_layers + 1 {
            return Err(NnError::shape("activation history", n_layers + 1, activation_history.len()));
        }
        let output_index = n_layers - 1;
        let errors = MseLoss::derivative(&activation_history[n_layers], targets)?;

        // Output layer.
        let output_inputs = &activation_history[output_index];
        for (j, neuron) in self.layers[output_index].neurons_mut().iter_mut().enumerate() {
            let error_derivative = errors[j];
            let activation_derivative = match mode {
                DerivativeMode::Positional => ActivationFunction::Sigmoid.derivative(neuron.last_activation()),
                DerivativeMode::PerLayer => neuron.activation()
                    .derivative_from_cache(neuron.last_z(), neuron.last_activation()),
            };
            neuron.set_delta(error_derivative * activation_derivative, output_inputs)?;
        }

        // Hidden layers, back to front.
        for i in (0..output_index).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let current = &mut head[i];
            let next = &tail[0];
            let layer_inputs = &activation_history[i];

            for (k, neuron) in current.neurons_mut().iter_mut().enumerate() {
                let weighted_error_sum: f64 = next.neurons().iter()
                    .map(|n| n.weights()[k] * n.delta())
                    .sum();
                let activation_derivative = match mode {
                    DerivativeMode::Positional => ActivationFunction::ReLU.derivative(neuron.last_z()),
                    DerivativeMode::PerLayer => neuron.activation()
                        .derivative_from_cache(neuron.last_z(), neuron.last_activation()),
                };
                neuron.set_delta(weighted_error_sum * activation_derivative, layer_inputs)?;
            }
        }

        Ok(())
    }

    /// Applies `param -= learning_rate * grad` to every weight and bias using
    /// the gradients left by the last `backpropagate` call.
    pub fn update_parameters(&mut self, learning_rate: f64) {
        for layer in &mut self.layers {
            layer.apply_gradients(learning_rate);
        }
    }
}
