use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`      : number of neurons in this layer
/// - `activation`: activation function applied after the linear transform
///
/// The input width is not stored; it is the previous layer's `size`, or
/// `NetworkSpec::input_size` for the first layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture.
///
/// Holds no weights: a `Network` built from the same spec twice gets two
/// independent random initialisations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Width of the raw feature vector.
    pub input_size: usize,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    pub fn new(input_size: usize, layers: Vec<LayerSpec>) -> Self {
        NetworkSpec { input_size, layers }
    }

    /// Expands the spec into `(size, input_size, activation)` triples, chaining
    /// each layer's input width from the previous layer's size.
    pub fn resolve(&self) -> Result<Vec<(usize, usize, ActivationFunction)>> {
        if self.layers.is_empty() {
            return Err(NnError::InvalidConfig("network needs at least one layer".into()));
        }
        if self.input_size == 0 {
            return Err(NnError::InvalidConfig("input_size must be at least 1".into()));
        }
        if let Some(i) = self.layers.iter().position(|l| l.size == 0) {
            return Err(NnError::InvalidConfig(format!("layer {i} has zero neurons")));
        }

        let mut input_size = self.input_size;
        Ok(self.layers.iter()
            .map(|layer| {
                let triple = (layer.size, input_size, layer.activation);
                input_size = layer.size;
                triple
            })
            .collect())
    }

    /// Width of the final layer.
    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for NetworkSpec {
    /// 4 features → 6 ReLU → 3 Sigmoid.
    fn default() -> Self {
        NetworkSpec {
            input_size: 4,
            layers: vec![
                LayerSpec { size: 6, activation: ActivationFunction::ReLU },
                LayerSpec { size: 3, activation: ActivationFunction::Sigmoid },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_chains_input_widths() {
        let triples = NetworkSpec::default().resolve().unwrap();
        assert_eq!(triples, vec![
            (6, 4, ActivationFunction::ReLU),
            (3, 6, ActivationFunction::Sigmoid),
        ]);
    }

    #[test]
    fn empty_or_degenerate_specs_are_rejected() {
        assert!(NetworkSpec::new(4, vec![]).resolve().is_err());
        assert!(NetworkSpec::new(0, vec![LayerSpec { size: 1, activation: ActivationFunction::Sigmoid }])
            .resolve().is_err());
        assert!(NetworkSpec::new(2, vec![LayerSpec { size: 0, activation: ActivationFunction::ReLU }])
            .resolve().is_err());
    }

    #[test]
    fn parses_from_json() {
        let json = r#"{
            "input_size": 2,
            "layers": [
                { "size": 2, "activation": "relu" },
                { "size": 1, "activation": "sigmoid" }
            ]
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.output_size(), 1);
        assert_eq!(spec.layers[0].activation, ActivationFunction::ReLU);
    }
}
