use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
}

impl ActivationFunction {
    /// Element-wise activation.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => x.max(0.0),
        }
    }

    /// Element-wise derivative, taking whichever cached value the variant is
    /// expressed in.
    ///
    /// - `Sigmoid` expects the **output** `a` and returns `a * (1 - a)`.
    /// - `ReLU` expects the **pre-activation** `z` and returns `1` for `z > 0`,
    ///   `0` otherwise (including `z == 0`).
    ///
    /// Use [`ActivationFunction::derivative_from_cache`] when both cached
    /// values are at hand and the caller should not have to know which one
    /// applies.
    pub fn derivative(&self, cached: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => cached * (1.0 - cached),
            ActivationFunction::ReLU => if cached > 0.0 { 1.0 } else { 0.0 },
        }
    }

    /// Picks the right cache (`last_z` or `last_activation`) for this variant
    /// and applies [`ActivationFunction::derivative`] to it.
    pub fn derivative_from_cache(&self, last_z: f64, last_activation: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => self.derivative(last_activation),
            ActivationFunction::ReLU => self.derivative(last_z),
        }
    }
}
