use crate::error::{NnError, Result};

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²), `0` for empty input.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> Result<f64> {
        if predicted.len() != expected.len() {
            return Err(NnError::shape("mse", predicted.len(), expected.len()));
        }
        if predicted.is_empty() {
            return Ok(0.0);
        }
        let n = predicted.len() as f64;
        Ok(predicted.iter().zip(expected.iter())
            .map(|(p, y)| (y - p).powi(2))
            .sum::<f64>() / n)
    }

    /// Per-output gradient: predicted - expected (not divided by n).
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        if predicted.len() != expected.len() {
            return Err(NnError::shape("mse derivative", predicted.len(), expected.len()));
        }
        Ok(predicted.iter().zip(expected.iter())
            .map(|(p, y)| p - y)
            .collect())
    }
}
