use std::fmt;

use log::info;
use serde::{Serialize, Deserialize};

use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::loss::mse::MseLoss;
use crate::network::network::Network;

/// Result of a full pass over a dataset without any parameter update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Fraction of samples whose arg-max output matched the label, in [0, 1].
    pub accuracy: f64,
    /// Mean per-sample MSE.
    pub average_loss: f64,
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Accuracy: {:.2}% ({} / {} correct)",
            self.accuracy * 100.0, self.correct, self.total
        )?;
        write!(f, "Average Loss: {:.4}", self.average_loss)
    }
}

/// Classifies every sample with `network` and scores it against the labels.
///
/// Uses the cache-free forward pass, so neither the network's visible state
/// nor any session is touched. A sample whose label is outside the
/// dataset's category set always counts as wrong.
pub fn test_over_dataset(network: &Network, dataset: &Dataset) -> Result<TestReport> {
    let encoder = dataset.encoder();
    let mut correct = 0;
    let mut total_loss = 0.0;

    for sample in dataset.samples() {
        let target = encoder.target_for(&sample.label);
        let output = network.infer(&sample.features)?;
        if encoder.index_of(&sample.label) == Some(argmax(&output)) {
            correct += 1;
        }
        total_loss += MseLoss::loss(&output, &target)?;
    }

    let total = dataset.len();
    let report = TestReport {
        accuracy: correct as f64 / total as f64,
        average_loss: total_loss / total as f64,
        correct,
        total,
    };
    info!("test over {} samples: accuracy {:.2}%, average loss {:.4}", total, report.accuracy * 100.0, report.average_loss);
    Ok(report)
}

/// Index of the maximum element; ties go to the lowest index, an empty slice gives `0`.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate().skip(1) {
        if *x > v[best] {
            best = i;
        }
    }
    best
}
