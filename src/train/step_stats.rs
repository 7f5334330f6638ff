use serde::{Serialize, Deserialize};

/// Per-step training statistics, as shown on a progress display.
///
/// `epoch` and `learning_rate` are the values the step ran with, i.e. before
/// the session advanced past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// Mean-squared error of the sample this step trained on.
    pub loss: f64,
    /// 0-based epoch the step belonged to.
    pub epoch: usize,
    /// Epoch cap of the run.
    pub total_epochs: usize,
    pub learning_rate: f64,
    /// Index of the sample within the dataset.
    pub sample_index: usize,
}

/// Outcome of one executed training step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub stats: StepStats,
    /// Activation snapshot of the forward pass, for visualisation.
    pub activation_history: Vec<Vec<f64>>,
    /// `true` while the session is still running and another step should be
    /// scheduled.
    pub pending: bool,
}
