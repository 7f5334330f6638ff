use log::{debug, info};

use crate::network::network::Network;
use crate::train::session::TrainingStatus;
use crate::train::step_stats::StepStats;

/// Read-only consumer of training progress: a progress display, a
/// visualiser, a recorder in tests.
///
/// Implementations receive shared references only and cannot mutate the
/// network or the session.
pub trait TrainingObserver {
    /// Called after every executed step, and once after a reset with the
    /// loss of the first sample.
    fn on_step(&mut self, stats: &StepStats);

    /// Network structure plus the activation snapshot of the latest forward
    /// pass. Per-neuron `weights`, `bias`, `last_activation` and `last_z` are
    /// readable through `network`.
    fn on_activations(&mut self, _network: &Network, _activation_history: &[Vec<f64>]) {}

    /// Called when a drive loop stops, with the status it stopped in.
    fn on_status(&mut self, _status: &TrainingStatus) {}
}

/// Writes step statistics to the log, one line every `every` steps.
#[derive(Debug, Clone)]
pub struct LogObserver {
    every: usize,
    seen: usize,
}

impl LogObserver {
    pub fn new(every: usize) -> Self {
        LogObserver { every: every.max(1), seen: 0 }
    }
}

impl TrainingObserver for LogObserver {
    fn on_step(&mut self, stats: &StepStats) {
        if self.seen % self.every == 0 {
            info!(
                "loss {:.4} | epoch {} / {} | lr {:.2e}",
                stats.loss, stats.epoch, stats.total_epochs, stats.learning_rate
            );
        } else {
            debug!("sample {} loss {:.6}", stats.sample_index, stats.loss);
        }
        self.seen += 1;
    }

    fn on_status(&mut self, status: &TrainingStatus) {
        match status {
            TrainingStatus::Completed => info!("training complete"),
            TrainingStatus::Paused => info!("training paused"),
            other => debug!("drive loop stopped in {other:?}"),
        }
    }
}

/// No-op observer.
impl TrainingObserver for () {
    fn on_step(&mut self, _stats: &StepStats) {}
}
