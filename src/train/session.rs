use log::{info, warn};
use serde::{Serialize, Deserialize};

use crate::train::train_config::TrainConfig;

/// Lifecycle of a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrainingStatus {
    /// Freshly constructed or reset; nothing has run yet.
    Idle,
    /// Steps are being scheduled.
    Running,
    /// Halted by the user; `start` resumes where it left off.
    Paused,
    /// The epoch cap was reached. Only `reset` leaves this state.
    Completed,
    /// A step raised an error. Only `reset` leaves this state.
    Failed { reason: String },
}

/// Mutable state of one training run: where in the dataset it is, the
/// current learning rate and whether steps should keep being scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub current_epoch: usize,
    pub current_sample_index: usize,
    pub learning_rate: f64,
    pub status: TrainingStatus,
}

impl TrainingSession {
    pub fn new(config: &TrainConfig) -> Self {
        TrainingSession {
            current_epoch: 0,
            current_sample_index: 0,
            learning_rate: config.initial_learning_rate,
            status: TrainingStatus::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TrainingStatus::Running
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TrainingStatus::Completed | TrainingStatus::Failed { .. })
    }

    /// `Idle`/`Paused` → `Running`. A session already at its epoch cap goes
    /// straight to `Completed`.
    pub fn start(&mut self, config: &TrainConfig) -> &TrainingStatus {
        match self.status {
            TrainingStatus::Idle | TrainingStatus::Paused => {
                if self.current_epoch >= config.epoch_cap {
                    info!("epoch cap {} already reached, nothing to train", config.epoch_cap);
                    self.status = TrainingStatus::Completed;
                } else {
                    info!("training started at epoch {}, sample {}", self.current_epoch, self.current_sample_index);
                    self.status = TrainingStatus::Running;
                }
            }
            TrainingStatus::Running => {}
            TrainingStatus::Completed | TrainingStatus::Failed { .. } => {
                warn!("start ignored: session is {:?}, reset first", self.status);
            }
        }
        &self.status
    }

    /// `Running` → `Paused`; a no-op otherwise.
    pub fn pause(&mut self) -> &TrainingStatus {
        if self.is_running() {
            info!("training paused at epoch {}, sample {}", self.current_epoch, self.current_sample_index);
            self.status = TrainingStatus::Paused;
        }
        &self.status
    }

    /// Pauses a running session, starts any other resumable one.
    pub fn toggle(&mut self, config: &TrainConfig) -> &TrainingStatus {
        if self.is_running() {
            self.pause()
        } else {
            self.start(config)
        }
    }

    /// Moves to the next sample, rolling over into a new epoch at the end of
    /// the dataset and decaying the learning rate on every
    /// `decay_interval_epochs` boundary. Returns `true` when an epoch ended.
    pub fn advance(&mut self, dataset_len: usize, config: &TrainConfig) -> bool {
        self.current_sample_index += 1;
        if self.current_sample_index < dataset_len {
            return false;
        }

        self.current_sample_index = 0;
        self.current_epoch += 1;
        if self.current_epoch % config.decay_interval_epochs == 0 {
            self.learning_rate *= config.learning_rate_decay_factor;
            info!("epoch {}: learning rate decayed to {:.3e}", self.current_epoch, self.learning_rate);
        } else {
            info!("epoch {} complete", self.current_epoch);
        }
        true
    }
}
