use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::network::network::DerivativeMode;

/// Hyperparameters of a training session.
///
/// # Fields
/// - `initial_learning_rate`     : learning rate at epoch 0 and after every reset
/// - `epoch_cap`                 : the session completes once this many epochs ran
/// - `learning_rate_decay_factor`: multiplier applied on every decay boundary
/// - `decay_interval_epochs`     : decay happens whenever the epoch counter
///                                  reaches a positive multiple of this
/// - `derivative_mode`           : how backprop picks activation derivatives
/// - `seed`                      : fixes weight initialisation when set
///
/// Missing JSON fields fall back to the defaults (0.1, 100, 0.9, 10,
/// positional, unseeded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub initial_learning_rate: f64,
    pub epoch_cap: usize,
    pub learning_rate_decay_factor: f64,
    pub decay_interval_epochs: usize,
    pub derivative_mode: DerivativeMode,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            initial_learning_rate: 0.1,
            epoch_cap: 100,
            learning_rate_decay_factor: 0.9,
            decay_interval_epochs: 10,
            derivative_mode: DerivativeMode::Positional,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_learning_rate > 0.0 && self.initial_learning_rate.is_finite()) {
            return Err(NnError::InvalidConfig(format!(
                "initial_learning_rate must be positive, got {}",
                self.initial_learning_rate
            )));
        }
        if !(self.learning_rate_decay_factor > 0.0 && self.learning_rate_decay_factor <= 1.0) {
            return Err(NnError::InvalidConfig(format!(
                "learning_rate_decay_factor must be in (0, 1], got {}",
                self.learning_rate_decay_factor
            )));
        }
        if self.decay_interval_epochs == 0 {
            return Err(NnError::InvalidConfig("decay_interval_epochs must be at least 1".into()));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a config from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
