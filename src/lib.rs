pub mod error;
pub mod activation;
pub mod neuron;
pub mod layers;
pub mod network;
pub mod loss;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use activation::activation::ActivationFunction;
pub use neuron::neuron::Neuron;
pub use layers::dense::Layer;
pub use network::network::{DerivativeMode, Network, Prediction};
pub use network::spec::{LayerSpec, NetworkSpec};
pub use loss::mse::MseLoss;
pub use data::dataset::{Dataset, LabelEncoder, Sample};
pub use train::{
    drive, train_step, DriveConfig, DriveOutcome, LogObserver, StepReport, StepStats, TestReport,
    TrainConfig, Trainer, TrainingObserver, TrainingSession, TrainingStatus,
};
