pub mod evaluate;
pub mod loop_fn;
pub mod observer;
pub mod session;
pub mod step_stats;
pub mod train_config;
pub mod trainer;

pub use evaluate::{test_over_dataset, TestReport};
pub use loop_fn::{drive, DriveConfig, DriveOutcome};
pub use observer::{LogObserver, TrainingObserver};
pub use session::{TrainingSession, TrainingStatus};
pub use step_stats::{StepReport, StepStats};
pub use train_config::TrainConfig;
pub use trainer::{train_step, Trainer};
