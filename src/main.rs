// Console driver for the stepwise trainer.
// Usage:
//   pulse-nn [train_config.json] [dataset.csv]
// The network is features → 6 ReLU → one Sigmoid unit per class. Without
// arguments it trains on the embedded Iris excerpt. Set RUST_LOG=debug for per-step loss.
use std::process::ExitCode;

use log::{error, info};

use pulse_nn::data::{builtin_iris_excerpt, load_csv};
use pulse_nn::{
    drive, ActivationFunction, DriveConfig, LayerSpec, LogObserver, NetworkSpec, Result, TrainConfig,
    Trainer, TrainingStatus,
};

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => TrainConfig::load_json(&path)?,
        None => TrainConfig::default(),
    };
    let dataset = match args.next() {
        Some(path) => load_csv(&path, None)?,
        None => builtin_iris_excerpt()?,
    };
    let spec = NetworkSpec::new(dataset.feature_count(), vec![
        LayerSpec { size: 6, activation: ActivationFunction::ReLU },
        LayerSpec { size: dataset.encoder().len(), activation: ActivationFunction::Sigmoid },
    ]);
    info!(
        "{} samples, {} features, classes {:?}",
        dataset.len(), dataset.feature_count(), dataset.encoder().classes()
    );

    let frame_steps = dataset.len();
    let mut trainer = Trainer::new(spec, config, dataset)?;
    let mut observer = LogObserver::new(frame_steps * 10);

    trainer.reset_and_notify(&mut observer)?;
    println!("Before training:\n{}", trainer.test_over_dataset()?);

    trainer.toggle_train();
    let frame = DriveConfig::with_max_steps(frame_steps);
    while trainer.status() == &TrainingStatus::Running {
        drive(&mut trainer, &mut observer, &frame)?;
    }

    println!("After training:\n{}", trainer.test_over_dataset()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
