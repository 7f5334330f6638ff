use log::{debug, error, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::train::evaluate::{self, TestReport};
use crate::train::observer::TrainingObserver;
use crate::train::session::{TrainingSession, TrainingStatus};
use crate::train::step_stats::{StepReport, StepStats};
use crate::train::train_config::TrainConfig;

/// Runs one online-SGD step on the session's current sample and advances
/// the session.
///
/// Returns `Ok(None)` without touching anything unless the session is
/// `Running`. On error the session moves to `Failed` so nothing further is
/// scheduled, and the error is returned.
pub fn train_step(
    network: &mut Network,
    session: &mut TrainingSession,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<Option<StepReport>> {
    if !session.is_running() {
        return Ok(None);
    }
    match run_step(network, session, dataset, config) {
        Ok(report) => Ok(Some(report)),
        Err(e) => {
            error!(
                "training step failed at epoch {}, sample {}: {}",
                session.current_epoch, session.current_sample_index, e
            );
            session.status = TrainingStatus::Failed { reason: e.to_string() };
            Err(e)
        }
    }
}

fn run_step(
    network: &mut Network,
    session: &mut TrainingSession,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<StepReport> {
    let index = session.current_sample_index;
    let sample = dataset.get(index).ok_or_else(|| {
        NnError::InvalidConfig(format!("sample index {index} out of range for {} samples", dataset.len()))
    })?;
    let target = dataset.encoder().target_for(&sample.label);

    let prediction = network.predict(&sample.features)?;
    let loss = MseLoss::loss(&prediction.final_output, &target)?;
    network.backpropagate(&target, &prediction.activation_history, config.derivative_mode)?;
    network.update_parameters(session.learning_rate);

    let stats = StepStats {
        loss,
        epoch: session.current_epoch,
        total_epochs: config.epoch_cap,
        learning_rate: session.learning_rate,
        sample_index: index,
    };
    debug!("epoch {} sample {} loss {:.6}", stats.epoch, index, loss);

    session.advance(dataset.len(), config);
    let pending = if session.current_epoch < config.epoch_cap {
        true
    } else {
        info!("training complete after {} epochs", session.current_epoch);
        session.status = TrainingStatus::Completed;
        false
    };

    Ok(StepReport {
        stats,
        activation_history: prediction.activation_history,
        pending,
    })
}

/// Owns a network, its training session and the data it trains on.
///
/// The network is rebuilt from `spec` on every `reset`, so weights never
/// outlive the trainer.
#[derive(Debug)]
pub struct Trainer {
    spec: NetworkSpec,
    config: TrainConfig,
    dataset: Dataset,
    network: Network,
    session: TrainingSession,
    activation_history: Vec<Vec<f64>>,
    rng: StdRng,
}

impl Trainer {
    /// Validates the config and that the dataset's feature width and category
    /// count match the network's input and output widths, then builds a
    /// freshly initialised network and takes an initial snapshot on the
    /// first sample.
    pub fn new(spec: NetworkSpec, config: TrainConfig, dataset: Dataset) -> Result<Self> {
        config.validate()?;
        spec.resolve()?;
        if dataset.feature_count() != spec.input_size {
            return Err(NnError::shape("dataset features", spec.input_size, dataset.feature_count()));
        }
        if dataset.encoder().len() != spec.output_size() {
            return Err(NnError::shape("dataset categories", spec.output_size(), dataset.encoder().len()));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let network = Network::from_spec(&spec, &mut rng)?;
        let session = TrainingSession::new(&config);

        let mut trainer = Trainer {
            spec,
            config,
            dataset,
            network,
            session,
            activation_history: Vec::new(),
            rng,
        };
        trainer.snapshot()?;
        Ok(trainer)
    }

    /// Forward pass on the first sample, refreshing the cached activations;
    /// returns its loss as step statistics at the current session position.
    fn snapshot(&mut self) -> Result<StepStats> {
        let sample = self.dataset.get(0).ok_or(NnError::EmptyDataset)?;
        let target = self.dataset.encoder().target_for(&sample.label);
        let prediction = self.network.predict(&sample.features)?;
        let loss = MseLoss::loss(&prediction.final_output, &target)?;
        self.activation_history = prediction.activation_history;
        Ok(StepStats {
            loss,
            epoch: self.session.current_epoch,
            total_epochs: self.config.epoch_cap,
            learning_rate: self.session.learning_rate,
            sample_index: 0,
        })
    }

    /// Discards the network and session and starts over: new random weights,
    /// epoch 0, sample 0, initial learning rate, `Idle`.
    pub fn reset(&mut self) -> Result<StepStats> {
        info!("resetting network");
        self.network = Network::from_spec(&self.spec, &mut self.rng)?;
        self.session = TrainingSession::new(&self.config);
        self.snapshot()
    }

    /// `reset`, then hands the initial statistics and activations to `observer`.
    pub fn reset_and_notify(&mut self, observer: &mut dyn TrainingObserver) -> Result<StepStats> {
        let stats = self.reset()?;
        observer.on_step(&stats);
        observer.on_activations(&self.network, &self.activation_history);
        Ok(stats)
    }

    pub fn start(&mut self) -> TrainingStatus {
        self.session.start(&self.config).clone()
    }

    pub fn pause(&mut self) -> TrainingStatus {
        self.session.pause().clone()
    }

    /// Start if idle or paused, pause if running; returns the new status.
    pub fn toggle_train(&mut self) -> TrainingStatus {
        self.session.toggle(&self.config).clone()
    }

    /// See [`train_step`].
    pub fn step(&mut self) -> Result<Option<StepReport>> {
        let report = train_step(&mut self.network, &mut self.session, &self.dataset, &self.config)?;
        if let Some(r) = &report {
            self.activation_history = r.activation_history.clone();
        }
        Ok(report)
    }

    /// Scores the current network on the whole dataset. Available in every
    /// state; changes nothing.
    pub fn test_over_dataset(&self) -> Result<TestReport> {
        evaluate::test_over_dataset(&self.network, &self.dataset)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn status(&self) -> &TrainingStatus {
        &self.session.status
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn spec(&self) -> &NetworkSpec {
        &self.spec
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Activations of the most recent forward pass (step or reset snapshot).
    pub fn activation_history(&self) -> &[Vec<f64>] {
        &self.activation_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::data::dataset::{LabelEncoder, Sample};

    fn toy_dataset() -> Dataset {
        Dataset::new(
            vec![
                Sample::new(vec![1.0, 0.0], "a"),
                Sample::new(vec![0.0, 1.0], "b"),
                Sample::new(vec![1.0, 1.0], "a"),
            ],
            LabelEncoder::new(["a", "b"]),
        ).unwrap()
    }

    fn toy_spec() -> NetworkSpec {
        NetworkSpec::new(2, vec![
            crate::network::spec::LayerSpec { size: 3, activation: ActivationFunction::ReLU },
            crate::network::spec::LayerSpec { size: 2, activation: ActivationFunction::Sigmoid },
        ])
    }

    fn seeded(epoch_cap: usize) -> TrainConfig {
        TrainConfig { epoch_cap, seed: Some(42), ..TrainConfig::default() }
    }

    #[test]
    fn step_is_noop_unless_running() {
        let mut t = Trainer::new(toy_spec(), seeded(2), toy_dataset()).unwrap();
        assert!(t.step().unwrap().is_none());
        assert_eq!(t.session().current_sample_index, 0);
    }

    #[test]
    fn two_epochs_over_three_samples_take_six_steps() {
        let mut t = Trainer::new(toy_spec(), seeded(2), toy_dataset()).unwrap();
        t.start();
        let mut steps = 0;
        while let Some(report) = t.step().unwrap() {
            steps += 1;
            if !report.pending {
                break;
            }
        }
        assert_eq!(steps, 6);
        assert_eq!(t.session().current_epoch, 2);
        assert_eq!(t.session().current_sample_index, 0);
        assert_eq!(t.status(), &TrainingStatus::Completed);
        assert!(t.step().unwrap().is_none());
    }

    #[test]
    fn stats_carry_pre_advance_position() {
        let mut t = Trainer::new(toy_spec(), seeded(5), toy_dataset()).unwrap();
        t.start();
        for expected in [(0, 0), (0, 1), (0, 2), (1, 0)] {
            let r = t.step().unwrap().unwrap();
            assert_eq!((r.stats.epoch, r.stats.sample_index), expected);
            assert!(r.pending);
        }
    }

    #[test]
    fn same_seed_same_initial_weights() {
        let a = Trainer::new(toy_spec(), seeded(1), toy_dataset()).unwrap();
        let b = Trainer::new(toy_spec(), seeded(1), toy_dataset()).unwrap();
        assert_eq!(
            a.network().layers()[0].neurons()[0].weights(),
            b.network().layers()[0].neurons()[0].weights()
        );
    }

    #[test]
    fn reset_restores_session_and_reinitialises_weights() {
        let mut t = Trainer::new(toy_spec(), seeded(3), toy_dataset()).unwrap();
        let before: Vec<f64> = t.network().layers()[1].neurons()[0].weights().to_vec();
        t.start();
        t.step().unwrap();
        t.step().unwrap();

        let stats = t.reset().unwrap();
        assert_eq!(t.status(), &TrainingStatus::Idle);
        assert_eq!(t.session().current_sample_index, 0);
        assert_eq!(t.session().learning_rate, 0.1);
        assert_eq!(stats.epoch, 0);
        assert_eq!(t.activation_history().len(), 3);
        // The rng moved on, so the rebuilt network differs from the first one.
        assert_ne!(t.network().layers()[1].neurons()[0].weights(), before.as_slice());
    }

    #[test]
    fn mismatched_dataset_is_rejected_up_front() {
        let ds = Dataset::new(
            vec![Sample::new(vec![1.0, 2.0, 3.0], "a")],
            LabelEncoder::new(["a", "b"]),
        ).unwrap();
        assert!(Trainer::new(toy_spec(), seeded(1), ds).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn shape_error_mid_run_fails_the_session() {
        let ds = toy_dataset();
        let mut rng = StdRng::seed_from_u64(0);
        // Output width 3 against 2 categories.
        let mut net = Network::new(vec![
            (2, 2, ActivationFunction::ReLU),
            (3, 2, ActivationFunction::Sigmoid),
        ], &mut rng).unwrap();
        let config = seeded(2);
        let mut session = TrainingSession::new(&config);
        session.start(&config);

        let err = train_step(&mut net, &mut session, &ds, &config).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(matches!(session.status, TrainingStatus::Failed { .. }));
        assert_eq!(session.current_sample_index, 0);
        assert!(train_step(&mut net, &mut session, &ds, &config).unwrap().is_none());
    }
}
