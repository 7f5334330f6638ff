use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use log::info;

use crate::error::Result;
use crate::train::observer::TrainingObserver;
use crate::train::session::TrainingStatus;
use crate::train::step_stats::StepStats;
use crate::train::trainer::Trainer;

/// Controls one `drive` call.
///
/// # Fields
/// - `max_steps`  : stop after this many steps even if the session is still
///                   running (e.g. one frame's worth of work); `None` runs
///                   until the session stops on its own
/// - `progress_tx`: optional channel sender; one `StepStats` is sent per
///                   executed step. If the receiver is dropped the session is
///                   paused and the loop returns.
/// - `stop_flag`  : optional atomic flag; when set to `true` from another
///                   thread the session is paused before the next step.
#[derive(Default)]
pub struct DriveConfig {
    pub max_steps: Option<usize>,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl DriveConfig {
    /// Runs until the session pauses, completes or fails.
    pub fn new() -> Self {
        DriveConfig::default()
    }

    pub fn with_max_steps(max_steps: usize) -> Self {
        DriveConfig { max_steps: Some(max_steps), ..DriveConfig::default() }
    }
}

/// What a `drive` call did.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveOutcome {
    /// Steps executed by this call.
    pub steps: usize,
    /// Session status when the loop returned.
    pub status: TrainingStatus,
}

/// Repeatedly steps `trainer` while its session is running, yielding the
/// thread between steps.
///
/// Every executed step is reported to `observer` (statistics, then the
/// activation snapshot). Stopping is cooperative: a raised stop flag or a
/// dropped progress receiver pauses the session between steps, never in
/// the middle of one. A failing step is returned as the error after the
/// observer has seen the `Failed` status.
pub fn drive(
    trainer: &mut Trainer,
    observer: &mut dyn TrainingObserver,
    config: &DriveConfig,
) -> Result<DriveOutcome> {
    let mut steps = 0;

    loop {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                trainer.pause();
                break;
            }
        }
        if config.max_steps.is_some_and(|max| steps >= max) {
            break;
        }

        let report = match trainer.step() {
            Ok(Some(report)) => report,
            Ok(None) => break,
            Err(e) => {
                observer.on_status(trainer.status());
                return Err(e);
            }
        };
        steps += 1;

        observer.on_step(&report.stats);
        observer.on_activations(trainer.network(), &report.activation_history);

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(report.stats.clone()).is_err() {
                info!("progress receiver dropped, pausing");
                trainer.pause();
                break;
            }
        }

        if !report.pending {
            break;
        }
        thread::yield_now();
    }

    let status = trainer.status().clone();
    observer.on_status(&status);
    Ok(DriveOutcome { steps, status })
}
