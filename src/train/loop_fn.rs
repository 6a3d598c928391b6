use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info, trace};

use crate::data::example::TrainingExample;
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, TrainReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` sequential passes over `examples`.
///
/// Every example gets its own weight update, in the given order: no
/// shuffling, no batching. All examples are validated before the first
/// update, so a malformed set leaves the network untouched.
///
/// # Early termination
/// The loop stops early if:
/// - `config.stop_flag` is set (checked before every example), **or**
/// - the `progress_tx` receiver has been dropped (checked after every epoch).
///
/// Either way the network only ever holds fully applied steps.
pub fn train<E: AsRef<TrainingExample>>(
    network: &mut Network,
    examples: &[E],
    config: &TrainConfig,
) -> Result<TrainReport> {
    if config.epochs == 0 {
        return Err(NetError::InvalidEpochs(config.epochs));
    }
    if examples.is_empty() {
        return Err(NetError::EmptyDataset);
    }
    for example in examples {
        let example = example.as_ref();
        network.check_inputs(&example.inputs)?;
        network.check_targets(&example.targets)?;
    }

    let t_start = Instant::now();
    info!(
        "training started: {} examples, {} epoch(s), rate {}",
        examples.len(),
        config.epochs,
        network.rate()
    );

    let mut report = TrainReport {
        epochs_completed: 0,
        steps: 0,
        last_epoch_mean_error: None,
        cancelled: false,
        elapsed_ms: 0,
    };

    for epoch in 1..=config.epochs {
        let t_epoch = Instant::now();

        // ── One full pass over the examples ─────────────────────────────────
        let outcome = run_one_epoch(network, examples, epoch, config.stop_flag.as_deref())?;
        report.steps += outcome.steps;

        if outcome.cancelled {
            info!("training cancelled during epoch {} after {} steps", epoch, outcome.steps);
            report.cancelled = true;
            break;
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_error: outcome.error_sum / outcome.steps as f64,
            examples: outcome.steps,
            elapsed_ms: t_epoch.elapsed().as_millis() as u64,
        };
        info!(
            "epoch {}/{}: mean error {:.8} ({} ms)",
            stats.epoch, stats.total_epochs, stats.mean_error, stats.elapsed_ms
        );

        report.epochs_completed = epoch;
        report.last_epoch_mean_error = Some(stats.mean_error);

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!("progress receiver dropped, stopping after epoch {}", epoch);
                report.cancelled = epoch < config.epochs;
                break;
            }
        }
    }

    report.elapsed_ms = t_start.elapsed().as_millis() as u64;
    info!("training completed in {}ms ({} steps)", report.elapsed_ms, report.steps);

    Ok(report)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

struct EpochOutcome {
    steps: usize,
    error_sum: f64,
    cancelled: bool,
}

/// One sequential pass, one `train_step` per example.
fn run_one_epoch<E: AsRef<TrainingExample>>(
    network: &mut Network,
    examples: &[E],
    epoch: usize,
    stop_flag: Option<&AtomicBool>,
) -> Result<EpochOutcome> {
    let mut outcome = EpochOutcome { steps: 0, error_sum: 0.0, cancelled: false };

    for (index, example) in examples.iter().enumerate() {
        if stop_flag.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            outcome.cancelled = true;
            break;
        }

        let example = example.as_ref();
        let error = network.train_step(&example.inputs, &example.targets)?;
        trace!("iteration {}:{}: {:.8}", epoch, index, error);

        outcome.steps += 1;
        outcome.error_sum += error;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc};

    use rand::{rngs::StdRng, SeedableRng};

    fn xor() -> Vec<TrainingExample> {
        vec![
            TrainingExample::new(vec![1.0, 0.0], vec![1.0]),
            TrainingExample::new(vec![1.0, 1.0], vec![0.0]),
            TrainingExample::new(vec![0.0, 1.0], vec![1.0]),
            TrainingExample::new(vec![0.0, 0.0], vec![0.0]),
        ]
    }

    fn net() -> Network {
        Network::with_rng(&[2, 3, 1], 0.5, &mut StdRng::seed_from_u64(3)).unwrap()
    }

    #[test]
    fn applies_one_step_per_example_per_epoch() {
        let mut network = net();
        let report = train(&mut network, &xor(), &TrainConfig::new(3)).unwrap();

        assert_eq!(report.epochs_completed, 3);
        assert_eq!(report.steps, 12);
        assert!(!report.cancelled);
        assert!(report.last_epoch_mean_error.is_some());
    }

    #[test]
    fn matches_manual_sequential_steps() {
        let examples = xor();
        let mut looped = net();
        let mut manual = net();

        train(&mut looped, &examples, &TrainConfig::new(2)).unwrap();
        for _ in 0..2 {
            for e in &examples {
                manual.train_step(&e.inputs, &e.targets).unwrap();
            }
        }

        assert_eq!(looped.weights(), manual.weights());
    }

    #[test]
    fn rejects_empty_set_and_zero_epochs() {
        let mut network = net();
        let none: Vec<TrainingExample> = vec![];

        assert!(matches!(
            train(&mut network, &none, &TrainConfig::new(1)),
            Err(NetError::EmptyDataset)
        ));
        assert!(matches!(
            train(&mut network, &xor(), &TrainConfig::new(0)),
            Err(NetError::InvalidEpochs(0))
        ));
    }

    #[test]
    fn malformed_example_fails_before_any_update() {
        let mut network = net();
        let before = network.weights().to_vec();
        let mut examples = xor();
        examples.push(TrainingExample::new(vec![1.0], vec![1.0]));

        assert!(matches!(
            train(&mut network, &examples, &TrainConfig::new(1)),
            Err(NetError::InvalidInput { expected: 2, got: 1 })
        ));
        assert_eq!(network.weights(), &before[..]);
    }

    #[test]
    fn raised_stop_flag_prevents_every_step() {
        let mut network = net();
        let before = network.weights().to_vec();
        let flag = Arc::new(AtomicBool::new(true));
        let config = TrainConfig::new(5).with_stop_flag(flag);

        let report = train(&mut network, &xor(), &config).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.steps, 0);
        assert_eq!(report.epochs_completed, 0);
        assert_eq!(network.weights(), &before[..]);
    }

    #[test]
    fn progress_channel_receives_every_epoch() {
        let mut network = net();
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig::new(4).with_progress(tx);

        train(&mut network, &xor(), &config).unwrap();
        drop(config);

        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(stats.iter().all(|s| s.examples == 4 && s.total_epochs == 4));
    }

    #[test]
    fn dropped_receiver_stops_after_first_epoch() {
        let mut network = net();
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let report = train(&mut network, &xor(), &TrainConfig::new(10).with_progress(tx)).unwrap();

        assert_eq!(report.epochs_completed, 1);
        assert_eq!(report.steps, 4);
        assert!(report.cancelled);
    }
}
