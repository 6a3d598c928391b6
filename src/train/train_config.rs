use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train` run.
///
/// # Fields
/// - `epochs`: full sequential passes over the examples; at least 1
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///   completed epoch. If the receiver is dropped the loop stops after that
///   epoch.
/// - `stop_flag`: optional atomic flag; when set to `true` from another
///   thread the loop stops before the next example.
pub struct TrainConfig {
    pub epochs: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
