use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
/// The values are observational only and never feed back into training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean of the per-example squared errors seen during this epoch.
    pub mean_error: f64,
    /// Number of training steps applied in this epoch.
    pub examples: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Summary returned once a training run stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub epochs_completed: usize,
    /// Weight updates applied, across all epochs.
    pub steps: usize,
    /// Mean error of the last completed epoch; `None` if none completed.
    pub last_epoch_mean_error: Option<f64>,
    /// `true` if the stop flag or a dropped progress receiver ended the run early.
    pub cancelled: bool,
    pub elapsed_ms: u64,
}
