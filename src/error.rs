use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

/// Everything that can go wrong while building, training, evaluating or
/// persisting a network.
///
/// Shape errors are caller contract violations: they are reported before any
/// weight is touched and are never retried.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid topology {layers:?}: {reason}")]
    InvalidTopology { layers: Vec<usize>, reason: &'static str },

    #[error("invalid learning rate {0}: must lie in (0, 1]")]
    InvalidRate(f64),

    #[error("invalid epoch count {0}: must be at least 1")]
    InvalidEpochs(usize),

    #[error("invalid inputs: expected {expected} values, got {got}")]
    InvalidInput { expected: usize, got: usize },

    #[error("invalid targets: expected {expected} values, got {got}")]
    InvalidTargets { expected: usize, got: usize },

    #[error("invalid labels: expected {expected} labels, got {got}")]
    InvalidLabels { expected: usize, got: usize },

    #[error("corrupt model: {0}")]
    CorruptModel(String),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("label count mismatch: network has {expected} outputs, got {got} labels")]
    LabelCountMismatch { expected: usize, got: usize },

    #[error("dataset line {line}: {reason}")]
    Dataset { line: u64, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
