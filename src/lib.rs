pub mod math;
pub mod activation;
pub mod network;
pub mod train;
pub mod data;
pub mod visual;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use network::{ForwardPass, PredictMode, Prediction, Topology};
pub use train::{evaluate, train, train_network, Evaluation, TrainConfig, TrainReport};
pub use data::{load_dataset, Alphabet, LabeledExample, TrainingExample};
pub use visual::draw;
pub use config::RunConfig;
pub use error::{NetError, Result};
