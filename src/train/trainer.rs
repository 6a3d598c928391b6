use crate::{
    data::example::TrainingExample,
    error::Result,
    network::network::Network,
    train::{loop_fn::train, train_config::TrainConfig},
};

/// Runs a single sequential epoch and returns its mean error.
pub fn train_network<E: AsRef<TrainingExample>>(
    network: &mut Network,
    examples: &[E],
) -> Result<f64> {
    let report = train(network, examples, &TrainConfig::new(1))?;
    Ok(report.last_epoch_mean_error.unwrap_or(0.0))
}
