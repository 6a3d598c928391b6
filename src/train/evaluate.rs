use std::time::Instant;

use log::info;
use serde::{Serialize, Deserialize};

use crate::data::example::LabeledExample;
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::network::prediction::{truncate_percent, PredictMode};

/// Classification accuracy over a labeled set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub matches: usize,
    pub total: usize,
}

impl Evaluation {
    /// `matches / total`.
    pub fn accuracy(&self) -> f64 {
        self.matches as f64 / self.total as f64
    }

    /// Accuracy as a percentage truncated to four decimals.
    pub fn percent(&self) -> f64 {
        truncate_percent(self.accuracy())
    }
}

/// Predicts every example in normalized mode and counts exact label matches
/// against `label_normalized`.
///
/// `labels` names the output neurons in order.
pub fn evaluate(
    network: &Network,
    examples: &[LabeledExample],
    labels: &[char],
) -> Result<Evaluation> {
    if examples.is_empty() {
        return Err(NetError::EmptyDataset);
    }
    if labels.len() != network.output_width() {
        return Err(NetError::LabelCountMismatch {
            expected: network.output_width(),
            got: labels.len(),
        });
    }

    let t_start = Instant::now();
    info!("testing started on {} examples", examples.len());

    let mut matches = 0;
    for example in examples {
        let prediction = network.predict(example.inputs(), labels, PredictMode::Normalized)?;
        if prediction.label() == Some(&example.label_normalized) {
            matches += 1;
        }
    }

    let evaluation = Evaluation { matches, total: examples.len() };
    info!(
        "testing completed in {}ms: accuracy {}% ({}/{})",
        t_start.elapsed().as_millis(),
        evaluation.percent(),
        evaluation.matches,
        evaluation.total
    );

    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::example::TrainingExample;
    use crate::math::matrix::Matrix;

    fn example(label_normalized: char) -> LabeledExample {
        LabeledExample {
            example: TrainingExample::new(vec![1.0, 1.0], vec![0.0; 3]),
            label: 0,
            label_normalized,
        }
    }

    /// Output neuron 1 always wins for non-negative inputs.
    fn always_b() -> Network {
        let w = Matrix::from_data(vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]]);
        Network::from_weights(&[2, 3], 0.3, vec![w]).unwrap()
    }

    #[test]
    fn fixed_prediction_scores_its_share() {
        let labels: Vec<char> = "aaaaccc".chars().chain("bbb".chars()).collect();
        let examples: Vec<LabeledExample> = labels.iter().map(|&l| example(l)).collect();

        let evaluation = evaluate(&always_b(), &examples, &['a', 'b', 'c']).unwrap();

        assert_eq!(evaluation, Evaluation { matches: 3, total: 10 });
        assert_eq!(evaluation.accuracy(), 0.3);
        assert_eq!(evaluation.percent(), 30.0);
    }

    #[test]
    fn precondition_failures() {
        let net = always_b();
        assert!(matches!(evaluate(&net, &[], &['a', 'b', 'c']), Err(NetError::EmptyDataset)));
        assert!(matches!(
            evaluate(&net, &[example('a')], &['a', 'b']),
            Err(NetError::LabelCountMismatch { expected: 3, got: 2 })
        ));
    }
}
