use std::fs;
use std::path::Path;

use log::{debug, info};
use rand::Rng;

use crate::activation::{sigmoid, sigmoid_derivative_from_output};
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::model;
use crate::network::pass::ForwardPass;
use crate::network::prediction::{first_max, PredictMode, Prediction};
use crate::network::topology::Topology;

/// Fully-connected sigmoid network without biases.
///
/// `weights[k]` maps layer `k` to layer `k + 1` and is always
/// `topology[k + 1] × topology[k]`. Every operation validates its arguments
/// before touching the weights, so a failed call leaves them unchanged.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    rate: f64,
    weights: Vec<Matrix>,
}

impl Network {
    /// Builds a randomly initialized network using the thread RNG.
    pub fn new(layers: &[usize], rate: f64) -> Result<Network> {
        Network::with_rng(layers, rate, &mut rand::thread_rng())
    }

    /// Builds a randomly initialized network from the given RNG.
    pub fn with_rng<R: Rng + ?Sized>(layers: &[usize], rate: f64, rng: &mut R) -> Result<Network> {
        let topology = Topology::new(layers.to_vec())?;
        check_rate(rate)?;

        let weights = topology
            .weight_shapes()
            .map(|(rows, cols)| Matrix::fan_in_uniform(rows, cols, &mut *rng))
            .collect();
        debug!("initialized network {:?} with rate {}", topology.layers(), rate);

        Ok(Network { topology, rate, weights })
    }

    /// Builds a network around existing weights.
    pub fn from_weights(layers: &[usize], rate: f64, weights: Vec<Matrix>) -> Result<Network> {
        let topology = Topology::new(layers.to_vec())?;
        check_rate(rate)?;
        check_weights(&topology, &weights)?;
        Ok(Network { topology, rate, weights })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn input_width(&self) -> usize {
        self.topology.input_width()
    }

    pub fn output_width(&self) -> usize {
        self.topology.output_width()
    }

    /// Replaces every weight matrix. Fails with `CorruptModel` if the count or
    /// any shape disagrees with the topology.
    pub fn load_weights(&mut self, weights: Vec<Matrix>) -> Result<()> {
        check_weights(&self.topology, &weights)?;
        self.weights = weights;
        Ok(())
    }

    /// Reads a model file written by `save_model` and installs its weights.
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        self.load_weights(model::decode(&bytes)?)?;
        info!("loaded model from {}", path.display());
        Ok(())
    }

    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, model::encode(&self.weights)?)?;
        info!("saved model to {}", path.display());
        Ok(())
    }

    /// Runs the inputs through every layer and keeps each layer's activations
    /// and derivative hints.
    pub fn forward(&self, inputs: &[f64]) -> Result<ForwardPass> {
        self.check_inputs(inputs)?;
        Ok(self.propagate(inputs))
    }

    /// One back-propagation step on a single example. Returns the example's
    /// mean squared error before the update.
    pub fn train_step(&mut self, inputs: &[f64], targets: &[f64]) -> Result<f64> {
        self.check_inputs(inputs)?;
        self.check_targets(targets)?;

        let pass = self.propagate(inputs);
        let output_error = &Matrix::column(targets) - pass.output();
        let mse = mean_squared(&output_error);

        let errors = self.backpropagate(output_error);
        self.apply_updates(&pass, &errors);

        Ok(mse)
    }

    /// Forward pass only, with one label per output neuron.
    pub fn predict<L: Clone>(
        &self,
        inputs: &[f64],
        labels: &[L],
        mode: PredictMode,
    ) -> Result<Prediction<L>> {
        self.check_inputs(inputs)?;
        if labels.len() != self.output_width() {
            return Err(NetError::InvalidLabels {
                expected: self.output_width(),
                got: labels.len(),
            });
        }

        let output = self.propagate(inputs).output_values();

        match mode {
            PredictMode::Raw => Ok(Prediction::Raw(
                labels.iter().cloned().zip(output).collect(),
            )),
            PredictMode::Normalized => {
                // Topology guarantees at least one output neuron.
                let best = first_max(&output).unwrap_or(0);
                Ok(Prediction::Best { label: labels[best].clone(), value: output[best] })
            }
        }
    }

    fn propagate(&self, inputs: &[f64]) -> ForwardPass {
        let input = Matrix::column(inputs);
        let mut derivative_hints = vec![Matrix::zeros(input.rows, 1)];
        let mut activations = vec![input];

        for w in &self.weights {
            let output = (w * &activations[activations.len() - 1]).map(sigmoid);
            derivative_hints.push(output.map(sigmoid_derivative_from_output));
            activations.push(output);
        }

        ForwardPass { activations, derivative_hints }
    }

    /// Error signal of every layer, `errors[k]` for `k = 0..=L`, computed
    /// against the current weights. Must run before `apply_updates`.
    fn backpropagate(&self, output_error: Matrix) -> Vec<Matrix> {
        let layers = self.weights.len();
        let mut errors = vec![Matrix::default(); layers + 1];
        errors[layers] = output_error;

        for k in (0..layers).rev() {
            errors[k] = &self.weights[k].transpose() * &errors[k + 1];
        }

        errors
    }

    /// `W[k] += rate · (E[k+1] ⊙ hint[k+1]) · A[k]^T`
    fn apply_updates(&mut self, pass: &ForwardPass, errors: &[Matrix]) {
        for k in (0..self.weights.len()).rev() {
            let gradient = errors[k + 1].hadamard(&pass.derivative_hints[k + 1]);
            let delta = (&gradient * &pass.activations[k].transpose()).scale(self.rate);
            self.weights[k] += &delta;
        }
    }

    pub(crate) fn check_inputs(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.input_width() {
            return Err(NetError::InvalidInput { expected: self.input_width(), got: inputs.len() });
        }
        Ok(())
    }

    pub(crate) fn check_targets(&self, targets: &[f64]) -> Result<()> {
        if targets.len() != self.output_width() {
            return Err(NetError::InvalidTargets {
                expected: self.output_width(),
                got: targets.len(),
            });
        }
        Ok(())
    }
}

fn check_rate(rate: f64) -> Result<()> {
    if rate > 0.0 && rate <= 1.0 {
        Ok(())
    } else {
        Err(NetError::InvalidRate(rate))
    }
}

fn check_weights(topology: &Topology, weights: &[Matrix]) -> Result<()> {
    if weights.len() != topology.weight_count() {
        return Err(NetError::CorruptModel(format!(
            "expected {} weight matrices for topology {:?}, got {}",
            topology.weight_count(),
            topology.layers(),
            weights.len()
        )));
    }

    for (k, (w, (rows, cols))) in weights.iter().zip(topology.weight_shapes()).enumerate() {
        if w.shape() != (rows, cols) || !w.is_well_formed() {
            return Err(NetError::CorruptModel(format!(
                "weight matrix {k} is {}x{}, expected {rows}x{cols}",
                w.rows, w.cols
            )));
        }
    }

    Ok(())
}

fn mean_squared(error: &Matrix) -> f64 {
    let n = (error.rows * error.cols) as f64;
    error.data.iter().flatten().map(|e| e * e).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(layers: &[usize], rate: f64) -> Network {
        Network::with_rng(layers, rate, &mut StdRng::seed_from_u64(42)).unwrap()
    }

    fn shapes(net: &Network) -> Vec<(usize, usize)> {
        net.weights().iter().map(Matrix::shape).collect()
    }

    #[test]
    fn construction_allocates_one_matrix_per_layer_pair() {
        let net = seeded(&[4, 3, 5, 2], 0.3);
        assert_eq!(shapes(&net), vec![(3, 4), (5, 3), (2, 5)]);
    }

    #[test]
    fn construction_rejects_bad_arguments() {
        assert!(matches!(Network::new(&[5], 0.3), Err(NetError::InvalidTopology { .. })));
        assert!(matches!(Network::new(&[2, 1], 0.0), Err(NetError::InvalidRate(_))));
        assert!(matches!(Network::new(&[2, 1], 1.5), Err(NetError::InvalidRate(_))));
        assert!(Network::new(&[2, 1], 1.0).is_ok());
    }

    #[test]
    fn forward_returns_every_layer() {
        let net = seeded(&[3, 4, 2], 0.3);
        let pass = net.forward(&[0.2, 0.4, 0.6]).unwrap();

        assert_eq!(pass.activations.len(), 3);
        assert_eq!(pass.derivative_hints.len(), 3);
        assert_eq!(pass.activations[0].column_values(), vec![0.2, 0.4, 0.6]);
        assert_eq!(pass.derivative_hints[0], Matrix::zeros(3, 1));
        assert_eq!(pass.output().shape(), (2, 1));

        for (a, hint) in pass.activations.iter().zip(&pass.derivative_hints).skip(1) {
            for (&x, &h) in a.data.iter().flatten().zip(hint.data.iter().flatten()) {
                assert!(x > 0.0 && x < 1.0);
                assert_relative_eq!(h, x * (1.0 - x));
            }
        }
    }

    #[test]
    fn forward_matches_hand_computation() {
        let w = Matrix::from_data(vec![vec![0.5, -1.0]]);
        let net = Network::from_weights(&[2, 1], 0.5, vec![w]).unwrap();

        let out = net.forward(&[1.0, 1.0]).unwrap().output_values();

        assert_relative_eq!(out[0], sigmoid(-0.5), epsilon = 1e-15);
    }

    #[test]
    fn train_step_uses_pre_update_weights_for_every_error() {
        // 1 -> 1 -> 1 chain so each quantity is a scalar.
        let w0 = 0.4;
        let w1 = -0.7;
        let rate = 0.5;
        let mut net = Network::from_weights(
            &[1, 1, 1],
            rate,
            vec![Matrix::from_data(vec![vec![w0]]), Matrix::from_data(vec![vec![w1]])],
        )
        .unwrap();

        let x = 1.0;
        let target = 0.9;
        let a1 = sigmoid(w0 * x);
        let a2 = sigmoid(w1 * a1);
        let e2 = target - a2;
        let e1 = w1 * e2;
        let expected_w1 = w1 + rate * e2 * a2 * (1.0 - a2) * a1;
        let expected_w0 = w0 + rate * e1 * a1 * (1.0 - a1) * x;

        let mse = net.train_step(&[x], &[target]).unwrap();

        assert_relative_eq!(mse, e2 * e2, epsilon = 1e-15);
        assert_relative_eq!(net.weights()[1].data[0][0], expected_w1, epsilon = 1e-12);
        assert_relative_eq!(net.weights()[0].data[0][0], expected_w0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_shapes_leave_weights_untouched() {
        let mut net = seeded(&[3, 2], 0.3);
        let before = net.weights().to_vec();

        assert!(matches!(
            net.train_step(&[1.0, 2.0], &[0.5, 0.5]),
            Err(NetError::InvalidInput { expected: 3, got: 2 })
        ));
        assert!(matches!(
            net.train_step(&[1.0, 2.0, 3.0], &[0.5]),
            Err(NetError::InvalidTargets { expected: 2, got: 1 })
        ));
        assert!(matches!(net.forward(&[]), Err(NetError::InvalidInput { .. })));
        assert_eq!(net.weights(), &before[..]);
    }

    #[test]
    fn load_weights_rejects_mismatched_shapes() {
        let mut net = seeded(&[3, 2], 0.3);
        let before = net.weights().to_vec();

        assert!(matches!(
            net.load_weights(vec![Matrix::zeros(3, 2)]),
            Err(NetError::CorruptModel(_))
        ));
        assert!(matches!(net.load_weights(vec![]), Err(NetError::CorruptModel(_))));
        assert_eq!(net.weights(), &before[..]);

        net.load_weights(vec![Matrix::zeros(2, 3)]).unwrap();
        assert_eq!(net.weights()[0], Matrix::zeros(2, 3));
    }

    #[test]
    fn predict_modes() {
        let w = Matrix::from_data(vec![vec![1.0], vec![3.0], vec![-2.0]]);
        let net = Network::from_weights(&[1, 3], 0.3, vec![w]).unwrap();
        let labels = ['x', 'y', 'z'];

        match net.predict(&[1.0], &labels, PredictMode::Raw).unwrap() {
            Prediction::Raw(pairs) => {
                assert_eq!(pairs.iter().map(|(l, _)| *l).collect::<Vec<_>>(), labels);
                assert_relative_eq!(pairs[1].1, sigmoid(3.0));
            }
            other => panic!("expected raw prediction, got {other:?}"),
        }

        let best = net.predict(&[1.0], &labels, PredictMode::Normalized).unwrap();
        assert_eq!(best, Prediction::Best { label: 'y', value: sigmoid(3.0) });

        assert!(matches!(
            net.predict(&[1.0], &labels[..2], PredictMode::Normalized),
            Err(NetError::InvalidLabels { expected: 3, got: 2 })
        ));
        assert!(matches!(
            net.predict(&[1.0, 0.0], &labels, PredictMode::Normalized),
            Err(NetError::InvalidInput { .. })
        ));
    }

    #[test]
    fn predict_breaks_ties_towards_first_label() {
        let w = Matrix::from_data(vec![vec![0.2], vec![0.9], vec![0.9], vec![0.1]]);
        let net = Network::from_weights(&[1, 4], 0.3, vec![w]).unwrap();

        let best = net.predict(&[1.0], &["a", "b", "c", "d"], PredictMode::Normalized).unwrap();

        assert_eq!(best.label(), Some(&"b"));
    }
}
