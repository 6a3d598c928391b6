use crate::math::matrix::Matrix;

/// Everything one forward pass produced, kept for back-propagation.
///
/// Both vectors hold one column per layer, input layer included.
/// `derivative_hints[0]` is a zero column and is never read.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: Vec<Matrix>,
    pub derivative_hints: Vec<Matrix>,
}

impl ForwardPass {
    /// Output-layer activations.
    pub fn output(&self) -> &Matrix {
        &self.activations[self.activations.len() - 1]
    }

    pub fn output_values(&self) -> Vec<f64> {
        self.output().column_values()
    }
}
