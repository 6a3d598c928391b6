use std::f64::consts::E;

/// Logistic sigmoid, `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Sigmoid derivative expressed through the sigmoid's own output `a`:
/// `σ'(x) = a · (1 - a)` with `a = σ(x)`.
///
/// The forward pass stores this as the layer's derivative hint so the
/// backward pass never has to recompute the sigmoid.
pub fn sigmoid_derivative_from_output(a: f64) -> f64 {
    a * (1.0 - a)
}
