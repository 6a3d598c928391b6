use serde::{Serialize, Deserialize};

/// How `Network::predict` reports the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictMode {
    /// Every output neuron's activation, paired with its label.
    Raw,
    /// Only the most activated neuron.
    #[default]
    Normalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prediction<L> {
    Raw(Vec<(L, f64)>),
    Best { label: L, value: f64 },
}

impl<L> Prediction<L> {
    /// Label of the winning neuron; `None` for raw predictions.
    pub fn label(&self) -> Option<&L> {
        match self {
            Prediction::Best { label, .. } => Some(label),
            Prediction::Raw(_) => None,
        }
    }

    /// Winning activation as a percentage truncated to four decimals.
    pub fn probability_percent(&self) -> Option<f64> {
        match self {
            Prediction::Best { value, .. } => Some(truncate_percent(*value)),
            Prediction::Raw(_) => None,
        }
    }
}

/// Index of the largest value. Ties keep the earliest index: a later value
/// only wins when strictly greater.
pub fn first_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        let replace = match best {
            None => true,
            Some((_, incumbent)) => incumbent < v,
        };
        if replace {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// `floor(fraction * 1e6) / 1e4`: a fraction in [0, 1] as a percentage with
/// four truncated decimals.
pub fn truncate_percent(fraction: f64) -> f64 {
    (fraction * 1_000_000.0).floor() / 10_000.0
}
