use serde::{Serialize, Deserialize};

/// One supervised example: an input vector and the desired output vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl TrainingExample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> TrainingExample {
        TrainingExample { inputs, targets }
    }
}

impl AsRef<TrainingExample> for TrainingExample {
    fn as_ref(&self) -> &TrainingExample {
        self
    }
}

/// A training example read from a dataset, with its class label.
///
/// `label` is the raw integer from the table; `label_normalized` is the
/// matching alphabet symbol that predictions are compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub example: TrainingExample,
    pub label: u32,
    pub label_normalized: char,
}

impl LabeledExample {
    pub fn inputs(&self) -> &[f64] {
        &self.example.inputs
    }

    pub fn targets(&self) -> &[f64] {
        &self.example.targets
    }
}

impl AsRef<TrainingExample> for LabeledExample {
    fn as_ref(&self) -> &TrainingExample {
        &self.example
    }
}
