pub mod dataset;
pub mod example;

pub use dataset::{load_dataset, parse_dataset, Alphabet};
pub use example::{LabeledExample, TrainingExample};
