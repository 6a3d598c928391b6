use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::data::dataset::Alphabet;
use crate::error::{NetError, Result};
use crate::network::topology::Topology;

/// Settings for one training or evaluation run.
///
/// Every field has a default, so a config file only needs the values it
/// changes. Defaults match the EMNIST letters setup: `784 → 512 → 26`,
/// rate `0.3`, one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Neurons per layer, input first.
    pub topology: Vec<usize>,
    /// Learning rate in (0, 1].
    pub rate: f64,
    /// Sequential passes over the training set.
    pub epochs: usize,
    pub dataset_path: Option<PathBuf>,
    pub test_dataset_path: Option<PathBuf>,
    /// Where to write (train) or read (run) the model.
    pub model_path: Option<PathBuf>,
    pub alphabet: Alphabet,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            topology: vec![784, 512, 26],
            rate: 0.3,
            epochs: 1,
            dataset_path: None,
            test_dataset_path: None,
            model_path: None,
            alphabet: Alphabet::Letters,
        }
    }
}

impl RunConfig {
    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Checks everything that can be checked without touching the disk.
    pub fn validate(&self) -> Result<()> {
        let topology = Topology::new(self.topology.clone())?;
        if !(self.rate > 0.0 && self.rate <= 1.0) {
            return Err(NetError::InvalidRate(self.rate));
        }
        if self.epochs == 0 {
            return Err(NetError::InvalidEpochs(self.epochs));
        }
        if topology.output_width() != self.alphabet.len() {
            return Err(NetError::LabelCountMismatch {
                expected: topology.output_width(),
                got: self.alphabet.len(),
            });
        }
        Ok(())
    }
}
