use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Ordered per-layer neuron counts, input layer first.
///
/// Guaranteed to hold at least two layers, each at least one neuron wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    layers: Vec<usize>,
}

impl Topology {
    pub fn new(layers: Vec<usize>) -> Result<Topology> {
        if layers.len() < 2 {
            return Err(NetError::InvalidTopology {
                layers,
                reason: "at least an input and an output layer are required",
            });
        }
        if layers.contains(&0) {
            return Err(NetError::InvalidTopology {
                layers,
                reason: "every layer needs at least one neuron",
            });
        }
        Ok(Topology { layers })
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn input_width(&self) -> usize {
        self.layers[0]
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Number of weight matrices, one per adjacent layer pair.
    pub fn weight_count(&self) -> usize {
        self.layers.len() - 1
    }

    /// `(rows, cols)` of every weight matrix in order: `rows` is the width of
    /// the receiving layer, `cols` the width of the feeding layer.
    pub fn weight_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.layers.windows(2).map(|pair| (pair[1], pair[0]))
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = NetError;

    fn try_from(layers: Vec<usize>) -> Result<Topology> {
        Topology::new(layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.layers
    }
}
