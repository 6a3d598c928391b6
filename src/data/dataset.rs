//! Delimited-text dataset loading.
//!
//! Format:
//! - comma-separated, no header row
//! - column 0 is the integer class label
//! - the remaining columns are pixel intensities in [0, 255]
//!
//! Letter datasets (EMNIST letters) number their classes from 1, digit
//! datasets from 0; `Alphabet` carries that offset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::data::example::{LabeledExample, TrainingExample};
use crate::error::{NetError, Result};

const DIGITS: &str = "0123456789";
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Target value for the true class.
pub const TARGET_HIT: f64 = 0.99;
/// Target value for every other class.
pub const TARGET_MISS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    /// `0`-`9`, labels start at 0.
    Digits,
    /// `a`-`z`, labels start at 1.
    #[default]
    Letters,
}

impl Alphabet {
    fn symbols(self) -> &'static str {
        match self {
            Alphabet::Digits => DIGITS,
            Alphabet::Letters => LETTERS,
        }
    }

    /// Label value of the first symbol.
    pub fn offset(self) -> u32 {
        match self {
            Alphabet::Digits => 0,
            Alphabet::Letters => 1,
        }
    }

    /// One label per output neuron, in neuron order.
    pub fn labels(self) -> Vec<char> {
        self.symbols().chars().collect()
    }

    pub fn len(self) -> usize {
        self.symbols().len()
    }

    /// Position of `label` in the alphabet, if it names a symbol.
    pub fn class_index(self, label: u32) -> Option<usize> {
        let index = label.checked_sub(self.offset())? as usize;
        (index < self.len()).then_some(index)
    }
}

/// Reads a dataset file. See the module docs for the format.
pub fn load_dataset<P: AsRef<Path>>(path: P, alphabet: Alphabet) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    info!("loading dataset {}", path.display());
    let set = parse_dataset(File::open(path)?, alphabet)?;
    info!("loaded {} examples from {}", set.len(), path.display());
    Ok(set)
}

/// Parses dataset rows from any reader.
pub fn parse_dataset<R: Read>(reader: R, alphabet: Alphabet) -> Result<Vec<LabeledExample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let labels = alphabet.labels();
    let mut set = Vec::new();
    let mut width: Option<usize> = None;

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() < 2 {
            return Err(NetError::Dataset {
                line,
                reason: format!("expected a label and at least one value, got {} columns", record.len()),
            });
        }

        let label: u32 = record[0].parse().map_err(|_| NetError::Dataset {
            line,
            reason: format!("label '{}' is not a non-negative integer", &record[0]),
        })?;
        let class = alphabet.class_index(label).ok_or_else(|| NetError::Dataset {
            line,
            reason: format!("label {label} is outside the {alphabet:?} alphabet"),
        })?;

        let inputs = record
            .iter()
            .skip(1)
            .map(|cell| {
                cell.parse::<f64>().map(|raw| raw / 255.0).map_err(|_| NetError::Dataset {
                    line,
                    reason: format!("'{cell}' is not a valid number"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match width {
            None => width = Some(inputs.len()),
            Some(w) if w != inputs.len() => {
                return Err(NetError::Dataset {
                    line,
                    reason: format!("{} values do not match the first row's {}", inputs.len(), w),
                });
            }
            Some(_) => {}
        }

        let targets = (0..alphabet.len())
            .map(|i| if i == class { TARGET_HIT } else { TARGET_MISS })
            .collect();

        set.push(LabeledExample {
            example: TrainingExample::new(inputs, targets),
            label,
            label_normalized: labels[class],
        });
    }

    debug!("parsed {} rows, {} values each", set.len(), width.unwrap_or(0));
    Ok(set)
}
