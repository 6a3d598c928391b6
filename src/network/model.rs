//! Textual model format: the ordered list of weight matrices as JSON.
//!
//! Each matrix is written as `{"rows": r, "cols": c, "data": [[...], ...]}`.
//! Older model files stored every matrix as an object carrying `numRows`,
//! `numCols` and one key per row index (`"0"`, `"1"`, ...); `decode` still
//! reads those.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMatrix {
    Current(Matrix),
    Legacy(LegacyMatrix),
}

#[derive(Deserialize)]
struct LegacyMatrix {
    #[serde(rename = "numRows")]
    num_rows: usize,
    #[serde(rename = "numCols")]
    num_cols: usize,
    #[serde(flatten)]
    rows: BTreeMap<String, Vec<f64>>,
}

impl LegacyMatrix {
    fn into_matrix(mut self, index: usize) -> Result<Matrix> {
        let data = (0..self.num_rows)
            .map(|row| {
                self.rows.remove(&row.to_string()).ok_or_else(|| {
                    NetError::CorruptModel(format!("matrix {index}: row {row} is missing"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Matrix { rows: self.num_rows, cols: self.num_cols, data })
    }
}

/// Serializes weight matrices as pretty-printed JSON.
pub fn encode(weights: &[Matrix]) -> Result<String> {
    serde_json::to_string_pretty(weights)
        .map_err(|e| NetError::CorruptModel(format!("cannot encode weights: {e}")))
}

/// Parses weight matrices written by `encode` (or the legacy layout).
///
/// Only checks that every matrix agrees with its own declared shape; matching
/// the shapes against a topology is the network's job.
pub fn decode(bytes: &[u8]) -> Result<Vec<Matrix>> {
    let stored: Vec<StoredMatrix> = serde_json::from_slice(bytes)
        .map_err(|e| NetError::CorruptModel(format!("cannot decode weights: {e}")))?;

    stored
        .into_iter()
        .enumerate()
        .map(|(index, matrix)| {
            let matrix = match matrix {
                StoredMatrix::Current(m) => m,
                StoredMatrix::Legacy(m) => m.into_matrix(index)?,
            };
            if !matrix.is_well_formed() {
                return Err(NetError::CorruptModel(format!(
                    "matrix {index} declares {}x{} but stores different dimensions",
                    matrix.rows, matrix.cols
                )));
            }
            Ok(matrix)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Matrix> {
        vec![
            Matrix::from_data(vec![vec![0.1, -0.25], vec![1e-9, 3.5]]),
            Matrix::from_data(vec![vec![0.123456789012345, -7.0]]),
        ]
    }

    #[test]
    fn encode_then_decode_is_exact() {
        let weights = sample();
        let text = encode(&weights).unwrap();
        assert_eq!(decode(text.as_bytes()).unwrap(), weights);
    }

    #[test]
    fn reads_legacy_row_keyed_layout() {
        let legacy = r#"[
            {"0": [0.5, -0.5, 1.0], "1": [2.0, 0.0, -1.0], "numRows": 2, "numCols": 3},
            {"0": [0.25, 0.75], "numRows": 1, "numCols": 2}
        ]"#;

        let weights = decode(legacy.as_bytes()).unwrap();

        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].shape(), (2, 3));
        assert_eq!(weights[0].data[1], vec![2.0, 0.0, -1.0]);
        assert_eq!(weights[1].data, vec![vec![0.25, 0.75]]);
    }

    #[test]
    fn legacy_missing_row_is_corrupt() {
        let legacy = r#"[{"0": [0.5], "numRows": 2, "numCols": 1}]"#;
        assert!(matches!(decode(legacy.as_bytes()), Err(NetError::CorruptModel(_))));
    }

    #[test]
    fn inconsistent_declared_shape_is_corrupt() {
        let text = r#"[{"rows": 2, "cols": 2, "data": [[1.0, 2.0], [3.0]]}]"#;
        assert!(matches!(decode(text.as_bytes()), Err(NetError::CorruptModel(_))));
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(decode(b"not json"), Err(NetError::CorruptModel(_))));
        assert!(matches!(decode(br#"{"rows": 1}"#), Err(NetError::CorruptModel(_))));
    }
}
