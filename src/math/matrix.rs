use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// Dense row-major matrix of `f64`.
///
/// Column vectors are plain `n × 1` matrices. Shape mismatches in the
/// arithmetic operators are programming errors and panic; the network
/// validates every externally supplied shape before it reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Fan-in scaled uniform initialization.
    ///
    /// Every entry is drawn from `[-s, 2s)` where `s = cols^(-1/2)` and `cols`
    /// is the number of incoming connections. The interval is skewed towards
    /// positive weights.
    pub fn fan_in_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let spread = (cols as f64).powf(-0.5);
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 3.0 * spread - spread;
            }
        }

        res
    }

    /// Builds a matrix from row vectors. An empty outer vector yields `0 × 0`.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data,
        }
    }

    /// Builds an `n × 1` column vector.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::from_data(values.iter().map(|&v| vec![v]).collect())
    }

    /// Flattens the first column into a `Vec`.
    pub fn column_values(&self) -> Vec<f64> {
        self.data.iter().map(|row| row[0]).collect()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `true` when the declared shape agrees with the stored rows.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    fn zip_with<F>(&self, rhs: &Matrix, functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!(
                "Matrices are of incorrect sizes: {}x{} vs {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(row_a, row_b)| {
                    row_a.iter().zip(row_b.iter()).map(|(&a, &b)| functor(a, b)).collect()
                })
                .collect(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!(
                "Matrices are of incorrect sizes: {}x{} vs {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, &y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!(
                "Matrices are of incorrect sizes: {}x{} * {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}
