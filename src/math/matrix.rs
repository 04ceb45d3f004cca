use std::fmt;
use std::io::Read;
use std::ops::Mul;

use serde::{Serialize, Deserialize};

use crate::error::{MlpError, Result};

/// Values above this render as a filled glyph in the `Display` output.
/// Presentation-only; never consulted by any numeric operation.
const RENDER_THRESHOLD: f32 = 0.1;

/// A dense 2D matrix of `f32` values stored row-major in a single owned
/// buffer.
///
/// The buffer length always equals `rows * cols`, and no two `Matrix` values
/// ever alias the same storage: `Clone` deep-copies, moves transfer the
/// buffer. Fields are private so the length invariant cannot be broken from
/// outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Constructs a zero-filled `rows x cols` matrix.
    ///
    /// Fails with [`MlpError::InvalidDimensions`] if either dimension is 0.
    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MlpError::InvalidDimensions { rows, cols });
        }
        Ok(Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    /// Constructs a matrix from a row-major buffer, taking ownership of it.
    ///
    /// Fails if either dimension is 0 or if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<f32>, rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MlpError::InvalidDimensions { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(MlpError::DimensionMismatch {
                expected: format!("{} elements ({}x{})", rows * cols, rows, cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total element count (`rows * cols`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        // Always false for a constructed matrix (dims are at least 1x1).
        self.data.is_empty()
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.data.iter()
    }

    /// `"RxC"`, used in error messages.
    fn shape(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    /// Element at `(row, col)`.
    ///
    /// Fails with [`MlpError::OutOfRange`] outside `[0,rows) x [0,cols)`.
    pub fn get(&self, row: usize, col: usize) -> Result<&f32> {
        if row >= self.rows || col >= self.cols {
            return Err(MlpError::OutOfRange {
                index: format!("({}, {})", row, col),
                bounds: self.shape(),
            });
        }
        Ok(&self.data[row * self.cols + col])
    }

    /// Mutable element at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f32> {
        if row >= self.rows || col >= self.cols {
            return Err(MlpError::OutOfRange {
                index: format!("({}, {})", row, col),
                bounds: self.shape(),
            });
        }
        let cols = self.cols;
        Ok(&mut self.data[row * cols + col])
    }

    /// Element at flat row-major index `idx`.
    ///
    /// `at(r * cols + c)` and `get(r, c)` address the same element.
    pub fn at(&self, idx: usize) -> Result<&f32> {
        if idx >= self.data.len() {
            return Err(MlpError::OutOfRange {
                index: idx.to_string(),
                bounds: format!("{} elements", self.data.len()),
            });
        }
        Ok(&self.data[idx])
    }

    /// Mutable element at flat row-major index `idx`.
    pub fn at_mut(&mut self, idx: usize) -> Result<&mut f32> {
        if idx >= self.data.len() {
            return Err(MlpError::OutOfRange {
                index: idx.to_string(),
                bounds: format!("{} elements", self.data.len()),
            });
        }
        Ok(&mut self.data[idx])
    }

    /// Returns the transpose: dimensions swapped, `out(j, i) = self(i, j)`.
    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Reshapes into a single column of `rows * cols` entries, preserving
    /// row-major element order. Consumes `self` and reuses its buffer.
    pub fn flatten(self) -> Matrix {
        Matrix {
            rows: self.rows * self.cols,
            cols: 1,
            data: self.data,
        }
    }

    /// Returns a new matrix with `functor` applied to every element.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f32) -> f32,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MlpError::DimensionMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        let data = self.data.iter().zip(other.data.iter())
            .map(|(a, b)| a * b)
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Frobenius norm: sqrt of the sum of squares of all elements.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Element-wise sum of two same-shape matrices.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MlpError::DimensionMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        let data = self.data.iter().zip(other.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// In-place element-wise sum; equivalent to `*self = self.add(other)?`.
    pub fn add_assign(&mut self, other: &Matrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MlpError::DimensionMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(())
    }

    /// Standard matrix product; requires `self.cols == other.rows`.
    ///
    /// Result shape is `self.rows x other.cols`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(MlpError::DimensionMismatch {
                expected: format!("{} rows (to match {} columns)", self.cols, self.shape()),
                actual: other.shape(),
            });
        }
        let mut data = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }
                data[i * other.cols + j] = sum;
            }
        }
        Ok(Matrix { rows: self.rows, cols: other.cols, data })
    }

    /// Fills this matrix from raw little-endian IEEE-754 f32 bytes.
    ///
    /// The source must yield exactly `rows * cols * 4` bytes; shorter and
    /// longer sources are both rejected with [`MlpError::InvalidFileSize`].
    /// Dimensions are fixed beforehand, only the contents change.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let expected = self.data.len() * std::mem::size_of::<f32>();
        let mut bytes = Vec::with_capacity(expected);
        reader.read_to_end(&mut bytes)?;
        if bytes.len() != expected {
            return Err(MlpError::InvalidFileSize {
                expected,
                actual: bytes.len(),
            });
        }
        for (value, chunk) in self.data.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(())
    }

    /// Numeric dump of the elements, space-separated, one row per line.
    /// `Display` is the glyph rendering used for images; this shows the
    /// actual values.
    pub fn to_plain_string(&self) -> String {
        let mut out = String::new();
        for i in 0..self.rows {
            for j in 0..self.cols {
                if j > 0 {
                    out.push(' ');
                }
                out.push_str(&self.data[i * self.cols + j].to_string());
            }
            out.push('\n');
        }
        out
    }

    /// Prints the numeric dump to stdout.
    pub fn plain_print(&self) {
        print!("{}", self.to_plain_string());
    }
}

impl Mul<f32> for &Matrix {
    type Output = Matrix;

    fn mul(self, scalar: f32) -> Matrix {
        self.map(|x| x * scalar)
    }
}

impl Mul<f32> for Matrix {
    type Output = Matrix;

    fn mul(self, scalar: f32) -> Matrix {
        &self * scalar
    }
}

impl Mul<&Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, matrix: &Matrix) -> Matrix {
        matrix * self
    }
}

impl Mul<Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, matrix: Matrix) -> Matrix {
        &matrix * self
    }
}

/// Glyph rendering for showing an image matrix in a terminal: `**` where the
/// value exceeds 0.1, blank otherwise, one row per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                let glyph = if self.data[i * self.cols + j] > RENDER_THRESHOLD {
                    "**"
                } else {
                    "  "
                };
                f.write_str(glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::prelude::*;
    use std::io::Cursor;

    fn random_matrix(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let data = (0..rows * cols).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect();
        Matrix::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn zeros_allocates_a_zero_filled_buffer() {
        let m = Matrix::zeros(3, 5).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 5);
        assert_eq!(m.len(), 15);
        assert!(m.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(Matrix::zeros(0, 4), Err(MlpError::InvalidDimensions { .. })));
        assert!(matches!(Matrix::zeros(4, 0), Err(MlpError::InvalidDimensions { .. })));
        assert!(matches!(Matrix::zeros(0, 0), Err(MlpError::InvalidDimensions { .. })));
        assert!(matches!(
            Matrix::from_vec(vec![], 0, 1),
            Err(MlpError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn from_vec_checks_the_element_count() {
        assert!(Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).is_ok());
        assert!(matches!(
            Matrix::from_vec(vec![1.0, 2.0, 3.0], 2, 2),
            Err(MlpError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn clone_produces_independent_storage() {
        let mut a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = a.clone();
        *a.get_mut(0, 0).unwrap() = 99.0;
        assert_eq!(*b.get(0, 0).unwrap(), 1.0);
        assert_eq!(*a.get(0, 0).unwrap(), 99.0);
    }

    #[test]
    fn transpose_swaps_dimensions_and_elements() {
        let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(m.get(i, j).unwrap(), t.get(j, i).unwrap());
            }
        }
    }

    #[test]
    fn transpose_is_an_involution() {
        let m = random_matrix(7, 3);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn flatten_preserves_order_and_count() {
        let m = random_matrix(4, 6);
        let original: Vec<f32> = m.as_slice().to_vec();
        let v = m.flatten();
        assert_eq!(v.rows(), 24);
        assert_eq!(v.cols(), 1);
        assert_eq!(v.as_slice(), original.as_slice());
    }

    #[test]
    fn norm_matches_the_frobenius_definition() {
        let m = Matrix::from_vec(vec![3.0, 4.0], 1, 2).unwrap();
        assert_relative_eq!(m.norm(), 5.0);

        let z = Matrix::zeros(5, 5).unwrap();
        assert_eq!(z.norm(), 0.0);

        let r = random_matrix(3, 4);
        let expected = r.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert_relative_eq!(r.norm(), expected);
        assert!(r.norm() >= 0.0);
    }

    #[test]
    fn add_is_element_wise_and_shape_checked() {
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![10.0, 20.0, 30.0, 40.0], 2, 2).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.as_slice(), &[11.0, 22.0, 33.0, 44.0]);

        let c = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(a.add(&c), Err(MlpError::DimensionMismatch { .. })));
    }

    #[test]
    fn add_assign_matches_add() {
        let mut a = random_matrix(3, 3);
        let b = random_matrix(3, 3);
        let expected = a.add(&b).unwrap();
        a.add_assign(&b).unwrap();
        assert_eq!(a, expected);

        let c = Matrix::zeros(3, 4).unwrap();
        assert!(matches!(a.add_assign(&c), Err(MlpError::DimensionMismatch { .. })));
    }

    #[test]
    fn hadamard_is_element_wise_and_shape_checked() {
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![5.0, 6.0, 7.0, 8.0], 2, 2).unwrap();
        let prod = a.hadamard(&b).unwrap();
        assert_eq!(prod.as_slice(), &[5.0, 12.0, 21.0, 32.0]);

        let c = Matrix::zeros(4, 1).unwrap();
        assert!(matches!(a.hadamard(&c), Err(MlpError::DimensionMismatch { .. })));
    }

    #[test]
    fn matmul_follows_the_sum_of_products_definition() {
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let b = Matrix::from_vec(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 2);
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn matmul_rejects_mismatched_inner_dimensions() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(a.matmul(&b), Err(MlpError::DimensionMismatch { .. })));
    }

    #[test]
    fn scalar_multiplication_commutes() {
        let m = random_matrix(3, 2);
        let left = 2.5 * &m;
        let right = &m * 2.5;
        assert_eq!(left, right);
        for (scaled, original) in left.iter().zip(m.iter()) {
            assert_relative_eq!(*scaled, original * 2.5);
        }
    }

    #[test]
    fn coordinate_and_flat_indexing_agree() {
        let m = random_matrix(4, 5);
        for r in 0..4 {
            for c in 0..5 {
                assert_eq!(m.get(r, c).unwrap(), m.at(r * 5 + c).unwrap());
            }
        }
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut m = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(m.get(2, 0), Err(MlpError::OutOfRange { .. })));
        assert!(matches!(m.get(0, 3), Err(MlpError::OutOfRange { .. })));
        assert!(matches!(m.at(6), Err(MlpError::OutOfRange { .. })));
        assert!(matches!(m.get_mut(5, 5), Err(MlpError::OutOfRange { .. })));
        assert!(matches!(m.at_mut(100), Err(MlpError::OutOfRange { .. })));
    }

    #[test]
    fn read_from_fills_in_row_major_order() {
        let mut m = Matrix::zeros(2, 2).unwrap();
        let values = [1.0f32, -2.0, 3.5, 0.25];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        m.read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(m.as_slice(), &values);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);
    }

    #[test]
    fn read_from_rejects_short_and_long_sources() {
        let mut m = Matrix::zeros(2, 2).unwrap();

        let short = vec![0u8; 15];
        assert!(matches!(
            m.read_from(&mut Cursor::new(short)),
            Err(MlpError::InvalidFileSize { expected: 16, actual: 15 })
        ));

        let long = vec![0u8; 17];
        assert!(matches!(
            m.read_from(&mut Cursor::new(long)),
            Err(MlpError::InvalidFileSize { expected: 16, actual: 17 })
        ));
    }

    #[test]
    fn to_plain_string_dumps_numeric_elements() {
        let m = Matrix::from_vec(vec![1.0, -2.5, 0.0, 4.0], 2, 2).unwrap();
        assert_eq!(m.to_plain_string(), "1 -2.5\n0 4\n");
    }

    #[test]
    fn display_renders_glyphs_above_the_threshold() {
        let m = Matrix::from_vec(vec![0.5, 0.05, 0.10, 0.11], 2, 2).unwrap();
        let rendered = m.to_string();
        // 0.1 itself is not strictly greater than the threshold.
        assert_eq!(rendered, "**  \n  **\n");
    }
}
