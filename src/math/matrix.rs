//! Small dense matrices and the normal-equation algebra built on them.
//!
//! Only what the model catalog needs is supported: every model has at most three
//! coefficients, so `XᵀX` is at most 3×3. Determinant and adjugate are written out
//! explicitly for sizes 0 through 3 and refuse anything larger.
//!
//! Each operation comes in two forms:
//! - `try_*` returns `Result<_, AlgebraError>` and says why a value could not be
//!   computed
//! - the plain form is total: it logs the failure and returns the documented
//!   sentinel (the empty matrix, or `1.0` for determinants) so a display pipeline
//!   always runs to completion
//!
//! Singular matrices are not detected. Inverting one divides by a zero determinant
//! and the resulting `inf`/`NaN` entries flow through to whatever consumes them.

use std::ops::Index;

use thiserror::Error;
use tracing::warn;

/// Largest square size handled by [`determinant`] and [`adjugate`].
pub const MAX_SQUARE: usize = 3;

/// Why an algebra operation could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlgebraError {
    #[error("cannot multiply {lhs_rows}x{lhs_cols} by {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("unsupported size {size}x{size} (at most 3x3)")]
    UnsupportedSize { size: usize },
    #[error("row {row} has {found} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Row-major matrix of `f64`.
///
/// A matrix with zero rows is the *empty* matrix. It is what operations return
/// when there is nothing to compute, and it is distinct from an `n×0` matrix
/// (rows of length zero).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// The empty (0×0) matrix.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a matrix from a list of rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, AlgebraError> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let ncols = first.as_ref().len();

        let mut data = Vec::with_capacity(rows.len() * ncols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != ncols {
                return Err(AlgebraError::Ragged {
                    row,
                    expected: ncols,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Ok(Self {
            nrows: rows.len(),
            ncols,
            data,
        })
    }

    /// Build a matrix from row-major values.
    ///
    /// # Panics
    /// Panics if `data.len() != nrows * ncols`.
    pub(crate) fn from_row_slice(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "row slice length must equal nrows * ncols"
        );
        if nrows == 0 {
            return Self::empty();
        }
        Self {
            nrows,
            ncols,
            data: data.to_vec(),
        }
    }

    /// Build an `nrows × ncols` matrix from `f(row, col)`.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        if nrows == 0 {
            return Self::empty();
        }
        let mut data = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                data.push(f(r, c));
            }
        }
        Self { nrows, ncols, data }
    }

    /// An `n×1` column vector. An empty slice gives the empty matrix.
    pub fn column(values: &[f64]) -> Self {
        Self::from_row_slice(values.len(), usize::from(!values.is_empty()), values)
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |r, c| if r == c { 1.0 } else { 0.0 })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// True for the zero-row matrix.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// True when every entry is finite (vacuously true for the empty matrix).
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Borrow one row.
    ///
    /// # Panics
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.nrows, "row {row} out of range for {} rows", self.nrows);
        &self.data[row * self.ncols..(row + 1) * self.ncols]
    }

    /// Iterate over rows (works for `n×0` matrices too).
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.nrows).map(move |r| self.row(r))
    }

    /// All entries in row-major order. For a column vector this is the vector itself.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.nrows,
            self.ncols
        );
        &self.data[row * self.ncols + col]
    }
}

/// `B[i][j] = A[j][i]`.
///
/// A matrix with no rows or no columns transposes to the empty matrix.
pub fn transpose(a: &Matrix) -> Matrix {
    if a.nrows == 0 || a.ncols == 0 {
        return Matrix::empty();
    }
    Matrix::from_fn(a.ncols, a.nrows, |r, c| a[(c, r)])
}

/// Matrix product, or `DimensionMismatch` when `a.ncols() != b.nrows()`.
///
/// An empty operand is not an error: the product is the empty matrix.
pub fn try_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, AlgebraError> {
    if a.is_empty() || b.is_empty() {
        return Ok(Matrix::empty());
    }
    if a.ncols != b.nrows {
        return Err(AlgebraError::DimensionMismatch {
            lhs_rows: a.nrows,
            lhs_cols: a.ncols,
            rhs_rows: b.nrows,
            rhs_cols: b.ncols,
        });
    }

    let n = a.ncols;
    Ok(Matrix::from_fn(a.nrows, b.ncols, |i, j| {
        (0..n).map(|k| a[(i, k)] * b[(k, j)]).sum()
    }))
}

/// Matrix product; incompatible shapes are logged and give the empty matrix.
pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    try_multiply(a, b).unwrap_or_else(|err| {
        warn!(error = %err, "matrix product not computable");
        Matrix::empty()
    })
}

/// Determinant of a square matrix up to 3×3. The empty matrix has determinant 1.
pub fn try_determinant(a: &Matrix) -> Result<f64, AlgebraError> {
    if a.is_empty() {
        return Ok(1.0);
    }
    if !a.is_square() {
        return Err(AlgebraError::NotSquare {
            rows: a.nrows,
            cols: a.ncols,
        });
    }

    match a.nrows {
        1 => Ok(a[(0, 0)]),
        2 => Ok(a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)]),
        3 => Ok(a[(0, 0)] * a[(1, 1)] * a[(2, 2)]
            + a[(0, 1)] * a[(1, 2)] * a[(2, 0)]
            + a[(0, 2)] * a[(1, 0)] * a[(2, 1)]
            - a[(0, 2)] * a[(1, 1)] * a[(2, 0)]
            - a[(0, 1)] * a[(1, 0)] * a[(2, 2)]
            - a[(0, 0)] * a[(1, 2)] * a[(2, 1)]),
        size => Err(AlgebraError::UnsupportedSize { size }),
    }
}

/// Determinant, or `1.0` when it is not computable (non-square or larger than 3×3).
///
/// The `1.0` is a placeholder, not a numerical answer.
pub fn determinant(a: &Matrix) -> f64 {
    try_determinant(a).unwrap_or_else(|err| {
        warn!(error = %err, "determinant not computable");
        1.0
    })
}

/// `a` with `row` and `col` removed.
///
/// An out-of-range index leaves that dimension untouched.
pub fn minor(a: &Matrix, row: usize, col: usize) -> Matrix {
    let nrows = a.nrows - usize::from(row < a.nrows);
    let ncols = a.ncols - usize::from(col < a.ncols);

    let mut data = Vec::with_capacity(nrows * ncols);
    for (r, values) in a.rows().enumerate() {
        if r == row {
            continue;
        }
        for (c, &v) in values.iter().enumerate() {
            if c != col {
                data.push(v);
            }
        }
    }

    Matrix::from_row_slice(nrows, ncols, &data)
}

/// Matrix of signed minors: `C[r][c] = (-1)^(r+c) · det(minor(A, r, c))`.
pub fn cofactor_matrix(a: &Matrix) -> Result<Matrix, AlgebraError> {
    if !a.is_square() {
        return Err(AlgebraError::NotSquare {
            rows: a.nrows,
            cols: a.ncols,
        });
    }
    if a.nrows > MAX_SQUARE {
        return Err(AlgebraError::UnsupportedSize { size: a.nrows });
    }

    let n = a.nrows;
    let mut data = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
            data.push(sign * try_determinant(&minor(a, r, c))?);
        }
    }
    Ok(Matrix::from_row_slice(n, n, &data))
}

/// Classical adjugate (transpose of the cofactor matrix) up to 3×3.
pub fn try_adjugate(a: &Matrix) -> Result<Matrix, AlgebraError> {
    if a.is_empty() {
        return Ok(Matrix::empty());
    }
    if !a.is_square() {
        return Err(AlgebraError::NotSquare {
            rows: a.nrows,
            cols: a.ncols,
        });
    }

    match a.nrows {
        1 => Ok(Matrix::from_row_slice(1, 1, &[1.0])),
        2 => Ok(Matrix::from_row_slice(
            2,
            2,
            &[a[(1, 1)], -a[(0, 1)], -a[(1, 0)], a[(0, 0)]],
        )),
        3 => Ok(transpose(&cofactor_matrix(a)?)),
        size => Err(AlgebraError::UnsupportedSize { size }),
    }
}

/// Adjugate, or the empty matrix when it is not computable.
pub fn adjugate(a: &Matrix) -> Matrix {
    try_adjugate(a).unwrap_or_else(|err| {
        warn!(error = %err, "adjugate not computable");
        Matrix::empty()
    })
}

/// Multiply every entry by `s`, keeping the shape.
pub fn scalar_multiply(a: &Matrix, s: f64) -> Matrix {
    Matrix {
        nrows: a.nrows,
        ncols: a.ncols,
        data: a.data.iter().map(|v| v * s).collect(),
    }
}

/// `adj(A) / det(A)`. A singular `A` yields non-finite entries rather than an error.
pub fn try_invert(a: &Matrix) -> Result<Matrix, AlgebraError> {
    let adj = try_adjugate(a)?;
    let det = try_determinant(a)?;
    Ok(scalar_multiply(&adj, 1.0 / det))
}

/// Inverse, or the empty matrix when the size is not supported.
pub fn invert(a: &Matrix) -> Matrix {
    try_invert(a).unwrap_or_else(|err| {
        warn!(error = %err, "inverse not computable");
        Matrix::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn assert_matrix_close(a: &Matrix, b: &Matrix, eps: f64) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_abs_diff_eq!(*x, *y, epsilon = eps);
        }
    }

    fn four_by_four() -> Matrix {
        Matrix::from_fn(4, 4, |r, c| (r * 4 + c) as f64 + if r == c { 10.0 } else { 0.0 })
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            AlgebraError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_is_distinct_from_rows_of_length_zero() {
        let no_cols = Matrix::from_rows(&[Vec::<f64>::new(), Vec::new()]).unwrap();
        assert!(!no_cols.is_empty());
        assert_eq!(no_cols.shape(), (2, 0));
        assert_eq!(no_cols.rows().count(), 2);
        assert!(Matrix::empty().is_empty());
        assert_ne!(no_cols, Matrix::empty());
    }

    #[test]
    fn transpose_swaps_indices() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = transpose(&a);
        assert_eq!(t, m(&[&[1.0, 4.0], &[2.0, 5.0], &[3.0, 6.0]]));
    }

    #[test]
    fn transpose_twice_is_identity() {
        for a in [
            m(&[&[1.0]]),
            m(&[&[1.0, 2.0, 3.0]]),
            m(&[&[1.0], &[2.0], &[3.0]]),
            m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]),
            Matrix::empty(),
        ] {
            assert_eq!(transpose(&transpose(&a)), a);
        }
    }

    #[test]
    fn transpose_of_degenerate_shapes_is_empty() {
        assert!(transpose(&Matrix::empty()).is_empty());
        let no_cols = Matrix::from_rows(&[Vec::<f64>::new()]).unwrap();
        assert!(transpose(&no_cols).is_empty());
    }

    #[test]
    fn multiply_computes_standard_product() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0], &[6.0]]);
        assert_eq!(multiply(&a, &b), m(&[&[17.0], &[39.0]]));
    }

    #[test]
    fn multiply_mismatch_returns_empty_for_non_empty_operands() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        let b = m(&[&[1.0, 2.0]]);
        assert!(multiply(&a, &b).is_empty());
        assert_eq!(
            try_multiply(&a, &b),
            Err(AlgebraError::DimensionMismatch {
                lhs_rows: 1,
                lhs_cols: 3,
                rhs_rows: 1,
                rhs_cols: 2
            })
        );
    }

    #[test]
    fn multiply_with_empty_operand_is_empty() {
        let a = m(&[&[1.0, 2.0]]);
        assert!(multiply(&a, &Matrix::empty()).is_empty());
        assert!(multiply(&Matrix::empty(), &a).is_empty());
        assert_eq!(try_multiply(&Matrix::empty(), &a), Ok(Matrix::empty()));
    }

    #[test]
    fn determinant_scenarios() {
        assert_eq!(determinant(&m(&[&[5.0]])), 5.0);
        assert_eq!(determinant(&m(&[&[1.0, 2.0], &[3.0, 4.0]])), -2.0);
        assert_eq!(determinant(&Matrix::identity(3)), 1.0);
        assert_eq!(determinant(&Matrix::empty()), 1.0);
        assert_eq!(
            determinant(&m(&[&[4.0, 7.0, 2.0], &[3.0, 6.0, 1.0], &[2.0, 5.0, 3.0]])),
            9.0
        );
    }

    #[test]
    fn determinant_of_unsupported_input_is_the_sentinel_one() {
        // Documented limitation: 1.0 here is a placeholder, not the determinant.
        let big = four_by_four();
        assert_eq!(determinant(&big), 1.0);
        assert_eq!(
            try_determinant(&big),
            Err(AlgebraError::UnsupportedSize { size: 4 })
        );

        let rect = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(determinant(&rect), 1.0);
        assert_eq!(
            try_determinant(&rect),
            Err(AlgebraError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn adjugate_small_sizes() {
        assert_eq!(adjugate(&m(&[&[7.0]])), m(&[&[1.0]]));
        assert_eq!(
            adjugate(&m(&[&[1.0, 2.0], &[3.0, 4.0]])),
            m(&[&[4.0, -2.0], &[-3.0, 1.0]])
        );
        assert!(adjugate(&Matrix::empty()).is_empty());
    }

    #[test]
    fn adjugate_three_by_three_is_transposed_cofactors() {
        let a = m(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]);
        let expected = m(&[
            &[-24.0, 18.0, 5.0],
            &[20.0, -15.0, -4.0],
            &[-5.0, 4.0, 1.0],
        ]);
        assert_eq!(adjugate(&a), expected);
        assert_eq!(cofactor_matrix(&a).unwrap(), transpose(&expected));
    }

    #[test]
    fn adjugate_of_unsupported_input_is_empty() {
        // Documented limitation: no adjugate beyond 3x3.
        assert!(adjugate(&four_by_four()).is_empty());
        assert_eq!(
            try_adjugate(&four_by_four()),
            Err(AlgebraError::UnsupportedSize { size: 4 })
        );
        assert!(adjugate(&m(&[&[1.0, 2.0]])).is_empty());
    }

    #[test]
    fn minor_removes_row_and_column() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(minor(&a, 1, 0), m(&[&[2.0, 3.0], &[8.0, 9.0]]));
        assert!(minor(&m(&[&[1.0]]), 0, 0).is_empty());
    }

    #[test]
    fn scalar_multiply_preserves_shape() {
        let a = m(&[&[1.0, -2.0], &[0.5, 4.0]]);
        assert_eq!(scalar_multiply(&a, 2.0), m(&[&[2.0, -4.0], &[1.0, 8.0]]));
        assert!(scalar_multiply(&Matrix::empty(), 3.0).is_empty());
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let cases = [
            m(&[&[4.0]]),
            m(&[&[4.0, 7.0], &[2.0, 6.0]]),
            m(&[&[4.0, 7.0, 2.0], &[3.0, 6.0, 1.0], &[2.0, 5.0, 3.0]]),
            m(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]),
        ];
        for a in &cases {
            let product = multiply(a, &invert(a));
            assert_matrix_close(&product, &Matrix::identity(a.nrows()), 1e-12);
        }
    }

    #[test]
    fn inverse_matches_nalgebra() {
        let a = m(&[&[2.0, -1.0, 0.0], &[-1.0, 2.0, -1.0], &[0.0, -1.0, 2.0]]);
        let ours = invert(&a);

        let na = nalgebra::DMatrix::from_row_slice(3, 3, a.as_slice());
        let reference = na.try_inverse().unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert_abs_diff_eq!(ours[(r, c)], reference[(r, c)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn singular_inverse_propagates_non_finite_values() {
        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let inv = invert(&singular);
        assert_eq!(inv.shape(), (2, 2));
        assert!(inv.as_slice().iter().all(|v| !v.is_finite()));
        assert!(try_invert(&singular).is_ok());
    }

    #[test]
    fn inverse_of_unsupported_or_empty_input_is_empty() {
        assert!(invert(&Matrix::empty()).is_empty());
        assert!(invert(&four_by_four()).is_empty());
    }
}
