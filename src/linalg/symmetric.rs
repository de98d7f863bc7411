//! Symmetric matrix with enforced mirrored storage.

use std::ops::{Index, Mul};

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Relative tolerance accepted when checking that supplied data is symmetric.
const SYMMETRY_TOL: f64 = 1e-9;

/// A square symmetric matrix.
///
/// The only mutators are [`set`] and [`set_block`], both of which keep `M[i,j] == M[j,i]`: a
/// scalar write mirrors across the diagonal, and a block write lands together with its transpose
/// image or is rejected. Covariance matrices are represented with this type so that no operation
/// can leave them asymmetric.
///
/// [`set`]: #method.set
/// [`set_block`]: #method.set_block
#[derive(Debug, Clone, PartialEq)]
pub struct SymMatrix {
    m: DMatrix<f64>,
}

impl SymMatrix {
    /// The zero matrix of the given dimension.
    pub fn zeros(dim: usize) -> SymMatrix {
        SymMatrix {
            m: DMatrix::zeros(dim, dim),
        }
    }

    /// The identity matrix of the given dimension.
    pub fn identity(dim: usize) -> SymMatrix {
        SymMatrix {
            m: DMatrix::identity(dim, dim),
        }
    }

    /// A diagonal matrix from the given diagonal entries.
    pub fn from_diagonal(diagonal: &DVector<f64>) -> SymMatrix {
        SymMatrix {
            m: DMatrix::from_diagonal(diagonal),
        }
    }

    /// Wraps a dense matrix, rejecting non-square or asymmetric input.
    pub fn from_matrix(m: DMatrix<f64>) -> Result<SymMatrix> {
        if m.nrows() != m.ncols() {
            return Err(Error::dimensions(m.nrows(), m.ncols()));
        }
        if !is_symmetric(&m) {
            return Err(Error::SymmetryViolation("matrix data is not symmetric"));
        }
        Ok(SymMatrix { m })
    }

    /// Forces a square matrix symmetric as `(M + Mᵗ)/2`.
    ///
    /// Used where a numerically computed matrix is symmetric up to rounding, such as the
    /// covariance result of a filter observation.
    pub fn symmetrize(m: DMatrix<f64>) -> Result<SymMatrix> {
        if m.nrows() != m.ncols() {
            return Err(Error::dimensions(m.nrows(), m.ncols()));
        }
        let mt = m.transpose();
        Ok(SymMatrix { m: (m + mt) * 0.5 })
    }

    pub fn dim(&self) -> usize {
        self.m.nrows()
    }

    /// The matrix as a dense nalgebra matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.m
    }

    /// Mirrored scalar write: sets both `[i,j]` and `[j,i]`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.m[(i, j)] = value;
        self.m[(j, i)] = value;
    }

    /// Copy of the sub-block starting at `(row, col)`.
    pub fn block(&self, row: usize, col: usize, nrows: usize, ncols: usize) -> DMatrix<f64> {
        self.m.slice((row, col), (nrows, ncols)).clone_owned()
    }

    /// Assigns a sub-block without breaking symmetry.
    ///
    /// A diagonal placement (`row == col` with a square block) requires the block itself to be
    /// symmetric. An off-diagonal placement whose row and column ranges are disjoint writes the
    /// block at `(row, col)` and its transpose at `(col, row)` together. Any placement that
    /// partially overlaps its own transpose image is rejected with `SymmetryViolation`.
    pub fn set_block(&mut self, row: usize, col: usize, block: &DMatrix<f64>) -> Result<()> {
        let (nrows, ncols) = block.shape();
        if row + nrows > self.dim() || col + ncols > self.dim() {
            return Err(Error::dimensions(self.dim(), (row + nrows).max(col + ncols)));
        }
        if row == col && nrows == ncols {
            if !is_symmetric(block) {
                return Err(Error::SymmetryViolation("diagonal block is not symmetric"));
            }
            self.m.slice_mut((row, col), (nrows, ncols)).copy_from(block);
            return Ok(());
        }
        // Row range [row, row+nrows) and column range [col, col+ncols) must be disjoint,
        // otherwise the block intersects its own transpose image.
        if row < col + ncols && col < row + nrows {
            return Err(Error::SymmetryViolation(
                "block overlaps its own transpose image",
            ));
        }
        self.m.slice_mut((row, col), (nrows, ncols)).copy_from(block);
        self.m
            .slice_mut((col, row), (ncols, nrows))
            .copy_from(&block.transpose());
        Ok(())
    }
}

fn is_symmetric(m: &DMatrix<f64>) -> bool {
    let scale = m.amax().max(1.0);
    for j in 0..m.ncols() {
        for i in 0..j {
            if (m[(i, j)] - m[(j, i)]).abs() > SYMMETRY_TOL * scale {
                return false;
            }
        }
    }
    true
}

impl Index<(usize, usize)> for SymMatrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.m[index]
    }
}

impl Mul<f64> for SymMatrix {
    type Output = SymMatrix;

    fn mul(self, rhs: f64) -> SymMatrix {
        SymMatrix { m: self.m * rhs }
    }
}

impl Mul<f64> for &SymMatrix {
    type Output = SymMatrix;

    fn mul(self, rhs: f64) -> SymMatrix {
        SymMatrix {
            m: &self.m * rhs,
        }
    }
}
