//! Small fixed-size dense matrices for the projective chain.

use std::ops::{Index, IndexMut, Mul};

/// An error type for matrix operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LinalgError {
    /// The matrix has no inverse.
    #[error("Matrix is singular")]
    Singular,
}

/// A row-major `R x C` matrix of `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<const R: usize, const C: usize>(pub [[f64; C]; R]);

/// 3x3 matrix, a 2D projective transform.
pub type Mat3 = Matrix<3, 3>;
/// 3x4 matrix, a camera external matrix or a projection.
pub type Mat3x4 = Matrix<3, 4>;
/// 4x4 matrix, a homogeneous 3D transform.
pub type Mat4 = Matrix<4, 4>;
/// 4x3 matrix, a lift from pixel to 3D plane coordinates.
pub type Mat4x3 = Matrix<4, 3>;

impl<const R: usize, const C: usize> Matrix<R, C> {
    /// Create a matrix from its rows.
    pub fn from_rows(rows: [[f64; C]; R]) -> Self {
        Self(rows)
    }

    /// The zero matrix.
    pub fn zeros() -> Self {
        Self([[0.0; C]; R])
    }

    /// Matrix product `self * rhs`.
    pub fn matmul<const K: usize>(&self, rhs: &Matrix<C, K>) -> Matrix<R, K> {
        let mut out = Matrix::<R, K>::zeros();
        for i in 0..R {
            for j in 0..K {
                out.0[i][j] = (0..C).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        out
    }

    /// Matrix-vector product `self * v`.
    pub fn mul_vec(&self, v: &[f64; C]) -> [f64; R] {
        let mut out = [0.0; R];
        for (o, row) in out.iter_mut().zip(self.0.iter()) {
            *o = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
        }
        out
    }
}

impl<const N: usize> Matrix<N, N> {
    /// The identity matrix.
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.0[i][i] = 1.0;
        }
        m
    }

    /// The inverse matrix, by Gauss-Jordan elimination with partial pivoting.
    ///
    /// # Errors
    ///
    /// [`LinalgError::Singular`] when a pivot vanishes relative to the largest
    /// entry of the matrix, or when the matrix holds non-finite values.
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        if self.0.iter().flatten().any(|v| !v.is_finite()) {
            return Err(LinalgError::Singular);
        }
        let scale = self
            .0
            .iter()
            .flatten()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        if scale == 0.0 {
            return Err(LinalgError::Singular);
        }
        let eps = scale * 1e-12;

        let mut a = self.0;
        let mut inv = Self::identity().0;

        for col in 0..N {
            let pivot = (col..N)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(col);
            if a[pivot][col].abs() < eps {
                return Err(LinalgError::Singular);
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let p = a[col][col];
            for k in 0..N {
                a[col][k] /= p;
                inv[col][k] /= p;
            }

            for row in 0..N {
                if row == col {
                    continue;
                }
                let f = a[row][col];
                if f == 0.0 {
                    continue;
                }
                for k in 0..N {
                    a[row][k] -= f * a[col][k];
                    inv[row][k] -= f * inv[col][k];
                }
            }
        }

        Ok(Self(inv))
    }
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const R: usize, const C: usize> Index<usize> for Matrix<R, C> {
    type Output = [f64; C];

    fn index(&self, row: usize) -> &Self::Output {
        &self.0[row]
    }
}

impl<const R: usize, const C: usize> IndexMut<usize> for Matrix<R, C> {
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        &mut self.0[row]
    }
}

impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;

    fn mul(self, rhs: Matrix<C, K>) -> Self::Output {
        self.matmul(&rhs)
    }
}
