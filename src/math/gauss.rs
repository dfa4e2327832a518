//! Gaussian elimination with partial pivoting.
//!
//! The polynomial fitter builds a small augmented normal-equations system
//! `[A | b]` (3×4) and solves it here. The matrix is taken by value: elimination
//! rewrites it in place, so each caller hands over its own copy.
//!
//! A pivot that is exactly zero after row selection means the system is
//! singular; we report that instead of dividing by zero.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModelingError, Result};

/// Solve the `n×(n+1)` augmented system `[A | b]` for `x` in `A·x = b`.
pub fn solve(mut m: DMatrix<f64>) -> Result<DVector<f64>> {
    let n = m.nrows();
    if m.ncols() != n + 1 {
        return Err(ModelingError::DegenerateInput(format!(
            "augmented matrix must be n×(n+1), got {}×{}",
            n,
            m.ncols()
        )));
    }

    // Forward elimination.
    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = m[(col, col)].abs();
        for row in (col + 1)..n {
            let v = m[(row, col)].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot_row = row;
            }
        }

        if pivot_abs == 0.0 {
            return Err(ModelingError::SingularMatrix { column: col });
        }
        if pivot_row != col {
            m.swap_rows(col, pivot_row);
        }

        let pivot = m[(col, col)];
        for row in (col + 1)..n {
            let factor = m[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..=n {
                m[(row, k)] -= factor * m[(col, k)];
            }
        }
    }

    // Back substitution.
    let mut x = DVector::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut acc = m[(i, n)];
        for j in (i + 1)..n {
            acc -= m[(i, j)] * x[j];
        }
        x[i] = acc / m[(i, i)];
    }

    Ok(x)
}
