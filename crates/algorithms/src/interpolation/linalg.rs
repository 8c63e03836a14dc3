//! Dense solver for the small linear systems of TPS and kriging.

use geokrig_core::{Error, Result};

/// Solve the n×n system `mat · x = rhs` in place using Gaussian
/// elimination with partial pivoting. `mat` is row-major.
///
/// Sized for the systems this crate produces (tens of unknowns), not a
/// general-purpose solver.
pub(crate) fn gauss_solve(n: usize, mat: &mut [f64], rhs: &mut [f64]) -> Result<Vec<f64>> {
    debug_assert_eq!(mat.len(), n * n);
    debug_assert_eq!(rhs.len(), n);

    // Forward elimination
    for col in 0..n {
        let mut pivot_val = mat[col * n + col].abs();
        let mut pivot_row = col;
        for row in (col + 1)..n {
            let val = mat[row * n + col].abs();
            if val > pivot_val {
                pivot_val = val;
                pivot_row = row;
            }
        }

        if pivot_val < 1e-14 {
            return Err(Error::Algorithm("singular linear system".into()));
        }

        if pivot_row != col {
            for j in 0..n {
                mat.swap(col * n + j, pivot_row * n + j);
            }
            rhs.swap(col, pivot_row);
        }

        let pivot = mat[col * n + col];
        for row in (col + 1)..n {
            let factor = mat[row * n + col] / pivot;
            mat[row * n + col] = 0.0;
            for j in (col + 1)..n {
                mat[row * n + j] -= factor * mat[col * n + j];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0_f64; n];
    for col in (0..n).rev() {
        let mut sum = rhs[col];
        for j in (col + 1)..n {
            sum -= mat[col * n + j] * x[j];
        }
        x[col] = sum / mat[col * n + col];
    }

    Ok(x)
}
