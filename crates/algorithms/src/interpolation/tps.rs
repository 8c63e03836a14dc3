//! Thin Plate Spline (TPS) interpolation
//!
//! Constructs a smooth surface through the sample points that minimizes
//! bending energy. The interpolant is
//! ```text
//! f(q) = a₀ + Σⱼ aⱼ·qⱼ + Σᵢ wᵢ · U(‖q − xᵢ‖)
//! ```
//! with the radial kernel U(r) = r²·ln(r) and a linear drift term over
//! all coordinate dimensions. Fitting solves an (n+k+1)-square system,
//! so it is practical for up to a few thousand points.
//!
//! A positive smoothing parameter λ relaxes exact interpolation into a
//! smoothing spline.
//!
//! Reference:
//! Duchon, J. (1976). Interpolation des fonctions de deux variables
//! suivant le principe de la flexion des plaques minces. RAIRO.
//! Wahba, G. (1990). Spline Models for Observational Data. SIAM.

use geokrig_core::{Error, Model, Prediction, Result, SampleSet};

use super::linalg::gauss_solve;

/// Parameters for TPS interpolation
#[derive(Debug, Clone, Copy)]
pub struct TpsParams {
    /// Smoothing parameter λ ≥ 0. Default 0.0 = exact interpolation;
    /// larger values trade fidelity at the samples for smoothness.
    pub smoothing: f64,
}

impl Default for TpsParams {
    fn default() -> Self {
        Self { smoothing: 0.0 }
    }
}

/// TPS radial kernel: U(r) = r²·ln(r), with U(0) = 0
#[inline]
fn tps_kernel(r: f64) -> f64 {
    if r < 1e-15 {
        0.0
    } else {
        r * r * r.ln()
    }
}

/// A fitted thin plate spline.
///
/// Holds the radial weights and the drift coefficients solved at fit
/// time; prediction evaluates the expansion.
#[derive(Debug)]
pub struct TpsModel<'a> {
    samples: &'a SampleSet,
    /// Radial weights w₁..wₙ
    weights: Vec<f64>,
    /// Drift coefficients a₀, a₁..aₖ
    drift: Vec<f64>,
}

/// Fit a thin plate spline on a sample set.
///
/// # Errors
/// - [`Error::Validation`] for an empty set or negative smoothing
/// - [`Error::InsufficientData`] with fewer than k + 2 points
/// - [`Error::Algorithm`] when the system is singular (all points
///   affinely dependent, e.g. collinear in 2-D)
pub fn fit(samples: &SampleSet, params: TpsParams) -> Result<TpsModel<'_>> {
    if samples.is_empty() {
        return Err(Error::validation(
            "samples",
            0,
            "cannot fit on an empty sample set",
        ));
    }
    if params.smoothing < 0.0 {
        return Err(Error::validation(
            "smoothing",
            params.smoothing,
            "must be non-negative",
        ));
    }

    let n = samples.len();
    let k = samples.dim();
    if n < k + 2 {
        return Err(Error::InsufficientData {
            required: k + 2,
            actual: n,
        });
    }

    let points = samples.points();
    let m = n + k + 1;
    let mut mat = vec![0.0_f64; m * m];
    let mut rhs = vec![0.0_f64; m];

    // K block with λ on the diagonal
    for i in 0..n {
        mat[i * m + i] = params.smoothing;
        for j in (i + 1)..n {
            let u = tps_kernel(points[i].dist(&points[j].coords));
            mat[i * m + j] = u;
            mat[j * m + i] = u;
        }
    }

    // P block (n × (k+1)) and its transpose
    for i in 0..n {
        mat[i * m + n] = 1.0;
        mat[n * m + i] = 1.0;
        for j in 0..k {
            mat[i * m + n + 1 + j] = points[i].coords[j];
            mat[(n + 1 + j) * m + i] = points[i].coords[j];
        }
    }

    // RHS: sample values, then zeros for the orthogonality conditions
    for i in 0..n {
        rhs[i] = points[i].value;
    }

    let coeffs = gauss_solve(m, &mut mat, &mut rhs)?;

    Ok(TpsModel {
        samples,
        weights: coeffs[..n].to_vec(),
        drift: coeffs[n..].to_vec(),
    })
}

impl Model for TpsModel<'_> {
    fn predict(&self, query: &[f64]) -> Result<Prediction> {
        self.samples.check_query(query)?;

        let mut value = self.drift[0];
        for (j, q) in query.iter().enumerate() {
            value += self.drift[1 + j] * q;
        }
        for (pt, w) in self.samples.iter().zip(&self.weights) {
            value += w * tps_kernel(pt.dist(query));
        }

        Ok(Prediction {
            value,
            coords: query.to_vec(),
        })
    }

    fn n_samples(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.samples.dim()
    }
}
