//! Ordinary Kriging interpolation
//!
//! Best Linear Unbiased Estimator (BLUE) for spatial data. A fitted
//! variogram supplies the spatial covariance structure; each prediction
//! solves a local system for weights that minimize estimation variance
//! under the unbiasedness constraint Σwᵢ = 1.
//!
//! The kriging system for the k selected neighbors:
//! ```text
//! [γ(x₁,x₁) … γ(x₁,xₖ) 1] [w₁]   [γ(x₁,x₀)]
//! [   ⋮          ⋮     ⋮] [ ⋮] = [    ⋮    ]
//! [γ(xₖ,x₁) … γ(xₖ,xₖ) 1] [wₖ]   [γ(xₖ,x₀)]
//! [   1     …    1     0] [μ ]   [    1    ]
//! ```
//! where μ is the Lagrange multiplier.
//!
//! Reference:
//! Matheron, G. (1963). Principles of geostatistics. Economic Geology.
//! Cressie, N. (1993). Statistics for Spatial Data. Wiley.

use geokrig_core::{Error, Model, Prediction, Result, SampleSet};

use super::linalg::gauss_solve;
use super::variogram::{empirical_variogram, fit_best_variogram, FittedVariogram, VariogramParams};

/// Parameters for ordinary kriging
#[derive(Debug, Clone)]
pub struct KrigingParams {
    /// Maximum number of nearest samples per estimation (default 16)
    pub max_neighbors: usize,
    /// Pre-fitted variogram model. `None` fits one from the training
    /// samples at fit time.
    pub variogram: Option<FittedVariogram>,
    /// Empirical variogram settings used when `variogram` is `None`
    pub variogram_params: VariogramParams,
}

impl Default for KrigingParams {
    fn default() -> Self {
        Self {
            max_neighbors: 16,
            variogram: None,
            variogram_params: VariogramParams::default(),
        }
    }
}

/// A fitted ordinary kriging model.
#[derive(Debug)]
pub struct KrigingModel<'a> {
    samples: &'a SampleSet,
    variogram: FittedVariogram,
    max_neighbors: usize,
}

/// Fit an ordinary kriging model.
///
/// When no variogram is supplied, the empirical variogram is computed
/// from the samples and the best of the three theoretical models is
/// fitted to it.
///
/// # Errors
/// - [`Error::InsufficientData`] with fewer than 2 samples
/// - [`Error::Validation`] if `max_neighbors` is zero
/// - variogram fitting errors when no model can be fitted
pub fn fit(samples: &SampleSet, params: KrigingParams) -> Result<KrigingModel<'_>> {
    if samples.len() < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            actual: samples.len(),
        });
    }
    if params.max_neighbors < 1 {
        return Err(Error::validation(
            "max_neighbors",
            params.max_neighbors,
            "must be at least 1",
        ));
    }

    let variogram = match params.variogram {
        Some(v) => v,
        None => {
            let emp = empirical_variogram(samples, params.variogram_params)?;
            fit_best_variogram(&emp)?
        }
    };

    Ok(KrigingModel {
        samples,
        variogram,
        max_neighbors: params.max_neighbors,
    })
}

impl KrigingModel<'_> {
    /// The variogram model driving the kriging weights.
    pub fn variogram(&self) -> &FittedVariogram {
        &self.variogram
    }

    /// Estimate with the kriging variance (estimation uncertainty).
    ///
    /// The variance is `Σ wᵢ·γ(xᵢ,x₀) + μ`, clamped at zero; an exact
    /// coordinate hit reports zero variance. When the local system is
    /// singular the estimate falls back to inverse-distance weighting
    /// and the variance is NaN.
    pub fn predict_with_variance(&self, query: &[f64]) -> Result<(Prediction, f64)> {
        self.samples.check_query(query)?;

        let points = self.samples.points();
        let mut neighbors: Vec<(f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(i, pt)| (pt.dist_sq(query), i))
            .collect();
        neighbors.sort_by(|a, b| {
            a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(self.max_neighbors);

        if neighbors[0].0 == 0.0 {
            let idx = neighbors[0].1;
            return Ok((
                Prediction {
                    value: points[idx].value,
                    coords: query.to_vec(),
                },
                0.0,
            ));
        }

        let k = neighbors.len();
        let m = k + 1;
        let mut mat = vec![0.0_f64; m * m];
        let mut rhs = vec![0.0_f64; m];

        // γ(xᵢ, xⱼ) block plus the Lagrange row/column
        for i in 0..k {
            let pi = &points[neighbors[i].1];
            for j in (i + 1)..k {
                let pj = &points[neighbors[j].1];
                let gamma = self.variogram.evaluate(pi.dist(&pj.coords));
                mat[i * m + j] = gamma;
                mat[j * m + i] = gamma;
            }
            mat[i * m + k] = 1.0;
            mat[k * m + i] = 1.0;
            rhs[i] = self.variogram.evaluate(neighbors[i].0.sqrt());
        }
        rhs[k] = 1.0;

        let gammas: Vec<f64> = rhs[..k].to_vec();

        match gauss_solve(m, &mut mat, &mut rhs) {
            Ok(weights) => {
                let mut estimate = 0.0;
                for i in 0..k {
                    estimate += weights[i] * points[neighbors[i].1].value;
                }

                let mut variance = weights[k]; // Lagrange multiplier μ
                for i in 0..k {
                    variance += weights[i] * gammas[i];
                }

                Ok((
                    Prediction {
                        value: estimate,
                        coords: query.to_vec(),
                    },
                    variance.max(0.0),
                ))
            }
            Err(_) => {
                // Singular system, typically a degenerate variogram.
                // Fall back to inverse-distance weights.
                let mut sum_w = 0.0;
                let mut sum_wz = 0.0;
                for &(d_sq, idx) in &neighbors {
                    let w = 1.0 / d_sq;
                    sum_w += w;
                    sum_wz += w * points[idx].value;
                }
                Ok((
                    Prediction {
                        value: sum_wz / sum_w,
                        coords: query.to_vec(),
                    },
                    f64::NAN,
                ))
            }
        }
    }
}

impl Model for KrigingModel<'_> {
    fn predict(&self, query: &[f64]) -> Result<Prediction> {
        self.predict_with_variance(query).map(|(p, _)| p)
    }

    fn n_samples(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.samples.dim()
    }
}
