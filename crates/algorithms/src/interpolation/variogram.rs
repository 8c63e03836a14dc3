//! Variogram computation and model fitting
//!
//! Computes the empirical variogram of a sample set and fits theoretical
//! models (spherical, exponential, Gaussian). Prerequisite for kriging.
//!
//! The semivariance γ(h) measures spatial dissimilarity as a function of
//! separation distance h:
//! ```text
//! γ(h) = (1/2N(h)) Σ [z(xᵢ) - z(xⱼ)]²   over pairs separated by ≈ h
//! ```
//!
//! Reference:
//! Matheron, G. (1963). Principles of geostatistics. Economic Geology.
//! Cressie, N. (1993). Statistics for Spatial Data. Wiley.

use serde::{Deserialize, Serialize};

use geokrig_core::{Error, Result, SampleSet};

/// Empirical variogram: semivariance at discrete lag distances.
#[derive(Debug, Clone)]
pub struct EmpiricalVariogram {
    /// Lag distances (bin centers)
    pub lags: Vec<f64>,
    /// Semivariance γ(h) per lag; NaN where a bin received no pairs
    pub semivariance: Vec<f64>,
    /// Number of point pairs contributing to each lag bin
    pub pair_counts: Vec<usize>,
}

/// Theoretical variogram model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariogramModel {
    /// γ(h) = c₀ + c·[1.5(h/a) − 0.5(h/a)³] for h ≤ a; c₀ + c beyond
    Spherical,
    /// γ(h) = c₀ + c·[1 − exp(−3h/a)]
    Exponential,
    /// γ(h) = c₀ + c·[1 − exp(−3h²/a²)]
    Gaussian,
}

/// Fitted variogram model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedVariogram {
    /// Model type
    pub model: VariogramModel,
    /// Nugget c₀: semivariance as h → 0
    pub nugget: f64,
    /// Sill c₀ + c: semivariance where the model levels off
    pub sill: f64,
    /// Range a: distance at which the sill is (approximately) reached
    pub range: f64,
    /// Partial sill c = sill − nugget
    pub partial_sill: f64,
    /// Weighted residual sum of squares from fitting (lower = better)
    pub rss: f64,
}

impl FittedVariogram {
    /// Evaluate the model at separation distance h.
    pub fn evaluate(&self, h: f64) -> f64 {
        if h < 1e-15 {
            return 0.0;
        }

        let c0 = self.nugget;
        let c = self.partial_sill;
        let a = self.range;

        match self.model {
            VariogramModel::Spherical => {
                if h >= a {
                    c0 + c
                } else {
                    let hr = h / a;
                    c0 + c * (1.5 * hr - 0.5 * hr * hr * hr)
                }
            }
            VariogramModel::Exponential => c0 + c * (1.0 - (-3.0 * h / a).exp()),
            VariogramModel::Gaussian => c0 + c * (1.0 - (-3.0 * h * h / (a * a)).exp()),
        }
    }
}

/// Parameters for empirical variogram computation
#[derive(Debug, Clone, Copy)]
pub struct VariogramParams {
    /// Number of lag bins (default 15)
    pub n_lags: usize,
    /// Maximum lag distance. `None` auto-computes half the maximum
    /// pairwise distance.
    pub max_lag: Option<f64>,
}

impl Default for VariogramParams {
    fn default() -> Self {
        Self {
            n_lags: 15,
            max_lag: None,
        }
    }
}

/// Compute the empirical variogram of a sample set.
///
/// Pairwise separation distances use the full coordinate dimensionality,
/// covariate dimensions included.
///
/// # Errors
/// - [`Error::InsufficientData`] with fewer than 2 samples
/// - [`Error::Validation`] for a non-positive lag count or max lag
pub fn empirical_variogram(
    samples: &SampleSet,
    params: VariogramParams,
) -> Result<EmpiricalVariogram> {
    let n = samples.len();
    if n < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            actual: n,
        });
    }
    if params.n_lags == 0 {
        return Err(Error::validation("n_lags", 0, "must be at least 1"));
    }

    let points = samples.points();

    let max_lag = match params.max_lag {
        Some(m) if m > 0.0 => m,
        Some(m) => {
            return Err(Error::validation("max_lag", m, "must be positive"));
        }
        None => {
            let mut max_dist: f64 = 0.0;
            for i in 0..n {
                for j in (i + 1)..n {
                    max_dist = max_dist.max(points[i].dist(&points[j].coords));
                }
            }
            if max_dist <= 0.0 {
                return Err(Error::Algorithm(
                    "all pairwise distances are zero".into(),
                ));
            }
            // Convention: half the maximum pairwise distance
            max_dist / 2.0
        }
    };

    let bin_width = max_lag / params.n_lags as f64;
    let lags: Vec<f64> = (0..params.n_lags)
        .map(|k| (k as f64 + 0.5) * bin_width)
        .collect();
    let mut semivariance = vec![0.0_f64; params.n_lags];
    let mut pair_counts = vec![0_usize; params.n_lags];

    for i in 0..n {
        for j in (i + 1)..n {
            let d = points[i].dist(&points[j].coords);
            if d >= max_lag {
                continue;
            }
            let bin = ((d / bin_width) as usize).min(params.n_lags - 1);
            let dz = points[i].value - points[j].value;
            semivariance[bin] += dz * dz;
            pair_counts[bin] += 1;
        }
    }

    for k in 0..params.n_lags {
        if pair_counts[k] > 0 {
            semivariance[k] /= 2.0 * pair_counts[k] as f64;
        } else {
            semivariance[k] = f64::NAN;
        }
    }

    Ok(EmpiricalVariogram {
        lags,
        semivariance,
        pair_counts,
    })
}

/// Fit a theoretical model to an empirical variogram.
///
/// Grid search over (nugget, sill, range) candidates, scored by residual
/// sum of squares weighted by pair counts (Cressie-style weighting).
pub fn fit_variogram(
    empirical: &EmpiricalVariogram,
    model: VariogramModel,
) -> Result<FittedVariogram> {
    let valid: Vec<(f64, f64, usize)> = empirical
        .lags
        .iter()
        .zip(&empirical.semivariance)
        .zip(&empirical.pair_counts)
        .filter(|((_, sv), cnt)| !sv.is_nan() && **cnt > 0)
        .map(|((&lag, &sv), &cnt)| (lag, sv, cnt))
        .collect();

    if valid.len() < 3 {
        return Err(Error::InsufficientData {
            required: 3,
            actual: valid.len(),
        });
    }

    let max_lag = valid[valid.len() - 1].0;
    let max_sv = valid.iter().map(|(_, sv, _)| *sv).fold(0.0_f64, f64::max);
    if max_sv <= 0.0 {
        return Err(Error::Algorithm("all semivariance values are zero".into()));
    }

    const NUGGET_STEPS: usize = 10;
    const SILL_STEPS: usize = 10;
    const RANGE_STEPS: usize = 20;

    let mut best: Option<FittedVariogram> = None;

    for ni in 0..=NUGGET_STEPS {
        // Nugget candidates up to half the observed maximum
        let nugget = max_sv * ni as f64 / (2.0 * NUGGET_STEPS as f64);
        for si in 1..=SILL_STEPS {
            let sill = max_sv * si as f64 / SILL_STEPS as f64;
            if sill <= nugget {
                continue;
            }
            for ri in 1..=RANGE_STEPS {
                // Range candidates up to twice the last observed lag
                let range = 2.0 * max_lag * ri as f64 / RANGE_STEPS as f64;
                let trial = FittedVariogram {
                    model,
                    nugget,
                    sill,
                    range,
                    partial_sill: sill - nugget,
                    rss: 0.0,
                };

                let mut rss = 0.0;
                for &(lag, sv, cnt) in &valid {
                    let residual = sv - trial.evaluate(lag);
                    rss += cnt as f64 * residual * residual;
                }

                let better = match &best {
                    Some(b) => rss < b.rss,
                    None => true,
                };
                if better {
                    best = Some(FittedVariogram { rss, ..trial });
                }
            }
        }
    }

    best.ok_or_else(|| Error::Algorithm("variogram grid search found no candidate".into()))
}

/// Fit spherical, exponential, and Gaussian models; return the lowest-RSS fit.
pub fn fit_best_variogram(empirical: &EmpiricalVariogram) -> Result<FittedVariogram> {
    let models = [
        VariogramModel::Spherical,
        VariogramModel::Exponential,
        VariogramModel::Gaussian,
    ];

    let mut best: Option<FittedVariogram> = None;
    for &model in &models {
        if let Ok(fitted) = fit_variogram(empirical, model) {
            let better = match &best {
                Some(b) => fitted.rss < b.rss,
                None => true,
            };
            if better {
                best = Some(fitted);
            }
        }
    }

    best.ok_or_else(|| Error::Algorithm("could not fit any variogram model".into()))
}
