//! Spatial interpolation strategies
//!
//! Estimate values at unmeasured coordinates from scattered samples:
//! - IDW: Inverse Distance Weighting
//! - TPS: Thin Plate Spline
//! - Ordinary Kriging: BLUE geostatistical interpolation
//! - Variogram: empirical variogram computation and model fitting
//!
//! Every strategy produces a fitted model satisfying the same
//! [`Model`] prediction contract; [`FitStrategy`] selects one at fit
//! time.

pub mod idw;
pub mod kriging;
mod linalg;
pub mod tps;
pub mod variogram;

pub use idw::{IdwModel, IdwParams};
pub use kriging::{KrigingModel, KrigingParams};
pub use tps::{TpsModel, TpsParams};
pub use variogram::{
    empirical_variogram, fit_best_variogram, fit_variogram, EmpiricalVariogram, FittedVariogram,
    VariogramModel, VariogramParams,
};

use geokrig_core::{Model, Prediction, Result, SampleSet};
use rayon::prelude::*;

/// Interpolation strategy selected at fit time.
#[derive(Debug, Clone)]
pub enum FitStrategy {
    Idw(IdwParams),
    Tps(TpsParams),
    OrdinaryKriging(KrigingParams),
}

impl FitStrategy {
    /// Fit the selected strategy on a sample set.
    pub fn fit<'a>(&self, samples: &'a SampleSet) -> Result<FittedModel<'a>> {
        match self {
            FitStrategy::Idw(params) => Ok(FittedModel::Idw(idw::fit(samples, *params)?)),
            FitStrategy::Tps(params) => Ok(FittedModel::Tps(tps::fit(samples, *params)?)),
            FitStrategy::OrdinaryKriging(params) => Ok(FittedModel::OrdinaryKriging(
                kriging::fit(samples, params.clone())?,
            )),
        }
    }

    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            FitStrategy::Idw(_) => "idw",
            FitStrategy::Tps(_) => "tps",
            FitStrategy::OrdinaryKriging(_) => "ordinary-kriging",
        }
    }
}

/// A model fitted through [`FitStrategy`].
#[derive(Debug)]
pub enum FittedModel<'a> {
    Idw(IdwModel<'a>),
    Tps(TpsModel<'a>),
    OrdinaryKriging(KrigingModel<'a>),
}

impl Model for FittedModel<'_> {
    fn predict(&self, query: &[f64]) -> Result<Prediction> {
        match self {
            FittedModel::Idw(m) => m.predict(query),
            FittedModel::Tps(m) => m.predict(query),
            FittedModel::OrdinaryKriging(m) => m.predict(query),
        }
    }

    fn n_samples(&self) -> usize {
        match self {
            FittedModel::Idw(m) => m.n_samples(),
            FittedModel::Tps(m) => m.n_samples(),
            FittedModel::OrdinaryKriging(m) => m.n_samples(),
        }
    }

    fn dim(&self) -> usize {
        match self {
            FittedModel::Idw(m) => m.dim(),
            FittedModel::Tps(m) => m.dim(),
            FittedModel::OrdinaryKriging(m) => m.dim(),
        }
    }
}

/// Predict at many query coordinates in parallel.
///
/// Queries are independent, so this is a straight parallel map; the
/// result order matches the query order.
pub fn predict_batch<M>(model: &M, queries: &[Vec<f64>]) -> Result<Vec<Prediction>>
where
    M: Model + Sync,
{
    queries
        .par_iter()
        .map(|q| model.predict(q))
        .collect()
}
