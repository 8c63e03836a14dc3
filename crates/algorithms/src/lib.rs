//! # GeoKrig Algorithms
//!
//! Spatial interpolation and accuracy assessment for scattered samples.
//!
//! ## Available modules
//!
//! - **interpolation**: IDW, thin plate spline, ordinary kriging (with
//!   empirical variogram computation and model fitting)
//! - **validation**: seeded holdout / k-fold partitioning and accuracy
//!   reports (R², RMSE, MAE)
//! - **surface**: evaluation of a fitted model over a regular grid

pub mod interpolation;
pub mod surface;
pub mod validation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{
        idw, kriging, tps, FitStrategy, FittedModel, IdwParams, KrigingParams, TpsParams,
    };
    pub use crate::interpolation::variogram::{
        empirical_variogram, fit_best_variogram, fit_variogram, EmpiricalVariogram,
        FittedVariogram, VariogramModel, VariogramParams,
    };
    pub use crate::surface::{predict_surface, to_ascii_grid, GridSpec};
    pub use crate::validation::{
        cross_validate, evaluate, k_fold_split, split, AccuracyReport,
    };
    pub use geokrig_core::prelude::*;
}
