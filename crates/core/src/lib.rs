//! # GeoKrig Core
//!
//! Core types and I/O for the GeoKrig spatial interpolation library.
//!
//! This crate provides:
//! - `SamplePoint` / `SampleSet`: validated scattered sample data
//! - `Prediction`: an estimate at a query coordinate
//! - `Model`: the prediction contract every fitted estimator satisfies
//! - I/O for plain-text point files

pub mod error;
pub mod io;
pub mod sample;

pub use error::{Error, Result};
pub use sample::{Prediction, SamplePoint, SampleSet};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::sample::{Prediction, SamplePoint, SampleSet};
    pub use crate::Model;
}

/// A fitted estimator that can predict values at query coordinates.
///
/// Fitted models are immutable: they borrow the sample set they were fit
/// on and never mutate it. `predict` is deterministic — identical inputs
/// always yield identical output.
pub trait Model {
    /// Estimate the value at a query coordinate.
    ///
    /// # Errors
    /// [`Error::DimensionMismatch`] if `query` does not match the
    /// dimensionality of the samples the model was fit on.
    fn predict(&self, query: &[f64]) -> Result<Prediction>;

    /// Number of samples the model was fit on.
    fn n_samples(&self) -> usize;

    /// Coordinate dimensionality the model expects.
    fn dim(&self) -> usize;
}
