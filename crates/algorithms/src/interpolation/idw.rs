//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates the value at a query coordinate as a weighted average of the
//! nearest sample points, with weights inversely proportional to distance
//! raised to a power parameter.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use geokrig_core::{Error, Model, Prediction, Result, SampleSet};

/// Parameters for IDW interpolation
#[derive(Debug, Clone, Copy)]
pub struct IdwParams {
    /// Power parameter (default: 2.0).
    /// Higher values give more weight to nearby points.
    pub power: f64,
    /// Maximum number of nearest samples used per estimate (default: 16).
    pub max_neighbors: usize,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            max_neighbors: 16,
        }
    }
}

/// A fitted IDW model.
///
/// Fitting stores the samples and parameters; all computation happens at
/// predict time.
#[derive(Debug)]
pub struct IdwModel<'a> {
    samples: &'a SampleSet,
    power: f64,
    max_neighbors: usize,
}

/// Fit an IDW model on a sample set.
///
/// # Errors
/// [`Error::Validation`] if the set is empty, `power` is not positive,
/// or `max_neighbors` is zero.
pub fn fit(samples: &SampleSet, params: IdwParams) -> Result<IdwModel<'_>> {
    if samples.is_empty() {
        return Err(Error::validation(
            "samples",
            0,
            "cannot fit on an empty sample set",
        ));
    }
    if !(params.power > 0.0) {
        return Err(Error::validation(
            "power",
            params.power,
            "must be positive",
        ));
    }
    if params.max_neighbors < 1 {
        return Err(Error::validation(
            "max_neighbors",
            params.max_neighbors,
            "must be at least 1",
        ));
    }

    Ok(IdwModel {
        samples,
        power: params.power,
        max_neighbors: params.max_neighbors,
    })
}

impl IdwModel<'_> {
    /// The power exponent the model was fit with.
    pub fn power(&self) -> f64 {
        self.power
    }

    /// The neighbor cap the model was fit with.
    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }
}

impl Model for IdwModel<'_> {
    /// Estimate the value at `query`.
    ///
    /// # Algorithm
    ///
    /// ```text
    /// z(q) = Σ(wᵢ · zᵢ) / Σ(wᵢ)    with  wᵢ = 1 / d(q, xᵢ)^p
    /// ```
    ///
    /// over the `max_neighbors` nearest samples. The sort is stable, so
    /// equidistant samples are taken in insertion order. A query that
    /// coincides exactly with a sample returns that sample's value.
    fn predict(&self, query: &[f64]) -> Result<Prediction> {
        self.samples.check_query(query)?;

        let mut neighbors: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, pt)| (pt.dist_sq(query), i))
            .collect();

        neighbors.sort_by(|a, b| {
            a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(self.max_neighbors);

        // Exact coordinate hit: return the sample value directly.
        if neighbors[0].0 == 0.0 {
            let idx = neighbors[0].1;
            return Ok(Prediction {
                value: self.samples.points()[idx].value,
                coords: query.to_vec(),
            });
        }

        let mut sum_w = 0.0;
        let mut sum_wz = 0.0;
        for &(d_sq, idx) in &neighbors {
            let w = 1.0 / d_sq.sqrt().powf(self.power);
            sum_w += w;
            sum_wz += w * self.samples.points()[idx].value;
        }

        Ok(Prediction {
            value: sum_wz / sum_w,
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

#[cfg(test)]
mod tests {
    use super::*;
    use geokrig_core::SamplePoint;

    fn corner_samples() -> SampleSet {
        SampleSet::new(vec![
            SamplePoint::xy(0.0, 0.0, 10.0),
            SamplePoint::xy(10.0, 0.0, 20.0),
            SamplePoint::xy(0.0, 10.0, 30.0),
            SamplePoint::xy(10.0, 10.0, 40.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_midpoint_of_two_points() {
        // samples {(0,0)→10, (10,0)→20}, query (5,0), power 1:
        // w = 1/5 each → (10/5 + 20/5) / (2/5) = 15.0
        let samples = SampleSet::new(vec![
            SamplePoint::xy(0.0, 0.0, 10.0),
            SamplePoint::xy(10.0, 0.0, 20.0),
        ])
        .unwrap();
        let model = fit(
            &samples,
            IdwParams {
                power: 1.0,
                max_neighbors: 2,
            },
        )
        .unwrap();

        let p = model.predict(&[5.0, 0.0]).unwrap();
        assert!((p.value - 15.0).abs() < 1e-12, "got {}", p.value);
    }

    #[test]
    fn test_exact_match_returns_sample_value() {
        let samples = corner_samples();
        let model = fit(&samples, IdwParams::default()).unwrap();

        for pt in &samples {
            let p = model.predict(&pt.coords).unwrap();
            assert_eq!(p.value, pt.value, "at {:?}", pt.coords);
        }
    }

    #[test]
    fn test_prediction_within_neighborhood_range() {
        let samples = corner_samples();
        let model = fit(&samples, IdwParams::default()).unwrap();

        for qx in 0..=10 {
            for qy in 0..=10 {
                let p = model.predict(&[qx as f64, qy as f64]).unwrap();
                assert!(
                    (10.0..=40.0).contains(&p.value),
                    "weighted average must not extrapolate: {} at ({}, {})",
                    p.value,
                    qx,
                    qy
                );
            }
        }
    }

    #[test]
    fn test_center_is_average() {
        let samples = corner_samples();
        let model = fit(&samples, IdwParams::default()).unwrap();

        // Equidistant from all four corners
        let p = model.predict(&[5.0, 5.0]).unwrap();
        assert!((p.value - 25.0).abs() < 1e-9, "got {}", p.value);
    }

    #[test]
    fn test_power_increases_nearest_influence() {
        // Query closer to the value-10 sample; higher power must pull the
        // estimate toward 10.
        let samples = SampleSet::new(vec![
            SamplePoint::xy(0.0, 0.0, 10.0),
            SamplePoint::xy(10.0, 0.0, 20.0),
        ])
        .unwrap();

        let mut last = f64::MAX;
        for power in [1.0, 2.0, 4.0, 8.0] {
            let model = fit(
                &samples,
                IdwParams {
                    power,
                    max_neighbors: 2,
                },
            )
            .unwrap();
            let v = model.predict(&[2.0, 0.0]).unwrap().value;
            assert!(
                v < last,
                "power {} should pull estimate toward nearest: {} !< {}",
                power,
                v,
                last
            );
            last = v;
        }
    }

    #[test]
    fn test_tie_broken_by_insertion_order() {
        // Two samples exactly equidistant from the query; cap of 1 keeps
        // the earlier-inserted one.
        let samples = SampleSet::new(vec![
            SamplePoint::xy(-1.0, 0.0, 100.0),
            SamplePoint::xy(1.0, 0.0, 200.0),
        ])
        .unwrap();
        let model = fit(
            &samples,
            IdwParams {
                power: 2.0,
                max_neighbors: 1,
            },
        )
        .unwrap();

        let p = model.predict(&[0.0, 0.0]).unwrap();
        assert_eq!(p.value, 100.0);
    }

    #[test]
    fn test_single_point_degenerate() {
        let samples = SampleSet::new(vec![SamplePoint::xy(5.0, 5.0, 42.0)]).unwrap();
        let model = fit(
            &samples,
            IdwParams {
                power: 2.0,
                max_neighbors: 1,
            },
        )
        .unwrap();

        for q in [[0.0, 0.0], [100.0, -3.0], [5.0, 6.0]] {
            let p = model.predict(&q).unwrap();
            assert_eq!(p.value, 42.0, "single sample dominates at {:?}", q);
        }
    }

    #[test]
    fn test_covariate_distance() {
        // 3-D coordinates: nearest in (x, y, elevation) space wins
        let samples = SampleSet::new(vec![
            SamplePoint::new(vec![0.0, 0.0, 0.0], 1.0),
            SamplePoint::new(vec![0.0, 0.0, 100.0], 9.0),
        ])
        .unwrap();
        let model = fit(
            &samples,
            IdwParams {
                power: 2.0,
                max_neighbors: 1,
            },
        )
        .unwrap();

        let p = model.predict(&[0.0, 1.0, 99.0]).unwrap();
        assert_eq!(p.value, 9.0);
    }

    #[test]
    fn test_fit_rejects_bad_parameters() {
        let samples = corner_samples();

        assert!(fit(
            &samples,
            IdwParams {
                power: 0.0,
                max_neighbors: 4
            }
        )
        .is_err());
        assert!(fit(
            &samples,
            IdwParams {
                power: -1.0,
                max_neighbors: 4
            }
        )
        .is_err());
        assert!(fit(
            &samples,
            IdwParams {
                power: 2.0,
                max_neighbors: 0
            }
        )
        .is_err());

        let empty = SampleSet::new(Vec::new()).unwrap();
        assert!(fit(&empty, IdwParams::default()).is_err());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let samples = corner_samples();
        let model = fit(&samples, IdwParams::default()).unwrap();
        assert!(matches!(
            model.predict(&[1.0, 2.0, 3.0]),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_deterministic() {
        let samples = corner_samples();
        let model = fit(&samples, IdwParams::default()).unwrap();
        let a = model.predict(&[3.3, 7.1]).unwrap();
        let b = model.predict(&[3.3, 7.1]).unwrap();
        assert_eq!(a, b);
    }
}
