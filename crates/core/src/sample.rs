//! Sample data model: labeled points and validated point collections.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A labeled sample: coordinates plus a scalar measurement.
///
/// Coordinates are k-dimensional (k ≥ 2). The first two dimensions are
/// conventionally (x, y); further dimensions carry auxiliary covariates
/// such as elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Coordinate tuple, identical length for every point in a set
    pub coords: Vec<f64>,
    /// Measured value at the coordinates
    pub value: f64,
}

impl SamplePoint {
    pub fn new(coords: Vec<f64>, value: f64) -> Self {
        Self { coords, value }
    }

    /// Convenience constructor for plain (x, y) samples.
    pub fn xy(x: f64, y: f64, value: f64) -> Self {
        Self {
            coords: vec![x, y],
            value,
        }
    }

    /// Coordinate dimensionality of this point.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Squared Euclidean distance to a query coordinate.
    ///
    /// Assumes `query` has the same dimensionality; extra dimensions on
    /// either side are not silently truncated (callers validate first).
    #[inline]
    pub fn dist_sq(&self, query: &[f64]) -> f64 {
        debug_assert_eq!(self.coords.len(), query.len());
        self.coords
            .iter()
            .zip(query.iter())
            .map(|(a, b)| {
                let d = a - b;
                d * d
            })
            .sum()
    }

    /// Euclidean distance to a query coordinate.
    #[inline]
    pub fn dist(&self, query: &[f64]) -> f64 {
        self.dist_sq(query).sqrt()
    }
}

/// An estimate produced at a query coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Estimated value
    pub value: f64,
    /// The query coordinates the estimate was produced at
    pub coords: Vec<f64>,
}

/// An ordered, validated collection of sample points.
///
/// Construction enforces the invariants every estimator relies on:
/// - all points share one coordinate dimensionality k, with k ≥ 2,
/// - no two points share the same coordinate tuple.
///
/// An empty set is constructible (fitting rejects it); the original
/// insertion order is preserved and is observable through neighbor
/// tie-breaking in the estimators.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    points: Vec<SamplePoint>,
    dim: usize,
}

impl SampleSet {
    /// Build a sample set, validating dimensionality and uniqueness.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if points disagree on dimensionality
    /// - [`Error::Validation`] if k < 2 or two points share coordinates
    pub fn new(points: Vec<SamplePoint>) -> Result<Self> {
        let dim = match points.first() {
            Some(p) => p.dim(),
            None => return Ok(Self { points, dim: 0 }),
        };

        if dim < 2 {
            return Err(Error::validation(
                "coords",
                dim,
                "coordinates need at least 2 dimensions",
            ));
        }

        for p in &points {
            if p.dim() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: p.dim(),
                });
            }
        }

        // Duplicate coordinate tuples: sort an index permutation
        // lexicographically and compare adjacent entries.
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            lex_cmp(&points[a].coords, &points[b].coords)
        });
        for pair in order.windows(2) {
            let (a, b) = (&points[pair[0]], &points[pair[1]]);
            if a.coords == b.coords {
                return Err(Error::validation(
                    "points",
                    format_coords(&a.coords),
                    "duplicate coordinates; deduplicate before building a SampleSet",
                ));
            }
        }

        Ok(Self { points, dim })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Coordinate dimensionality k (0 for an empty set).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Samples in insertion order.
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Iterate over samples in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SamplePoint> {
        self.points.iter()
    }

    /// Sample at index `i`.
    pub fn get(&self, i: usize) -> Option<&SamplePoint> {
        self.points.get(i)
    }

    /// Measured values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Check a query coordinate against this set's dimensionality.
    pub fn check_query(&self, query: &[f64]) -> Result<()> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                found: query.len(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a SamplePoint;
    type IntoIter = std::slice::Iter<'a, SamplePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn lex_cmp(a: &[f64], b: &[f64]) -> std::cmp::Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.partial_cmp(y) {
            Some(std::cmp::Ordering::Equal) | None => continue,
            Some(ord) => return ord,
        }
    }
    std::cmp::Ordering::Equal
}

fn format_coords(coords: &[f64]) -> String {
    let parts: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
    format!("({})", parts.join(", "))
}
