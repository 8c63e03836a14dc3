//! Regular-grid evaluation of fitted models.
//!
//! Turns a fitted model into a gridded surface: cell centers become
//! query coordinates, estimates become cell values. Rows are evaluated
//! in parallel; cells whose local prediction fails are NaN.

use ndarray::Array2;
use rayon::prelude::*;

use geokrig_core::{Error, Model, Result};

/// A regular 2-D grid: cell centers are the query coordinates.
///
/// Row 0 is the top edge (north-up orientation); cell (row, col) has its
/// center at
/// ```text
/// x = x_min + (col + 0.5) · cell_size
/// y = y_min + (rows − row − 0.5) · cell_size
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub x_min: f64,
    pub y_min: f64,
    pub cell_size: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridSpec {
    /// Build a grid spec, validating its extents.
    pub fn new(x_min: f64, y_min: f64, cell_size: f64, rows: usize, cols: usize) -> Result<Self> {
        if !(cell_size > 0.0) {
            return Err(Error::validation(
                "cell_size",
                cell_size,
                "must be positive",
            ));
        }
        if rows == 0 || cols == 0 {
            return Err(Error::validation(
                "rows/cols",
                format!("{rows}x{cols}"),
                "grid must have at least one cell",
            ));
        }
        Ok(Self {
            x_min,
            y_min,
            cell_size,
            rows,
            cols,
        })
    }

    /// Geographic center of cell (row, col).
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let x = self.x_min + (col as f64 + 0.5) * self.cell_size;
        let y = self.y_min + (self.rows as f64 - row as f64 - 0.5) * self.cell_size;
        (x, y)
    }

    /// Upper x extent.
    pub fn x_max(&self) -> f64 {
        self.x_min + self.cols as f64 * self.cell_size
    }

    /// Upper y extent.
    pub fn y_max(&self) -> f64 {
        self.y_min + self.rows as f64 * self.cell_size
    }
}

/// Evaluate a fitted model at every cell center of a grid.
///
/// Only valid for models fit on 2-D samples; the grid has no way to
/// supply covariate dimensions.
///
/// # Errors
/// [`Error::DimensionMismatch`] when the model expects more than two
/// coordinate dimensions.
pub fn predict_surface<M>(model: &M, grid: &GridSpec) -> Result<Array2<f64>>
where
    M: Model + Sync,
{
    if model.dim() != 2 {
        return Err(Error::DimensionMismatch {
            expected: model.dim(),
            found: 2,
        });
    }

    let data: Vec<f64> = (0..grid.rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; grid.cols];
            for (col, cell) in row_data.iter_mut().enumerate() {
                let (x, y) = grid.cell_center(row, col);
                if let Ok(p) = model.predict(&[x, y]) {
                    *cell = p.value;
                }
            }
            row_data
        })
        .collect();

    Array2::from_shape_vec((grid.rows, grid.cols), data)
        .map_err(|e| Error::Algorithm(e.to_string()))
}

/// Render a surface as an ESRI ASCII grid (NaN → nodata).
pub fn to_ascii_grid(surface: &Array2<f64>, grid: &GridSpec) -> String {
    const NODATA: f64 = -9999.0;

    let (rows, cols) = surface.dim();
    let mut out = String::new();
    out.push_str(&format!("ncols {cols}\n"));
    out.push_str(&format!("nrows {rows}\n"));
    out.push_str(&format!("xllcorner {}\n", grid.x_min));
    out.push_str(&format!("yllcorner {}\n", grid.y_min));
    out.push_str(&format!("cellsize {}\n", grid.cell_size));
    out.push_str(&format!("NODATA_value {NODATA}\n"));

    for row in 0..rows {
        let line: Vec<String> = (0..cols)
            .map(|col| {
                let v = surface[(row, col)];
                if v.is_nan() {
                    NODATA.to_string()
                } else {
                    format!("{v:.6}")
                }
            })
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }

    out
}
