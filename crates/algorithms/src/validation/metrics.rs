//! Paired-series accuracy metrics.

use geokrig_core::{Error, Result};

fn check_pair(observed: &[f64], predicted: &[f64], required: usize) -> Result<()> {
    if observed.len() != predicted.len() {
        return Err(Error::validation(
            "predicted",
            predicted.len(),
            format!("length mismatch with observed ({})", observed.len()),
        ));
    }
    if observed.len() < required {
        return Err(Error::InsufficientData {
            required,
            actual: observed.len(),
        });
    }
    Ok(())
}

/// Squared Pearson correlation between observed and predicted values.
///
/// Clamped to [0, 1] against floating-point drift.
///
/// # Errors
/// - [`Error::InsufficientData`] with fewer than 2 pairs
/// - [`Error::Algorithm`] when either series is constant (the
///   correlation is undefined)
pub fn pearson_r2(observed: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(observed, predicted, 2)?;

    let n = observed.len() as f64;
    let mean_o = observed.iter().sum::<f64>() / n;
    let mean_p = predicted.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_o = 0.0;
    let mut var_p = 0.0;
    for (o, p) in observed.iter().zip(predicted.iter()) {
        let d_o = o - mean_o;
        let d_p = p - mean_p;
        cov += d_o * d_p;
        var_o += d_o * d_o;
        var_p += d_p * d_p;
    }

    if var_o == 0.0 || var_p == 0.0 {
        return Err(Error::Algorithm(
            "correlation undefined: constant observed or predicted values".into(),
        ));
    }

    let r = cov / (var_o * var_p).sqrt();
    Ok((r * r).clamp(0.0, 1.0))
}

/// Root mean squared error.
pub fn rmse(observed: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(observed, predicted, 1)?;

    let sum_sq: f64 = observed
        .iter()
        .zip(predicted.iter())
        .map(|(o, p)| {
            let d = o - p;
            d * d
        })
        .sum();
    Ok((sum_sq / observed.len() as f64).sqrt())
}

/// Mean absolute error.
pub fn mae(observed: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(observed, predicted, 1)?;

    let sum_abs: f64 = observed
        .iter()
        .zip(predicted.iter())
        .map(|(o, p)| (o - p).abs())
        .sum();
    Ok(sum_abs / observed.len() as f64)
}
