//! Plain-text point file reader.
//!
//! Reads scattered samples from whitespace- or comma-separated text.
//! Each data row is one sample: coordinate columns first, measured value
//! last. Lines starting with `#` are comments; a single leading header
//! row of column names is tolerated and skipped.
//!
//! ```text
//! # meuse lead concentrations
//! x,y,lead
//! 181072,333611,299
//! 181025,333558,277
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::sample::{SamplePoint, SampleSet};

/// Read a validated [`SampleSet`] from a point file.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<SampleSet> {
    let file = File::open(path)?;
    parse_points(BufReader::new(file))
}

/// Parse point rows from any buffered reader.
///
/// # Errors
/// - [`Error::Parse`] on malformed rows (fewer than 3 columns, or a
///   non-numeric token past the optional header)
/// - the [`SampleSet`] construction errors (duplicates, mixed
///   dimensionality) for rows that parse but violate set invariants
pub fn parse_points<R: BufRead>(reader: R) -> Result<SampleSet> {
    let mut points = Vec::new();
    let mut header_skipped = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = split_row(trimmed);
        if fields.len() < 3 {
            return Err(Error::Parse {
                line: line_no,
                message: format!(
                    "expected at least 3 columns (x, y, value), got {}",
                    fields.len()
                ),
            });
        }

        let mut numbers = Vec::with_capacity(fields.len());
        let mut bad_token = None;
        for f in &fields {
            match f.parse::<f64>() {
                Ok(v) => numbers.push(v),
                Err(_) => {
                    bad_token = Some(*f);
                    break;
                }
            }
        }

        if let Some(token) = bad_token {
            // One non-numeric row before any data is a header; anything
            // later is an error.
            if !header_skipped && points.is_empty() {
                header_skipped = true;
                continue;
            }
            return Err(Error::Parse {
                line: line_no,
                message: format!("could not parse '{token}' as a number"),
            });
        }

        let value = numbers[numbers.len() - 1];
        numbers.truncate(numbers.len() - 1);
        points.push(SamplePoint::new(numbers, value));
    }

    SampleSet::new(points)
}

/// Split a data row on commas if present, otherwise on whitespace.
fn split_row(row: &str) -> Vec<&str> {
    if row.contains(',') {
        row.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    } else {
        row.split_whitespace().collect()
    }
}
