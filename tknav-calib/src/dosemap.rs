//! Dose-map table parsing.
//!
//! A dose map is a plain-text matrix of floating-point values: one row
//! per eta ring, one column per longitudinal layer, whitespace
//! delimited. Units are Mrad per fb^-1.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;

use crate::error::{Error, Result};

/// Reads a dose map into an `[eta ring][layer]` table.
///
/// Blank lines are skipped. Row and column order of the file are
/// preserved exactly.
///
/// # Errors
/// Fails when the file cannot be opened, a token does not parse as a
/// number, rows have inconsistent column counts, or the file holds no
/// rows; all of these abort model construction.
pub fn read_dose_map<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::OpenDoseMap {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| Error::MalformedDoseMap {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("invalid number `{token}`"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::MalformedDoseMap {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("expected {} columns, found {}", first.len(), row.len()),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(Error::EmptyDoseMap(path.to_path_buf()));
    }

    let shape = (rows.len(), rows[0].len());
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec(shape, flat).map_err(|e| Error::Config(e.to_string()))
}
