//! Calibration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for calibration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Calibration error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dose-map file could not be opened.
    #[error("cannot open dose map {}: {source}", path.display())]
    OpenDoseMap {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A dose-map file had a bad token or inconsistent row.
    #[error("malformed dose map {} at line {line}: {reason}", path.display())]
    MalformedDoseMap {
        /// Path of the offending file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// A dose-map file held no rows at all.
    #[error("empty dose map: {}", .0.display())]
    EmptyDoseMap(PathBuf),

    /// Queried luminosity lies beyond the configured schedule.
    #[error("integrated luminosity {0} beyond the configured schedule")]
    LumiOutOfSchedule(f64),

    /// Invalid model configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON configuration parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
