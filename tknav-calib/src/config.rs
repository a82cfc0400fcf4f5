//! Darkening model configuration.
//!
//! The parameter block mirrors the framework configuration the model is
//! driven by: a luminosity schedule, the dose-rate power law, the eta
//! indexing shift and one dose-map file per beam energy.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One year of the configured luminosity schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumiYearConfig {
    /// Year label; the schedule is sorted by it.
    pub year: String,
    /// Integrated luminosity of the year (fb^-1).
    pub intlumi: f64,
    /// Instantaneous luminosity (fb^-1/hr).
    pub lumirate: f64,
    /// Center-of-mass energy key (TeV).
    pub energy: u32,
}

/// A dose-map file registered for one beam energy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseMapEntry {
    /// Center-of-mass energy key (TeV).
    pub energy: u32,
    /// Path of the whitespace-delimited dose table.
    pub path: PathBuf,
}

/// Full parameter block of the darkening model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DarkeningConfig {
    /// Offset between physics eta ring numbering and dose-map rows.
    pub ieta_shift: i32,
    /// Dose-rate power law constant A in D(d) = A * d^B.
    pub drd_a: f64,
    /// Dose-rate power law exponent B in D(d) = A * d^B.
    pub drd_b: f64,
    /// Luminosity schedule.
    pub years: Vec<LumiYearConfig>,
    /// Dose maps per beam energy.
    pub dose_maps: Vec<DoseMapEntry>,
}

impl DarkeningConfig {
    /// Reads a configuration block from a JSON file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or does not parse.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_from_json() {
        let json = r#"{
            "ieta_shift": 16,
            "drd_a": 30.0,
            "drd_b": -0.2,
            "years": [
                {"year": "2030", "intlumi": 30.0, "lumirate": 4.0e-3, "energy": 13}
            ],
            "dose_maps": [
                {"energy": 13, "path": "doses_13tev.txt"}
            ]
        }"#;
        let config: DarkeningConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.ieta_shift, 16);
        assert_eq!(config.years.len(), 1);
        assert_eq!(config.years[0].year, "2030");
        assert_eq!(config.dose_maps[0].energy, 13);
    }
}
