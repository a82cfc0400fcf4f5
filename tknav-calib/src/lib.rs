//! tknav-calib: Scintillator radiation-darkening calibration.
//!
//! Maps accumulated luminosity and detector position (eta ring,
//! longitudinal layer) to a signal-degradation factor, combining
//! per-energy dose-map tables with a per-year luminosity schedule and a
//! power-law dose-rate model.
//!

pub mod config;
pub mod darkening;
pub mod dosemap;
pub mod error;

pub use config::{DarkeningConfig, DoseMapEntry, LumiYearConfig};
pub use darkening::{DarkeningModel, LumiYear};
pub use dosemap::read_dose_map;
pub use error::{Error, Result};
