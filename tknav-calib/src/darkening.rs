//! The scintillator darkening model.
//!
//! Ingredients:
//! 1) dose maps (Mrad/fb^-1) per center-of-mass energy
//! 2) decay constant D as a function of dose rate d: D(d) = A * d^B
//! 3) per-year instantaneous and integrated luminosity

use std::collections::BTreeMap;

use log::debug;
use ndarray::Array2;

use crate::config::DarkeningConfig;
use crate::dosemap::read_dose_map;
use crate::error::{Error, Result};

/// One year of the luminosity schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct LumiYear {
    year: String,
    int_lumi: f64,
    lumi_rate: f64,
    energy: u32,
    sum_lumi: f64,
}

impl LumiYear {
    /// Creates a schedule entry; the cumulative luminosity is filled in
    /// by the model at construction.
    #[must_use]
    pub fn new(year: impl Into<String>, int_lumi: f64, lumi_rate: f64, energy: u32) -> Self {
        Self {
            year: year.into(),
            int_lumi,
            lumi_rate,
            energy,
            sum_lumi: 0.0,
        }
    }

    /// Year label.
    #[inline]
    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Integrated luminosity delivered in this year (fb^-1).
    #[inline]
    #[must_use]
    pub fn int_lumi(&self) -> f64 {
        self.int_lumi
    }

    /// Instantaneous luminosity (fb^-1/hr).
    #[inline]
    #[must_use]
    pub fn lumi_rate(&self) -> f64 {
        self.lumi_rate
    }

    /// Center-of-mass energy key for the dose map.
    #[inline]
    #[must_use]
    pub fn energy(&self) -> u32 {
        self.energy
    }

    /// Cumulative integrated luminosity through this year.
    #[inline]
    #[must_use]
    pub fn sum_lumi(&self) -> f64 {
        self.sum_lumi
    }
}

/// Scintillator darkening model: signal degradation as a function of
/// accumulated luminosity and detector position.
///
/// Immutable after construction; queries are pure lookups.
#[derive(Debug, Clone)]
pub struct DarkeningModel {
    ieta_shift: i32,
    drd_a: f64,
    drd_b: f64,
    dose_maps: BTreeMap<u32, Array2<f64>>,
    years: Vec<LumiYear>,
}

impl DarkeningModel {
    /// Builds a model from its ingredients. Years are sorted by label
    /// and their cumulative luminosities accumulated.
    ///
    /// # Errors
    /// Fails when the schedule is empty.
    pub fn new(
        ieta_shift: i32,
        drd_a: f64,
        drd_b: f64,
        dose_maps: BTreeMap<u32, Array2<f64>>,
        mut years: Vec<LumiYear>,
    ) -> Result<Self> {
        if years.is_empty() {
            return Err(Error::Config("empty luminosity schedule".into()));
        }
        years.sort_by(|a, b| a.year.cmp(&b.year));
        let mut sum = 0.0;
        for year in &mut years {
            sum += year.int_lumi;
            year.sum_lumi = sum;
        }
        Ok(Self {
            ieta_shift,
            drd_a,
            drd_b,
            dose_maps,
            years,
        })
    }

    /// Loads dose maps from disk and builds the model from a parsed
    /// configuration block.
    ///
    /// # Errors
    /// Fails on any malformed dose-map file or an empty schedule.
    pub fn from_config(config: &DarkeningConfig) -> Result<Self> {
        let mut dose_maps = BTreeMap::new();
        for entry in &config.dose_maps {
            let map = read_dose_map(&entry.path)?;
            debug!(
                "dose map for {} TeV: {} eta rings x {} layers",
                entry.energy,
                map.nrows(),
                map.ncols()
            );
            dose_maps.insert(entry.energy, map);
        }
        let years = config
            .years
            .iter()
            .map(|y| LumiYear::new(y.year.clone(), y.intlumi, y.lumirate, y.energy))
            .collect();
        Self::new(config.ieta_shift, config.drd_a, config.drd_b, dose_maps, years)
    }

    /// The luminosity schedule, sorted, with cumulative sums filled.
    #[must_use]
    pub fn years(&self) -> &[LumiYear] {
        &self.years
    }

    /// Signal degradation factor in `[0, 1]` after `int_lumi` fb^-1 at
    /// the given eta ring and longitudinal layer.
    ///
    /// The factor is the product of the per-year exponential losses up
    /// to the year in which `int_lumi` is reached.
    ///
    /// # Errors
    /// Fails when `int_lumi` exceeds the configured schedule.
    pub fn degradation(&self, int_lumi: f64, ieta: i32, layer: usize) -> Result<f64> {
        let last = self.year_for_lumi(int_lumi)?;
        let mut response = 1.0;
        for year in &self.years[..=last] {
            response *= self.degradation_year(year, int_lumi, ieta, layer);
        }
        Ok(response)
    }

    /// Dose (Mrad/fb^-1) at a detector position for one beam energy.
    /// Positions without damage information get dose zero.
    fn dose(&self, ieta: i32, layer: usize, energy: u32) -> f64 {
        let Some(map) = self.dose_maps.get(&energy) else {
            return 0.0;
        };
        let Ok(row) = usize::try_from(ieta - self.ieta_shift) else {
            return 0.0;
        };
        if row >= map.nrows() || layer >= map.ncols() {
            return 0.0;
        }
        map[(row, layer)]
    }

    /// Index of the first year whose cumulative luminosity reaches
    /// `int_lumi`.
    fn year_for_lumi(&self, int_lumi: f64) -> Result<usize> {
        let index = self.years.partition_point(|y| y.sum_lumi < int_lumi);
        if index == self.years.len() {
            return Err(Error::LumiOutOfSchedule(int_lumi));
        }
        Ok(index)
    }

    /// Exponential loss accumulated within one year. The last year of a
    /// query only counts the luminosity actually delivered in it.
    fn degradation_year(&self, year: &LumiYear, int_lumi: f64, ieta: i32, layer: usize) -> f64 {
        let dose = self.dose(ieta, layer, year.energy);
        if dose == 0.0 {
            return 1.0;
        }
        let decay_const = self.drd_a * (dose * year.lumi_rate).powf(self.drd_b);
        let lumi = if int_lumi < year.sum_lumi {
            int_lumi - (year.sum_lumi - year.int_lumi)
        } else {
            year.int_lumi
        };
        (-(lumi * dose) / decay_const).exp()
    }
}
