//! Periodic phi bin finder.

use tknav_core::{Phi, TWO_PI};

/// O(1) phi-to-bin lookup over a circle divided into uniform bins.
///
/// Bin 0 is centered on the phi of the first element of a sub-layer;
/// the step covers the full circle, and integer indices wrap in both
/// directions so the finder can drive a circular neighbor walk.
#[derive(Debug, Clone)]
pub struct PeriodicBinFinder {
    nbins: usize,
    step: f64,
    offset: f64,
}

impl PeriodicBinFinder {
    /// Creates a finder for `nbins` bins with bin 0 centered on
    /// `first_phi`. `nbins` must be non-zero; sub-layer construction
    /// guarantees it.
    #[must_use]
    pub fn new(first_phi: Phi, nbins: usize) -> Self {
        let step = TWO_PI / nbins as f64;
        Self {
            nbins,
            step,
            offset: first_phi.radians() - 0.5 * step,
        }
    }

    /// Number of bins.
    #[inline]
    #[must_use]
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Angular width of one bin.
    #[inline]
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Bin index containing `phi`.
    #[must_use]
    pub fn bin_index(&self, phi: Phi) -> usize {
        let shifted = (phi.radians() - self.offset).rem_euclid(TWO_PI);
        let index = (shifted / self.step) as usize;
        // float edge at exactly one full turn wraps to bin 0
        if index >= self.nbins {
            0
        } else {
            index
        }
    }

    /// Wraps any integer index into `[0, nbins)`.
    #[must_use]
    pub fn bin_index_wrapped(&self, index: isize) -> usize {
        index.rem_euclid(self.nbins as isize) as usize
    }

    /// Reference phi at the center of bin `index`, defined for
    /// out-of-range indices as well.
    #[must_use]
    pub fn bin_position(&self, index: isize) -> Phi {
        Phi::new(self.offset + self.step * (index as f64 + 0.5))
    }
}
