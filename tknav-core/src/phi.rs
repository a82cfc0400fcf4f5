//! Circular angle arithmetic.
//!
//! Azimuthal angles live on a circle, so plain float comparison and
//! subtraction are wrong near the +-pi seam. [`Phi`] keeps every angle
//! normalized and defines the difference and ordering operations the
//! layer search relies on.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full turn in radians.
pub const TWO_PI: f64 = 2.0 * PI;

/// An azimuthal angle normalized to `(-pi, pi]`.
///
/// Linear comparison of raw radians is meaningless on a circle; use
/// [`Phi::is_less`] and [`Phi::delta`] instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Phi(f64);

impl Phi {
    /// Creates a normalized angle from raw radians.
    #[must_use]
    pub fn new(radians: f64) -> Self {
        Self(normalize(radians))
    }

    /// Returns the angle in radians, in `(-pi, pi]`.
    #[inline]
    #[must_use]
    pub fn radians(self) -> f64 {
        self.0
    }

    /// Returns the angle wrapped into `[0, 2pi)`.
    #[inline]
    #[must_use]
    pub fn positive(self) -> f64 {
        if self.0 < 0.0 {
            self.0 + TWO_PI
        } else {
            self.0
        }
    }

    /// Signed minimal angular difference `self - other`, in `[-pi, pi)`.
    #[must_use]
    pub fn delta(self, other: Phi) -> f64 {
        normalize_delta(self.0 - other.0)
    }

    /// Circular ordering: `self` lies within the half turn behind `other`.
    ///
    /// This is the phi-ordering comparator used to sign-correct angular
    /// distances and to test circular range intersection.
    #[must_use]
    pub fn is_less(self, other: Phi) -> bool {
        self.delta(other) < 0.0
    }
}

impl From<f64> for Phi {
    fn from(radians: f64) -> Self {
        Self::new(radians)
    }
}

/// Wraps raw radians into `(-pi, pi]`.
fn normalize(radians: f64) -> f64 {
    let r = radians.rem_euclid(TWO_PI);
    if r > PI {
        r - TWO_PI
    } else {
        r
    }
}

/// Wraps an angle difference into `[-pi, pi)`.
fn normalize_delta(diff: f64) -> f64 {
    (diff + PI).rem_euclid(TWO_PI) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalization() {
        assert_relative_eq!(Phi::new(0.0).radians(), 0.0);
        assert_relative_eq!(Phi::new(TWO_PI + 0.5).radians(), 0.5);
        assert_relative_eq!(Phi::new(-0.5).radians(), -0.5);
        assert_relative_eq!(Phi::new(3.0 * PI).radians(), PI);
    }

    #[test]
    fn test_positive_wrap() {
        assert_relative_eq!(Phi::new(-0.5).positive(), TWO_PI - 0.5);
        assert_relative_eq!(Phi::new(1.0).positive(), 1.0);
    }

    #[test]
    fn test_delta_across_seam() {
        let a = Phi::new(PI - 0.1);
        let b = Phi::new(-PI + 0.1);
        assert_relative_eq!(b.delta(a), 0.2, epsilon = 1e-12);
        assert_relative_eq!(a.delta(b), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_ordering() {
        let a = Phi::new(0.1);
        let b = Phi::new(0.3);
        assert!(a.is_less(b));
        assert!(!b.is_less(a));

        // ordering wraps: just below the seam precedes just above it
        let c = Phi::new(PI - 0.05);
        let d = Phi::new(-PI + 0.05);
        assert!(c.is_less(d));
        assert!(!d.is_less(c));
    }
}
