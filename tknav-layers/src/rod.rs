//! Sub-layer aggregates: barrel rods and tilted rings.

use std::sync::Arc;

use tknav_core::{
    BoundDisk, DetUnit, Error, GlobalPoint, Phi, PhiRange, Result, SearchDet,
};

/// A rod of barrel modules at a common azimuth, stacked along z.
#[derive(Debug, Clone)]
pub struct DetRod {
    position: GlobalPoint,
    phi_span: PhiRange,
    components: Vec<Arc<DetUnit>>,
}

impl DetRod {
    /// Builds a rod owning its modules; position and phi span are
    /// precomputed from them.
    ///
    /// # Errors
    /// Returns an error when `components` is empty.
    pub fn new(components: Vec<Arc<DetUnit>>) -> Result<Self> {
        if components.is_empty() {
            return Err(Error::EmptyCollection("rod components"));
        }
        let position = mean_position(&components);
        let phi_span = phi_hull(&components, position.phi());
        Ok(Self {
            position,
            phi_span,
            components,
        })
    }
}

impl SearchDet for DetRod {
    fn position(&self) -> GlobalPoint {
        self.position
    }

    fn phi_span(&self) -> PhiRange {
        self.phi_span
    }

    fn components(&self) -> &[Arc<DetUnit>] {
        &self.components
    }
}

/// A ring of modules tilted out of the barrel plane, extending layer
/// coverage at high pseudorapidity.
#[derive(Debug, Clone)]
pub struct DetRing {
    position: GlobalPoint,
    disk: BoundDisk,
    phi_span: PhiRange,
    components: Vec<Arc<DetUnit>>,
}

impl DetRing {
    /// Builds a ring owning its modules; the bounding disk spans their
    /// radial extent at the mean z.
    ///
    /// # Errors
    /// Returns an error when `components` is empty.
    pub fn new(components: Vec<Arc<DetUnit>>) -> Result<Self> {
        if components.is_empty() {
            return Err(Error::EmptyCollection("ring components"));
        }
        let position = mean_position(&components);
        let mut r_min = f64::INFINITY;
        let mut r_max = f64::NEG_INFINITY;
        for unit in &components {
            let r = unit.position().perp();
            r_min = r_min.min(r);
            r_max = r_max.max(r);
        }
        let disk = BoundDisk::new(position.z(), r_min, r_max);
        let phi_span = phi_hull(&components, position.phi());
        Ok(Self {
            position,
            disk,
            phi_span,
            components,
        })
    }

    /// The ring's bounding disk.
    #[inline]
    #[must_use]
    pub fn disk(&self) -> &BoundDisk {
        &self.disk
    }
}

impl SearchDet for DetRing {
    fn position(&self) -> GlobalPoint {
        self.position
    }

    fn phi_span(&self) -> PhiRange {
        self.phi_span
    }

    fn components(&self) -> &[Arc<DetUnit>] {
        &self.components
    }
}

fn mean_position(units: &[Arc<DetUnit>]) -> GlobalPoint {
    let n = units.len() as f64;
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for unit in units {
        let p = unit.position();
        x += p.x();
        y += p.y();
        z += p.z();
    }
    GlobalPoint::new(x / n, y / n, z / n)
}

/// Circular hull of the unit spans around `reference`.
fn phi_hull(units: &[Arc<DetUnit>], reference: Phi) -> PhiRange {
    let mut lo = 0.0_f64;
    let mut hi = 0.0_f64;
    for unit in units {
        let span = unit.phi_span();
        lo = lo.min(span.min().delta(reference));
        hi = hi.max(span.max().delta(reference));
    }
    PhiRange::from_radians(reference.radians() + lo, reference.radians() + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tknav_core::{BoundPlane, RectBounds};

    fn barrel_unit(radius: f64, phi: f64, z: f64) -> Arc<DetUnit> {
        let position = GlobalPoint::new(radius * phi.cos(), radius * phi.sin(), z);
        Arc::new(DetUnit::new(BoundPlane::barrel(
            position,
            RectBounds::new(2.0, 5.0),
        )))
    }

    #[test]
    fn test_rod_position_and_span() {
        let rod = DetRod::new(vec![
            barrel_unit(25.0, 0.1, -5.0),
            barrel_unit(25.0, 0.1, 5.0),
        ])
        .unwrap();
        assert_relative_eq!(rod.position().phi().radians(), 0.1, epsilon = 1e-9);
        assert_relative_eq!(rod.position().z(), 0.0, epsilon = 1e-12);
        let span = rod.phi_span();
        assert!(span.min().is_less(Phi::new(0.1)));
        assert!(Phi::new(0.1).is_less(span.max()));
    }

    #[test]
    fn test_rod_requires_components() {
        assert!(DetRod::new(Vec::new()).is_err());
        assert!(DetRing::new(Vec::new()).is_err());
    }

    #[test]
    fn test_ring_disk_extent() {
        let ring = DetRing::new(vec![
            barrel_unit(23.0, 0.0, 100.0),
            barrel_unit(27.0, 1.0, 100.0),
        ])
        .unwrap();
        assert_relative_eq!(ring.disk().z(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(ring.disk().inner_radius(), 23.0, epsilon = 1e-12);
        assert_relative_eq!(ring.disk().outer_radius(), 27.0, epsilon = 1e-12);
    }
}
