//! Detector units and searchable aggregates.

use std::sync::Arc;

use crate::point::GlobalPoint;
use crate::range::PhiRange;
use crate::surface::BoundPlane;

/// A leaf detector module: a bounded sensor plane.
///
/// Units are immutable after construction and shared between the
/// aggregates that reference them and the owning layer's flattened
/// component list via `Arc`.
#[derive(Debug, Clone)]
pub struct DetUnit {
    plane: BoundPlane,
    phi_span: PhiRange,
}

impl DetUnit {
    /// Creates a unit on the given plane; the phi span is cached.
    #[must_use]
    pub fn new(plane: BoundPlane) -> Self {
        let phi_span = plane.phi_span();
        Self { plane, phi_span }
    }

    #[inline]
    #[must_use]
    pub fn plane(&self) -> &BoundPlane {
        &self.plane
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> GlobalPoint {
        self.plane.position()
    }

    /// Azimuthal span of the sensor.
    #[inline]
    #[must_use]
    pub fn phi_span(&self) -> PhiRange {
        self.phi_span
    }
}

/// An aggregate of detector units searchable as one element of a
/// sub-layer: a barrel rod, a tilted ring.
pub trait SearchDet: Send + Sync {
    /// Reference position of the aggregate.
    fn position(&self) -> GlobalPoint;

    /// Azimuthal span covered by the aggregate's units.
    fn phi_span(&self) -> PhiRange;

    /// The leaf units this aggregate groups.
    fn components(&self) -> &[Arc<DetUnit>];
}
