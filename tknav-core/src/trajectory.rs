//! Trajectory states and the propagator/estimator collaborator contracts.

use crate::det::DetUnit;
use crate::point::{GlobalPoint, GlobalVector, LocalPoint, LocalVector};
use crate::surface::BoundPlane;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of propagation relative to the track momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropagationDirection {
    /// Forward along the momentum vector.
    AlongMomentum,
    /// Backward against the momentum vector.
    OppositeToMomentum,
    /// Whichever solution is closest.
    AnyDirection,
}

/// Kinematic state of a track candidate at a point.
///
/// The transverse curvature is signed; its magnitude is the inverse
/// bending radius in the transverse plane, zero for a straight track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryState {
    position: GlobalPoint,
    momentum: GlobalVector,
    curvature: f64,
}

impl TrajectoryState {
    /// Creates a state from position, momentum and signed transverse
    /// curvature.
    #[must_use]
    pub fn new(position: GlobalPoint, momentum: GlobalVector, curvature: f64) -> Self {
        Self {
            position,
            momentum,
            curvature,
        }
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> GlobalPoint {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn momentum(&self) -> GlobalVector {
        self.momentum
    }

    /// Signed transverse curvature (1/cm).
    #[inline]
    #[must_use]
    pub fn transverse_curvature(&self) -> f64 {
        self.curvature
    }

    /// The state position expressed in a plane-local frame.
    #[must_use]
    pub fn local_position(&self, plane: &BoundPlane) -> LocalPoint {
        plane.to_local(self.position)
    }
}

/// Propagates trajectory states onto target surfaces.
///
/// Propagation may legitimately find no solution; that is reported as
/// `None`, not as an error.
pub trait Propagator: Send + Sync {
    /// The direction this propagator works in.
    fn direction(&self) -> PropagationDirection;

    /// Propagates `state` onto `plane`, or `None` when no valid
    /// solution exists.
    fn propagate(&self, state: &TrajectoryState, plane: &BoundPlane) -> Option<TrajectoryState>;
}

/// Judges the compatibility of propagated states with detector units
/// and bounds the search window around a trajectory.
pub trait Estimator: Send + Sync {
    /// Maximal local displacement of the trajectory on `plane`,
    /// used to size the phi search window.
    fn maximal_local_displacement(
        &self,
        state: &TrajectoryState,
        plane: &BoundPlane,
    ) -> LocalVector;

    /// Whether a state propagated onto `det`'s plane is compatible
    /// with the unit.
    fn is_compatible(&self, state: &TrajectoryState, det: &DetUnit) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RectBounds;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_position() {
        let plane = BoundPlane::barrel(GlobalPoint::new(25.0, 0.0, 0.0), RectBounds::new(5.0, 10.0));
        let state = TrajectoryState::new(
            GlobalPoint::new(25.0, 1.5, 3.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        let lp = state.local_position(&plane);
        // tangential local x at phi = 0 is global +y, local y is global z
        assert_relative_eq!(lp.x(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(lp.y(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(lp.z(), 0.0, epsilon = 1e-12);
    }
}
