//! Reference collaborators and batch queries.
//!
//! The track-finding framework supplies its own propagators and
//! estimators; the implementations here are the simple reference ones
//! used by tests, demos and high-momentum studies.

use rayon::prelude::*;

use tknav_core::{
    BoundPlane, DetUnit, Estimator, LocalVector, PropagationDirection, Propagator,
    TrajectoryState,
};

use crate::group::DetGroup;
use crate::layer::GeometricSearchLayer;

/// Tolerance (cm) on the propagation path sign: a state already lying
/// on the target surface propagates onto it in either direction.
const PATH_SIGN_TOLERANCE: f64 = 1e-9;

/// Straight-line propagation onto planes, valid in the high-momentum
/// limit where the bending over one layer spacing is negligible.
#[derive(Debug, Clone, Copy)]
pub struct StraightLinePropagator {
    direction: PropagationDirection,
}

impl StraightLinePropagator {
    /// Creates a propagator working in the given direction.
    #[must_use]
    pub fn new(direction: PropagationDirection) -> Self {
        Self { direction }
    }
}

impl Propagator for StraightLinePropagator {
    fn direction(&self) -> PropagationDirection {
        self.direction
    }

    fn propagate(&self, state: &TrajectoryState, plane: &BoundPlane) -> Option<TrajectoryState> {
        if state.momentum().norm() == 0.0 {
            return None;
        }
        let direction = state.momentum().normalized();
        let normal = plane.normal();
        let denominator = direction.dot(&normal);
        if denominator.abs() < 1e-12 {
            return None;
        }
        let path = (plane.position() - state.position()).dot(&normal) / denominator;
        match self.direction {
            PropagationDirection::AlongMomentum if path < -PATH_SIGN_TOLERANCE => return None,
            PropagationDirection::OppositeToMomentum if path > PATH_SIGN_TOLERANCE => {
                return None
            }
            _ => {}
        }
        Some(TrajectoryState::new(
            state.position() + direction * path,
            state.momentum(),
            state.transverse_curvature(),
        ))
    }
}

/// Accepts units the propagated state hits within fixed local margins;
/// the same margins size the phi search window.
#[derive(Debug, Clone, Copy)]
pub struct LocalWindowEstimator {
    x_margin: f64,
    y_margin: f64,
}

impl LocalWindowEstimator {
    /// Creates an estimator with the given local x and y margins (cm).
    #[must_use]
    pub fn new(x_margin: f64, y_margin: f64) -> Self {
        Self { x_margin, y_margin }
    }
}

impl Estimator for LocalWindowEstimator {
    fn maximal_local_displacement(
        &self,
        _state: &TrajectoryState,
        _plane: &BoundPlane,
    ) -> LocalVector {
        LocalVector::new(self.x_margin, self.y_margin, 0.0)
    }

    fn is_compatible(&self, state: &TrajectoryState, det: &DetUnit) -> bool {
        let local = state.local_position(det.plane());
        local.x().abs() <= det.plane().bounds().half_x() + self.x_margin
            && local.y().abs() <= det.plane().bounds().half_y() + self.y_margin
    }
}

/// Runs navigation queries for many trajectory states in parallel.
///
/// Queries only read the immutable layer geometry, so fanning them out
/// over the rayon pool is sound.
pub fn grouped_compatible_dets_batch<L>(
    layer: &L,
    states: &[TrajectoryState],
    propagator: &dyn Propagator,
    estimator: &dyn Estimator,
) -> Vec<Vec<DetGroup>>
where
    L: GeometricSearchLayer + ?Sized,
{
    states
        .par_iter()
        .map(|state| layer.grouped_compatible_dets(state, propagator, estimator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tknav_core::{GlobalPoint, GlobalVector, RectBounds};

    fn plane_at_x(x: f64) -> BoundPlane {
        BoundPlane::barrel(GlobalPoint::new(x, 0.0, 0.0), RectBounds::new(5.0, 10.0))
    }

    #[test]
    fn test_straight_line_hits_plane() {
        let propagator = StraightLinePropagator::new(PropagationDirection::AlongMomentum);
        let state = TrajectoryState::new(
            GlobalPoint::new(0.0, 1.0, 2.0),
            GlobalVector::new(2.0, 0.0, 0.0),
            0.0,
        );
        let propagated = propagator.propagate(&state, &plane_at_x(25.0)).unwrap();
        assert_relative_eq!(propagated.position().x(), 25.0, epsilon = 1e-12);
        assert_relative_eq!(propagated.position().y(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(propagated.position().z(), 2.0, epsilon = 1e-12);
        // momentum is untouched
        assert_eq!(propagated.momentum(), state.momentum());
    }

    #[test]
    fn test_straight_line_respects_direction() {
        let state = TrajectoryState::new(
            GlobalPoint::new(50.0, 0.0, 0.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        let forward = StraightLinePropagator::new(PropagationDirection::AlongMomentum);
        assert!(forward.propagate(&state, &plane_at_x(25.0)).is_none());

        let backward = StraightLinePropagator::new(PropagationDirection::OppositeToMomentum);
        assert!(backward.propagate(&state, &plane_at_x(25.0)).is_some());

        let any = StraightLinePropagator::new(PropagationDirection::AnyDirection);
        assert!(any.propagate(&state, &plane_at_x(25.0)).is_some());
    }

    #[test]
    fn test_estimator_margins() {
        use std::sync::Arc;
        let det = Arc::new(DetUnit::new(plane_at_x(25.0)));
        let estimator = LocalWindowEstimator::new(1.0, 1.0);

        // local x on this plane is global y
        let on_edge = TrajectoryState::new(
            GlobalPoint::new(25.0, 5.5, 0.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        assert!(estimator.is_compatible(&on_edge, &det));

        let too_far = TrajectoryState::new(
            GlobalPoint::new(25.0, 6.5, 0.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        assert!(!estimator.is_compatible(&too_far, &det));
    }
}
