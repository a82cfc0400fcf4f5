//! Compatible-detector adder.

use std::sync::Arc;

use tknav_core::{Estimator, Propagator, SearchDet, TrajectoryState};

use crate::group::{DetGroup, DetGroupElement};

/// Propagates `state` onto each unit of `det` and appends the
/// compatible ones to the currently open group, opening one if needed.
///
/// Returns false when no unit of the aggregate was compatible; the
/// neighbor walk uses that as its termination signal, relying on the
/// phi ordering of the sub-layer.
pub fn add_compatible_det<D, P, E>(
    det: &D,
    state: &TrajectoryState,
    propagator: &P,
    estimator: &E,
    result: &mut Vec<DetGroup>,
) -> bool
where
    D: SearchDet + ?Sized,
    P: Propagator + ?Sized,
    E: Estimator + ?Sized,
{
    let mut added = false;
    for unit in det.components() {
        let Some(propagated) = propagator.propagate(state, unit.plane()) else {
            continue;
        };
        if !estimator.is_compatible(&propagated, unit) {
            continue;
        }
        if result.is_empty() {
            result.push(DetGroup::new(0, 1));
        }
        if let Some(group) = result.last_mut() {
            group.push(DetGroupElement::new(Arc::clone(unit), propagated));
        }
        added = true;
    }
    added
}
