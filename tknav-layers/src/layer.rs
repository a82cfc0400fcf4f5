//! The layer search interface.

use std::sync::Arc;

use tknav_core::{DetUnit, Estimator, Propagator, TrajectoryState};

use crate::group::DetGroup;

/// A detector layer navigable by the track finder.
///
/// Queries are read-only over immutable geometry, so implementations
/// may be shared across threads and queried concurrently.
pub trait GeometricSearchLayer: Send + Sync {
    /// Flattened list of all leaf modules of the layer.
    fn basic_components(&self) -> &[Arc<DetUnit>];

    /// The detector groups compatible with `state`, ordered along the
    /// trajectory. An empty result is a valid outcome, not an error.
    fn grouped_compatible_dets(
        &self,
        state: &TrajectoryState,
        propagator: &dyn Propagator,
        estimator: &dyn Estimator,
    ) -> Vec<DetGroup>;
}
