//! Tilted barrel layer: a barrel extended with tilted rings.

use std::sync::Arc;

use log::trace;

use tknav_core::{DetUnit, Estimator, GlobalPoint, Propagator, Result, SearchDet, TrajectoryState};

use crate::barrel::BarrelLayer;
use crate::crossing::SubLayerId;
use crate::group::DetGroup;
use crate::layer::GeometricSearchLayer;
use crate::rod::{DetRing, DetRod};

/// A barrel layer whose coverage is extended on both ends by rings of
/// modules tilted relative to the barrel axis.
///
/// The rings contribute their modules to the layer's flattened
/// component list and bounds; navigation queries run over the two rod
/// sub-layers. The layer owns every aggregate passed to it.
pub struct TiltedBarrelLayer {
    barrel: BarrelLayer,
    negative_rings: Vec<DetRing>,
    positive_rings: Vec<DetRing>,
    basic_components: Vec<Arc<DetUnit>>,
}

impl TiltedBarrelLayer {
    /// Builds the layer from inner/outer rods and the rings on the
    /// negative- and positive-z sides.
    ///
    /// # Errors
    /// Returns an error when either rod collection is empty.
    pub fn new(
        inner_rods: Vec<DetRod>,
        outer_rods: Vec<DetRod>,
        negative_rings: Vec<DetRing>,
        positive_rings: Vec<DetRing>,
    ) -> Result<Self> {
        let barrel = BarrelLayer::new(inner_rods, outer_rods)?;

        // flattened union: inner rods, outer rods, negative rings,
        // positive rings, built once and immutable
        let mut basic_components = barrel.basic_components().to_vec();
        for ring in negative_rings.iter().chain(positive_rings.iter()) {
            basic_components.extend(ring.components().iter().cloned());
        }

        for ring in &negative_rings {
            trace_element("negative ring", ring.position());
        }
        for rod in barrel
            .rods(SubLayerId::Inner)
            .iter()
            .chain(barrel.rods(SubLayerId::Outer).iter())
        {
            trace_element("rod", rod.position());
        }
        for ring in &positive_rings {
            trace_element("positive ring", ring.position());
        }

        Ok(Self {
            barrel,
            negative_rings,
            positive_rings,
            basic_components,
        })
    }

    /// The underlying pure-barrel layer.
    #[must_use]
    pub fn barrel(&self) -> &BarrelLayer {
        &self.barrel
    }

    /// Rings on the negative-z side.
    #[must_use]
    pub fn negative_rings(&self) -> &[DetRing] {
        &self.negative_rings
    }

    /// Rings on the positive-z side.
    #[must_use]
    pub fn positive_rings(&self) -> &[DetRing] {
        &self.positive_rings
    }
}

fn trace_element(kind: &str, position: GlobalPoint) {
    trace!(
        "{kind} pos z,perp,eta,phi: {} , {} , {} , {}",
        position.z(),
        position.perp(),
        position.eta(),
        position.phi().radians()
    );
}

impl GeometricSearchLayer for TiltedBarrelLayer {
    fn basic_components(&self) -> &[Arc<DetUnit>] {
        &self.basic_components
    }

    fn grouped_compatible_dets(
        &self,
        state: &TrajectoryState,
        propagator: &dyn Propagator,
        estimator: &dyn Estimator,
    ) -> Vec<DetGroup> {
        self.barrel.grouped_compatible_dets(state, propagator, estimator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tknav_core::{BoundPlane, RectBounds};

    fn rod_at(radius: f64, phi: f64) -> DetRod {
        let position = GlobalPoint::new(radius * phi.cos(), radius * phi.sin(), 0.0);
        let unit = Arc::new(DetUnit::new(BoundPlane::barrel(
            position,
            RectBounds::new(2.0, 10.0),
        )));
        DetRod::new(vec![unit]).unwrap()
    }

    fn ring_at(z: f64, tilt: f64, n: usize) -> DetRing {
        let units = (0..n)
            .map(|i| {
                let phi = i as f64 * tknav_core::TWO_PI / n as f64;
                let position = GlobalPoint::new(24.0 * phi.cos(), 24.0 * phi.sin(), z);
                Arc::new(DetUnit::new(BoundPlane::tilted(
                    position,
                    tilt,
                    RectBounds::new(2.0, 5.0),
                )))
            })
            .collect();
        DetRing::new(units).unwrap()
    }

    fn rods(radius: f64, n: usize, phi0: f64) -> Vec<DetRod> {
        (0..n)
            .map(|i| rod_at(radius, phi0 + i as f64 * tknav_core::TWO_PI / n as f64))
            .collect()
    }

    #[test]
    fn test_components_flattened_in_order() {
        let layer = TiltedBarrelLayer::new(
            rods(23.0, 12, 0.0),
            rods(25.0, 12, 0.1),
            vec![ring_at(-110.0, 0.8, 10)],
            vec![ring_at(110.0, 0.8, 10)],
        )
        .expect("valid layer");

        // 12 + 12 rod units, then 10 + 10 ring units
        assert_eq!(layer.basic_components().len(), 44);
        let rod_units = layer.barrel().basic_components();
        for (a, b) in layer.basic_components().iter().zip(rod_units.iter()) {
            assert!(Arc::ptr_eq(a, b));
        }
        let neg_unit = &layer.basic_components()[24];
        assert!(Arc::ptr_eq(neg_unit, &layer.negative_rings()[0].components()[0]));
    }

    #[test]
    fn test_queries_delegate_to_barrel() {
        use crate::navigation::{LocalWindowEstimator, StraightLinePropagator};
        use tknav_core::{GlobalVector, PropagationDirection};

        let layer = TiltedBarrelLayer::new(
            rods(23.0, 12, 0.0),
            rods(25.0, 12, 0.1),
            vec![ring_at(-110.0, 0.8, 10)],
            vec![ring_at(110.0, 0.8, 10)],
        )
        .expect("valid layer");

        let state = TrajectoryState::new(
            GlobalPoint::new(0.0, 0.0, 0.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        let propagator = StraightLinePropagator::new(PropagationDirection::AlongMomentum);
        let estimator = LocalWindowEstimator::new(1.0, 1.0);

        let from_tilted = layer.grouped_compatible_dets(&state, &propagator, &estimator);
        let from_barrel = layer
            .barrel()
            .grouped_compatible_dets(&state, &propagator, &estimator);
        assert_eq!(from_tilted.len(), from_barrel.len());
        for (a, b) in from_tilted.iter().zip(from_barrel.iter()) {
            assert_eq!(a.len(), b.len());
            assert_eq!(a.index(), b.index());
        }
    }
}
