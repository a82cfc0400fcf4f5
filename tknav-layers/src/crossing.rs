//! Helix-cylinder crossing computation.

use tknav_core::{BoundCylinder, GlobalPoint, GlobalVector, PropagationDirection, TWO_PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Below this curvature (1/cm) the arc over a layer spacing is flat and
/// the straight-line solution is used.
const STRAIGHT_LINE_CURVATURE: f64 = 1e-9;

/// Identifies one of the two concentric sub-layers of a barrel layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubLayerId {
    /// The inner shell.
    Inner,
    /// The outer shell.
    Outer,
}

/// Intersection of a helical trajectory with a barrel cylinder.
///
/// Recomputed per navigation query; the result is a pure function of
/// its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixBarrelCylinderCrossing {
    position: GlobalPoint,
    path_length: f64,
}

impl HelixBarrelCylinderCrossing {
    /// Solves the trajectory against the cylinder, honoring the
    /// propagation direction. `None` when no real solution exists in
    /// the requested direction.
    #[must_use]
    pub fn new(
        start: GlobalPoint,
        momentum: GlobalVector,
        curvature: f64,
        direction: PropagationDirection,
        cylinder: &BoundCylinder,
    ) -> Option<Self> {
        let pt = momentum.perp();
        if pt == 0.0 {
            return None;
        }
        let ux = momentum.x() / pt;
        let uy = momentum.y() / pt;
        let radius = cylinder.radius();

        let (s, x, y) = if curvature.abs() < STRAIGHT_LINE_CURVATURE {
            line_solution(&start, ux, uy, radius, direction)?
        } else {
            helix_solution(&start, ux, uy, curvature, radius, direction)?
        };

        let z = start.z() + s * momentum.z() / pt;
        Some(Self {
            position: GlobalPoint::new(x, y, z),
            path_length: s * momentum.norm() / pt,
        })
    }

    /// The crossing point.
    #[inline]
    #[must_use]
    pub fn position(&self) -> GlobalPoint {
        self.position
    }

    /// Signed path length along the trajectory to the crossing.
    #[inline]
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.path_length
    }
}

/// Straight-line intersection with the cylinder in the transverse
/// plane. Returns the transverse path length and the crossing x, y.
fn line_solution(
    start: &GlobalPoint,
    ux: f64,
    uy: f64,
    radius: f64,
    direction: PropagationDirection,
) -> Option<(f64, f64, f64)> {
    let b = start.x() * ux + start.y() * uy;
    let c = start.x() * start.x() + start.y() * start.y() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (s1, s2) = (-b - sq, -b + sq);

    let s = match direction {
        PropagationDirection::AlongMomentum => {
            if s1 >= 0.0 {
                s1
            } else if s2 >= 0.0 {
                s2
            } else {
                return None;
            }
        }
        PropagationDirection::OppositeToMomentum => {
            if s2 <= 0.0 {
                s2
            } else if s1 <= 0.0 {
                s1
            } else {
                return None;
            }
        }
        PropagationDirection::AnyDirection => {
            if s1.abs() <= s2.abs() {
                s1
            } else {
                s2
            }
        }
    };
    Some((s, start.x() + s * ux, start.y() + s * uy))
}

/// Circle-circle intersection between the transverse projection of the
/// helix and the cylinder, with the candidate chosen by direction.
fn helix_solution(
    start: &GlobalPoint,
    ux: f64,
    uy: f64,
    curvature: f64,
    radius: f64,
    direction: PropagationDirection,
) -> Option<(f64, f64, f64)> {
    // center of the bending circle: one signed bending radius along the
    // left normal of the direction of motion
    let r_bend = 1.0 / curvature;
    let cx = start.x() - r_bend * uy;
    let cy = start.y() + r_bend * ux;

    let d2 = cx * cx + cy * cy;
    let d = d2.sqrt();
    let r_abs = r_bend.abs();
    if d == 0.0 || d > radius + r_abs || d < (radius - r_abs).abs() {
        return None;
    }

    // foot of the chord joining the two intersection points
    let a = (d2 + r_abs * r_abs - radius * radius) / (2.0 * d);
    let h = (r_abs * r_abs - a * a).max(0.0).sqrt();
    let ex = -cx / d;
    let ey = -cy / d;
    let fx = cx + a * ex;
    let fy = cy + a * ey;
    let candidates = [(fx - h * ey, fy + h * ex), (fx + h * ey, fy - h * ex)];

    let period = TWO_PI / curvature.abs();
    let v0x = start.x() - cx;
    let v0y = start.y() - cy;

    let mut best: Option<(f64, f64, f64)> = None;
    for (x, y) in candidates {
        let v1x = x - cx;
        let v1y = y - cy;
        // rotation of the radius vector, signed like the curvature
        let alpha = (v0x * v1y - v0y * v1x).atan2(v0x * v1x + v0y * v1y);
        let s = alpha / curvature;
        let s = match direction {
            PropagationDirection::AlongMomentum => {
                // the transverse motion is periodic: a solution behind
                // the start is reached one turn later
                if s >= 0.0 {
                    s
                } else {
                    s + period
                }
            }
            PropagationDirection::OppositeToMomentum => {
                if s <= 0.0 {
                    s
                } else {
                    s - period
                }
            }
            PropagationDirection::AnyDirection => s,
        };
        if best.is_none_or(|(bs, _, _)| s.abs() < bs.abs()) {
            best = Some((s, x, y));
        }
    }
    best
}

/// A crossing of one sub-layer's bounding cylinder: the point, the
/// sub-layer it belongs to, and the index of the nearest element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubLayerCrossing {
    sub_layer: SubLayerId,
    closest_det_index: usize,
    position: GlobalPoint,
}

impl SubLayerCrossing {
    /// Creates a crossing record.
    #[must_use]
    pub fn new(sub_layer: SubLayerId, closest_det_index: usize, position: GlobalPoint) -> Self {
        Self {
            sub_layer,
            closest_det_index,
            position,
        }
    }

    /// The sub-layer this crossing belongs to.
    #[inline]
    #[must_use]
    pub fn sub_layer(&self) -> SubLayerId {
        self.sub_layer
    }

    /// Index of the sub-layer element nearest to the crossing point.
    #[inline]
    #[must_use]
    pub fn closest_det_index(&self) -> usize {
        self.closest_det_index
    }

    /// The crossing point.
    #[inline]
    #[must_use]
    pub fn position(&self) -> GlobalPoint {
        self.position
    }
}

/// The pair of sub-layer crossings of one navigation query, ordered by
/// angular proximity of each crossing to its nearest element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubLayerCrossings {
    closest: SubLayerCrossing,
    other: SubLayerCrossing,
    closest_index: SubLayerId,
}

impl SubLayerCrossings {
    /// Creates the pair; `closest_index` names the sub-layer of the
    /// closer crossing.
    #[must_use]
    pub fn new(closest: SubLayerCrossing, other: SubLayerCrossing, closest_index: SubLayerId) -> Self {
        Self {
            closest,
            other,
            closest_index,
        }
    }

    /// The crossing closer to its nearest element.
    #[inline]
    #[must_use]
    pub fn closest(&self) -> &SubLayerCrossing {
        &self.closest
    }

    /// The other sub-layer's crossing.
    #[inline]
    #[must_use]
    pub fn other(&self) -> &SubLayerCrossing {
        &self.other
    }

    /// Which sub-layer the closer crossing belongs to.
    #[inline]
    #[must_use]
    pub fn closest_index(&self) -> SubLayerId {
        self.closest_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cylinder(radius: f64) -> BoundCylinder {
        BoundCylinder::new(radius, -100.0, 100.0)
    }

    #[test]
    fn test_straight_line_forward() {
        let crossing = HelixBarrelCylinderCrossing::new(
            GlobalPoint::new(0.0, 0.0, 0.0),
            GlobalVector::new(2.0, 0.0, 1.0),
            0.0,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        )
        .unwrap();
        let p = crossing.position();
        assert_relative_eq!(p.x(), 25.0, epsilon = 1e-9);
        assert_relative_eq!(p.y(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.z(), 12.5, epsilon = 1e-9);
        assert!(crossing.path_length() > 25.0);
    }

    #[test]
    fn test_straight_line_misses_cylinder() {
        // line parallel to y at x = 30 never reaches r = 25
        let crossing = HelixBarrelCylinderCrossing::new(
            GlobalPoint::new(30.0, 0.0, 0.0),
            GlobalVector::new(0.0, 1.0, 0.0),
            0.0,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        );
        assert!(crossing.is_none());
    }

    #[test]
    fn test_direction_selects_solution() {
        let start = GlobalPoint::new(50.0, 0.0, 0.0);
        let momentum = GlobalVector::new(1.0, 0.0, 0.0);
        // both intersections lie behind the start
        assert!(HelixBarrelCylinderCrossing::new(
            start,
            momentum,
            0.0,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        )
        .is_none());

        let backward = HelixBarrelCylinderCrossing::new(
            start,
            momentum,
            0.0,
            PropagationDirection::OppositeToMomentum,
            &cylinder(25.0),
        )
        .unwrap();
        assert_relative_eq!(backward.position().x(), 25.0, epsilon = 1e-9);
        assert_relative_eq!(backward.path_length(), -25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_curved_crossing() {
        // bending radius 100 cm, curving toward +y
        let crossing = HelixBarrelCylinderCrossing::new(
            GlobalPoint::new(0.0, 0.0, 0.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.01,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        )
        .unwrap();
        let p = crossing.position();
        assert_relative_eq!(p.perp(), 25.0, epsilon = 1e-9);
        assert!(p.y() > 0.0);
        // the arc is slightly longer than the straight chord
        assert!(crossing.path_length() > 25.0);
    }

    #[test]
    fn test_curvature_too_strong_to_reach() {
        // bending radius 10 cm: maximal transverse reach is 20 cm
        let crossing = HelixBarrelCylinderCrossing::new(
            GlobalPoint::new(0.0, 0.0, 0.0),
            GlobalVector::new(1.0, 0.0, 0.0),
            0.1,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        );
        assert!(crossing.is_none());
    }

    #[test]
    fn test_idempotent_on_identical_inputs() {
        let start = GlobalPoint::new(1.0, 2.0, 3.0);
        let momentum = GlobalVector::new(1.0, 0.5, 0.2);
        let first = HelixBarrelCylinderCrossing::new(
            start,
            momentum,
            0.005,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        );
        let second = HelixBarrelCylinderCrossing::new(
            start,
            momentum,
            0.005,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_transverse_momentum() {
        let crossing = HelixBarrelCylinderCrossing::new(
            GlobalPoint::new(0.0, 0.0, 0.0),
            GlobalVector::new(0.0, 0.0, 1.0),
            0.0,
            PropagationDirection::AlongMomentum,
            &cylinder(25.0),
        );
        assert!(crossing.is_none());
    }
}
