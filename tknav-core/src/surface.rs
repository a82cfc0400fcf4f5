//! Bounded surfaces: planes, cylinders, disks.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::point::{GlobalPoint, GlobalVector, LocalPoint};
use crate::range::PhiRange;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rectangular half-widths of a detector plane (cm).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectBounds {
    half_x: f64,
    half_y: f64,
}

impl RectBounds {
    /// Creates bounds from half-widths along local x and y.
    #[must_use]
    pub fn new(half_x: f64, half_y: f64) -> Self {
        Self { half_x, half_y }
    }

    #[inline]
    #[must_use]
    pub fn half_x(&self) -> f64 {
        self.half_x
    }

    #[inline]
    #[must_use]
    pub fn half_y(&self) -> f64 {
        self.half_y
    }
}

/// An oriented, bounded detector plane.
///
/// The plane defines a local right-handed frame: its rotation maps local
/// coordinates to the global frame, with the local origin at `position`
/// and local z normal to the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundPlane {
    position: GlobalPoint,
    rotation: Rotation3<f64>,
    bounds: RectBounds,
}

impl BoundPlane {
    /// Creates a plane from a local frame given by its x and y axes.
    ///
    /// The axes are orthonormalized; the normal is their cross product.
    #[must_use]
    pub fn from_axes(
        position: GlobalPoint,
        x_axis: GlobalVector,
        y_axis: GlobalVector,
        bounds: RectBounds,
    ) -> Self {
        let x = x_axis.inner().normalize();
        let mut y = y_axis.inner() - x * y_axis.inner().dot(&x);
        y.normalize_mut();
        let z = x.cross(&y);
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
        Self {
            position,
            rotation,
            bounds,
        }
    }

    /// Creates a barrel-module plane: local x tangential (r-phi), local
    /// y along the beam axis, normal pointing radially outward.
    #[must_use]
    pub fn barrel(position: GlobalPoint, bounds: RectBounds) -> Self {
        let phi = position.phi().radians();
        let tangential = GlobalVector::new(-phi.sin(), phi.cos(), 0.0);
        let axial = GlobalVector::new(0.0, 0.0, 1.0);
        Self::from_axes(position, tangential, axial, bounds)
    }

    /// Creates a module plane tilted by `tilt` radians about the
    /// tangential axis, tipping the normal from radial toward the beam
    /// axis. `tilt = 0` reproduces [`BoundPlane::barrel`].
    #[must_use]
    pub fn tilted(position: GlobalPoint, tilt: f64, bounds: RectBounds) -> Self {
        let phi = position.phi().radians();
        let tangential = Vector3::new(-phi.sin(), phi.cos(), 0.0);
        let radial = Vector3::new(phi.cos(), phi.sin(), 0.0);
        let axial = Vector3::new(0.0, 0.0, 1.0);
        let normal = radial * tilt.cos() + axial * tilt.sin();
        let y = normal.cross(&tangential);
        let rotation =
            Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[tangential, y, normal]));
        Self {
            position,
            rotation,
            bounds,
        }
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> GlobalPoint {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn bounds(&self) -> &RectBounds {
        &self.bounds
    }

    /// Plane normal (local z) in the global frame.
    #[must_use]
    pub fn normal(&self) -> GlobalVector {
        GlobalVector::from_inner(self.rotation * Vector3::z())
    }

    /// Maps a local point into the global frame.
    #[must_use]
    pub fn to_global(&self, local: LocalPoint) -> GlobalPoint {
        GlobalPoint::from_inner(self.position.inner() + self.rotation * local.inner().coords)
    }

    /// Maps a global point into the plane-local frame.
    #[must_use]
    pub fn to_local(&self, global: GlobalPoint) -> LocalPoint {
        let d = global.inner() - self.position.inner();
        LocalPoint::from_inner((self.rotation.inverse() * d).into())
    }

    /// Azimuthal span of the plane, the circular hull of its corners.
    #[must_use]
    pub fn phi_span(&self) -> PhiRange {
        let reference = self.position.phi();
        let mut lo = 0.0_f64;
        let mut hi = 0.0_f64;
        for (sx, sy) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
            let corner = self.to_global(LocalPoint::new(
                sx * self.bounds.half_x,
                sy * self.bounds.half_y,
                0.0,
            ));
            let d = corner.phi().delta(reference);
            lo = lo.min(d);
            hi = hi.max(d);
        }
        PhiRange::from_radians(reference.radians() + lo, reference.radians() + hi)
    }
}

/// A cylinder coaxial with the beam axis, bounding a barrel sub-layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundCylinder {
    radius: f64,
    z_min: f64,
    z_max: f64,
}

impl BoundCylinder {
    /// Creates a cylinder from its radius and z extent.
    #[must_use]
    pub fn new(radius: f64, z_min: f64, z_max: f64) -> Self {
        Self {
            radius,
            z_min,
            z_max,
        }
    }

    #[inline]
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    #[must_use]
    pub fn z_min(&self) -> f64 {
        self.z_min
    }

    #[inline]
    #[must_use]
    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    /// Length of the cylinder along the beam axis.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.z_max - self.z_min
    }
}

/// An annular disk normal to the beam axis, bounding a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundDisk {
    z: f64,
    inner_radius: f64,
    outer_radius: f64,
}

impl BoundDisk {
    /// Creates a disk from its z position and radial extent.
    #[must_use]
    pub fn new(z: f64, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            z,
            inner_radius,
            outer_radius,
        }
    }

    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    #[inline]
    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }
}
