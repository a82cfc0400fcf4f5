//! Points and vectors in the global and local detector frames.
//!
//! The global frame is the detector frame: z along the beam axis, phi
//! the azimuth in the transverse plane. Local frames belong to a
//! [`crate::surface::BoundPlane`]; mixing the two is a type error.

use nalgebra::{Point3, Vector3};
use std::ops::{Add, Mul, Neg, Sub};

use crate::phi::Phi;

/// A point in the global detector frame (cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalPoint(Point3<f64>);

impl GlobalPoint {
    /// Creates a point from global cartesian coordinates.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Point3::new(x, y, z))
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Transverse radius sqrt(x^2 + y^2).
    #[must_use]
    pub fn perp(&self) -> f64 {
        self.0.x.hypot(self.0.y)
    }

    /// Azimuthal angle in the transverse plane.
    #[must_use]
    pub fn phi(&self) -> Phi {
        Phi::new(self.0.y.atan2(self.0.x))
    }

    /// Pseudorapidity -ln tan(theta/2).
    #[must_use]
    pub fn eta(&self) -> f64 {
        (self.0.z / self.perp()).asinh()
    }

    #[inline]
    pub(crate) fn inner(&self) -> &Point3<f64> {
        &self.0
    }

    pub(crate) fn from_inner(p: Point3<f64>) -> Self {
        Self(p)
    }
}

impl Sub for GlobalPoint {
    type Output = GlobalVector;

    fn sub(self, rhs: Self) -> GlobalVector {
        GlobalVector(self.0 - rhs.0)
    }
}

impl Add<GlobalVector> for GlobalPoint {
    type Output = GlobalPoint;

    fn add(self, rhs: GlobalVector) -> GlobalPoint {
        GlobalPoint(self.0 + rhs.0)
    }
}

/// A displacement or momentum vector in the global frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalVector(Vector3<f64>);

impl GlobalVector {
    /// Creates a vector from global cartesian components.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Transverse component magnitude.
    #[must_use]
    pub fn perp(&self) -> f64 {
        self.0.x.hypot(self.0.y)
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    /// Azimuthal angle of the transverse component.
    #[must_use]
    pub fn phi(&self) -> Phi {
        Phi::new(self.0.y.atan2(self.0.x))
    }

    /// Scalar product.
    #[must_use]
    pub fn dot(&self, other: &GlobalVector) -> f64 {
        self.0.dot(&other.0)
    }

    /// Unit vector in the same direction.
    #[must_use]
    pub fn normalized(&self) -> GlobalVector {
        GlobalVector(self.0.normalize())
    }

    #[inline]
    pub(crate) fn inner(&self) -> &Vector3<f64> {
        &self.0
    }

    pub(crate) fn from_inner(v: Vector3<f64>) -> Self {
        Self(v)
    }
}

impl Mul<f64> for GlobalVector {
    type Output = GlobalVector;

    fn mul(self, rhs: f64) -> GlobalVector {
        GlobalVector(self.0 * rhs)
    }
}

impl Neg for GlobalVector {
    type Output = GlobalVector;

    fn neg(self) -> GlobalVector {
        GlobalVector(-self.0)
    }
}

/// A point in a surface-local frame (cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint(Point3<f64>);

impl LocalPoint {
    /// Creates a point from local cartesian coordinates.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Point3::new(x, y, z))
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    #[inline]
    pub(crate) fn inner(&self) -> &Point3<f64> {
        &self.0
    }

    pub(crate) fn from_inner(p: Point3<f64>) -> Self {
        Self(p)
    }
}

impl Add<LocalVector> for LocalPoint {
    type Output = LocalPoint;

    fn add(self, rhs: LocalVector) -> LocalPoint {
        LocalPoint(self.0 + rhs.0)
    }
}

/// A displacement vector in a surface-local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVector(Vector3<f64>);

impl LocalVector {
    /// Creates a vector from local cartesian components.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.0.z
    }
}

impl Neg for LocalVector {
    type Output = LocalVector;

    fn neg(self) -> LocalVector {
        LocalVector(-self.0)
    }
}
