//! tknav-core: Geometric primitives and collaborator traits for tracker
//! layer navigation.
//!
//! This crate provides the foundational abstractions shared by the layer
//! search code: global/local points and vectors, circular angle
//! arithmetic, bounded surfaces, detector units, trajectory states and
//! the propagator/estimator collaborator contracts.
//!

pub mod det;
pub mod error;
pub mod phi;
pub mod point;
pub mod range;
pub mod surface;
pub mod trajectory;

pub use det::{DetUnit, SearchDet};
pub use error::{Error, Result};
pub use phi::{Phi, TWO_PI};
pub use point::{GlobalPoint, GlobalVector, LocalPoint, LocalVector};
pub use range::PhiRange;
pub use surface::{BoundCylinder, BoundDisk, BoundPlane, RectBounds};
pub use trajectory::{Estimator, PropagationDirection, Propagator, TrajectoryState};
