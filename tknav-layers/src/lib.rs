//! tknav-layers: Barrel-layer navigation.
//!
//! This crate implements the layer search used during track finding:
//! - **Bin finder** - O(1) phi-to-element lookup with circular wrap
//! - **Crossing** - helix/cylinder intersection per sub-layer
//! - **Neighbor search** - bounded bidirectional phi expansion
//! - **Merging** - ordering the two sub-layer results along the track
//!
#![warn(missing_docs)]

mod adder;
mod barrel;
mod binfinder;
mod crossing;
mod group;
mod layer;
mod navigation;
mod rod;
mod tilted;

pub use adder::add_compatible_det;
pub use barrel::BarrelLayer;
pub use binfinder::PeriodicBinFinder;
pub use crossing::{HelixBarrelCylinderCrossing, SubLayerCrossing, SubLayerCrossings, SubLayerId};
pub use group::{crossing_side, order_and_merge_two_levels, DetGroup, DetGroupElement};
pub use layer::GeometricSearchLayer;
pub use navigation::{
    grouped_compatible_dets_batch, LocalWindowEstimator, StraightLinePropagator,
};
pub use rod::{DetRing, DetRod};
pub use tilted::TiltedBarrelLayer;

// Re-export the construction error types
pub use tknav_core::{Error, Result};
