//! Detector groups and two-level result merging.

use std::sync::Arc;

use tknav_core::{DetUnit, PropagationDirection, TrajectoryState};

use crate::crossing::SubLayerId;

/// A detector unit paired with the trajectory state propagated onto it.
#[derive(Debug, Clone)]
pub struct DetGroupElement {
    det: Arc<DetUnit>,
    state: TrajectoryState,
}

impl DetGroupElement {
    /// Creates an element from a unit and its propagated state.
    #[must_use]
    pub fn new(det: Arc<DetUnit>, state: TrajectoryState) -> Self {
        Self { det, state }
    }

    /// The detector unit.
    #[inline]
    #[must_use]
    pub fn det(&self) -> &Arc<DetUnit> {
        &self.det
    }

    /// The state propagated onto the unit's plane.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &TrajectoryState {
        &self.state
    }
}

/// An ordered group of compatible detector units at one navigation step.
///
/// `index` is the group's position among all groups of the layer along
/// the trajectory and `index_size` the total count; both are maintained
/// by the merge step.
#[derive(Debug, Clone, Default)]
pub struct DetGroup {
    elements: Vec<DetGroupElement>,
    index: usize,
    index_size: usize,
}

impl DetGroup {
    /// Creates an empty group at the given index.
    #[must_use]
    pub fn new(index: usize, index_size: usize) -> Self {
        Self {
            elements: Vec::new(),
            index,
            index_size,
        }
    }

    /// The elements of the group, in the order they were added.
    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[DetGroupElement] {
        &self.elements
    }

    /// Appends an element.
    pub fn push(&mut self, element: DetGroupElement) {
        self.elements.push(element);
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the group holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of the group along the trajectory.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total number of group positions on the layer.
    #[inline]
    #[must_use]
    pub fn index_size(&self) -> usize {
        self.index_size
    }

    /// Sets the total number of group positions.
    pub fn set_index_size(&mut self, size: usize) {
        self.index_size = size;
    }

    /// Shifts the group to a later position, growing the total
    /// accordingly; used when merging two levels.
    pub fn increment_index(&mut self, increment: usize) {
        self.index += increment;
        self.index_size += increment;
    }
}

/// Which sub-layer a track leaving `state` crosses first, given the
/// propagation direction.
#[must_use]
pub fn crossing_side(state: &TrajectoryState, direction: PropagationDirection) -> SubLayerId {
    let position = state.position();
    let momentum = state.momentum();
    let outward = position.x() * momentum.x() + position.y() * momentum.y() > 0.0;
    match direction {
        PropagationDirection::OppositeToMomentum => {
            if outward {
                SubLayerId::Outer
            } else {
                SubLayerId::Inner
            }
        }
        _ => {
            if outward {
                SubLayerId::Inner
            } else {
                SubLayerId::Outer
            }
        }
    }
}

/// Merges the group lists of the two sub-layers into one list ordered
/// along the trajectory.
///
/// `first_index` names the sub-layer that produced `one`; `first_crossed`
/// the sub-layer the track geometrically meets first. The first-crossed
/// level keeps its indices, the other level is offset past it. A single
/// empty input only re-indexes the survivor.
#[must_use]
pub fn order_and_merge_two_levels(
    one: Vec<DetGroup>,
    two: Vec<DetGroup>,
    first_index: SubLayerId,
    first_crossed: SubLayerId,
) -> Vec<DetGroup> {
    if one.is_empty() && two.is_empty() {
        return Vec::new();
    }
    if one.is_empty() {
        let mut result = two;
        if first_index == first_crossed {
            increment_and_double_size(&mut result);
        } else {
            double_index_size(&mut result);
        }
        result
    } else if two.is_empty() {
        let mut result = one;
        if first_index == first_crossed {
            double_index_size(&mut result);
        } else {
            increment_and_double_size(&mut result);
        }
        result
    } else if first_index == first_crossed {
        merge_two_levels(one, two)
    } else {
        merge_two_levels(two, one)
    }
}

/// Concatenates two levels, `first` crossed first, re-indexing every
/// group into the combined index space.
fn merge_two_levels(first: Vec<DetGroup>, second: Vec<DetGroup>) -> Vec<DetGroup> {
    let size1 = first.first().map_or(0, DetGroup::index_size);
    let size2 = second.first().map_or(0, DetGroup::index_size);

    let mut result = Vec::with_capacity(first.len() + second.len());
    for mut group in first {
        group.set_index_size(size1 + size2);
        result.push(group);
    }
    for mut group in second {
        group.increment_index(size1);
        result.push(group);
    }
    result
}

/// The level kept its position but the other level exists behind it.
fn double_index_size(groups: &mut [DetGroup]) {
    for group in groups {
        group.set_index_size(group.index_size() * 2);
    }
}

/// The level moved past the (empty) first-crossed level.
fn increment_and_double_size(groups: &mut [DetGroup]) {
    for group in groups {
        let size = group.index_size();
        group.increment_index(size);
    }
}
