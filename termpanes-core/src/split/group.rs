//! Data model for split groups and the overall layout state
//!
//! A split group is an ordered run of panes sharing one axis and one
//! ratio array. The layout state is a flat map of groups — splits are
//! never nested. The `parent_group_id` field is reserved for a possible
//! recursive-tiling extension and is never set by any operation.

use std::collections::HashMap;

use super::types::{GroupId, PaneId, SplitDirection};

/// Absolute tolerance for the ratio-sum invariant.
///
/// After every committed mutation (split, close, reset, reconcile) the
/// ratios of a group sum to 1 within this tolerance. Mid-drag clamping
/// may drift slightly further; the next renormalizing mutation restores
/// the invariant.
pub const RATIO_SUM_TOLERANCE: f64 = 1e-9;

/// An ordered collection of panes sharing one axis.
///
/// Invariants (upheld by [`SplitGroupStore`](super::SplitGroupStore)):
/// - `ratios.len() == pane_ids.len()`
/// - `ratios` sum to 1 within [`RATIO_SUM_TOLERANCE`] after committed mutations
/// - a group with fewer than two panes does not exist (it is dissolved)
/// - a pane id belongs to at most one group
#[derive(Debug, Clone, PartialEq)]
pub struct SplitGroup {
    /// Unique identifier for this group.
    pub id: GroupId,
    /// Panes in layout order (left-to-right or top-to-bottom).
    pub pane_ids: Vec<PaneId>,
    /// Axis along which the panes are arranged.
    pub direction: SplitDirection,
    /// Fractional share of available space per pane, same order as `pane_ids`.
    pub ratios: Vec<f64>,
    /// Reserved for recursive tiling; never set by any current operation.
    pub parent_group_id: Option<GroupId>,
}

impl SplitGroup {
    /// Creates a two-pane group with an even split.
    #[must_use]
    pub fn new(direction: SplitDirection, first: PaneId, second: PaneId) -> Self {
        Self {
            id: GroupId::new(),
            pane_ids: vec![first, second],
            direction,
            ratios: vec![0.5, 0.5],
            parent_group_id: None,
        }
    }

    /// Returns the number of panes in the group.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.pane_ids.len()
    }

    /// Returns the number of sashes rendered between adjacent panes.
    #[must_use]
    pub fn sash_count(&self) -> usize {
        self.pane_ids.len().saturating_sub(1)
    }

    /// Returns the position of a pane within the group.
    #[must_use]
    pub fn index_of(&self, pane_id: PaneId) -> Option<usize> {
        self.pane_ids.iter().position(|&id| id == pane_id)
    }

    /// Returns true if the group contains the given pane.
    #[must_use]
    pub fn contains(&self, pane_id: PaneId) -> bool {
        self.pane_ids.contains(&pane_id)
    }
}

/// The authoritative layout state owned by the store.
///
/// Created empty or loaded from storage at engine start, mutated only
/// through [`SplitGroupStore`](super::SplitGroupStore) operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutState {
    /// All split groups, keyed by group id.
    pub groups: HashMap<GroupId, SplitGroup>,
    /// The group the user last interacted with, if any.
    pub active_group_id: Option<GroupId>,
    /// The pane that currently holds focus, if any.
    pub focused_pane_id: Option<PaneId>,
}

impl LayoutState {
    /// Creates an empty layout state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no groups are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the id of the group containing the given pane, if any.
    #[must_use]
    pub fn group_of_pane(&self, pane_id: PaneId) -> Option<GroupId> {
        self.groups
            .values()
            .find(|g| g.contains(pane_id))
            .map(|g| g.id)
    }

    /// Returns the group the active-group pointer resolves to, if any.
    #[must_use]
    pub fn active_group(&self) -> Option<&SplitGroup> {
        self.active_group_id.and_then(|id| self.groups.get(&id))
    }
}
