//! Split group store — the authoritative layout state machine
//!
//! The store exclusively owns the [`LayoutState`]: all mutation goes
//! through its operations so the ratio-sum and length invariants cannot
//! be violated from outside. Every committed mutation is synchronously
//! written through the injected persistence backend; storage failures
//! are logged and the store degrades to in-memory operation.
//!
//! Operations referencing an unknown group, pane, or index are silent
//! no-ops — the engine has no fatal error conditions and defers
//! correctness restoration to the next `reconcile` or normalize pass.

use tracing::{debug, warn};

use super::focus;
use super::group::{LayoutState, SplitGroup};
use super::persist::{self, LayoutBackend};
use super::ratio;
use super::types::{FocusDirection, GroupId, PaneId, SplitDirection};

/// Owns the split layout state for one layout root.
///
/// Construct one store per layout root and thread it into the resize
/// controller and view bindings explicitly; the engine has no ambient
/// singleton state.
pub struct SplitGroupStore {
    state: LayoutState,
    backend: Box<dyn LayoutBackend>,
    key: String,
}

impl std::fmt::Debug for SplitGroupStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitGroupStore")
            .field("state", &self.state)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl SplitGroupStore {
    /// Creates a store bound to a backend and storage key.
    ///
    /// Starts from the state persisted under `key` when present and
    /// readable, otherwise empty — a corrupt blob never fails the
    /// caller.
    #[must_use]
    pub fn new(backend: Box<dyn LayoutBackend>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = persist::load_state(backend.as_ref(), &key);
        Self {
            state,
            backend,
            key,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the current layout state.
    #[must_use]
    pub const fn state(&self) -> &LayoutState {
        &self.state
    }

    /// Returns a group by id.
    #[must_use]
    pub fn group(&self, group_id: GroupId) -> Option<&SplitGroup> {
        self.state.groups.get(&group_id)
    }

    /// Iterates over all tracked groups, in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = &SplitGroup> {
        self.state.groups.values()
    }

    /// Returns the group containing the given pane, if any.
    #[must_use]
    pub fn group_of_pane(&self, pane_id: PaneId) -> Option<&SplitGroup> {
        self.state
            .group_of_pane(pane_id)
            .and_then(|id| self.state.groups.get(&id))
    }

    /// Returns the active group, if the pointer still resolves.
    #[must_use]
    pub fn active_group(&self) -> Option<&SplitGroup> {
        self.state.active_group()
    }

    /// Returns the currently focused pane, if any.
    #[must_use]
    pub const fn focused_pane(&self) -> Option<PaneId> {
        self.state.focused_pane_id
    }

    /// Returns true if no groups are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Splits a pane, placing `new_pane` immediately after `existing`.
    ///
    /// If `existing` already belongs to a group, `new_pane` is inserted
    /// after it and the whole group returns to an equal split — prior
    /// proportions are deliberately not preserved on re-split. If
    /// `existing` is standalone, a fresh two-pane group is created in
    /// the requested direction and becomes the active group.
    ///
    /// Returns the id of the group the new pane landed in. A `new_pane`
    /// that is already tracked anywhere is a no-op.
    pub fn split_pane(
        &mut self,
        existing: PaneId,
        direction: SplitDirection,
        new_pane: PaneId,
    ) -> Option<GroupId> {
        if self.state.group_of_pane(new_pane).is_some() {
            warn!(pane = %new_pane, "refusing to split with a pane already in a group");
            return None;
        }

        let group_id = if let Some(group_id) = self.state.group_of_pane(existing) {
            let group = self.state.groups.get_mut(&group_id)?;
            let index = group.index_of(existing)?;
            group.pane_ids.insert(index + 1, new_pane);
            group.ratios = ratio::equal_split(group.pane_ids.len());
            debug!(group = %group_id, panes = group.pane_ids.len(), "inserted pane into group");
            group_id
        } else {
            let group = SplitGroup::new(direction, existing, new_pane);
            let group_id = group.id;
            self.state.groups.insert(group_id, group);
            self.state.active_group_id = Some(group_id);
            debug!(group = %group_id, %direction, "created split group");
            group_id
        };

        self.persist();
        Some(group_id)
    }

    /// Removes a pane from its group, renormalizing the remainder.
    ///
    /// A group left with one pane is dissolved entirely. If the closed
    /// pane held focus, focus moves to the pane now at the same index
    /// (clamped to the new bounds), or clears if the group is gone.
    pub fn close_pane(&mut self, pane_id: PaneId) {
        let Some(group_id) = self.state.group_of_pane(pane_id) else {
            return;
        };
        let Some(group) = self.state.groups.get_mut(&group_id) else {
            return;
        };
        let Some(index) = group.index_of(pane_id) else {
            return;
        };

        group.pane_ids.remove(index);
        if index < group.ratios.len() {
            group.ratios.remove(index);
        }
        let had_focus = self.state.focused_pane_id == Some(pane_id);

        if group.pane_ids.len() < 2 {
            self.state.groups.remove(&group_id);
            if self.state.active_group_id == Some(group_id) {
                self.state.active_group_id = None;
            }
            if had_focus {
                self.state.focused_pane_id = None;
            }
            debug!(group = %group_id, "dissolved group after close");
        } else {
            group.ratios = ratio::normalize(&group.ratios);
            if had_focus {
                let next = index.min(group.pane_ids.len() - 1);
                self.state.focused_pane_id = Some(group.pane_ids[next]);
            }
            debug!(group = %group_id, pane = %pane_id, "closed pane");
        }

        self.persist();
    }

    /// Assigns one ratio directly.
    ///
    /// The store does not enforce that a matching adjacent update
    /// accompanies this call; the resize controller always commits the
    /// pair produced by [`ratio::drag_delta`] back-to-back.
    pub fn update_ratio(&mut self, group_id: GroupId, index: usize, value: f64) {
        let Some(group) = self.state.groups.get_mut(&group_id) else {
            return;
        };
        if index >= group.ratios.len() || !value.is_finite() {
            return;
        }
        group.ratios[index] = value;
        self.persist();
    }

    /// Changes a group's axis. Ratios are unaffected.
    pub fn change_direction(&mut self, group_id: GroupId, direction: SplitDirection) {
        let Some(group) = self.state.groups.get_mut(&group_id) else {
            return;
        };
        if group.direction == direction {
            return;
        }
        group.direction = direction;
        debug!(group = %group_id, %direction, "changed group direction");
        self.persist();
    }

    /// Resets a group to an equal split.
    pub fn reset_equal(&mut self, group_id: GroupId) {
        let Some(group) = self.state.groups.get_mut(&group_id) else {
            return;
        };
        group.ratios = ratio::equal_split(group.pane_ids.len());
        debug!(group = %group_id, "reset group to equal split");
        self.persist();
    }

    /// Synchronizes against the externally-owned live pane set.
    ///
    /// Call whenever the terminal-lifecycle collaborator's pane list
    /// changes out-of-band. Panes no longer alive are removed from
    /// their groups (ratios trimmed alongside, short arrays padded with
    /// the equal share, then renormalized), groups left with fewer than
    /// two panes are dissolved, and dangling active/focus pointers are
    /// cleared.
    pub fn reconcile(&mut self, live_pane_ids: &[PaneId]) {
        let mut dissolved = Vec::new();

        for group in self.state.groups.values_mut() {
            let before = group.pane_ids.len();
            let mut pane_ids = Vec::with_capacity(before);
            let mut ratios = Vec::with_capacity(before);
            for (index, pane_id) in group.pane_ids.iter().enumerate() {
                if live_pane_ids.contains(pane_id) {
                    pane_ids.push(*pane_id);
                    ratios.push(group.ratios.get(index).copied().unwrap_or(0.0));
                }
            }
            if pane_ids.len() < 2 {
                dissolved.push(group.id);
                continue;
            }
            if pane_ids.len() != before {
                debug!(group = %group.id, removed = before - pane_ids.len(), "reconciled group against live panes");
            }
            // A short ratio array is padded with the equal share before
            // renormalizing, so padded panes get a fair slice.
            let equal = 1.0 / pane_ids.len() as f64;
            for entry in &mut ratios {
                if *entry <= 0.0 || !entry.is_finite() {
                    *entry = equal;
                }
            }
            group.pane_ids = pane_ids;
            group.ratios = ratio::normalize(&ratios);
        }

        for group_id in dissolved {
            self.state.groups.remove(&group_id);
            debug!(group = %group_id, "dissolved group during reconcile");
        }

        if let Some(active) = self.state.active_group_id
            && !self.state.groups.contains_key(&active)
        {
            self.state.active_group_id = None;
        }
        if let Some(focused) = self.state.focused_pane_id
            && !live_pane_ids.contains(&focused)
        {
            self.state.focused_pane_id = None;
        }

        self.persist();
    }

    /// Clears all layout state.
    pub fn reset(&mut self) {
        self.state = LayoutState::new();
        debug!("cleared layout state");
        self.persist();
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Records the externally-requested focused pane.
    ///
    /// The pane need not belong to a group — standalone panes can hold
    /// focus too. Marks the owning group (if any) active.
    pub fn set_focused_pane(&mut self, pane_id: Option<PaneId>) {
        if self.state.focused_pane_id == pane_id {
            return;
        }
        self.state.focused_pane_id = pane_id;
        if let Some(pane) = pane_id
            && let Some(group_id) = self.state.group_of_pane(pane)
        {
            self.state.active_group_id = Some(group_id);
        }
        self.persist();
    }

    /// Moves focus to the next pane in the focused pane's group, wrapping.
    pub fn focus_next(&mut self) {
        self.focus_cyclic(focus::next_index);
    }

    /// Moves focus to the previous pane in the focused pane's group, wrapping.
    pub fn focus_prev(&mut self) {
        self.focus_cyclic(focus::prev_index);
    }

    /// Moves focus directionally within the focused pane's group.
    ///
    /// A no-op when the direction is off the group's axis or the move
    /// would cross the group boundary — directional navigation never
    /// wraps.
    pub fn focus_directional(&mut self, direction: FocusDirection) {
        let Some((group_id, index, count, group_direction)) = self.focused_position() else {
            return;
        };
        let Some(next) = focus::directional_index(index, count, group_direction, direction) else {
            return;
        };
        self.commit_focus(group_id, next);
    }

    fn focus_cyclic(&mut self, advance: fn(usize, usize) -> usize) {
        let Some((group_id, index, count, _)) = self.focused_position() else {
            return;
        };
        self.commit_focus(group_id, advance(index, count));
    }

    /// Resolves the focused pane's group, index, size, and axis.
    fn focused_position(&self) -> Option<(GroupId, usize, usize, SplitDirection)> {
        let pane = self.state.focused_pane_id?;
        let group = self.group_of_pane(pane)?;
        let index = group.index_of(pane)?;
        Some((group.id, index, group.pane_ids.len(), group.direction))
    }

    fn commit_focus(&mut self, group_id: GroupId, index: usize) {
        let Some(group) = self.state.groups.get(&group_id) else {
            return;
        };
        let Some(&pane) = group.pane_ids.get(index) else {
            return;
        };
        if self.state.focused_pane_id == Some(pane) {
            return;
        }
        self.state.focused_pane_id = Some(pane);
        self.state.active_group_id = Some(group_id);
        self.persist();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Writes the committed state through the backend.
    ///
    /// Failures are logged and swallowed; the engine keeps operating on
    /// the in-memory state for the rest of the session.
    fn persist(&self) {
        if let Err(err) = persist::save_state(self.backend.as_ref(), &self.key, &self.state) {
            warn!(key = %self.key, error = %err, "failed to persist layout state");
        }
    }
}
