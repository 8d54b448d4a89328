//! Focus navigation within a split group
//!
//! Two navigation styles coexist deliberately: `next`/`prev` cycle and
//! always succeed, while directional navigation is bounded — at a group
//! edge the request is a no-op. The asymmetry matches how users expect
//! keyboard cycling versus arrow-style movement to behave.

use super::types::{FocusDirection, SplitDirection};

/// Returns the index after `current`, wrapping at the end of the group.
#[must_use]
pub fn next_index(current: usize, pane_count: usize) -> usize {
    if pane_count == 0 {
        return 0;
    }
    (current + 1) % pane_count
}

/// Returns the index before `current`, wrapping at the start of the group.
#[must_use]
pub fn prev_index(current: usize, pane_count: usize) -> usize {
    if pane_count == 0 {
        return 0;
    }
    (current + pane_count - 1) % pane_count
}

/// Returns the index a directional focus request lands on.
///
/// Returns `None` when the request direction does not lie on the
/// group's axis, or when the move would cross a group boundary — there
/// is no wraparound for directional navigation.
#[must_use]
pub fn directional_index(
    current: usize,
    pane_count: usize,
    group_direction: SplitDirection,
    focus_direction: FocusDirection,
) -> Option<usize> {
    if focus_direction.axis() != group_direction {
        return None;
    }
    if focus_direction.is_forward() {
        if current + 1 < pane_count {
            Some(current + 1)
        } else {
            None
        }
    } else {
        current.checked_sub(1)
    }
}
