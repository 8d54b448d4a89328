//! Sash resize controller — the pointer-gesture state machine
//!
//! Turns drag, hover, and double-click input on the divider between two
//! panes into ratio commits on the store. The controller is a pure data
//! model: pointer positions and timestamps are injected by the hosting
//! UI layer, which keeps the 300 ms double-click and hover windows
//! testable without a widget toolkit or real clocks.
//!
//! The controller owns only transient gesture state. Ratio changes
//! applied during a drag remain committed when the drag ends or is
//! cancelled — there is no rollback of a partial gesture.

use std::time::{Duration, Instant};

use tracing::debug;

use super::ratio::{self, SizingConfig};
use super::store::SplitGroupStore;
use super::types::{GroupId, SplitDirection};

/// Two pointer-downs on the same sash within this window count as a
/// double-click and reset the group to an equal split.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Default pointer-presence delay before the hover affordance shows.
pub const HOVER_DELAY: Duration = Duration::from_millis(300);

/// Document-wide side effects of an active drag.
///
/// Acquired when a drag starts and released on every exit from the
/// drag, including cancellation: the hosting UI typically pins an
/// axis-appropriate resize cursor and suppresses text selection for the
/// duration of the gesture.
pub trait DragSurface {
    /// Called once when a drag starts, with the resize axis.
    fn acquire(&mut self, axis: SplitDirection);

    /// Called once when the drag ends or is cancelled.
    fn release(&mut self);
}

/// A [`DragSurface`] with no side effects, for headless use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDragSurface;

impl DragSurface for NullDragSurface {
    fn acquire(&mut self, _axis: SplitDirection) {}

    fn release(&mut self) {}
}

/// Observable phase of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SashPhase {
    /// No gesture in progress.
    Idle,
    /// Pointer has rested on a sash long enough to show the affordance.
    ///
    /// Purely visual; committed layout state is untouched.
    Hovering,
    /// A drag is converting pointer deltas into ratio commits.
    Dragging,
}

#[derive(Debug)]
struct DragState {
    group_id: GroupId,
    sash_index: usize,
    last_pos: f64,
}

/// Pointer-gesture controller for one split container's sashes.
#[derive(Debug)]
pub struct SashController<S: DragSurface = NullDragSurface> {
    sizing: SizingConfig,
    surface: S,
    hover_delay: Duration,
    drag: Option<DragState>,
    hovering: bool,
    hover_since: Option<Instant>,
    last_down: Option<(GroupId, usize, Instant)>,
}

impl SashController<NullDragSurface> {
    /// Creates a controller with no drag-surface side effects.
    #[must_use]
    pub fn new(sizing: SizingConfig) -> Self {
        Self::with_surface(sizing, NullDragSurface)
    }
}

impl<S: DragSurface> SashController<S> {
    /// Creates a controller that drives the given drag surface.
    #[must_use]
    pub fn with_surface(sizing: SizingConfig, surface: S) -> Self {
        Self {
            sizing,
            surface,
            hover_delay: HOVER_DELAY,
            drag: None,
            hovering: false,
            hover_since: None,
            last_down: None,
        }
    }

    /// Overrides the hover-affordance delay.
    #[must_use]
    pub const fn with_hover_delay(mut self, delay: Duration) -> Self {
        self.hover_delay = delay;
        self
    }

    /// Returns the current gesture phase.
    #[must_use]
    pub const fn phase(&self) -> SashPhase {
        if self.drag.is_some() {
            SashPhase::Dragging
        } else if self.hovering {
            SashPhase::Hovering
        } else {
            SashPhase::Idle
        }
    }

    /// Returns true while a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handles a pointer-down on a sash.
    ///
    /// A second down on the same sash within [`DOUBLE_CLICK_WINDOW`]
    /// consumes the event and resets the group to an equal split
    /// without starting a drag. Otherwise the drag starts: the drag
    /// surface is acquired with the group's resize axis and subsequent
    /// moves commit ratio pairs.
    ///
    /// `pos` is the pointer coordinate along the group's axis.
    pub fn pointer_down(
        &mut self,
        store: &mut SplitGroupStore,
        group_id: GroupId,
        sash_index: usize,
        pos: f64,
        now: Instant,
    ) {
        if self.drag.is_some() {
            return;
        }
        if let Some((prev_group, prev_sash, prev_at)) = self.last_down
            && prev_group == group_id
            && prev_sash == sash_index
            && now.duration_since(prev_at) <= DOUBLE_CLICK_WINDOW
        {
            self.last_down = None;
            debug!(group = %group_id, sash = sash_index, "double-click reset to equal split");
            store.reset_equal(group_id);
            return;
        }
        self.last_down = Some((group_id, sash_index, now));

        // Unknown group or out-of-range sash: stay idle.
        let Some(group) = store.group(group_id) else {
            return;
        };
        if sash_index >= group.sash_count() {
            return;
        }

        self.hovering = false;
        self.hover_since = None;
        self.surface.acquire(group.direction);
        self.drag = Some(DragState {
            group_id,
            sash_index,
            last_pos: pos,
        });
        debug!(group = %group_id, sash = sash_index, "drag started");
    }

    /// Handles a pointer-move during a drag.
    ///
    /// Each move works on the delta from the previous event — deltas
    /// are never accumulated across moves, so clamping cannot drift the
    /// gesture. Both adjacent ratios are committed together. O(1) in
    /// the group size; a no-op outside a drag.
    pub fn pointer_move(&mut self, store: &mut SplitGroupStore, pos: f64, container: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta = pos - drag.last_pos;
        drag.last_pos = pos;

        let pair = store.group(drag.group_id).and_then(|group| {
            ratio::drag_delta(&group.ratios, drag.sash_index, delta, container, &self.sizing)
        });
        if let Some(pair) = pair {
            let group_id = drag.group_id;
            store.update_ratio(group_id, pair.sash_index, pair.first);
            store.update_ratio(group_id, pair.sash_index + 1, pair.second);
        }
    }

    /// Handles a pointer-up, ending the drag.
    ///
    /// Ratio changes already applied stay committed.
    pub fn pointer_up(&mut self) {
        self.finish_drag();
    }

    /// Handles a pointer-cancel (capture lost, window blur).
    ///
    /// Identical to pointer-up: the drag surface is released and
    /// applied changes stay committed.
    pub fn pointer_cancel(&mut self) {
        self.finish_drag();
    }

    /// Records pointer presence over a sash, arming the hover timer.
    ///
    /// A later [`poll_hover`](Self::poll_hover) reports whether the
    /// affordance should show. Re-entering re-arms the timer; the most
    /// recent timer wins.
    pub fn pointer_enter(&mut self, now: Instant) {
        if self.drag.is_some() {
            return;
        }
        self.hover_since = Some(now);
        self.hovering = false;
    }

    /// Clears pointer presence and hides the affordance.
    pub fn pointer_leave(&mut self) {
        self.hover_since = None;
        self.hovering = false;
    }

    /// Returns true if the hover affordance should be visible at `now`.
    pub fn poll_hover(&mut self, now: Instant) -> bool {
        if self.drag.is_none()
            && let Some(since) = self.hover_since
            && now.duration_since(since) >= self.hover_delay
        {
            self.hovering = true;
        }
        self.hovering
    }

    /// Single exit path for the drag state, however it terminates.
    fn finish_drag(&mut self) {
        if self.drag.take().is_some() {
            self.surface.release();
            debug!("drag ended");
        }
    }
}
