//! Split-pane layout engine for terminal sessions
//!
//! This module manages how terminal panes are grouped into resizable
//! splits: converting pointer-drag gestures into proportional size
//! changes, redistributing space when panes come and go, and moving
//! focus between panes. Pane identities are owned by the external
//! terminal-lifecycle collaborator; the engine only arranges them.
//!
//! # Architecture
//!
//! - **Flat groups**: each split is one ordered run of panes on a
//!   single axis; splits are never nested
//! - **Store-owned state**: all mutation goes through
//!   [`SplitGroupStore`] so the ratio invariants hold
//! - **Pure gesture model**: [`SashController`] is toolkit-free, with
//!   injected positions and timestamps
//! - **Injected persistence**: one [`LayoutBackend`] per layout root,
//!   never an ambient singleton
//!
//! # Module Structure
//!
//! - `types` - Identifier types and enums (`PaneId`, `GroupId`, `SplitDirection`, `FocusDirection`)
//! - `group` - Data model (`SplitGroup`, `LayoutState`)
//! - `ratio` - Ratio allocation (`normalize`, `compute_sizes`, `drag_delta`)
//! - `store` - Layout state machine (`SplitGroupStore`)
//! - `focus` - Focus navigation index transitions
//! - `sash` - Pointer-gesture state machine (`SashController`)
//! - `persist` - Persistence adapter (`PersistedLayout`, backends)
//! - `error` - Error types (`LayoutPersistError`)
//!
//! # Example
//!
//! ```
//! use termpanes_core::split::{
//!     MemoryBackend, PaneId, SplitDirection, SplitGroupStore,
//! };
//!
//! let mut store = SplitGroupStore::new(Box::new(MemoryBackend::new()), "workspace");
//!
//! // Split a standalone pane: a fresh two-pane group appears.
//! let first = PaneId::new();
//! let second = PaneId::new();
//! let group_id = store
//!     .split_pane(first, SplitDirection::Horizontal, second)
//!     .unwrap();
//!
//! let group = store.group(group_id).unwrap();
//! assert_eq!(group.pane_ids, vec![first, second]);
//! assert_eq!(group.ratios, vec![0.5, 0.5]);
//!
//! // Closing one of two panes dissolves the group.
//! store.close_pane(second);
//! assert!(store.is_empty());
//! ```

mod error;
mod focus;
mod group;
mod persist;
mod ratio;
mod sash;
mod store;
mod types;

pub use error::LayoutPersistError;
pub use focus::{directional_index, next_index, prev_index};
pub use group::{LayoutState, RATIO_SUM_TOLERANCE, SplitGroup};
pub use persist::{
    FileBackend, LAYOUT_FORMAT_VERSION, LayoutBackend, MemoryBackend, PersistedGroup,
    PersistedLayout, load_state, save_state,
};
pub use ratio::{
    RatioPair, SizingConfig, available_size, compute_sizes, drag_delta, equal_split, normalize,
};
pub use sash::{
    DOUBLE_CLICK_WINDOW, DragSurface, HOVER_DELAY, NullDragSurface, SashController, SashPhase,
};
pub use store::SplitGroupStore;
pub use types::{FocusDirection, GroupId, PaneId, SplitDirection};
