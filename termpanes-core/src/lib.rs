//! `TermPanes` Core Library
//!
//! This crate provides the split-pane layout engine used by the
//! `TermPanes` editor shell to arrange terminal sessions: split groups,
//! ratio allocation, sash drag gestures, focus navigation, and layout
//! persistence.
//!
//! # Crate Structure
//!
//! - [`split`] - The layout engine (groups, ratios, store, sash, focus, persistence)
//! - [`trace`] - Opt-in tracing-subscriber setup for embedders and tests
//!
//! The engine is deliberately toolkit-free and single-threaded: the
//! hosting UI injects pointer positions, timestamps, and container
//! sizes, and consumes pane ids and pixel sizes back. Terminal
//! emulation, command execution, and widget code live with the
//! embedder.

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod split;
pub mod trace;

pub use split::{
    FocusDirection, GroupId, LayoutBackend, LayoutPersistError, LayoutState, PaneId,
    SashController, SizingConfig, SplitDirection, SplitGroup, SplitGroupStore,
};
