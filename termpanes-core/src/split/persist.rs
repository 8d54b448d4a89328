//! Persistence adapter for layout state
//!
//! Serializes the layout to a versioned JSON blob stored under a
//! caller-supplied key. The backend is injected into the store rather
//! than read from an ambient singleton, so multiple independent layout
//! roots can coexist (and tests run against the in-memory backend).
//!
//! Restoring is fail-soft: a missing, corrupt, or incompatible blob
//! yields an empty layout and a warning — never an error to the caller.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::LayoutPersistError;
use super::group::{LayoutState, SplitGroup};
use super::ratio;
use super::types::{GroupId, PaneId, SplitDirection};

/// Current version of the persisted layout format.
pub const LAYOUT_FORMAT_VERSION: u32 = 1;

/// One split group as persisted to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Terminal pane ids in layout order.
    pub terminal_ids: Vec<PaneId>,
    /// Group axis.
    pub direction: SplitDirection,
    /// Fractional sizes, same order as `terminal_ids`.
    pub ratios: Vec<f64>,
    /// Reserved nesting reference; round-tripped but never acted on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<GroupId>,
}

/// The complete persisted layout blob.
///
/// Focus is deliberately not persisted — the terminal-lifecycle
/// collaborator owns the active pane and re-asserts it after restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    /// Format version for forward compatibility.
    pub version: u32,
    /// All split groups.
    pub groups: Vec<PersistedGroup>,
    /// The active group, if it still resolves.
    pub active_group_id: Option<GroupId>,
}

impl PersistedLayout {
    /// Captures the persistable portion of a layout state.
    #[must_use]
    pub fn from_state(state: &LayoutState) -> Self {
        let mut groups: Vec<PersistedGroup> = state
            .groups
            .values()
            .map(|g| PersistedGroup {
                id: g.id,
                terminal_ids: g.pane_ids.clone(),
                direction: g.direction,
                ratios: g.ratios.clone(),
                parent_id: g.parent_group_id,
            })
            .collect();
        // HashMap iteration order is arbitrary; keep the blob stable.
        groups.sort_by_key(|g| g.id.as_uuid());
        Self {
            version: LAYOUT_FORMAT_VERSION,
            groups,
            active_group_id: state.active_group_id,
        }
    }

    /// Rebuilds a layout state, repairing any damage in the blob.
    ///
    /// Groups with fewer than two panes are dropped, pane ids already
    /// claimed by an earlier group are skipped, ratio arrays are padded
    /// or trimmed to the pane count and renormalized, and a dangling
    /// active-group pointer is cleared.
    #[must_use]
    pub fn into_state(self) -> LayoutState {
        let mut groups = HashMap::new();
        let mut claimed: HashSet<PaneId> = HashSet::new();

        for persisted in self.groups {
            let mut pane_ids = Vec::with_capacity(persisted.terminal_ids.len());
            let mut ratios = Vec::with_capacity(persisted.terminal_ids.len());
            for (index, pane_id) in persisted.terminal_ids.iter().enumerate() {
                if !claimed.insert(*pane_id) {
                    warn!(pane = %pane_id, "dropping duplicate pane reference from persisted layout");
                    continue;
                }
                pane_ids.push(*pane_id);
                ratios.push(persisted.ratios.get(index).copied().unwrap_or(0.0));
            }
            if pane_ids.len() < 2 {
                continue;
            }
            groups.insert(
                persisted.id,
                SplitGroup {
                    id: persisted.id,
                    pane_ids,
                    direction: persisted.direction,
                    ratios: ratio::normalize(&ratios),
                    parent_group_id: persisted.parent_id,
                },
            );
        }

        let active_group_id = self.active_group_id.filter(|id| groups.contains_key(id));
        LayoutState {
            groups,
            active_group_id,
            focused_pane_id: None,
        }
    }

    /// Serializes the blob to pretty JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, LayoutPersistError> {
        serde_json::to_string_pretty(self).map_err(LayoutPersistError::Serialization)
    }

    /// Parses a blob from JSON, rejecting unknown format versions.
    ///
    /// # Errors
    /// Returns an error if parsing fails or the version is unsupported.
    pub fn from_json(json: &str) -> Result<Self, LayoutPersistError> {
        let parsed: Self =
            serde_json::from_str(json).map_err(LayoutPersistError::Deserialization)?;
        if parsed.version > LAYOUT_FORMAT_VERSION {
            return Err(LayoutPersistError::VersionMismatch {
                expected: LAYOUT_FORMAT_VERSION,
                actual: parsed.version,
            });
        }
        Ok(parsed)
    }
}

/// Storage backend for persisted layout blobs.
///
/// Implementations are keyed by a caller-supplied identifier so one
/// backend can serve several layout roots.
pub trait LayoutBackend {
    /// Loads the blob stored under `key`, if any.
    ///
    /// # Errors
    /// Returns an error if the backend could not be read.
    fn load(&self, key: &str) -> Result<Option<String>, LayoutPersistError>;

    /// Stores `payload` under `key`, replacing any previous blob.
    ///
    /// # Errors
    /// Returns an error if the backend could not be written.
    fn store(&self, key: &str, payload: &str) -> Result<(), LayoutPersistError>;
}

impl<B: LayoutBackend + ?Sized> LayoutBackend for std::rc::Rc<B> {
    fn load(&self, key: &str) -> Result<Option<String>, LayoutPersistError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, payload: &str) -> Result<(), LayoutPersistError> {
        (**self).store(key, payload)
    }
}

/// File-system backend storing one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at the given directory.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the conventional per-user data directory for layouts.
    ///
    /// `None` when the platform exposes no data directory.
    #[must_use]
    pub fn default_base_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("termpanes"))
    }

    /// Returns the file path a key maps to.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl LayoutBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>, LayoutPersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, key: &str, payload: &str) -> Result<(), LayoutPersistError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, payload)?;
        Ok(())
    }
}

/// In-memory backend for tests and in-memory-only degraded operation.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the blob currently stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Seeds a blob under `key`.
    pub fn put(&self, key: impl Into<String>, payload: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), payload.into());
    }
}

impl LayoutBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, LayoutPersistError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn store(&self, key: &str, payload: &str) -> Result<(), LayoutPersistError> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}

/// Restores the layout stored under `key`, failing soft to empty.
#[must_use]
pub fn load_state(backend: &dyn LayoutBackend, key: &str) -> LayoutState {
    let json = match backend.load(key) {
        Ok(Some(json)) => json,
        Ok(None) => return LayoutState::new(),
        Err(err) => {
            warn!(key, error = %err, "failed to read persisted layout, starting empty");
            return LayoutState::new();
        }
    };
    match PersistedLayout::from_json(&json) {
        Ok(persisted) => persisted.into_state(),
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable persisted layout");
            LayoutState::new()
        }
    }
}

/// Writes the persistable portion of `state` under `key`.
///
/// # Errors
/// Returns an error if serialization or the backend write fails.
pub fn save_state(
    backend: &dyn LayoutBackend,
    key: &str,
    state: &LayoutState,
) -> Result<(), LayoutPersistError> {
    let json = PersistedLayout::from_state(state).to_json()?;
    backend.store(key, &json)
}
