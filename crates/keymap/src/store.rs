//! Persistence for the keyboard's binding table.
//!
//! The store is a pure transport: it moves a [`KeyboardState`] between the
//! keyboard's export/import operations and a JSON file, and performs no
//! command logic of its own. The on-disk shape is a single object mapping
//! each key combo to the bound command's `{type, params}` descriptor,
//! with no history and no wrapper fields.

use crate::command::CommandDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The persisted, history-free snapshot of the binding table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyboardState(IndexMap<String, CommandDescriptor>);

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, combo: &str) -> Option<&CommandDescriptor> {
        self.0.get(combo)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CommandDescriptor)> {
        self.0.iter()
    }
}

impl FromIterator<(String, CommandDescriptor)> for KeyboardState {
    fn from_iter<I: IntoIterator<Item = (String, CommandDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors from reading or writing the persisted snapshot.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads and writes the snapshot at a fixed path.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the snapshot as pretty-printed JSON, creating parent
    /// directories as needed. Write failures propagate to the caller.
    pub fn save(&self, state: &KeyboardState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Load the snapshot from disk.
    ///
    /// A missing file is a fresh start, not a fault, and yields an empty
    /// snapshot. Malformed content is a [`StateError::Parse`] and nothing
    /// of it is applied.
    pub fn load(&self) -> Result<KeyboardState, StateError> {
        if !self.path.exists() {
            return Ok(KeyboardState::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&content)?;
        Ok(state)
    }
}
