/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor preferences, stored as TOML.
//!
//! Default location: `<config dir>/bookmark-graph/prefs.toml`. A missing file
//! is not an error; every omitted field keeps its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::layout::LayoutMetrics;
use crate::services::history::DEFAULT_UNDO_LIMIT;
use crate::services::persistence::EditorStore;

const APP_DIR: &str = "bookmark-graph";
const PREFS_FILE: &str = "prefs.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Retained undo steps; 0 keeps everything.
    pub undo_limit: usize,
    /// Overrides the persistence directory.
    pub data_dir: Option<PathBuf>,
    pub layout: LayoutMetrics,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            data_dir: None,
            layout: LayoutMetrics::default(),
        }
    }
}

impl EditorPreferences {
    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        let content = std::fs::read_to_string(path).map_err(|e| PrefsError::Io(format!("{}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| PrefsError::Parse(format!("{}: {e}", path.display())))
    }

    /// Load `path` (or the default location), falling back to defaults on
    /// any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            log::warn!("Could not determine preferences path, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::info!("No preferences file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(prefs) => {
                log::info!("Loaded preferences from {}", path.display());
                prefs
            },
            Err(e) => {
                log::warn!("Failed to load preferences ({e}), using defaults");
                Self::default()
            },
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PrefsError::Io(format!("{e}")))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| PrefsError::Parse(format!("{e}")))?;
        std::fs::write(path, content).map_err(|e| PrefsError::Io(format!("{}: {e}", path.display())))
    }

    /// Configured data dir, else the platform default.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(EditorStore::default_data_dir)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
}

#[derive(Debug)]
pub enum PrefsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "IO error: {e}"),
            PrefsError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for PrefsError {}
