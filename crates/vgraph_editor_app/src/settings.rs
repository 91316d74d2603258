// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings.
//!
//! Read from a RON file next to the executable's working directory. Every
//! field has a default, so a partial file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vgraph_editor_graph::loader::DEFAULT_NODES_DIR;

/// Settings file name looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "editor.ron";

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Main window title
    pub window_title: String,
    /// Main window icon (PNG or ICO)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_icon: Option<PathBuf>,
    /// Theme file applied before anything is shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,
    /// Root of the JSON node definition tree
    pub nodes_dir: PathBuf,
    /// Namespace prefixed to loaded node names
    pub nodes_namespace: String,
    /// Keep watching `nodes_dir` and reload definitions on change
    pub watch_nodes: bool,
    /// Debounce for definition changes, in milliseconds
    pub watch_debounce_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            window_title: "Visual Graph".to_string(),
            window_icon: None,
            stylesheet: None,
            nodes_dir: PathBuf::from(DEFAULT_NODES_DIR),
            nodes_namespace: vgraph_editor_graph::loader::DEFAULT_NAMESPACE.to_string(),
            watch_nodes: false,
            watch_debounce_ms: 250,
        }
    }
}

impl EditorSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Load settings, using defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> std::io::Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let settings = Self::load(path)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(path, content)
    }
}
