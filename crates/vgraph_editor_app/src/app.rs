// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor startup sequence and hot-reload loop.

use crate::settings::{EditorSettings, SETTINGS_FILE_NAME};
use crate::theme::EditorTheme;
use crate::watcher::DefinitionWatcher;
use crate::window::MainWindow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use vgraph_editor_graph::library;
use vgraph_editor_graph::{LoadReport, NodeDefinitionLoader};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Settings file could not be read or parsed
    #[error("Failed to load settings from {path:?}: {source}")]
    Settings {
        /// Settings file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Window icon could not be decoded
    #[error("Failed to load window icon {path:?}: {source}")]
    WindowIcon {
        /// Icon path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: image::ImageError,
    },

    /// Definition watcher could not be started
    #[error("Failed to watch node definitions: {0}")]
    Watcher(#[from] notify_debouncer_full::notify::Error),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Poll interval of the hot-reload loop
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Headless editor shell
pub struct EditorApp {
    settings: EditorSettings,
    loader: NodeDefinitionLoader,
    egui_ctx: egui::Context,
    window: Option<MainWindow>,
}

impl EditorApp {
    /// Create the shell from settings
    pub fn new(settings: EditorSettings) -> Self {
        let loader = NodeDefinitionLoader::with_namespace(settings.nodes_namespace.clone());
        Self {
            settings,
            loader,
            egui_ctx: egui::Context::default(),
            window: None,
        }
    }

    /// Load settings from `path` (or `editor.ron`) and create the shell
    pub fn from_settings_file(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(SETTINGS_FILE_NAME), Path::to_path_buf);
        if !path.exists() {
            // leave a template behind for the user to edit
            if let Err(e) = EditorSettings::default().save(&path) {
                tracing::warn!("Failed to write default settings to {:?}: {e}", path);
            }
        }
        let settings = EditorSettings::load_or_default(&path)
            .map_err(|source| EditorError::Settings { path, source })?;
        Ok(Self::new(settings))
    }

    /// The main window, if it was constructed
    #[cfg(test)]
    pub fn window(&self) -> Option<&MainWindow> {
        self.window.as_ref()
    }

    /// Apply the stylesheet, load node definitions, then construct the window.
    ///
    /// A window that fails to construct is reported; the editor keeps running
    /// without it.
    pub fn start(&mut self) -> LoadReport {
        let theme = EditorTheme::load_or_default(self.settings.stylesheet.as_deref());
        theme.apply(&self.egui_ctx);

        let report = self.load_definitions();

        let library = library::global().read();
        match MainWindow::new(&self.settings, &library) {
            Ok(mut window) => {
                window.show(&self.egui_ctx, &library);
                self.window = Some(window);
            }
            Err(e) => tracing::error!("{e}"),
        }

        report
    }

    /// Load the node directory into the global library
    pub fn load_definitions(&self) -> LoadReport {
        let report = {
            let mut library = library::global().write();
            self.loader.load_directory(&self.settings.nodes_dir, &mut library)
        };

        if !report.is_clean() {
            tracing::warn!(
                "{} node definitions skipped, {} tolerated problems",
                report.issues.len(),
                report.diagnostics.len()
            );
        }
        report
    }

    /// Reload definitions after a change and refresh the window
    pub fn reload(&mut self, changed: &[PathBuf]) -> LoadReport {
        tracing::info!("Node definitions changed: {:?}", changed);
        let report = self.load_definitions();

        if let Some(window) = &mut self.window {
            let library = library::global().read();
            window.refresh(&library);
            window.show(&self.egui_ctx, &library);
        }
        report
    }

    /// Start up and, if configured, keep reloading definitions on change
    pub fn run(mut self) -> Result<()> {
        self.start();

        if !self.settings.watch_nodes {
            return Ok(());
        }

        let debounce = Duration::from_millis(self.settings.watch_debounce_ms);
        let watcher = DefinitionWatcher::new(&self.settings.nodes_dir, debounce)?;
        self.watch(watcher);
        Ok(())
    }

    /// Reload on every change until the definition directory goes away
    fn watch(&mut self, watcher: DefinitionWatcher) {
        while watcher.is_active() {
            let changed = watcher.wait_for_changes(WATCH_POLL_INTERVAL);
            if !changed.is_empty() {
                self.reload(&changed);
            }
        }

        tracing::warn!(
            "Node definition directory {:?} removed, no longer watching",
            watcher.root()
        );
        watcher.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_loads_definitions_and_builds_window() {
        let tmp = tempfile::tempdir().unwrap();
        let nodes_dir = tmp.path().join("defs");
        std::fs::create_dir_all(&nodes_dir).unwrap();
        std::fs::write(
            nodes_dir.join("nodes.json"),
            r#"[{"name": "StartupProbe", "package": "Tests"}]"#,
        )
        .unwrap();

        let settings = EditorSettings {
            nodes_dir,
            nodes_namespace: "app_startup_test".to_string(),
            ..EditorSettings::default()
        };
        let mut app = EditorApp::new(settings);
        let report = app.start();

        assert_eq!(report.registered, ["app_startup_test.StartupProbe"]);
        assert!(library::global().read().contains("app_startup_test.StartupProbe"));
        let window = app.window().unwrap();
        assert!(window.palette.entry("app_startup_test.StartupProbe").is_some());
    }

    #[test]
    fn test_window_failure_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = EditorSettings {
            nodes_dir: tmp.path().join("json"),
            nodes_namespace: "app_window_test".to_string(),
            window_icon: Some(tmp.path().join("missing.png")),
            ..EditorSettings::default()
        };
        let mut app = EditorApp::new(settings);
        let report = app.start();

        assert!(report.created_directory);
        assert!(app.window().is_none());
    }

    #[test]
    fn test_reload_replaces_nodes() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("nodes.json");
        std::fs::write(&file, r#"[{"name": "Probe", "title": "Old"}]"#).unwrap();

        let settings = EditorSettings {
            nodes_dir: tmp.path().to_path_buf(),
            nodes_namespace: "app_reload_test".to_string(),
            ..EditorSettings::default()
        };
        let mut app = EditorApp::new(settings);
        app.start();

        std::fs::write(&file, r#"[{"name": "Probe", "title": "New"}]"#).unwrap();
        let report = app.reload(&[file]);

        assert_eq!(report.replaced, ["app_reload_test.Probe"]);
        let window = app.window().unwrap();
        assert_eq!(window.palette.entry("app_reload_test.Probe").unwrap().title, "New");
    }

    #[test]
    fn test_watch_ends_when_directory_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let nodes_dir = tmp.path().join("json");
        let settings = EditorSettings {
            nodes_dir: nodes_dir.clone(),
            nodes_namespace: "app_watch_test".to_string(),
            ..EditorSettings::default()
        };
        let mut app = EditorApp::new(settings);
        app.start();

        let watcher = DefinitionWatcher::new(&nodes_dir, Duration::from_millis(50)).unwrap();
        std::fs::remove_dir(&nodes_dir).unwrap();
        app.watch(watcher);

        assert!(!nodes_dir.exists());
    }

    #[test]
    fn test_missing_settings_file_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("editor.ron");
        let app = EditorApp::from_settings_file(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(app.settings, EditorSettings::default());
    }

    #[test]
    fn test_malformed_settings_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("editor.ron");
        std::fs::write(&path, "(watch_nodes: maybe)").unwrap();
        let result = EditorApp::from_settings_file(Some(&path));
        assert!(matches!(result, Err(EditorError::Settings { .. })));
    }
}
