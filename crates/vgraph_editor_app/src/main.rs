// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual Graph editor shell.
//!
//! Startup order:
//! - Apply the stylesheet
//! - Load JSON node definitions into the node library
//! - Construct the main window (node palette)
//!
//! With `watch_nodes` enabled the shell then keeps reloading the definition
//! directory whenever a `.json` file changes.
//!
//! Usage: `vgraph_editor [settings.ron]`

mod app;
mod settings;
mod theme;
mod watcher;
mod window;

use app::EditorApp;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vgraph_editor_app=debug,vgraph_editor_graph=info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Starting Visual Graph Editor v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let result = EditorApp::from_settings_file(settings_path.as_deref()).and_then(EditorApp::run);

    if let Err(e) = result {
        tracing::error!("Editor failed: {e}");
        std::process::exit(1);
    }
}
