// SPDX-License-Identifier: MIT OR Apache-2.0
//! Watches the node definition directory for changes.
//!
//! Events are debounced and filtered to definition files, then handed to the
//! main thread, which reloads the directory into the node library.

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use vgraph_editor_graph::loader::is_definition_file;

/// Change reported by the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionEvent {
    /// A definition file was created, modified or removed
    Changed(PathBuf),
    /// The watcher backend reported an error
    Error(String),
}

/// Debounced watcher over a node definition directory
pub struct DefinitionWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    event_rx: Receiver<DefinitionEvent>,
    root: PathBuf,
}

impl DefinitionWatcher {
    /// Start watching `root` recursively
    pub fn new(root: impl AsRef<Path>, debounce: Duration) -> Result<Self, notify::Error> {
        let (event_tx, event_rx) = mpsc::channel();
        let root = root.as_ref().to_path_buf();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    for event in events {
                        if matches!(event.kind, EventKind::Any | EventKind::Access(_) | EventKind::Other) {
                            continue;
                        }
                        for path in event.paths.iter().filter(|p| is_definition_file(p)) {
                            let _ = event_tx.send(DefinitionEvent::Changed(path.clone()));
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = event_tx.send(DefinitionEvent::Error(error.to_string()));
                    }
                }
            }
        })?;

        debouncer.watch(&root, RecursiveMode::Recursive)?;
        tracing::info!("Watching node definitions for changes: {:?}", root);

        Ok(Self {
            debouncer,
            event_rx,
            root,
        })
    }

    /// Watched directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the watched directory still exists
    pub fn is_active(&self) -> bool {
        self.root.is_dir()
    }

    /// Wait up to `timeout` for definition changes.
    ///
    /// Returns the changed paths, deduplicated and sorted; empty on timeout.
    pub fn wait_for_changes(&self, timeout: Duration) -> Vec<PathBuf> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(first) => {
                let mut events = vec![first];
                events.extend(self.event_rx.try_iter());
                changed_paths(events)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Vec::new(),
        }
    }

    /// Stop watching
    pub fn stop(mut self) {
        if let Err(e) = self.debouncer.unwatch(&self.root) {
            tracing::warn!("Failed to stop watching {:?}: {e}", self.root);
        }
    }
}

fn changed_paths(events: Vec<DefinitionEvent>) -> Vec<PathBuf> {
    let mut paths = BTreeSet::new();
    for event in events {
        match event {
            DefinitionEvent::Changed(path) => {
                paths.insert(path);
            }
            DefinitionEvent::Error(e) => tracing::error!("Definition watcher error: {e}"),
        }
    }
    paths.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_paths_deduplicates() {
        let events = vec![
            DefinitionEvent::Changed(PathBuf::from("json/b.json")),
            DefinitionEvent::Error("backend hiccup".to_string()),
            DefinitionEvent::Changed(PathBuf::from("json/a.json")),
            DefinitionEvent::Changed(PathBuf::from("json/b.json")),
        ];
        assert_eq!(
            changed_paths(events),
            [PathBuf::from("json/a.json"), PathBuf::from("json/b.json")]
        );
    }

    #[test]
    fn test_watch_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let watcher = DefinitionWatcher::new(tmp.path(), Duration::from_millis(50)).unwrap();
        assert_eq!(watcher.root(), tmp.path());
        assert!(watcher.is_active());
        assert!(watcher.wait_for_changes(Duration::from_millis(10)).is_empty());
        watcher.stop();
    }

    #[test]
    fn test_only_definition_files_are_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let watcher = DefinitionWatcher::new(tmp.path(), Duration::from_millis(50)).unwrap();

        std::fs::write(tmp.path().join("a.txt"), "notes").unwrap();
        std::fs::write(tmp.path().join("b.json"), "[]").unwrap();

        let mut changed = BTreeSet::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while std::time::Instant::now() < deadline && changed.is_empty() {
            changed.extend(watcher.wait_for_changes(Duration::from_millis(200)));
        }
        // give late events for a.txt a chance to show up
        changed.extend(watcher.wait_for_changes(Duration::from_millis(300)));

        let names: Vec<_> = changed.iter().filter_map(|p| p.file_name()?.to_str()).collect();
        assert_eq!(names, ["b.json"]);
        watcher.stop();
    }

    #[test]
    fn test_inactive_after_root_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("json");
        std::fs::create_dir(&root).unwrap();
        let watcher = DefinitionWatcher::new(&root, Duration::from_millis(50)).unwrap();

        std::fs::remove_dir(&root).unwrap();

        assert!(!watcher.is_active());
        watcher.stop();
    }
}
