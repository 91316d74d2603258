// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loads node descriptors from a directory of JSON definition files.
//!
//! Failures are isolated to the smallest unit possible: an unknown widget
//! only drops that widget, a bad node only skips that node, a malformed file
//! only skips that file. Nothing here aborts the whole load; every problem
//! ends up in the returned [`LoadReport`] and in the log.

use crate::definition::{InputDefinition, NodeDefinition, OutputDefinition};
use crate::dtype::{DataType, TypeRegistry};
use crate::library::NodeLibrary;
use crate::node::{NodeDescriptor, DEFAULT_PACKAGE};
use crate::port::{Port, PortDirection, PortKey, PortKind};
use crate::widget::PinWidget;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Namespace prefixed to every loaded node name
pub const DEFAULT_NAMESPACE: &str = "json_nodes";

/// Directory scanned when none is configured
pub const DEFAULT_NODES_DIR: &str = "./json";

/// File name suffix of definition files, matched case-insensitively
pub const DEFINITION_SUFFIX: &str = ".json";

/// Whether a path names a definition file
pub fn is_definition_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_ascii_lowercase()
                .ends_with(DEFINITION_SUFFIX)
        })
        .unwrap_or(false)
}

/// Error that prevents a single node from being built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The definition has no name
    #[error("Node definition has no name")]
    MissingName,

    /// Two inputs share an explicit port identifier
    #[error("Duplicate input port_id {key}")]
    DuplicateInputPort {
        /// The repeated identifier
        key: PortKey,
    },

    /// Two outputs share an explicit port identifier
    #[error("Duplicate output port_id {key}")]
    DuplicateOutputPort {
        /// The repeated identifier
        key: PortKey,
    },

    /// A port `type` is neither `data` nor `exec`
    #[error("Port {port:?} has unknown type {kind:?}")]
    UnknownPortKind {
        /// Port name
        port: String,
        /// The unrecognised kind
        kind: String,
    },
}

/// Error for a single node document
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The document does not match the definition format
    #[error("Invalid node definition: {0}")]
    Invalid(#[from] serde_json::Error),

    /// The definition was rejected while building
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Error that prevents a whole file from being loaded
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON
    #[error("Malformed JSON in {path:?}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The top-level value is not an array
    #[error("{path:?} does not contain an array of node definitions")]
    NotAnArray {
        /// File path
        path: PathBuf,
    },
}

/// A problem recorded while loading
#[derive(Debug, thiserror::Error)]
pub enum LoadIssue {
    /// The missing node directory could not be created
    #[error("Failed to create node directory {path:?}: {source}")]
    CreateDirectory {
        /// Directory path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The node directory path exists but is not a directory
    #[error("{path:?} is not a directory")]
    NotADirectory {
        /// Offending path
        path: PathBuf,
    },

    /// An entry of the directory tree could not be visited
    #[error("Failed to scan node directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A definition file was skipped
    #[error(transparent)]
    File(#[from] LoadError),

    /// A node was skipped
    #[error("Failed to create node {node} from {path:?}: {source}")]
    Node {
        /// File the node came from
        path: PathBuf,
        /// Declared node name, or `unknown`
        node: String,
        /// What went wrong
        #[source]
        source: NodeError,
    },
}

/// Non-fatal problem found in a node that was still registered
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeDiagnostic {
    /// `pin_widget` names no known widget; the port gets no widget override
    #[error("Node {node}: port {port:?} uses unknown widget {widget:?}")]
    UnknownWidget {
        /// Node name
        node: String,
        /// Port name
        port: String,
        /// The unrecognised identifier
        widget: String,
    },

    /// `pin_widget` cannot edit the port's data type; kept as declared
    #[error("Node {node}: widget {widget:?} on port {port:?} cannot edit {data_type} values")]
    WidgetTypeMismatch {
        /// Node name
        node: String,
        /// Port name
        port: String,
        /// The declared widget
        widget: PinWidget,
        /// The port's data type
        data_type: DataType,
    },
}

/// A descriptor ready for registration, plus what was tolerated to build it
#[derive(Debug, Clone)]
pub struct BuiltNode {
    /// The descriptor
    pub descriptor: NodeDescriptor,
    /// Non-fatal problems
    pub diagnostics: Vec<NodeDiagnostic>,
}

/// Outcome of a load
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Whether the node directory had to be created
    pub created_directory: bool,
    /// Definition files read successfully
    pub files_loaded: usize,
    /// Qualified names registered, in order
    pub registered: Vec<String>,
    /// Qualified names whose previous descriptor was replaced
    pub replaced: Vec<String>,
    /// Subset of `replaced` whose descriptor actually changed
    pub modified: Vec<String>,
    /// Non-fatal problems in registered nodes
    pub diagnostics: Vec<NodeDiagnostic>,
    /// Skipped directories, files and nodes
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// Whether nothing was skipped or tolerated
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.issues.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: LoadReport) {
        self.created_directory |= other.created_directory;
        self.files_loaded += other.files_loaded;
        self.registered.extend(other.registered);
        self.replaced.extend(other.replaced);
        self.modified.extend(other.modified);
        self.diagnostics.extend(other.diagnostics);
        self.issues.extend(other.issues);
    }
}

/// Builds node descriptors from JSON definition files
#[derive(Debug, Clone)]
pub struct NodeDefinitionLoader {
    namespace: String,
}

impl Default for NodeDefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeDefinitionLoader {
    /// Create a loader using [`DEFAULT_NAMESPACE`]
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    /// Create a loader with a custom namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Namespace prefixed to node names
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key for a node name
    pub fn qualified_name(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Load every definition file below `dir` into `library`.
    ///
    /// A missing directory is created and nothing is registered.
    pub fn load_directory(&self, dir: impl AsRef<Path>, library: &mut NodeLibrary) -> LoadReport {
        let dir = dir.as_ref();
        let mut report = LoadReport::default();

        if !dir.exists() {
            match std::fs::create_dir_all(dir) {
                Ok(()) => {
                    tracing::info!("Created node definition directory: {:?}", dir);
                    report.created_directory = true;
                }
                Err(source) => {
                    let issue = LoadIssue::CreateDirectory {
                        path: dir.to_path_buf(),
                        source,
                    };
                    tracing::error!("{issue}");
                    report.issues.push(issue);
                }
            }
            return report;
        }

        if !dir.is_dir() {
            let issue = LoadIssue::NotADirectory {
                path: dir.to_path_buf(),
            };
            tracing::error!("{issue}");
            report.issues.push(issue);
            return report;
        }

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let issue = LoadIssue::from(e);
                    tracing::error!("{issue}");
                    report.issues.push(issue);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_definition_file(entry.path()) {
                continue;
            }

            match self.load_file(entry.path(), library) {
                Ok(file_report) => report.merge(file_report),
                Err(e) => {
                    tracing::error!("Failed to load node definitions: {e}");
                    report.issues.push(e.into());
                }
            }
        }

        tracing::info!(
            "Loaded {} node definitions from {:?} ({} skipped)",
            report.registered.len(),
            dir,
            report.issues.len()
        );
        report
    }

    /// Load one definition file into `library`.
    ///
    /// Fails only when the file as a whole is unusable; skipped nodes are
    /// listed in the returned report.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        library: &mut NodeLibrary,
    ) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let documents = match serde_json::from_str(&content) {
            Ok(serde_json::Value::Array(documents)) => documents,
            Ok(_) => {
                return Err(LoadError::NotAnArray {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(LoadError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut report = LoadReport {
            files_loaded: 1,
            ..LoadReport::default()
        };

        for document in documents {
            let node = document
                .get("name")
                .and_then(serde_json::Value::as_str)
                .filter(|name| !name.is_empty())
                .unwrap_or("unknown")
                .to_string();

            let built = serde_json::from_value::<NodeDefinition>(document)
                .map_err(NodeError::from)
                .and_then(|definition| self.build_node(&definition).map_err(NodeError::from));

            match built {
                Ok(built) => self.register(built, library, &mut report),
                Err(source) => {
                    let issue = LoadIssue::Node {
                        path: path.to_path_buf(),
                        node,
                        source,
                    };
                    tracing::error!("{issue}");
                    report.issues.push(issue);
                }
            }
        }

        tracing::debug!(
            "Loaded {} of {} node definitions from {:?}",
            report.registered.len(),
            report.registered.len() + report.issues.len(),
            path
        );
        Ok(report)
    }

    fn register(&self, built: BuiltNode, library: &mut NodeLibrary, report: &mut LoadReport) {
        for diagnostic in &built.diagnostics {
            match diagnostic {
                NodeDiagnostic::UnknownWidget { .. } => tracing::error!("{diagnostic}"),
                NodeDiagnostic::WidgetTypeMismatch { .. } => tracing::warn!("{diagnostic}"),
            }
        }
        report.diagnostics.extend(built.diagnostics);

        let qualified_name = built.descriptor.qualified_name.clone();
        tracing::debug!("Created node: {}", built.descriptor.title);
        if let Some(previous) = library.register(built.descriptor) {
            if library.lookup(&qualified_name) == Some(&previous) {
                tracing::debug!("Re-registered unchanged node {qualified_name}");
            } else {
                tracing::warn!("Replaced previously registered node {qualified_name}");
                report.modified.push(qualified_name.clone());
            }
            report.replaced.push(qualified_name.clone());
        }
        report.registered.push(qualified_name);
    }

    /// Build a descriptor from a parsed definition without registering it
    pub fn build_node(&self, definition: &NodeDefinition) -> Result<BuiltNode, BuildError> {
        let name = match definition.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BuildError::MissingName),
        };
        let is_pure = definition.is_pure.unwrap_or(false);
        let mut diagnostics = Vec::new();

        let input_definitions = definition.inputs.as_deref().unwrap_or_default();
        let output_definitions = definition.outputs.as_deref().unwrap_or_default();

        let mut inputs = Vec::with_capacity(input_definitions.len() + 1);
        let mut outputs = Vec::with_capacity(output_definitions.len() + 1);
        if !is_pure {
            inputs.push(Port::exec_input());
            outputs.push(Port::exec_output());
        }

        let mut seen = HashSet::new();
        for input in input_definitions {
            if let Some(key) = &input.port_id {
                if !seen.insert(key) {
                    return Err(BuildError::DuplicateInputPort { key: key.clone() });
                }
            }
            inputs.push(build_input(name, input, &mut diagnostics)?);
        }

        let mut seen = HashSet::new();
        for output in output_definitions {
            if let Some(key) = &output.port_id {
                if !seen.insert(key) {
                    return Err(BuildError::DuplicateOutputPort { key: key.clone() });
                }
            }
            outputs.push(build_output(output)?);
        }

        let descriptor = NodeDescriptor {
            qualified_name: self.qualified_name(name),
            name: name.to_string(),
            package: definition
                .package
                .clone()
                .unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            title: definition.title.clone().unwrap_or_else(|| name.to_string()),
            description: definition.description.clone().unwrap_or_default(),
            is_pure,
            inputs,
            outputs,
            stored: true,
        };

        Ok(BuiltNode {
            descriptor,
            diagnostics,
        })
    }
}

fn port_kind(name: &str, kind: Option<&str>) -> Result<PortKind, BuildError> {
    match kind {
        None => Ok(PortKind::Data),
        Some(kind) => PortKind::from_name(kind).ok_or_else(|| BuildError::UnknownPortKind {
            port: name.to_string(),
            kind: kind.to_string(),
        }),
    }
}

fn data_type(name: Option<&str>) -> DataType {
    TypeRegistry::global()
        .resolve(name.unwrap_or("Any"))
        .data_type
}

fn build_input(
    node: &str,
    input: &InputDefinition,
    diagnostics: &mut Vec<NodeDiagnostic>,
) -> Result<Port, BuildError> {
    let name = input.name.clone().unwrap_or_default();
    let kind = port_kind(&name, input.kind.as_deref())?;
    let data_type = data_type(input.data_type.as_deref());

    let mut port = Port::new(name, kind, data_type, PortDirection::Input);
    port.accepts_input = input.has_input.unwrap_or(true);
    port.key = input.port_id.clone();

    if let Some(widget_name) = &input.pin_widget {
        match PinWidget::from_name(widget_name) {
            Some(widget) => {
                if !widget.accepts(data_type) {
                    diagnostics.push(NodeDiagnostic::WidgetTypeMismatch {
                        node: node.to_string(),
                        port: port.name.clone(),
                        widget,
                        data_type,
                    });
                }
                port.widget = Some(widget);
            }
            None => diagnostics.push(NodeDiagnostic::UnknownWidget {
                node: node.to_string(),
                port: port.name.clone(),
                widget: widget_name.clone(),
            }),
        }
    }

    Ok(port)
}

fn build_output(output: &OutputDefinition) -> Result<Port, BuildError> {
    let name = output.name.clone().unwrap_or_default();
    let kind = port_kind(&name, output.kind.as_deref())?;
    let data_type = data_type(output.data_type.as_deref());

    let mut port = Port::new(name, kind, data_type, PortDirection::Output);
    if let Some(key) = &output.port_id {
        port = port.with_key(key.clone());
    }
    if output.hide_icon.unwrap_or(false) {
        port = port.with_hidden_icon();
    }
    Ok(port)
}
