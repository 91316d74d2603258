// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of available node descriptors.
//!
//! The process-wide library returned by [`global`] starts empty, is filled by
//! the node definition loader during startup (and again on hot reload), and
//! is only read by the editor UI afterwards. Entries are never evicted.

use crate::node::{NodeDescriptor, NodeInstance};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::LazyLock;

static GLOBAL_LIBRARY: LazyLock<RwLock<NodeLibrary>> =
    LazyLock::new(|| RwLock::new(NodeLibrary::new()));

/// The process-wide node library
pub fn global() -> &'static RwLock<NodeLibrary> {
    &GLOBAL_LIBRARY
}

/// Node descriptors keyed by qualified name
#[derive(Debug, Clone, Default)]
pub struct NodeLibrary {
    descriptors: IndexMap<String, NodeDescriptor>,
}

impl NodeLibrary {
    /// Create a new empty library
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    /// Register a descriptor under its qualified name.
    ///
    /// An existing entry with the same name is replaced and returned; it keeps
    /// its position in the palette order.
    pub fn register(&mut self, descriptor: NodeDescriptor) -> Option<NodeDescriptor> {
        self.descriptors
            .insert(descriptor.qualified_name.clone(), descriptor)
    }

    /// Get a descriptor by qualified name
    pub fn lookup(&self, qualified_name: &str) -> Option<&NodeDescriptor> {
        self.descriptors.get(qualified_name)
    }

    /// Whether a qualified name is registered
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.descriptors.contains_key(qualified_name)
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors, in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.descriptors.values()
    }

    /// Descriptors grouped by package, packages in first-seen order
    pub fn packages(&self) -> IndexMap<&str, Vec<&NodeDescriptor>> {
        let mut packages: IndexMap<&str, Vec<&NodeDescriptor>> = IndexMap::new();
        for descriptor in self.descriptors.values() {
            packages
                .entry(descriptor.package.as_str())
                .or_default()
                .push(descriptor);
        }
        packages
    }

    /// Spawn an instance of a registered node
    pub fn create_instance(&self, qualified_name: &str) -> Option<NodeInstance> {
        self.lookup(qualified_name).map(NodeInstance::new)
    }
}
