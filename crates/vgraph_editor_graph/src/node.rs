// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node descriptors and the instances spawned from them.

use crate::dtype::{TypeRegistry, Value};
use crate::port::{Port, PortKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Package used when a definition does not name one
pub const DEFAULT_PACKAGE: &str = "Custom Nodes";

/// Unique identifier for a node instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type definition, keyed in the library by its qualified name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Registry key, `<namespace>.<name>`
    pub qualified_name: String,
    /// Declared name
    pub name: String,
    /// Palette group
    pub package: String,
    /// Display title
    pub title: String,
    /// Description
    pub description: String,
    /// Pure nodes have no exec pins
    pub is_pure: bool,
    /// Input ports, in order
    pub inputs: Vec<Port>,
    /// Output ports, in order
    pub outputs: Vec<Port>,
    /// Whether instances are saved with the graph
    pub stored: bool,
}

impl NodeDescriptor {
    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get an input port by its stable key
    pub fn input_by_key(&self, key: &PortKey) -> Option<&Port> {
        self.inputs.iter().find(|p| p.key.as_ref() == Some(key))
    }

    /// Get an output port by its stable key
    pub fn output_by_key(&self, key: &PortKey) -> Option<&Port> {
        self.outputs.iter().find(|p| p.key.as_ref() == Some(key))
    }

    /// Data (non-exec) inputs
    pub fn data_inputs(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().filter(|p| !p.is_exec())
    }

    /// Whether the node carries any exec pin
    pub fn has_exec_ports(&self) -> bool {
        self.ports().any(Port::is_exec)
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// A node placed on a graph canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInstance {
    /// Unique instance ID
    pub id: NodeId,
    /// Qualified name of the descriptor
    pub node_type: String,
    /// Display name (can be customized)
    pub name: String,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Current value of each input; `None` for exec inputs
    pub input_values: Vec<Option<Value>>,
}

impl NodeInstance {
    /// Create a new instance from a descriptor
    pub fn new(descriptor: &NodeDescriptor) -> Self {
        let types = TypeRegistry::global();
        let input_values = descriptor
            .inputs
            .iter()
            .map(|port| (!port.is_exec()).then(|| types.default_value(port.data_type)))
            .collect();

        Self {
            id: NodeId::new(),
            node_type: descriptor.qualified_name.clone(),
            name: descriptor.title.clone(),
            position: [0.0, 0.0],
            input_values,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Current value of an input
    pub fn input_value(&self, index: usize) -> Option<&Value> {
        self.input_values.get(index).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DataType;

    fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            qualified_name: "json_nodes.Add".to_string(),
            name: "Add".to_string(),
            package: DEFAULT_PACKAGE.to_string(),
            title: "Add".to_string(),
            description: String::new(),
            is_pure: false,
            inputs: vec![
                Port::exec_input(),
                Port::input("a", DataType::Integer).with_key(PortKey::Name("a".to_string())),
                Port::input("b", DataType::Table),
            ],
            outputs: vec![Port::exec_output(), Port::output("sum", DataType::Integer)],
            stored: true,
        }
    }

    #[test]
    fn test_port_lookup() {
        let node = descriptor();
        let key = PortKey::Name("a".to_string());
        assert_eq!(node.input_by_key(&key).map(|p| p.name.as_str()), Some("a"));
        assert!(node.output_by_key(&key).is_none());
        assert_eq!(node.data_inputs().count(), 2);
        assert!(node.has_exec_ports());
        assert_eq!(node.ports().count(), 5);
    }

    #[test]
    fn test_instance_defaults() {
        let node = descriptor();
        let instance = NodeInstance::new(&node).with_position(10.0, 20.0);
        assert_eq!(instance.node_type, "json_nodes.Add");
        assert_eq!(instance.position, [10.0, 20.0]);
        assert_eq!(instance.input_value(0), None);
        assert_eq!(instance.input_value(1), Some(&Value::Int(0)));
        assert_eq!(instance.input_value(2), Some(&Value::Null));
        assert_ne!(instance.id, NodeInstance::new(&node).id);
    }
}
