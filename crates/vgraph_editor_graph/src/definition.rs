// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative node definitions as they appear in `.json` files.
//!
//! A definition file holds a JSON array of node objects. Every field except
//! `name` is optional; defaults are applied when the node is built, not here,
//! so that `null` and an absent field mean the same thing.

use crate::port::PortKey;
use serde::{Deserialize, Serialize};

/// One node object from a definition file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefinition {
    /// Node name, unique within the loader namespace
    pub name: Option<String>,
    /// Palette group
    pub package: Option<String>,
    /// Display title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Whether the node has no exec pins
    pub is_pure: Option<bool>,
    /// Declared inputs
    pub inputs: Option<Vec<InputDefinition>>,
    /// Declared outputs
    pub outputs: Option<Vec<OutputDefinition>>,
}

/// One entry of a node's `inputs` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefinition {
    /// Pin name
    pub name: Option<String>,
    /// `"data"` or `"exec"`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Type name, resolved through the type registry
    pub data_type: Option<String>,
    /// Whether an unconnected pin shows an inline editor
    pub has_input: Option<bool>,
    /// Widget identifier overriding the type default
    pub pin_widget: Option<String>,
    /// Stable port identifier
    pub port_id: Option<PortKey>,
}

/// One entry of a node's `outputs` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDefinition {
    /// Pin name
    pub name: Option<String>,
    /// `"data"` or `"exec"`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Type name, resolved through the type registry
    pub data_type: Option<String>,
    /// Whether the type icon is hidden
    pub hide_icon: Option<bool>,
    /// Stable port identifier
    pub port_id: Option<PortKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_definition() {
        let json = r#"{
            "name": "Add",
            "package": "Math",
            "is_pure": true,
            "inputs": [
                {"name": "a", "data_type": "int", "port_id": "a", "pin_widget": "IntInput"},
                {"name": "b", "type": "data", "data_type": "int", "port_id": 2, "has_input": false}
            ],
            "outputs": [{"name": "sum", "data_type": "int", "hide_icon": true, "port_id": null}],
            "color": "ignored"
        }"#;
        let def: NodeDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.name.as_deref(), Some("Add"));
        assert_eq!(def.is_pure, Some(true));
        let inputs = def.inputs.unwrap();
        let outputs = def.outputs.unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].port_id, Some(PortKey::Name("a".to_string())));
        assert_eq!(inputs[1].has_input, Some(false));
        assert_eq!(outputs[0].port_id, None);
        assert_eq!(outputs[0].hide_icon, Some(true));
    }

    #[test]
    fn test_parse_minimal_definition() {
        let def: NodeDefinition =
            serde_json::from_str(r#"{"name": "Noop", "title": null, "inputs": null}"#).unwrap();
        assert_eq!(def.title, None);
        assert_eq!(def.inputs, None);
        assert_eq!(def.outputs, None);
    }
}
