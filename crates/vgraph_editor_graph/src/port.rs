// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::dtype::DataType;
use crate::widget::PinWidget;
use serde::{Deserialize, Serialize};

/// Stable identifier a node definition may give to a port.
///
/// Strings and numbers are distinct keys: `"1"` and `1` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortKey {
    /// Named key
    Name(String),
    /// Numeric key
    Number(serde_json::Number),
}

impl std::fmt::Display for PortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// What flows through a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// Values
    Data,
    /// Execution flow
    Exec,
}

impl PortKind {
    /// Parse a kind name (`"data"` or `"exec"`, any case)
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("data") {
            Some(Self::Data)
        } else if name.eq_ignore_ascii_case("exec") {
            Some(Self::Exec)
        } else {
            None
        }
    }
}

/// A port on a node descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port name (empty for the implicit exec pins)
    pub name: String,
    /// Data or exec
    pub kind: PortKind,
    /// Data type (`Any` for exec pins)
    pub data_type: DataType,
    /// Port direction
    pub direction: PortDirection,
    /// Stable identifier, if the definition gave one
    pub key: Option<PortKey>,
    /// Widget override (inputs)
    pub widget: Option<PinWidget>,
    /// Whether an unconnected input shows an inline editor
    pub accepts_input: bool,
    /// Whether the type icon is hidden (outputs)
    pub hide_icon: bool,
}

impl Port {
    /// Create a new port
    pub fn new(
        name: impl Into<String>,
        kind: PortKind,
        data_type: DataType,
        direction: PortDirection,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            data_type,
            direction,
            key: None,
            widget: None,
            accepts_input: direction == PortDirection::Input,
            hide_icon: false,
        }
    }

    /// Create a new data input port
    pub fn input(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, PortKind::Data, data_type, PortDirection::Input)
    }

    /// Create a new data output port
    pub fn output(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, PortKind::Data, data_type, PortDirection::Output)
    }

    /// Create an unnamed exec input
    pub fn exec_input() -> Self {
        Self::new("", PortKind::Exec, DataType::Any, PortDirection::Input)
    }

    /// Create an unnamed exec output
    pub fn exec_output() -> Self {
        Self::new("", PortKind::Exec, DataType::Any, PortDirection::Output)
    }

    /// Set the stable key
    pub fn with_key(mut self, key: PortKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the widget override
    pub fn with_widget(mut self, widget: PinWidget) -> Self {
        self.widget = Some(widget);
        self
    }

    /// Disable the inline editor
    pub fn without_input(mut self) -> Self {
        self.accepts_input = false;
        self
    }

    /// Hide the type icon
    pub fn with_hidden_icon(mut self) -> Self {
        self.hide_icon = true;
        self
    }

    /// Whether this is an exec port
    pub fn is_exec(&self) -> bool {
        self.kind == PortKind::Exec
    }

    /// Widget shown for an unconnected input: the override, else the type default
    pub fn effective_widget(&self) -> Option<PinWidget> {
        if self.direction != PortDirection::Input || self.is_exec() || !self.accepts_input {
            return None;
        }
        self.widget.or_else(|| self.data_type.default_widget())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_key_json_forms() {
        let name: PortKey = serde_json::from_str("\"a\"").unwrap();
        let number: PortKey = serde_json::from_str("1").unwrap();
        let text_one: PortKey = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(name, PortKey::Name("a".to_string()));
        assert!(matches!(number, PortKey::Number(_)));
        assert_ne!(number, text_one);
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(PortKind::from_name("EXEC"), Some(PortKind::Exec));
        assert_eq!(PortKind::from_name("data"), Some(PortKind::Data));
        assert_eq!(PortKind::from_name("flow"), None);
    }

    #[test]
    fn test_effective_widget() {
        let port = Port::input("count", DataType::Integer);
        assert_eq!(port.effective_widget(), Some(PinWidget::IntInput));

        let port = Port::input("label", DataType::Any).with_widget(PinWidget::StringInput);
        assert_eq!(port.effective_widget(), Some(PinWidget::StringInput));

        let port = Port::input("count", DataType::Integer).without_input();
        assert_eq!(port.effective_widget(), None);

        assert_eq!(Port::exec_input().effective_widget(), None);
        assert_eq!(Port::output("sum", DataType::Float).effective_widget(), None);
    }
}
