// SPDX-License-Identifier: MIT OR Apache-2.0
//! Widget kinds attached to pins and node bodies.

use crate::dtype::DataType;
use serde::{Deserialize, Serialize};

/// Inline editor shown next to an unconnected input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinWidget {
    /// Integer spin box
    IntInput,
    /// Float spin box
    FloatInput,
    /// Single-line text field
    StringInput,
    /// Checkbox
    Checkbox,
}

impl PinWidget {
    /// All pin widgets
    pub fn all() -> &'static [PinWidget] {
        &[
            PinWidget::IntInput,
            PinWidget::FloatInput,
            PinWidget::StringInput,
            PinWidget::Checkbox,
        ]
    }

    /// Identifier used in node definition files
    pub fn name(&self) -> &'static str {
        match self {
            PinWidget::IntInput => "IntInput",
            PinWidget::FloatInput => "FloatInput",
            PinWidget::StringInput => "StringInput",
            PinWidget::Checkbox => "Checkbox",
        }
    }

    /// Look up a widget by identifier.
    ///
    /// Matching is exact; the older `*Wdg` identifiers are accepted too.
    /// Unknown identifiers yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "IntInput" | "IntInputWdg" => Some(PinWidget::IntInput),
            "FloatInput" | "FloatInputWdg" => Some(PinWidget::FloatInput),
            "StringInput" | "StringInputWdg" => Some(PinWidget::StringInput),
            "Checkbox" | "CheckboxWdg" => Some(PinWidget::Checkbox),
            _ => None,
        }
    }

    /// Whether this widget can edit values of the given type
    pub fn accepts(&self, data_type: DataType) -> bool {
        match self {
            PinWidget::IntInput | PinWidget::FloatInput => {
                matches!(data_type, DataType::Integer | DataType::Float | DataType::Any)
            }
            PinWidget::StringInput => {
                matches!(data_type, DataType::String | DataType::File | DataType::Any)
            }
            PinWidget::Checkbox => matches!(data_type, DataType::Bool | DataType::Any),
        }
    }
}

/// Read-only preview drawn on the node body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreviewWidget {
    /// Scrollable table grid
    TablePreview,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        for widget in PinWidget::all() {
            assert_eq!(PinWidget::from_name(widget.name()), Some(*widget));
        }
        assert_eq!(PinWidget::from_name("CheckboxWdg"), Some(PinWidget::Checkbox));
        assert_eq!(PinWidget::from_name("NoSuchWidget"), None);
        assert_eq!(PinWidget::from_name("checkbox"), None);
        assert_eq!(PinWidget::from_name(""), None);
    }

    #[test]
    fn test_accepts() {
        assert!(PinWidget::IntInput.accepts(DataType::Float));
        assert!(PinWidget::Checkbox.accepts(DataType::Any));
        assert!(!PinWidget::Checkbox.accepts(DataType::String));
        assert!(!PinWidget::StringInput.accepts(DataType::Table));
    }
}
