// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data types that flow through node pins.
//!
//! The type registry maps the free-form type names found in node definitions
//! to a closed set of [`DataType`]s, and each data type to its default value,
//! display color and widget associations.

use crate::widget::{PinWidget, PreviewWidget};
use egui::Color32;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Color used for type names the registry does not recognise
pub const DEFAULT_TYPE_COLOR: Color32 = Color32::from_rgb(0x07, 0x47, 0xbb);

/// Data type carried by a data pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Whole number
    Integer,
    /// Boolean flag
    Bool,
    /// Floating point number
    Float,
    /// Text
    String,
    /// Ordered sequence
    Array,
    /// String-keyed mapping
    Dict,
    /// Arbitrary object reference
    Class,
    /// 2D vector
    Vector,
    /// File handle
    File,
    /// Tabular data
    Table,
    /// Single table column
    Column,
    /// Accepts anything
    Any,
}

impl DataType {
    /// All data types, in palette order
    pub fn all() -> &'static [DataType] {
        &[
            DataType::Integer,
            DataType::Bool,
            DataType::Float,
            DataType::String,
            DataType::Array,
            DataType::Dict,
            DataType::Class,
            DataType::Vector,
            DataType::File,
            DataType::Table,
            DataType::Column,
            DataType::Any,
        ]
    }

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "Integer",
            DataType::Bool => "Bool",
            DataType::Float => "Float",
            DataType::String => "String",
            DataType::Array => "Array",
            DataType::Dict => "Dict",
            DataType::Class => "Class",
            DataType::Vector => "Vector",
            DataType::File => "File",
            DataType::Table => "Table",
            DataType::Column => "Column",
            DataType::Any => "Any",
        }
    }

    /// Parse a type name, accepting synonyms in any case.
    ///
    /// Returns `None` for names outside the known set; use
    /// [`TypeRegistry::resolve`] to get the `Any` fallback instead.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => DataType::Integer,
            "bool" | "boolean" => DataType::Bool,
            "float" | "double" => DataType::Float,
            "str" | "string" => DataType::String,
            "list" | "array" => DataType::Array,
            "dict" | "dictionary" => DataType::Dict,
            "class" | "object" => DataType::Class,
            "vector" => DataType::Vector,
            "file" => DataType::File,
            "table" | "dataframe" => DataType::Table,
            "column" => DataType::Column,
            "any" => DataType::Any,
            _ => return None,
        };
        Some(ty)
    }

    /// Zero value for this type
    pub fn default_value(&self) -> Value {
        match self {
            DataType::Integer => Value::Int(0),
            DataType::Float => Value::Float(0.0),
            DataType::String => Value::String(String::new()),
            DataType::Array => Value::Array(Vec::new()),
            DataType::Dict => Value::Dict(IndexMap::new()),
            DataType::Bool => Value::Bool(false),
            DataType::Vector => Value::Vector([0.0, 0.0]),
            DataType::Class
            | DataType::File
            | DataType::Table
            | DataType::Column
            | DataType::Any => Value::Null,
        }
    }

    /// Pin color for this type
    pub fn color(&self) -> Color32 {
        match self {
            DataType::Float => Color32::from_rgb(0x2f, 0xff, 0x09),
            DataType::Integer => Color32::from_rgb(0x00, 0x80, 0x00),
            DataType::Bool => Color32::from_rgb(0xff, 0x06, 0x06),
            DataType::String => Color32::from_rgb(0xbe, 0x0b, 0xa0),
            DataType::Array => Color32::from_rgb(0xd4, 0xaa, 0x24),
            DataType::Dict => Color32::from_rgb(0xed, 0x6c, 0x03),
            DataType::Class => Color32::from_rgb(0x07, 0x47, 0xbb),
            DataType::Vector => Color32::from_rgb(0x05, 0x5c, 0x54),
            DataType::File => Color32::from_rgb(0xb9, 0x2e, 0xe6),
            DataType::Table => Color32::from_rgb(0x00, 0xbf, 0xff),
            DataType::Column => Color32::from_rgb(0x00, 0xff, 0xff),
            DataType::Any => Color32::WHITE,
        }
    }

    /// Widget used to edit an unconnected input of this type
    pub fn default_widget(&self) -> Option<PinWidget> {
        match self {
            DataType::Integer => Some(PinWidget::IntInput),
            DataType::Bool => Some(PinWidget::Checkbox),
            DataType::String => Some(PinWidget::StringInput),
            DataType::Float => Some(PinWidget::FloatInput),
            _ => None,
        }
    }

    /// Widget used to preview values of this type on the node body
    pub fn preview_widget(&self) -> Option<PreviewWidget> {
        match self {
            DataType::Table => Some(PreviewWidget::TablePreview),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Value that can be held by a pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value (reference types before assignment)
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Sequence of values
    Array(Vec<Value>),
    /// Ordered mapping
    Dict(IndexMap<String, Value>),
    /// 2D vector
    Vector([f64; 2]),
}

impl Value {
    /// Whether this is the null sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Registry entry describing a data type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// The data type
    pub data_type: DataType,
    /// Zero value
    pub default_value: Value,
    /// Pin color
    pub color: Color32,
    /// Default edit widget
    pub widget: Option<PinWidget>,
    /// Preview widget
    pub preview: Option<PreviewWidget>,
}

impl TypeDescriptor {
    fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            default_value: data_type.default_value(),
            color: data_type.color(),
            widget: data_type.default_widget(),
            preview: data_type.preview_widget(),
        }
    }

    /// Canonical name
    pub fn name(&self) -> &'static str {
        self.data_type.name()
    }
}

static REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);

/// Lookup table from type names to [`TypeDescriptor`]s.
///
/// Built once on first use and read-only afterwards.
#[derive(Debug)]
pub struct TypeRegistry {
    descriptors: IndexMap<DataType, TypeDescriptor>,
}

impl TypeRegistry {
    fn new() -> Self {
        let descriptors = DataType::all()
            .iter()
            .map(|ty| (*ty, TypeDescriptor::new(*ty)))
            .collect();
        Self { descriptors }
    }

    /// The process-wide registry
    pub fn global() -> &'static TypeRegistry {
        &REGISTRY
    }

    /// Resolve a type name to its descriptor, falling back to `Any`
    pub fn resolve(&self, name: &str) -> &TypeDescriptor {
        let ty = DataType::from_name(name).unwrap_or(DataType::Any);
        self.descriptor(ty)
    }

    /// Descriptor for a data type
    pub fn descriptor(&self, data_type: DataType) -> &TypeDescriptor {
        // every DataType is inserted by `new`
        &self.descriptors[&data_type]
    }

    /// Zero value for a data type
    pub fn default_value(&self, data_type: DataType) -> Value {
        self.descriptor(data_type).default_value.clone()
    }

    /// Pin color for a data type
    pub fn display_color(&self, data_type: DataType) -> Color32 {
        self.descriptor(data_type).color
    }

    /// Pin color for a type name, or [`DEFAULT_TYPE_COLOR`] if unrecognised
    pub fn display_color_for_name(&self, name: &str) -> Color32 {
        DataType::from_name(name)
            .map(|ty| self.display_color(ty))
            .unwrap_or(DEFAULT_TYPE_COLOR)
    }

    /// All descriptors, in palette order
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_resolve_case_insensitively() {
        let registry = TypeRegistry::global();
        for name in ["INT", "Integer", "int", " integer "] {
            assert_eq!(registry.resolve(name).data_type, DataType::Integer);
        }
        assert_eq!(registry.resolve("Double").data_type, DataType::Float);
        assert_eq!(registry.resolve("STR").data_type, DataType::String);
        assert_eq!(registry.resolve("list").data_type, DataType::Array);
        assert_eq!(registry.resolve("Dictionary").data_type, DataType::Dict);
        assert_eq!(registry.resolve("object").data_type, DataType::Class);
        assert_eq!(registry.resolve("DataFrame").data_type, DataType::Table);
        assert_eq!(registry.resolve("boolean").data_type, DataType::Bool);
    }

    #[test]
    fn test_unknown_names_fall_back_to_any() {
        let registry = TypeRegistry::global();
        for name in ["", "   ", "quaternion", "int64"] {
            assert_eq!(registry.resolve(name).data_type, DataType::Any);
        }
    }

    #[test]
    fn test_default_values() {
        let registry = TypeRegistry::global();
        assert_eq!(registry.default_value(DataType::Integer), Value::Int(0));
        assert_eq!(registry.default_value(DataType::Float), Value::Float(0.0));
        assert_eq!(registry.default_value(DataType::String), Value::String(String::new()));
        assert_eq!(registry.default_value(DataType::Vector), Value::Vector([0.0, 0.0]));
        assert_eq!(registry.default_value(DataType::Bool), Value::Bool(false));
        assert!(registry.default_value(DataType::Table).is_null());
        assert!(registry.default_value(DataType::Any).is_null());
    }

    #[test]
    fn test_colors() {
        let registry = TypeRegistry::global();
        assert_eq!(registry.display_color(DataType::Any), Color32::WHITE);
        assert_eq!(registry.display_color_for_name("float"), Color32::from_rgb(0x2f, 0xff, 0x09));
        assert_eq!(registry.display_color_for_name("no such type"), DEFAULT_TYPE_COLOR);
    }

    #[test]
    fn test_widget_associations() {
        let registry = TypeRegistry::global();
        assert_eq!(registry.resolve("int").widget, Some(PinWidget::IntInput));
        assert_eq!(registry.resolve("bool").widget, Some(PinWidget::Checkbox));
        assert_eq!(registry.resolve("table").widget, None);
        assert_eq!(registry.resolve("table").preview, Some(PreviewWidget::TablePreview));
        assert_eq!(registry.descriptors().count(), DataType::all().len());
    }
}
