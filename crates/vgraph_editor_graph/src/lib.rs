// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node library for the Visual Graph editor.
//!
//! This crate provides the data-driven core behind the editor's node palette:
//! - A type registry mapping type names to colors, defaults and widgets
//! - Node descriptors with typed input/output ports
//! - A process-wide node library keyed by qualified name
//! - A loader that builds descriptors from JSON definition files
//!
//! ## Architecture
//!
//! Node types are plain values, not generated types. The loader turns each
//! definition document into an immutable [`NodeDescriptor`] and registers it
//! in a [`NodeLibrary`]; the editor queries the library by qualified name.

pub mod definition;
pub mod dtype;
pub mod library;
pub mod loader;
pub mod node;
pub mod port;
pub mod widget;

pub use dtype::{DataType, TypeDescriptor, TypeRegistry, Value};
pub use library::NodeLibrary;
pub use loader::{LoadReport, NodeDefinitionLoader};
pub use node::{NodeDescriptor, NodeId, NodeInstance};
pub use port::{Port, PortDirection, PortKey, PortKind};
pub use widget::{PinWidget, PreviewWidget};
