// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor window: the node palette.
//!
//! The palette is a snapshot of the node library grouped by package. It is
//! rebuilt whenever the library changes (startup and hot reload).

use crate::app::{EditorError, Result};
use crate::settings::EditorSettings;
use egui::{Color32, RichText};
use std::path::Path;
use vgraph_editor_graph::node::NodeInstance;
use vgraph_editor_graph::port::Port;
use vgraph_editor_graph::{DataType, NodeDescriptor, NodeLibrary, TypeRegistry};

/// Pin color for exec ports
pub const EXEC_PIN_COLOR: Color32 = Color32::from_rgb(200, 200, 200);

/// Decoded window icon
#[derive(Debug, Clone)]
pub struct WindowIcon {
    /// RGBA8 pixels, row-major
    pub rgba: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WindowIcon {
    /// Decode an icon file
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .map_err(|source| EditorError::WindowIcon {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            rgba: image.into_raw(),
            width,
            height,
        })
    }
}

/// One node in the palette
#[derive(Debug, Clone)]
pub struct PaletteEntry {
    /// Registry key
    pub qualified_name: String,
    /// Display title
    pub title: String,
    /// Tooltip
    pub description: String,
    /// Pin colors of the inputs, in order
    pub input_colors: Vec<Color32>,
    /// Pin colors of the outputs, in order
    pub output_colors: Vec<Color32>,
}

impl PaletteEntry {
    fn new(descriptor: &NodeDescriptor) -> Self {
        Self {
            qualified_name: descriptor.qualified_name.clone(),
            title: descriptor.title.clone(),
            description: descriptor.description.clone(),
            input_colors: descriptor.inputs.iter().map(pin_color).collect(),
            output_colors: descriptor.outputs.iter().map(pin_color).collect(),
        }
    }
}

/// Color a pin is drawn with
pub fn pin_color(port: &Port) -> Color32 {
    if port.is_exec() {
        EXEC_PIN_COLOR
    } else {
        TypeRegistry::global().display_color(port.data_type)
    }
}

/// Palette entries grouped by package
#[derive(Debug, Clone, Default)]
pub struct NodePalette {
    /// `(package, entries)` in library order
    pub packages: Vec<(String, Vec<PaletteEntry>)>,
}

impl NodePalette {
    /// Snapshot a library
    pub fn from_library(library: &NodeLibrary) -> Self {
        let packages = library
            .packages()
            .into_iter()
            .map(|(package, descriptors)| {
                let entries = descriptors.into_iter().map(PaletteEntry::new).collect();
                (package.to_string(), entries)
            })
            .collect();
        Self { packages }
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.packages.iter().map(|(_, entries)| entries.len()).sum()
    }

    /// Whether the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an entry by qualified name
    #[cfg(test)]
    pub fn entry(&self, qualified_name: &str) -> Option<&PaletteEntry> {
        self.packages
            .iter()
            .flat_map(|(_, entries)| entries)
            .find(|entry| entry.qualified_name == qualified_name)
    }
}

/// The main editor window
pub struct MainWindow {
    /// Window title
    pub title: String,
    /// Window icon
    pub icon: Option<WindowIcon>,
    /// Node palette
    pub palette: NodePalette,
    /// Nodes spawned from the palette, not yet placed on a graph
    pub spawned: Vec<NodeInstance>,
    icon_texture: Option<egui::TextureHandle>,
    filter: String,
}

impl MainWindow {
    /// Construct the window for the current library contents
    pub fn new(settings: &EditorSettings, library: &NodeLibrary) -> Result<Self> {
        let icon = settings
            .window_icon
            .as_deref()
            .map(WindowIcon::load)
            .transpose()?;

        let palette = NodePalette::from_library(library);
        if palette.is_empty() {
            tracing::warn!("Node library is empty, palette has nothing to show");
        }
        tracing::info!(
            "Created main window \"{}\" with {} nodes in {} packages",
            settings.window_title,
            palette.len(),
            palette.packages.len()
        );

        Ok(Self {
            title: settings.window_title.clone(),
            icon,
            palette,
            spawned: Vec::new(),
            icon_texture: None,
            filter: String::new(),
        })
    }

    /// Rebuild the palette after the library changed
    pub fn refresh(&mut self, library: &NodeLibrary) {
        self.palette = NodePalette::from_library(library);
        tracing::debug!("Palette refreshed: {} nodes", self.palette.len());
    }

    /// Spawn an instance of a palette node
    pub fn spawn(&mut self, library: &NodeLibrary, qualified_name: &str) -> bool {
        match library.create_instance(qualified_name) {
            Some(instance) => {
                tracing::debug!("Spawned {} ({:?})", qualified_name, instance.id);
                self.spawned.push(instance);
                true
            }
            None => {
                tracing::warn!("Node {qualified_name} is no longer registered");
                false
            }
        }
    }

    /// Run one frame of the window UI
    pub fn show(&mut self, ctx: &egui::Context, library: &NodeLibrary) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| self.ui(ctx, library));
    }

    /// Draw the window contents
    pub fn ui(&mut self, ctx: &egui::Context, library: &NodeLibrary) {
        let mut clicked = None;

        if self.icon_texture.is_none() {
            if let Some(icon) = &self.icon {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [icon.width as usize, icon.height as usize],
                    &icon.rgba,
                );
                self.icon_texture =
                    Some(ctx.load_texture("window_icon", image, egui::TextureOptions::default()));
            }
        }

        egui::SidePanel::left("node_palette")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Nodes");
                ui.text_edit_singleline(&mut self.filter);
                ui.separator();

                let filter = self.filter.to_lowercase();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (package, entries) in &self.palette.packages {
                        egui::CollapsingHeader::new(package)
                            .default_open(true)
                            .show(ui, |ui| {
                                for entry in entries
                                    .iter()
                                    .filter(|e| e.title.to_lowercase().contains(&filter))
                                {
                                    if palette_entry_ui(ui, entry) {
                                        clicked = Some(entry.qualified_name.clone());
                                    }
                                }
                            });
                    }
                });
            });

        egui::TopBottomPanel::bottom("type_legend").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for descriptor in TypeRegistry::global().descriptors() {
                    type_chip(ui, descriptor.data_type);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(texture) = &self.icon_texture {
                    let sized = egui::load::SizedTexture::new(texture.id(), egui::vec2(24.0, 24.0));
                    ui.add(egui::Image::new(sized));
                }
                ui.label(RichText::new(&self.title).heading());
            });
            ui.label(format!("{} nodes spawned", self.spawned.len()));
        });

        if let Some(qualified_name) = clicked {
            self.spawn(library, &qualified_name);
        }
    }
}

fn pin_dots(ui: &mut egui::Ui, colors: &[Color32]) {
    for color in colors {
        ui.label(RichText::new("●").color(*color));
    }
}

fn palette_entry_ui(ui: &mut egui::Ui, entry: &PaletteEntry) -> bool {
    ui.horizontal(|ui| {
        pin_dots(ui, &entry.input_colors);
        let response = ui.button(&entry.title);
        pin_dots(ui, &entry.output_colors);
        let response = if entry.description.is_empty() {
            response
        } else {
            response.on_hover_text(&entry.description)
        };
        response.clicked()
    })
    .inner
}

fn type_chip(ui: &mut egui::Ui, data_type: DataType) {
    let color = TypeRegistry::global().display_color(data_type);
    ui.label(RichText::new("■").color(color));
    ui.label(data_type.name());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> NodeLibrary {
        let mut library = NodeLibrary::new();
        library.register(NodeDescriptor {
            qualified_name: "json_nodes.Add".to_string(),
            name: "Add".to_string(),
            package: "Math".to_string(),
            title: "Add".to_string(),
            description: "Adds two numbers".to_string(),
            is_pure: false,
            inputs: vec![Port::exec_input(), Port::input("a", DataType::Integer)],
            outputs: vec![Port::exec_output(), Port::output("sum", DataType::Float)],
            stored: true,
        });
        library
    }

    #[test]
    fn test_palette_snapshot() {
        let palette = NodePalette::from_library(&library());
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.packages[0].0, "Math");

        let entry = palette.entry("json_nodes.Add").unwrap();
        assert_eq!(entry.input_colors, [EXEC_PIN_COLOR, DataType::Integer.color()]);
        assert_eq!(entry.output_colors, [EXEC_PIN_COLOR, DataType::Float.color()]);
        assert!(NodePalette::default().is_empty());
    }

    #[test]
    fn test_missing_icon_fails_construction() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = EditorSettings {
            window_icon: Some(tmp.path().join("icon.png")),
            ..EditorSettings::default()
        };
        let result = MainWindow::new(&settings, &library());
        assert!(matches!(result, Err(EditorError::WindowIcon { .. })));
    }

    #[test]
    fn test_spawn_and_refresh() {
        let mut library = library();
        let mut window = MainWindow::new(&EditorSettings::default(), &library).unwrap();
        assert!(window.spawn(&library, "json_nodes.Add"));
        assert!(!window.spawn(&library, "json_nodes.Missing"));
        assert_eq!(window.spawned.len(), 1);

        library.register(NodeDescriptor {
            qualified_name: "json_nodes.Print".to_string(),
            name: "Print".to_string(),
            package: "Debug".to_string(),
            title: "Print".to_string(),
            description: String::new(),
            is_pure: false,
            inputs: vec![Port::exec_input()],
            outputs: vec![Port::exec_output()],
            stored: true,
        });
        window.refresh(&library);
        assert_eq!(window.palette.len(), 2);
    }

    #[test]
    fn test_headless_frame() {
        let library = library();
        let mut window = MainWindow::new(&EditorSettings::default(), &library).unwrap();
        let ctx = egui::Context::default();
        window.show(&ctx, &library);
        assert!(window.spawned.is_empty());
    }
}
