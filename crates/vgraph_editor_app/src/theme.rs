// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor stylesheet.
//!
//! A theme is a small RON file (dark/light base, accent color, rounding and
//! spacing) turned into an egui [`Style`] and applied before any window is
//! constructed.

use egui::{Color32, Rounding, Stroke, Style, Visuals};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemePreset {
    /// Dark theme (default)
    #[default]
    Dark,
    /// Light theme
    Light,
}

impl ThemePreset {
    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "Dark",
            ThemePreset::Light => "Light",
        }
    }
}

/// Editor theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorTheme {
    /// Base palette
    pub preset: ThemePreset,
    /// Accent color used for selection and hover
    pub accent: [u8; 3],
    /// Corner radius of widgets
    pub widget_rounding: f32,
    /// Corner radius of windows and panels
    pub panel_rounding: f32,
    /// Spacing between items
    pub item_spacing: f32,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            preset: ThemePreset::Dark,
            accent: [66, 133, 244],
            widget_rounding: 4.0,
            panel_rounding: 6.0,
            item_spacing: 6.0,
        }
    }
}

impl EditorTheme {
    /// Load a theme from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Load the configured stylesheet, falling back to the default theme.
    ///
    /// A stylesheet that cannot be read is reported and otherwise ignored.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(theme) => {
                tracing::info!("Loaded stylesheet {:?} ({})", path, theme.preset.name());
                theme
            }
            Err(e) => {
                tracing::error!("Failed to load stylesheet {:?}: {e}", path);
                Self::default()
            }
        }
    }

    /// Accent color
    pub fn accent_color(&self) -> Color32 {
        let [r, g, b] = self.accent;
        Color32::from_rgb(r, g, b)
    }

    /// Convert to egui Style
    pub fn to_egui_style(&self) -> Style {
        let mut style = Style {
            visuals: self.to_egui_visuals(),
            ..Style::default()
        };
        style.spacing.item_spacing = egui::vec2(self.item_spacing, self.item_spacing);
        style
    }

    /// Convert to egui Visuals
    pub fn to_egui_visuals(&self) -> Visuals {
        let mut visuals = match self.preset {
            ThemePreset::Dark => Visuals::dark(),
            ThemePreset::Light => Visuals::light(),
        };

        let accent = self.accent_color();
        let [r, g, b] = self.accent;
        let accent_hover = Color32::from_rgb(
            r.saturating_add(40),
            g.saturating_add(40),
            b.saturating_add(40),
        );

        visuals.window_rounding = Rounding::same(self.panel_rounding);
        for widgets in [
            &mut visuals.widgets.noninteractive,
            &mut visuals.widgets.inactive,
            &mut visuals.widgets.hovered,
            &mut visuals.widgets.active,
            &mut visuals.widgets.open,
        ] {
            widgets.rounding = Rounding::same(self.widget_rounding);
        }

        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent_hover);
        visuals.widgets.active.bg_fill = accent;
        visuals.selection.bg_fill = Color32::from_rgba_unmultiplied(r, g, b, 80);
        visuals.selection.stroke = Stroke::new(1.0, accent);
        visuals.hyperlink_color = accent;

        visuals
    }

    /// Apply this theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_style(self.to_egui_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_theme_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("light.ron");
        std::fs::write(&path, "(preset: Light, accent: (200, 80, 80))").unwrap();

        let theme = EditorTheme::load_or_default(Some(&path));
        assert_eq!(theme.preset, ThemePreset::Light);
        assert_eq!(theme.accent_color(), Color32::from_rgb(200, 80, 80));
        assert_eq!(theme.widget_rounding, EditorTheme::default().widget_rounding);
    }

    #[test]
    fn test_missing_stylesheet_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let theme = EditorTheme::load_or_default(Some(&tmp.path().join("nope.ron")));
        assert_eq!(theme, EditorTheme::default());
        assert_eq!(EditorTheme::load_or_default(None), EditorTheme::default());
    }

    #[test]
    fn test_apply_to_context() {
        let theme = EditorTheme {
            preset: ThemePreset::Light,
            ..EditorTheme::default()
        };
        let ctx = egui::Context::default();
        theme.apply(&ctx);
        assert!(!ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.selection.stroke.color, theme.accent_color());
    }
}
