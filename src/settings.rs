use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::ElementStyle;
use crate::tools::Tool;

pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// User-adjustable drawing options. Persisted between runs; the scene is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorSettings {
    pub tool: Tool,
    pub color: Color32,
    pub thickness: f32,
    /// Fill rectangles and circles with `fill_color`
    pub fill_enabled: bool,
    pub fill_color: Color32,
    pub font_size: f32,
    pub font_family: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Color32::RED,
            thickness: 3.0,
            fill_enabled: false,
            fill_color: Color32::from_rgba_unmultiplied(255, 0, 0, 64),
            font_size: 24.0,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
        }
    }
}

impl EditorSettings {
    pub fn style(&self) -> ElementStyle {
        ElementStyle::new(self.color, self.thickness)
    }

    pub fn fill(&self) -> Option<Color32> {
        self.fill_enabled.then_some(self.fill_color)
    }
}
