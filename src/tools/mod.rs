use egui::Key;
use serde::{Deserialize, Serialize};

/// Drawing tools offered by the annotation editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pen,
    Rectangle,
    Circle,
    Arrow,
    Text,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Pen,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Arrow,
        Tool::Text,
        Tool::Eraser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Arrow => "Arrow",
            Tool::Text => "Text",
            Tool::Eraser => "Eraser",
        }
    }

    /// Keyboard shortcut that selects this tool
    pub fn shortcut(&self) -> Key {
        match self {
            Tool::Pen => Key::P,
            Tool::Rectangle => Key::R,
            Tool::Circle => Key::C,
            Tool::Arrow => Key::A,
            Tool::Text => Key::T,
            Tool::Eraser => Key::E,
        }
    }

    pub fn from_shortcut(key: Key) -> Option<Tool> {
        Self::ALL.into_iter().find(|tool| tool.shortcut() == key)
    }

    /// Tools that create an element on pointer-down and grow it while dragging
    pub fn is_drag_tool(&self) -> bool {
        matches!(self, Tool::Pen | Tool::Rectangle | Tool::Circle | Tool::Arrow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_shortcut(tool.shortcut()), Some(tool));
        }
        assert_eq!(Tool::from_shortcut(Key::Z), None);
    }

    #[test]
    fn only_shape_tools_drag() {
        assert!(Tool::Pen.is_drag_tool());
        assert!(Tool::Arrow.is_drag_tool());
        assert!(!Tool::Text.is_drag_tool());
        assert!(!Tool::Eraser.is_drag_tool());
    }
}
