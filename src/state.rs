use egui::Pos2;

use crate::element::DrawingElement;

/// Interaction state of the annotation editor.
///
/// ```text
///            pointer-down (shape tool)          pointer-up
///   Idle ─────────────────────────────► ActiveStroke ─────────► Idle
///    │                                                 (commit)
///    │ pointer-down (text tool)        Enter / submit
///    └─────────────────────────► TextPending ─────────► Idle
///                                     │     Escape
///                                     └───────────────► Idle
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Idle,
    /// A pointer drag is growing `element`; it is not yet in the scene
    ActiveStroke { element: DrawingElement, start: Pos2 },
    /// Waiting for text to place at `position`
    TextPending { position: Pos2, buffer: String },
}

impl EditorState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::ActiveStroke { .. })
    }

    pub fn is_text_pending(&self) -> bool {
        matches!(self, Self::TextPending { .. })
    }

    /// The uncommitted element, if a stroke is in progress
    pub fn in_progress(&self) -> Option<&DrawingElement> {
        match self {
            Self::ActiveStroke { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::ActiveStroke { .. } => "ActiveStroke",
            Self::TextPending { .. } => "TextPending",
        }
    }
}
