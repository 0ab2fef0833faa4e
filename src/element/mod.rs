use egui::{Color32, Pos2, Rect, pos2};

pub(crate) mod common;

pub use common::{HIT_MARGIN, TEXT_WIDTH_FACTOR, distance_to_line_segment};
pub use crate::id_generator::ElementId;

/// Stroke properties shared by every element variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub color: Color32,
    /// Line width, strictly positive
    pub thickness: f32,
}

impl ElementStyle {
    pub fn new(color: Color32, thickness: f32) -> Self {
        Self { color, thickness }
    }
}

/// Geometry of a drawing element.
///
/// Rectangle extents may be negative while a drag is in progress; they are
/// valid geometry and are never normalized in place.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Path {
        points: Vec<Pos2>,
    },
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color32>,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        fill: Option<Color32>,
    },
    Arrow {
        start: Pos2,
        end: Pos2,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        font_family: String,
    },
}

/// One element of the annotation scene
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingElement {
    id: ElementId,
    pub style: ElementStyle,
    pub kind: ElementKind,
}

impl DrawingElement {
    pub fn new(id: ElementId, style: ElementStyle, kind: ElementKind) -> Self {
        Self { id, style, kind }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn color(&self) -> Color32 {
        self.style.color
    }

    pub fn thickness(&self) -> f32 {
        self.style.thickness
    }

    pub fn element_type(&self) -> &'static str {
        match &self.kind {
            ElementKind::Path { .. } => "path",
            ElementKind::Rectangle { .. } => "rectangle",
            ElementKind::Circle { .. } => "circle",
            ElementKind::Arrow { .. } => "arrow",
            ElementKind::Text { .. } => "text",
        }
    }

    /// Axis-aligned bounds of the geometry, without stroke width or margin.
    ///
    /// Text bounds are approximated from the character count and font size.
    pub fn rect(&self) -> Rect {
        match &self.kind {
            ElementKind::Path { points } => {
                if points.is_empty() {
                    return Rect::NOTHING;
                }
                let mut rect = Rect::from_min_max(points[0], points[0]);
                for point in &points[1..] {
                    rect.extend_with(*point);
                }
                rect
            }
            ElementKind::Rectangle { x, y, width, height, .. } => {
                Rect::from_two_pos(pos2(*x, *y), pos2(x + width, y + height))
            }
            ElementKind::Circle { x, y, radius, .. } => {
                Rect::from_center_size(pos2(*x, *y), egui::Vec2::splat(radius * 2.0))
            }
            ElementKind::Arrow { start, end } => Rect::from_two_pos(*start, *end),
            ElementKind::Text { x, y, text, font_size, .. } => {
                let width = text.chars().count() as f32 * font_size * TEXT_WIDTH_FACTOR;
                Rect::from_min_size(pos2(*x, *y), egui::vec2(width, *font_size))
            }
        }
    }

    /// Checks that every coordinate is finite and every size is in range.
    pub fn is_valid_geometry(&self) -> bool {
        if !common::is_positive(self.style.thickness) {
            return false;
        }

        match &self.kind {
            ElementKind::Path { points } => points.iter().all(|p| common::is_finite_pos(*p)),
            ElementKind::Rectangle { x, y, width, height, .. } => {
                [x, y, width, height].iter().all(|v| v.is_finite())
            }
            ElementKind::Circle { x, y, radius, .. } => {
                x.is_finite() && y.is_finite() && radius.is_finite() && *radius >= 0.0
            }
            ElementKind::Arrow { start, end } => {
                common::is_finite_pos(*start) && common::is_finite_pos(*end)
            }
            ElementKind::Text { x, y, font_size, .. } => {
                x.is_finite() && y.is_finite() && common::is_positive(*font_size)
            }
        }
    }

    /// Updates an in-progress element for a pointer at `pos`, where `anchor`
    /// is the pointer-down position that created it.
    pub fn drag_to(&mut self, anchor: Pos2, pos: Pos2) {
        match &mut self.kind {
            ElementKind::Path { points } => points.push(pos),
            ElementKind::Rectangle { width, height, .. } => {
                *width = pos.x - anchor.x;
                *height = pos.y - anchor.y;
            }
            ElementKind::Circle { radius, .. } => *radius = anchor.distance(pos),
            ElementKind::Arrow { end, .. } => *end = pos,
            // Text is placed by a click, not dragged.
            ElementKind::Text { .. } => {}
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn create_path(id: ElementId, points: Vec<Pos2>, style: ElementStyle) -> DrawingElement {
        DrawingElement::new(id, style, ElementKind::Path { points })
    }

    /// Zero-extent rectangle anchored at `anchor`
    pub fn create_rectangle(
        id: ElementId,
        anchor: Pos2,
        style: ElementStyle,
        fill: Option<Color32>,
    ) -> DrawingElement {
        DrawingElement::new(
            id,
            style,
            ElementKind::Rectangle {
                x: anchor.x,
                y: anchor.y,
                width: 0.0,
                height: 0.0,
                fill,
            },
        )
    }

    /// Zero-radius circle centered at `center`
    pub fn create_circle(
        id: ElementId,
        center: Pos2,
        style: ElementStyle,
        fill: Option<Color32>,
    ) -> DrawingElement {
        DrawingElement::new(
            id,
            style,
            ElementKind::Circle {
                x: center.x,
                y: center.y,
                radius: 0.0,
                fill,
            },
        )
    }

    /// Zero-length arrow starting at `start`
    pub fn create_arrow(id: ElementId, start: Pos2, style: ElementStyle) -> DrawingElement {
        DrawingElement::new(id, style, ElementKind::Arrow { start, end: start })
    }

    pub fn create_text(
        id: ElementId,
        position: Pos2,
        text: impl Into<String>,
        font_size: f32,
        font_family: impl Into<String>,
        style: ElementStyle,
    ) -> DrawingElement {
        DrawingElement::new(
            id,
            style,
            ElementKind::Text {
                x: position.x,
                y: position.y,
                text: text.into(),
                font_size,
                font_family: font_family.into(),
            },
        )
    }
}
