use egui::{Pos2, Rect, pos2};

use crate::element::{DrawingElement, ElementKind, HIT_MARGIN, TEXT_WIDTH_FACTOR, distance_to_line_segment};
use crate::scene::Scene;

/// Returns the topmost element under `pos`, if any.
///
/// Elements are scanned from last to first so the one drawn on top wins.
pub fn hit_test(pos: Pos2, scene: &Scene) -> Option<&DrawingElement> {
    scene
        .elements()
        .iter()
        .rev()
        .find(|element| element_contains(element, pos))
}

/// Geometric test for a single element.
pub fn element_contains(element: &DrawingElement, pos: Pos2) -> bool {
    let reach = element.thickness() + HIT_MARGIN;

    match &element.kind {
        ElementKind::Path { points } => points
            .windows(2)
            .any(|w| distance_to_line_segment(pos, w[0], w[1]) <= reach),
        ElementKind::Rectangle { x, y, width, height, .. } => {
            // Whole box counts, not just the outline.
            Rect::from_two_pos(pos2(*x, *y), pos2(x + width, y + height))
                .expand(HIT_MARGIN)
                .contains(pos)
        }
        ElementKind::Circle { x, y, radius, .. } => {
            // Ring test: only the stroke band hits.
            (pos.distance(pos2(*x, *y)) - radius).abs() <= reach
        }
        ElementKind::Arrow { start, end } => distance_to_line_segment(pos, *start, *end) <= reach,
        ElementKind::Text { x, y, text, font_size, .. } => {
            let width = text.chars().count() as f32 * font_size * TEXT_WIDTH_FACTOR;
            Rect::from_min_size(pos2(*x, *y), egui::vec2(width, *font_size))
                .expand(HIT_MARGIN)
                .contains(pos)
        }
    }
}
