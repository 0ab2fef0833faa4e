use egui::Pos2;

/// Extra distance around an element's own stroke that still counts as a hit.
pub const HIT_MARGIN: f32 = 10.0;

/// Approximate glyph advance relative to the font size, used for text bounds.
pub const TEXT_WIDTH_FACTOR: f32 = 0.6;

/// Distance from `point` to the segment `line_start`–`line_end`.
///
/// The projection onto the infinite line is clamped to the segment, so
/// points beyond either end measure to the nearest endpoint.
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let len_sq = line_vec.length_sq();
    if len_sq == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / len_sq).clamp(0.0, 1.0);
    let projection = line_start + line_vec * t;
    (point - projection).length()
}

pub(crate) fn is_finite_pos(pos: Pos2) -> bool {
    pos.x.is_finite() && pos.y.is_finite()
}

pub(crate) fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
