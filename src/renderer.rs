// src/renderer.rs
use egui::{Color32, Pos2, Rect, Vec2, pos2};

use crate::element::{DrawingElement, ElementKind};
use crate::scene::Scene;

/// Arrowhead wings sit this far off the shaft direction.
const ARROW_HEAD_ANGLE: f32 = std::f32::consts::PI / 6.0;
/// Base arrowhead length; the stroke thickness is added on top.
const ARROW_HEAD_BASE_LENGTH: f32 = 15.0;

/// One step of a stroked outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    QuadTo { ctrl: Pos2, to: Pos2 },
    LineTo(Pos2),
}

/// Stroke parameters. Caps and joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec<'a> {
    pub size: f32,
    pub family: &'a str,
}

/// A drawing target the renderer paints into.
///
/// Implementations decide how to rasterise; the renderer only decides
/// what to draw and in which order.
pub trait Surface {
    /// Resets every pixel to fully transparent
    fn clear(&mut self);

    fn stroke_path(&mut self, path: &[PathCommand], stroke: StrokeStyle);

    fn fill_polygon(&mut self, points: &[Pos2], color: Color32);

    fn fill_rect(&mut self, rect: Rect, color: Color32);

    fn stroke_rect(&mut self, rect: Rect, stroke: StrokeStyle);

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: StrokeStyle);

    /// Draws `text` with the top of the line box at `pos.y`
    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec<'_>, color: Color32);
}

/// Paints scenes onto a [`Surface`].
///
/// Rendering is stateless: the same scene always produces the same pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Clears the surface and draws every element in scene order.
    pub fn render(&self, surface: &mut dyn Surface, scene: &Scene) {
        self.render_with_overlay(surface, scene, None);
    }

    /// Like [`Renderer::render`], then draws one uncommitted element on top.
    pub fn render_with_overlay(
        &self,
        surface: &mut dyn Surface,
        scene: &Scene,
        overlay: Option<&DrawingElement>,
    ) {
        surface.clear();
        for element in scene.elements().iter().chain(overlay) {
            self.draw_element(surface, element);
        }
    }

    pub fn draw_element(&self, surface: &mut dyn Surface, element: &DrawingElement) {
        if !element.is_valid_geometry() {
            log::debug!("Skipping {} {} with invalid geometry", element.element_type(), element.id());
            return;
        }

        let stroke = StrokeStyle {
            color: element.color(),
            width: element.thickness(),
        };

        match &element.kind {
            ElementKind::Path { points } => {
                if let Some(path) = Self::path_commands(points) {
                    surface.stroke_path(&path, stroke);
                }
            }
            ElementKind::Rectangle { x, y, width, height, fill } => {
                let rect = Rect::from_two_pos(pos2(*x, *y), pos2(x + width, y + height));
                if let Some(fill) = fill {
                    surface.fill_rect(rect, *fill);
                }
                surface.stroke_rect(rect, stroke);
            }
            ElementKind::Circle { x, y, radius, fill } => {
                let center = pos2(*x, *y);
                if let Some(fill) = fill {
                    surface.fill_circle(center, *radius, *fill);
                }
                surface.stroke_circle(center, *radius, stroke);
            }
            ElementKind::Arrow { start, end } => {
                surface.stroke_path(&[PathCommand::MoveTo(*start), PathCommand::LineTo(*end)], stroke);
                let head = Self::arrow_head(*start, *end, element.thickness());
                surface.fill_polygon(&head, element.color());
            }
            ElementKind::Text { x, y, text, font_size, font_family } => {
                let font = FontSpec {
                    size: *font_size,
                    family: font_family,
                };
                surface.draw_text(pos2(*x, *y), text, &font, element.color());
            }
        }
    }

    /// Smoothed outline through `points`.
    ///
    /// Each interior point becomes the control point of a quadratic curve
    /// ending halfway to the next point; the outline finishes with a
    /// straight segment to the last point. Fewer than two points yield
    /// nothing.
    pub fn path_commands(points: &[Pos2]) -> Option<Vec<PathCommand>> {
        if points.len() < 2 {
            return None;
        }

        let mut path = Vec::with_capacity(points.len() + 1);
        path.push(PathCommand::MoveTo(points[0]));
        for i in 1..points.len() - 1 {
            let ctrl = points[i];
            let to = ctrl + (points[i + 1] - ctrl) * 0.5;
            path.push(PathCommand::QuadTo { ctrl, to });
        }
        path.push(PathCommand::LineTo(points[points.len() - 1]));
        Some(path)
    }

    /// Triangle `[tip, left wing, right wing]` for an arrow ending at `end`.
    pub fn arrow_head(start: Pos2, end: Pos2, thickness: f32) -> [Pos2; 3] {
        let delta = end - start;
        let angle = delta.y.atan2(delta.x);
        let length = ARROW_HEAD_BASE_LENGTH + thickness;

        let wing = |a: f32| end - Vec2::angled(a) * length;
        [end, wing(angle - ARROW_HEAD_ANGLE), wing(angle + ARROW_HEAD_ANGLE)]
    }
}
