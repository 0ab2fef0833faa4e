use std::collections::HashMap;

use ab_glyph::{FontArc, PxScale};
use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut, draw_text_mut, text_size};
use imageproc::point::Point;

use crate::error::{EditorError, EditorResult};
use crate::renderer::{FontSpec, PathCommand, StrokeStyle, Surface};
use crate::settings::DEFAULT_FONT_FAMILY;

/// Largest raster a session will allocate (8192 x 8192).
pub const MAX_SURFACE_PIXELS: u64 = 8192 * 8192;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const COVERED: Luma<u8> = Luma([255]);

/// Font faces available to text elements, keyed by family name.
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: HashMap<String, FontArc>,
    default_family: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<_> = self.fonts.keys().collect();
        families.sort();
        f.debug_struct("FontBook")
            .field("families", &families)
            .field("default_family", &self.default_family)
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a face. The first family added becomes the fallback.
    pub fn insert(&mut self, family: impl Into<String>, font: FontArc) {
        let family = family.into();
        if self.default_family.is_none() {
            self.default_family = Some(family.clone());
        }
        self.fonts.insert(family, font);
    }

    /// Parses TrueType/OpenType bytes and registers them under `family`.
    pub fn load_family(&mut self, family: impl Into<String>, bytes: Vec<u8>) -> EditorResult<()> {
        let family = family.into();
        let font = FontArc::try_from_vec(bytes)
            .map_err(|err| EditorError::Font(format!("{family}: {err}")))?;
        self.insert(family, font);
        Ok(())
    }

    /// Face for `family`, falling back to the default face.
    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.fonts.get(family).or_else(|| {
            self.default_family
                .as_ref()
                .and_then(|default| self.fonts.get(default))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Faces bundled with egui: its proportional font as `sans-serif`
    /// (the default) and its monospace font as `monospace`.
    pub fn egui_defaults() -> Self {
        let definitions = egui::FontDefinitions::default();
        let mut book = Self::new();

        for (family, egui_family) in [
            (DEFAULT_FONT_FAMILY, egui::FontFamily::Proportional),
            ("monospace", egui::FontFamily::Monospace),
        ] {
            let Some(data) = definitions
                .families
                .get(&egui_family)
                .and_then(|names| names.first())
                .and_then(|name| definitions.font_data.get(name))
            else {
                continue;
            };
            if let Err(err) = book.load_family(family, data.font.to_vec()) {
                log::warn!("Could not load bundled font: {err}");
            }
        }
        book
    }
}

/// RGBA raster that the renderer draws the vector layer into.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    fonts: FontBook,
}

impl RasterSurface {
    /// Acquires a transparent `width` x `height` raster.
    pub fn new(width: u32, height: u32, fonts: FontBook) -> EditorResult<Self> {
        if width == 0 || height == 0 {
            return Err(EditorError::ResourceUnavailable(format!(
                "surface must not be empty ({width}x{height})"
            )));
        }
        if u64::from(width) * u64::from(height) > MAX_SURFACE_PIXELS {
            return Err(EditorError::ResourceUnavailable(format!(
                "surface {width}x{height} exceeds {MAX_SURFACE_PIXELS} pixels"
            )));
        }

        log::debug!("Allocated {}x{} drawing surface", width, height);
        Ok(Self {
            image: RgbaImage::new(width, height),
            fonts,
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Empty coverage mask for a primitive inside `bounds`.
    fn coverage(&self, bounds: Rect) -> Option<Coverage> {
        Coverage::over(bounds, self.image.width(), self.image.height())
    }

    /// Composites `color` source-over wherever `coverage` is set, once per pixel.
    fn blend(&mut self, coverage: &Coverage, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        for (x, y, pixel) in coverage.mask.enumerate_pixels() {
            let covered = pixel.0[0];
            if covered == 0 {
                continue;
            }
            let alpha = (u16::from(a) * u16::from(covered) / 255) as u8;
            self.image
                .get_pixel_mut(x + coverage.left, y + coverage.top)
                .blend(&Rgba([r, g, b, alpha]));
        }
    }

    /// Strokes a polyline with round caps and joins.
    fn stroke_polyline(&mut self, points: &[Pos2], closed: bool, stroke: StrokeStyle) {
        let half = stroke.width / 2.0;
        let Some(mut coverage) = self.coverage(Rect::from_points(points).expand(half)) else {
            return;
        };

        let mut segments: Vec<(Pos2, Pos2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        if closed && points.len() > 2 {
            segments.push((points[points.len() - 1], points[0]));
        }

        for (a, b) in segments {
            let dir = b - a;
            let len = dir.length();
            if len > f32::EPSILON {
                let normal = Vec2::new(-dir.y, dir.x) / len * half;
                coverage.polygon(&[a + normal, b + normal, b - normal, a - normal]);
            }
        }
        for point in points {
            coverage.disc(*point, half);
        }
        self.blend(&coverage, stroke.color);
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn stroke_path(&mut self, path: &[PathCommand], stroke: StrokeStyle) {
        let polyline = flatten(path);
        self.stroke_polyline(&polyline, false, stroke);
    }

    fn fill_polygon(&mut self, points: &[Pos2], color: Color32) {
        let Some(mut coverage) = self.coverage(Rect::from_points(points)) else {
            return;
        };
        coverage.polygon(points);
        self.blend(&coverage, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let Some(mut coverage) = self.coverage(rect) else {
            return;
        };
        coverage.rect(rect);
        self.blend(&coverage, color);
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: StrokeStyle) {
        let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
        self.stroke_polyline(&corners, true, stroke);
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        let Some(mut coverage) = self.coverage(Rect::from_center_size(center, Vec2::splat(radius * 2.0))) else {
            return;
        };
        coverage.disc(center, radius);
        self.blend(&coverage, color);
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: StrokeStyle) {
        let segments = ((radius * 0.5).ceil() as usize).clamp(16, 256);
        let outline: Vec<Pos2> = (0..segments)
            .map(|i| {
                let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
                center + Vec2::angled(angle) * radius
            })
            .collect();
        self.stroke_polyline(&outline, true, stroke);
    }

    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec<'_>, color: Color32) {
        let Some(face) = self.fonts.resolve(font.family).cloned() else {
            log::warn!("No font available for family {:?}; text skipped", font.family);
            return;
        };
        let scale = PxScale::from(font.size);
        let (width, _) = text_size(scale, &face, text);
        // Glyphs may overhang the advance box on either side.
        let bounds = Rect::from_min_size(
            pos - Vec2::splat(font.size),
            vec2(width as f32 + font.size * 2.0, font.size * 3.0),
        );
        let Some(mut coverage) = self.coverage(bounds) else {
            return;
        };
        let origin = coverage.local(pos);
        draw_text_mut(&mut coverage.mask, COVERED, origin.x, origin.y, scale, &face, text);
        self.blend(&coverage, color);
    }
}

/// Pixels one drawing call touches, clipped to the layer and offset by
/// `left`/`top`. Antialiased text stores partial coverage.
struct Coverage {
    mask: GrayImage,
    left: u32,
    top: u32,
}

impl Coverage {
    fn over(bounds: Rect, width: u32, height: u32) -> Option<Self> {
        if !bounds.is_finite() {
            return None;
        }
        let left = (bounds.min.x.floor() - 1.0).clamp(0.0, width as f32) as u32;
        let top = (bounds.min.y.floor() - 1.0).clamp(0.0, height as f32) as u32;
        let right = (bounds.max.x.ceil() + 2.0).clamp(0.0, width as f32) as u32;
        let bottom = (bounds.max.y.ceil() + 2.0).clamp(0.0, height as f32) as u32;
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self {
            mask: GrayImage::new(right - left, bottom - top),
            left,
            top,
        })
    }

    fn local(&self, p: Pos2) -> Point<i32> {
        Point::new(
            p.x.round() as i32 - self.left as i32,
            p.y.round() as i32 - self.top as i32,
        )
    }

    fn polygon(&mut self, points: &[Pos2]) {
        let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
        for p in points {
            let px = self.local(*p);
            if poly.last() != Some(&px) {
                poly.push(px);
            }
        }
        // draw_polygon_mut panics when the outline is explicitly closed.
        while poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }
        if poly.len() >= 3 {
            draw_polygon_mut(&mut self.mask, &poly, COVERED);
        }
    }

    fn disc(&mut self, center: Pos2, radius: f32) {
        let center = self.local(center);
        draw_filled_circle_mut(&mut self.mask, (center.x, center.y), radius.round().max(0.0) as i32, COVERED);
    }

    fn rect(&mut self, rect: Rect) {
        let min = self.local(rect.min);
        let max = self.local(rect.max);
        let (width, height) = ((max.x - min.x).max(0) as u32, (max.y - min.y).max(0) as u32);
        if width == 0 || height == 0 {
            return;
        }
        let px_rect = imageproc::rect::Rect::at(min.x, min.y).of_size(width, height);
        draw_filled_rect_mut(&mut self.mask, px_rect, COVERED);
    }
}

/// Turns path commands into a polyline, sampling quadratic curves.
fn flatten(path: &[PathCommand]) -> Vec<Pos2> {
    let mut points: Vec<Pos2> = Vec::with_capacity(path.len() * 4);
    for command in path {
        match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
            PathCommand::QuadTo { ctrl, to } => {
                let from = points.last().copied().unwrap_or(ctrl);
                let chord = from.distance(ctrl) + ctrl.distance(to);
                let steps = ((chord / 4.0).ceil() as usize).clamp(2, 32);
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    let mt = 1.0 - t;
                    points.push(pos2(
                        mt * mt * from.x + 2.0 * mt * t * ctrl.x + t * t * to.x,
                        mt * mt * from.y + 2.0 * mt * t * ctrl.y + t * t * to.y,
                    ));
                }
            }
        }
    }
    points
}
