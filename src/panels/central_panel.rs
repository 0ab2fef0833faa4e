use egui::{Color32, Rect, Sense, pos2, vec2};

use crate::app::AnnotateApp;

const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

pub fn central_panel(app: &mut AnnotateApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if app.session().is_none() {
            ui.centered_and_justified(|ui| {
                ui.heading("Drop an image to start annotating");
            });
            return;
        }

        // Fit the image into the panel, never scaling above 1:1.
        let available = ui.available_rect_before_wrap();
        let Some(session) = app.session_mut() else {
            return;
        };
        let (width, height) = session.editor.base_image().dimensions();
        let image_size = vec2(width as f32, height as f32);
        let scale = (available.width() / image_size.x)
            .min(available.height() / image_size.y)
            .min(1.0);
        let canvas_rect = Rect::from_center_size(available.center(), image_size * scale);
        session.input.set_canvas_rect(canvas_rect);

        let response = ui.allocate_rect(canvas_rect, Sense::click_and_drag());
        if response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        app.route_input(ctx);

        let Some(session) = app.session_mut() else {
            return;
        };
        session.sync_textures(ctx);

        let painter = ui.painter_at(canvas_rect);
        if let Some(texture) = &session.base_texture {
            painter.image(texture.id(), canvas_rect, FULL_UV, Color32::WHITE);
        }
        if let Some(texture) = &session.layer_texture {
            painter.image(texture.id(), canvas_rect, FULL_UV, Color32::WHITE);
        }
    });
}
