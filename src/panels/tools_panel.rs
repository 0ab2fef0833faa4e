use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::app::AnnotateApp;
use crate::tools::Tool;

enum PanelAction {
    Undo,
    Redo,
    ClearAll,
    Export,
}

pub fn tools_panel(app: &mut AnnotateApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            if app.session().is_none() {
                ui.label("Drop an image here, or pass its path on the command line.");
                if let Some(status) = app.status() {
                    ui.separator();
                    ui.label(status);
                }
                return;
            }
            let Some(session) = app.session_mut() else {
                return;
            };
            let editor = &mut session.editor;

            let active_tool = editor.tool();
            for tool in Tool::ALL {
                let label = format!("{}  ({:?})", tool.name(), tool.shortcut());
                if ui.selectable_label(active_tool == tool, label).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    editor.set_tool(tool);
                }
            }
            ui.separator();

            let settings = editor.settings_mut();
            ui.horizontal(|ui| {
                ui.label("Color:");
                color_edit_button_srgba(ui, &mut settings.color, Alpha::OnlyBlend);
            });
            ui.horizontal(|ui| {
                ui.label("Thickness:");
                ui.add(egui::Slider::new(&mut settings.thickness, 1.0..=50.0));
            });
            ui.horizontal(|ui| {
                ui.checkbox(&mut settings.fill_enabled, "Fill");
                color_edit_button_srgba(ui, &mut settings.fill_color, Alpha::OnlyBlend);
            });
            ui.horizontal(|ui| {
                ui.label("Font size:");
                ui.add(egui::Slider::new(&mut settings.font_size, 8.0..=128.0));
            });
            ui.separator();

            let mut action = None;
            ui.horizontal(|ui| {
                let can_undo = editor.history().can_undo();
                let can_redo = editor.history().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    action = Some(PanelAction::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    action = Some(PanelAction::Redo);
                }
                if ui.button("Clear").clicked() {
                    action = Some(PanelAction::ClearAll);
                }
            });
            if ui.button("Export").clicked() {
                action = Some(PanelAction::Export);
            }

            ui.separator();
            ui.label(format!("Elements: {}", editor.scene().len()));
            ui.label(format!(
                "History: {}/{} (max {})",
                editor.history().index() + 1,
                editor.history().len(),
                editor.history().capacity()
            ));
            ui.label(format!("State: {}", editor.state().name()));
            if editor.state().is_text_pending() {
                ui.label("Type, then Enter to place or Escape to cancel.");
            }

            match action {
                Some(PanelAction::Undo) => {
                    editor.undo();
                }
                Some(PanelAction::Redo) => {
                    editor.redo();
                }
                Some(PanelAction::ClearAll) => {
                    editor.clear_all();
                }
                Some(PanelAction::Export) => app.export(),
                None => {}
            }

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
