use std::path::PathBuf;

use eframe::egui;

use crate::editor::{EditorSession, EventOutcome};
use crate::file_handler::{self, FileHandler, LoadedImage};
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::raster::FontBook;
use crate::settings::EditorSettings;

/// Everything that lives exactly as long as one opened image
pub struct ActiveSession {
    pub editor: EditorSession,
    /// Keyboard and pointer routing for this session only
    pub input: InputHandler,
    pub name: String,
    pub source: Option<PathBuf>,
    pub base_texture: Option<egui::TextureHandle>,
    pub layer_texture: Option<egui::TextureHandle>,
    uploaded_version: Option<u64>,
}

impl ActiveSession {
    fn new(editor: EditorSession, name: String, source: Option<PathBuf>) -> Self {
        let (width, height) = editor.base_image().dimensions();
        Self {
            editor,
            input: InputHandler::new(egui::vec2(width as f32, height as f32)),
            name,
            source,
            base_texture: None,
            layer_texture: None,
            uploaded_version: None,
        }
    }

    /// Uploads the base image once and the vector layer whenever it changed
    pub fn sync_textures(&mut self, ctx: &egui::Context) {
        if self.base_texture.is_none() {
            let base = to_color_image(self.editor.base_image());
            self.base_texture = Some(ctx.load_texture("annotate-base", base, egui::TextureOptions::default()));
        }

        let version = self.editor.layer_version();
        if self.uploaded_version == Some(version) {
            return;
        }
        let layer = to_color_image(self.editor.vector_layer());
        match &mut self.layer_texture {
            Some(texture) => texture.set(layer, egui::TextureOptions::default()),
            None => {
                self.layer_texture =
                    Some(ctx.load_texture("annotate-layer", layer, egui::TextureOptions::default()));
            }
        }
        self.uploaded_version = Some(version);
    }
}

fn to_color_image(image: &image::RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// We derive Deserialize/Serialize so we can persist the drawing settings on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct AnnotateApp {
    settings: EditorSettings,
    #[serde(skip)]
    session: Option<ActiveSession>,
    #[serde(skip)]
    fonts: FontBook,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for AnnotateApp {
    fn default() -> Self {
        Self {
            settings: EditorSettings::default(),
            session: None,
            fonts: FontBook::default(),
            file_handler: FileHandler::new(),
            status: None,
        }
    }
}

impl AnnotateApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_image: Option<PathBuf>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.fonts = FontBook::egui_defaults();

        if let Some(path) = initial_image {
            match file_handler::load_image_file(&path) {
                Ok(image) => app.open_image(image),
                Err(err) => app.report(format!("Could not open {}: {err}", path.display())),
            }
        }
        app
    }

    /// Replaces the current session (if any) with one over `image`
    pub fn open_image(&mut self, image: LoadedImage) {
        self.remember_settings();
        let LoadedImage { name, path, image } = image;
        match EditorSession::open(image, self.fonts.clone(), self.settings.clone()) {
            Ok(editor) => {
                self.status = Some(format!("Editing {name}"));
                self.session = Some(ActiveSession::new(editor, name, path));
            }
            Err(err) => self.report(format!("Could not start editor for {name}: {err}")),
        }
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ActiveSession> {
        self.session.as_mut()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn report(&mut self, message: String) {
        log::error!("{message}");
        self.status = Some(message);
    }

    /// Feeds this frame's input to the session
    pub fn route_input(&mut self, ctx: &egui::Context) -> EventOutcome {
        let Some(session) = self.session.as_mut() else {
            return EventOutcome::Ignored;
        };
        let keyboard = !ctx.wants_keyboard_input();
        session
            .input
            .process_input(ctx, keyboard)
            .iter()
            .map(|event| session.editor.handle_event(event))
            .max()
            .unwrap_or(EventOutcome::Ignored)
    }

    /// Writes the merged image next to the source
    pub fn export(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let target = match &session.source {
            Some(path) => file_handler::export_path(path),
            None => PathBuf::from("annotated.png"),
        };
        let result = session
            .editor
            .export()
            .and_then(|merged| file_handler::save_png(&merged, &target));
        match result {
            Ok(()) => self.status = Some(format!("Saved {}", target.display())),
            Err(err) => self.report(format!("Export failed: {err}")),
        }
    }

    fn remember_settings(&mut self) {
        if let Some(session) = &self.session {
            self.settings = session.editor.settings().clone();
        }
    }
}

impl eframe::App for AnnotateApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.remember_settings();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.file_handler.check_for_dropped_files(ctx) {
            if let Some(image) = self.file_handler.take_dropped_image() {
                self.open_image(image);
            }
        }

        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
