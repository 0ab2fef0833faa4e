use egui::{Key, Modifiers, PointerButton, Pos2};
use image::RgbaImage;

use crate::compositor;
use crate::element::{DrawingElement, ElementId, factory};
use crate::error::{EditorError, EditorResult};
use crate::geometry::hit_test;
use crate::history::History;
use crate::id_generator::IdGenerator;
use crate::input::InputEvent;
use crate::raster::{FontBook, RasterSurface};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::settings::EditorSettings;
use crate::state::EditorState;
use crate::tools::Tool;

/// Id used for the text preview, never handed out by the generator.
const PREVIEW_ID: ElementId = ElementId(0);

/// What an input event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventOutcome {
    /// Nothing changed
    Ignored,
    /// Only the vector layer preview changed
    Redrawn,
    /// The committed scene changed
    SceneChanged,
}

/// One annotation session over a single base image.
///
/// Owns the live scene, its history, the interaction state and the raster
/// the vector layer is drawn into. All work happens synchronously inside
/// the event handlers.
#[derive(Debug)]
pub struct EditorSession {
    base: RgbaImage,
    scene: Scene,
    history: History,
    state: EditorState,
    settings: EditorSettings,
    ids: IdGenerator,
    renderer: Renderer,
    surface: RasterSurface,
    layer_version: u64,
}

impl EditorSession {
    /// Starts a session over `base`. Fails if no drawing surface of the
    /// image's size can be acquired.
    pub fn open(base: RgbaImage, fonts: FontBook, settings: EditorSettings) -> EditorResult<Self> {
        let (width, height) = base.dimensions();
        let surface = RasterSurface::new(width, height, fonts)?;

        let scene = Scene::new();
        let mut history = History::new();
        history.push(&scene);

        log::info!("Opened annotation session on {}x{} image", width, height);

        let mut session = Self {
            base,
            scene,
            history,
            state: EditorState::Idle,
            settings,
            ids: IdGenerator::new(),
            renderer: Renderer::new(),
            surface,
            layer_version: 0,
        };
        session.redraw();
        Ok(session)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Style changes apply to elements created afterwards
    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    pub fn tool(&self) -> Tool {
        self.settings.tool
    }

    pub fn base_image(&self) -> &RgbaImage {
        &self.base
    }

    /// The rendered vector layer, including any in-progress overlay
    pub fn vector_layer(&self) -> &RgbaImage {
        self.surface.image()
    }

    /// Bumped every time the vector layer is redrawn
    pub fn layer_version(&self) -> u64 {
        self.layer_version
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        match event {
            InputEvent::PointerDown {
                location,
                button: PointerButton::Primary,
            } if location.is_in_canvas => self.pointer_down(location.position),
            InputEvent::PointerMove { location, .. } => self.pointer_move(location.position),
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } => self.pointer_up(),
            InputEvent::KeyDown { key, modifiers } => self.key_down(*key, *modifiers),
            InputEvent::Text(text) => self.type_text(text),
            InputEvent::SubmitText(text) => self.submit_text(text),
            _ => EventOutcome::Ignored,
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> EventOutcome {
        if !(pos.x.is_finite() && pos.y.is_finite()) {
            log::warn!("Ignoring pointer-down at non-finite position {:?}", pos);
            return EventOutcome::Ignored;
        }

        // Settle whatever was in flight before starting something new.
        let mut outcome = self.finish_pending();

        let tool = self.settings.tool;
        if tool.is_drag_tool() {
            let element = self.create_element(tool, pos);
            log::debug!("Started {} {} at {:?}", element.element_type(), element.id(), pos);
            self.state = EditorState::ActiveStroke { element, start: pos };
            outcome = outcome.max(EventOutcome::Redrawn);
        } else if tool == Tool::Eraser {
            outcome = outcome.max(self.erase_at(pos));
        } else {
            self.state = EditorState::TextPending {
                position: pos,
                buffer: String::new(),
            };
            outcome = outcome.max(EventOutcome::Redrawn);
        }

        self.redraw();
        outcome
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> EventOutcome {
        let EditorState::ActiveStroke { element, start, .. } = &mut self.state else {
            return EventOutcome::Ignored;
        };

        element.drag_to(*start, pos);
        if !element.is_valid_geometry() {
            let err = EditorError::InvalidGeometry(format!(
                "{} {} dragged to {:?}",
                element.element_type(),
                element.id(),
                pos
            ));
            log::warn!("Dropping in-progress element: {err}");
            self.state = EditorState::Idle;
        }

        self.redraw();
        EventOutcome::Redrawn
    }

    pub fn pointer_up(&mut self) -> EventOutcome {
        match std::mem::take(&mut self.state) {
            EditorState::ActiveStroke { element, .. } => {
                let outcome = self.commit(element);
                self.redraw();
                outcome.max(EventOutcome::Redrawn)
            }
            other => {
                self.state = other;
                EventOutcome::Ignored
            }
        }
    }

    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> EventOutcome {
        let composing = self.state.is_text_pending();

        if modifiers.command {
            return match key {
                Key::Z if modifiers.shift => self.redo(),
                Key::Z => self.undo(),
                Key::Y => self.redo(),
                _ => EventOutcome::Ignored,
            };
        }

        match key {
            Key::Enter if composing => self.finish_pending(),
            Key::Escape if composing => self.cancel_text(),
            Key::Backspace if composing => {
                if let EditorState::TextPending { buffer, .. } = &mut self.state {
                    buffer.pop();
                }
                self.redraw();
                EventOutcome::Redrawn
            }
            _ if composing || modifiers.alt || modifiers.ctrl => EventOutcome::Ignored,
            _ => match Tool::from_shortcut(key) {
                Some(tool) => self.set_tool(tool),
                None => EventOutcome::Ignored,
            },
        }
    }

    /// Appends typed characters to pending text
    pub fn type_text(&mut self, text: &str) -> EventOutcome {
        let EditorState::TextPending { buffer, .. } = &mut self.state else {
            return EventOutcome::Ignored;
        };
        buffer.extend(text.chars().filter(|c| !c.is_control()));
        self.redraw();
        EventOutcome::Redrawn
    }

    /// Places `text` at the pending position. Blank text cancels instead.
    pub fn submit_text(&mut self, text: &str) -> EventOutcome {
        match std::mem::take(&mut self.state) {
            EditorState::TextPending { position, .. } => {
                let outcome = self.commit_text(position, text);
                self.redraw();
                outcome.max(EventOutcome::Redrawn)
            }
            other => {
                self.state = other;
                EventOutcome::Ignored
            }
        }
    }

    /// Drops pending text without touching history
    pub fn cancel_text(&mut self) -> EventOutcome {
        if !self.state.is_text_pending() {
            return EventOutcome::Ignored;
        }
        self.state = EditorState::Idle;
        log::debug!("Text entry cancelled");
        self.redraw();
        EventOutcome::Redrawn
    }

    pub fn set_tool(&mut self, tool: Tool) -> EventOutcome {
        if self.settings.tool == tool {
            return EventOutcome::Ignored;
        }
        let outcome = if self.state.is_text_pending() {
            self.finish_pending()
        } else {
            EventOutcome::Ignored
        };
        log::info!("Tool changed: {} -> {}", self.settings.tool.name(), tool.name());
        self.settings.tool = tool;
        outcome.max(EventOutcome::Redrawn)
    }

    /// Restores the previous snapshot. Uncommitted strokes and text are discarded.
    pub fn undo(&mut self) -> EventOutcome {
        self.discard_in_progress();
        match self.history.undo() {
            Some(scene) => {
                self.scene = scene;
                log::info!("Undo: {} elements", self.scene.len());
                self.redraw();
                EventOutcome::SceneChanged
            }
            None => {
                self.redraw();
                EventOutcome::Ignored
            }
        }
    }

    /// Re-applies the next snapshot. Uncommitted strokes and text are discarded.
    pub fn redo(&mut self) -> EventOutcome {
        self.discard_in_progress();
        match self.history.redo() {
            Some(scene) => {
                self.scene = scene;
                log::info!("Redo: {} elements", self.scene.len());
                self.redraw();
                EventOutcome::SceneChanged
            }
            None => {
                self.redraw();
                EventOutcome::Ignored
            }
        }
    }

    /// Removes every element and records the empty scene
    pub fn clear_all(&mut self) -> EventOutcome {
        self.state = EditorState::Idle;
        if self.scene.is_empty() {
            self.redraw();
            return EventOutcome::Ignored;
        }
        self.scene.clear();
        self.history.push(&self.scene);
        log::info!("Cleared all annotations");
        self.redraw();
        EventOutcome::SceneChanged
    }

    /// Merges the committed annotations over the base image.
    ///
    /// In-progress strokes and pending text are not part of the export.
    pub fn export(&self) -> EditorResult<RgbaImage> {
        let mut layer = self.surface.clone();
        self.renderer.render(&mut layer, &self.scene);
        let merged = compositor::merge(&self.base, layer.image())?;
        log::info!("Exported {} annotations", self.scene.len());
        Ok(merged)
    }

    fn create_element(&mut self, tool: Tool, pos: Pos2) -> DrawingElement {
        let id = self.ids.generate_id();
        let style = self.settings.style();
        let fill = self.settings.fill();
        match tool {
            Tool::Rectangle => factory::create_rectangle(id, pos, style, fill),
            Tool::Circle => factory::create_circle(id, pos, style, fill),
            Tool::Arrow => factory::create_arrow(id, pos, style),
            _ => factory::create_path(id, vec![pos], style),
        }
    }

    /// Commits or discards whatever stroke or text is in flight.
    fn finish_pending(&mut self) -> EventOutcome {
        match std::mem::take(&mut self.state) {
            EditorState::Idle => EventOutcome::Ignored,
            EditorState::ActiveStroke { element, .. } => self.commit(element),
            EditorState::TextPending { position, buffer } => {
                let outcome = self.commit_text(position, &buffer);
                self.redraw();
                outcome.max(EventOutcome::Redrawn)
            }
        }
    }

    fn discard_in_progress(&mut self) {
        match std::mem::take(&mut self.state) {
            EditorState::Idle => {}
            EditorState::ActiveStroke { element, .. } => {
                log::debug!("Discarding uncommitted {} {}", element.element_type(), element.id());
            }
            EditorState::TextPending { buffer, .. } => {
                log::debug!("Discarding pending text {:?}", buffer);
            }
        }
    }

    fn commit_text(&mut self, position: Pos2, text: &str) -> EventOutcome {
        if text.trim().is_empty() {
            log::debug!("Empty text discarded");
            return EventOutcome::Ignored;
        }
        let element = factory::create_text(
            self.ids.generate_id(),
            position,
            text,
            self.settings.font_size,
            self.settings.font_family.clone(),
            self.settings.style(),
        );
        self.commit(element)
    }

    /// Appends `element` to the scene and records a snapshot.
    fn commit(&mut self, element: DrawingElement) -> EventOutcome {
        if !element.is_valid_geometry() {
            let err = EditorError::InvalidGeometry(format!("{} {}", element.element_type(), element.id()));
            log::warn!("Dropping element on commit: {err}");
            return EventOutcome::Ignored;
        }

        log::info!("Committed {} {}", element.element_type(), element.id());
        self.scene.add_element(element);
        self.history.push(&self.scene);
        EventOutcome::SceneChanged
    }

    fn erase_at(&mut self, pos: Pos2) -> EventOutcome {
        let Some(id) = hit_test(pos, &self.scene).map(|e| e.id()) else {
            return EventOutcome::Ignored;
        };
        if let Some(removed) = self.scene.remove_element(id) {
            log::info!("Erased {} {}", removed.element_type(), removed.id());
            self.history.push(&self.scene);
        }
        EventOutcome::SceneChanged
    }

    fn redraw(&mut self) {
        let preview = match &self.state {
            EditorState::TextPending { position, buffer } if !buffer.is_empty() => Some(factory::create_text(
                PREVIEW_ID,
                *position,
                buffer.as_str(),
                self.settings.font_size,
                self.settings.font_family.clone(),
                self.settings.style(),
            )),
            _ => None,
        };
        let overlay = self.state.in_progress().or(preview.as_ref());
        self.renderer.render_with_overlay(&mut self.surface, &self.scene, overlay);
        self.layer_version += 1;
    }
}
