#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod compositor;
pub mod editor;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod state;
pub mod tools;

pub use app::AnnotateApp;
pub use editor::{EditorSession, EventOutcome};
pub use element::{DrawingElement, ElementKind, ElementStyle};
pub use error::{EditorError, EditorResult};
pub use history::History;
pub use input::{InputEvent, InputLocation};
pub use raster::{FontBook, RasterSurface};
pub use renderer::{Renderer, Surface};
pub use scene::Scene;
pub use settings::EditorSettings;
pub use state::EditorState;
pub use tools::Tool;
