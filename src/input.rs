use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect, Vec2};

/// Where an input event happened, in image (canvas) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    pub position: Pos2,
    /// Whether this position lies on the image
    pub is_in_canvas: bool,
}

impl InputLocation {
    pub fn in_canvas(position: Pos2) -> Self {
        Self {
            position,
            is_in_canvas: true,
        }
    }
}

/// Discrete input delivered to an editor session
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    PointerMove {
        location: InputLocation,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    /// Characters typed while composing text
    Text(String),
    /// Finished text from an external text box
    SubmitText(String),
}

/// Turns raw egui input into [`InputEvent`]s for one editor session.
///
/// Owned by the session wrapper, so keyboard handling starts and stops
/// with the session.
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    /// Screen rectangle the image is displayed in
    canvas_rect: Rect,
    /// Image size in pixels
    image_size: Vec2,
}

impl InputHandler {
    pub fn new(image_size: Vec2) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect: Rect::from_min_size(Pos2::ZERO, image_size),
            image_size,
        }
    }

    /// Update the on-screen rectangle (e.g. if the window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Maps a screen position into image coordinates
    pub fn to_image_space(&self, screen: Pos2) -> Pos2 {
        let size = self.canvas_rect.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return screen;
        }
        let rel = screen - self.canvas_rect.min;
        Pos2::new(rel.x * self.image_size.x / size.x, rel.y * self.image_size.y / size.y)
    }

    fn make_location(&self, screen: Pos2) -> InputLocation {
        InputLocation {
            position: self.to_image_space(screen),
            is_in_canvas: self.canvas_rect.contains(screen),
        }
    }

    /// Collects this frame's events. Keyboard events are only gathered when
    /// `keyboard` is set, so other widgets can keep their shortcuts.
    pub fn process_input(&mut self, ctx: &Context, keyboard: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();

            if let Some(pos) = hover {
                if Some(pos) != self.last_pointer_pos {
                    let held_buttons = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle]
                        .into_iter()
                        .filter(|b| input.pointer.button_down(*b))
                        .collect();
                    events.push(InputEvent::PointerMove {
                        location: self.make_location(pos),
                        held_buttons,
                    });
                }
            }
            self.last_pointer_pos = hover;

            if let Some(pos) = hover {
                for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                    if input.pointer.button_pressed(button) {
                        events.push(InputEvent::PointerDown {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                    if input.pointer.button_released(button) {
                        events.push(InputEvent::PointerUp {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                }
            }

            if !keyboard {
                return;
            }
            for event in &input.raw.events {
                match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    }),
                    egui::Event::Text(text) => events.push(InputEvent::Text(text.clone())),
                    _ => {}
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn screen_positions_map_to_image_pixels() {
        let mut handler = InputHandler::new(vec2(200.0, 100.0));
        handler.set_canvas_rect(Rect::from_min_size(pos2(10.0, 20.0), vec2(100.0, 50.0)));

        assert_eq!(handler.to_image_space(pos2(10.0, 20.0)), pos2(0.0, 0.0));
        assert_eq!(handler.to_image_space(pos2(60.0, 45.0)), pos2(100.0, 50.0));
        assert!(!handler.make_location(pos2(0.0, 0.0)).is_in_canvas);
    }
}
