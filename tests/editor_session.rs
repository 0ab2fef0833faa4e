use eframe_annotate::element::ElementKind;
use eframe_annotate::input::{InputEvent, InputLocation};
use eframe_annotate::{EditorSession, EditorSettings, EditorState, EventOutcome, FontBook, Tool};
use egui::{Color32, Key, Modifiers, PointerButton, Pos2, pos2};
use image::{Rgba, RgbaImage};

fn open_session() -> EditorSession {
    let base = RgbaImage::from_pixel(300, 300, Rgba([255, 255, 255, 255]));
    EditorSession::open(base, FontBook::new(), EditorSettings::default()).unwrap()
}

fn drag(session: &mut EditorSession, tool: Tool, from: Pos2, to: Pos2) -> EventOutcome {
    session.set_tool(tool);
    session.pointer_down(from);
    session.pointer_move(to);
    session.pointer_up()
}

fn command(key: Key) -> InputEvent {
    InputEvent::KeyDown {
        key,
        modifiers: Modifiers::COMMAND,
    }
}

fn plain(key: Key) -> InputEvent {
    InputEvent::KeyDown {
        key,
        modifiers: Modifiers::NONE,
    }
}

#[test]
fn test_surface_must_be_acquired() {
    let result = EditorSession::open(RgbaImage::new(0, 0), FontBook::new(), EditorSettings::default());
    assert!(matches!(result, Err(eframe_annotate::EditorError::ResourceUnavailable(_))));
}

#[test]
fn test_rectangle_circle_undo_redo_scenario() {
    let mut session = open_session();

    let outcome = drag(&mut session, Tool::Rectangle, pos2(50.0, 50.0), pos2(150.0, 120.0));
    assert_eq!(outcome, EventOutcome::SceneChanged);
    drag(&mut session, Tool::Circle, pos2(200.0, 200.0), pos2(230.0, 200.0));
    assert_eq!(session.scene().len(), 2);

    match &session.scene().elements()[1].kind {
        ElementKind::Circle { x, y, radius, .. } => assert_eq!((*x, *y, *radius), (200.0, 200.0, 30.0)),
        other => panic!("expected circle, got {other:?}"),
    }

    session.handle_event(&command(Key::Z));
    assert_eq!(session.scene().len(), 1);
    assert_eq!(session.scene().elements()[0].element_type(), "rectangle");

    session.handle_event(&command(Key::Y));
    assert_eq!(session.scene().len(), 2);
}

#[test]
fn test_commit_undo_redo_round_trip() {
    for n in [1usize, 10, 50] {
        let mut session = open_session();
        for i in 0..n {
            let y = i as f32 * 5.0;
            drag(&mut session, Tool::Arrow, pos2(10.0, y), pos2(90.0, y));
        }
        let original = session.scene().clone();
        assert_eq!(original.len(), n);

        for _ in 0..n {
            session.undo();
        }
        for _ in 0..n {
            session.redo();
        }
        assert_eq!(session.scene(), &original);
    }
}

#[test]
fn test_pen_stroke_collects_points() {
    let mut session = open_session();
    session.set_tool(Tool::Pen);
    session.pointer_down(pos2(10.0, 10.0));
    for i in 1..=5 {
        session.pointer_move(pos2(10.0 + i as f32 * 4.0, 10.0));
    }
    // Not part of the scene until the pointer comes up.
    assert!(session.scene().is_empty());
    assert!(session.state().is_drawing());

    session.pointer_up();
    assert!(session.state().is_idle());
    match &session.scene().elements()[0].kind {
        ElementKind::Path { points } => assert_eq!(points.len(), 6),
        other => panic!("expected path, got {other:?}"),
    }
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_eraser_removes_topmost_hit() {
    let mut session = open_session();
    drag(&mut session, Tool::Rectangle, pos2(50.0, 50.0), pos2(150.0, 150.0));
    drag(&mut session, Tool::Rectangle, pos2(90.0, 90.0), pos2(110.0, 110.0));
    let top_id = session.scene().elements()[1].id();
    let history_len = session.history().len();

    session.set_tool(Tool::Eraser);
    let outcome = session.pointer_down(pos2(100.0, 100.0));
    assert_eq!(outcome, EventOutcome::SceneChanged);
    assert_eq!(session.scene().len(), 1);
    assert!(session.scene().find_element_by_id(top_id).is_none());
    assert_eq!(session.history().len(), history_len + 1);
    assert!(session.state().is_idle());

    // Missing everything is a normal outcome.
    assert_eq!(session.pointer_down(pos2(290.0, 5.0)), EventOutcome::Ignored);
    assert_eq!(session.history().len(), history_len + 1);
}

#[test]
fn test_text_commit_and_cancel() {
    let mut session = open_session();
    session.handle_event(&plain(Key::T));
    assert_eq!(session.tool(), Tool::Text);

    session.pointer_down(pos2(20.0, 30.0));
    assert!(session.state().is_text_pending());
    assert!(session.scene().is_empty());

    session.handle_event(&InputEvent::Text("Hi".to_owned()));
    // Tool keys are text while composing.
    session.handle_event(&plain(Key::E));
    session.handle_event(&InputEvent::Text("e".to_owned()));
    assert_eq!(session.tool(), Tool::Text);

    session.handle_event(&plain(Key::Enter));
    assert!(session.state().is_idle());
    match &session.scene().elements()[0].kind {
        ElementKind::Text { x, y, text, .. } => {
            assert_eq!((*x, *y), (20.0, 30.0));
            assert_eq!(text, "Hie");
        }
        other => panic!("expected text, got {other:?}"),
    }

    let history_len = session.history().len();
    session.pointer_down(pos2(100.0, 100.0));
    session.handle_event(&InputEvent::Text("draft".to_owned()));
    session.handle_event(&plain(Key::Escape));
    assert!(session.state().is_idle());
    assert_eq!(session.scene().len(), 1);
    assert_eq!(session.history().len(), history_len);
}

#[test]
fn test_blank_text_is_discarded() {
    let mut session = open_session();
    session.set_tool(Tool::Text);
    session.pointer_down(pos2(5.0, 5.0));
    let outcome = session.submit_text("   ");
    assert_ne!(outcome, EventOutcome::SceneChanged);
    assert!(session.scene().is_empty());
    assert_eq!(session.history().len(), 1);

    session.pointer_down(pos2(5.0, 5.0));
    assert_eq!(session.submit_text("label"), EventOutcome::SceneChanged);
    assert_eq!(session.scene().len(), 1);
}

#[test]
fn test_tool_keys() {
    let mut session = open_session();
    for (key, tool) in [
        (Key::R, Tool::Rectangle),
        (Key::C, Tool::Circle),
        (Key::A, Tool::Arrow),
        (Key::E, Tool::Eraser),
        (Key::P, Tool::Pen),
    ] {
        session.handle_event(&plain(key));
        assert_eq!(session.tool(), tool);
    }
}

#[test]
fn test_undo_mid_stroke_discards_element() {
    let mut session = open_session();
    drag(&mut session, Tool::Arrow, pos2(0.0, 0.0), pos2(50.0, 50.0));

    session.pointer_down(pos2(100.0, 100.0));
    session.pointer_move(pos2(150.0, 100.0));
    session.handle_event(&command(Key::Z));

    assert!(session.state().is_idle());
    assert!(session.scene().is_empty());
    assert_eq!(session.pointer_up(), EventOutcome::Ignored);
    assert!(session.scene().is_empty());
}

#[test]
fn test_non_finite_move_drops_element() {
    let mut session = open_session();
    session.set_tool(Tool::Circle);
    session.pointer_down(pos2(10.0, 10.0));
    session.pointer_move(pos2(f32::NAN, 10.0));

    assert_eq!(session.state(), &EditorState::Idle);
    session.pointer_up();
    assert!(session.scene().is_empty());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_pointer_events_outside_canvas() {
    let mut session = open_session();
    session.set_tool(Tool::Rectangle);
    let outside = InputLocation {
        position: pos2(-5.0, -5.0),
        is_in_canvas: false,
    };
    let outcome = session.handle_event(&InputEvent::PointerDown {
        location: outside,
        button: PointerButton::Primary,
    });
    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(session.state().is_idle());

    // A drag that started inside keeps following the pointer outside.
    session.handle_event(&InputEvent::PointerDown {
        location: InputLocation::in_canvas(pos2(10.0, 10.0)),
        button: PointerButton::Primary,
    });
    session.handle_event(&InputEvent::PointerMove {
        location: outside,
        held_buttons: vec![PointerButton::Primary],
    });
    session.handle_event(&InputEvent::PointerUp {
        location: outside,
        button: PointerButton::Primary,
    });
    match &session.scene().elements()[0].kind {
        ElementKind::Rectangle { width, height, .. } => assert_eq!((*width, *height), (-15.0, -15.0)),
        other => panic!("expected rectangle, got {other:?}"),
    }
}

#[test]
fn test_clear_all() {
    let mut session = open_session();
    assert_eq!(session.clear_all(), EventOutcome::Ignored);

    drag(&mut session, Tool::Arrow, pos2(0.0, 0.0), pos2(50.0, 50.0));
    drag(&mut session, Tool::Arrow, pos2(0.0, 10.0), pos2(50.0, 60.0));
    assert_eq!(session.clear_all(), EventOutcome::SceneChanged);
    assert!(session.scene().is_empty());

    session.undo();
    assert_eq!(session.scene().len(), 2);
}

#[test]
fn test_layer_shows_in_progress_overlay() {
    let mut session = open_session();
    session.set_tool(Tool::Rectangle);
    let version = session.layer_version();

    session.pointer_down(pos2(20.0, 20.0));
    session.pointer_move(pos2(80.0, 80.0));
    assert!(session.layer_version() > version);
    assert!(session.vector_layer().get_pixel(20, 50).0[3] > 0);

    // The export only contains committed elements.
    let exported = session.export().unwrap();
    assert_eq!(exported.get_pixel(20, 50).0, [255, 255, 255, 255]);

    session.pointer_up();
    let exported = session.export().unwrap();
    assert_eq!(exported.get_pixel(20, 50).0, [255, 0, 0, 255]);
    assert_eq!(exported.dimensions(), (300, 300));
}

#[test]
fn test_translucent_fill_keeps_earlier_stroke_visible() {
    let mut session = open_session();
    session.settings_mut().color = Color32::BLUE;
    drag(&mut session, Tool::Arrow, pos2(20.0, 100.0), pos2(180.0, 100.0));
    assert_eq!(session.export().unwrap().get_pixel(100, 100).0, [0, 0, 255, 255]);

    session.settings_mut().color = Color32::RED;
    session.settings_mut().fill_enabled = true;
    drag(&mut session, Tool::Rectangle, pos2(60.0, 60.0), pos2(140.0, 140.0));

    let layer = session.vector_layer().get_pixel(100, 100).0;
    let exported = session.export().unwrap().get_pixel(100, 100).0;
    for pixel in [layer, exported] {
        assert!(pixel[0].abs_diff(64) <= 2, "{pixel:?}");
        assert_eq!(pixel[1], 0);
        assert!(pixel[2].abs_diff(191) <= 2, "{pixel:?}");
        assert_eq!(pixel[3], 255);
    }

    // Filled interior away from the arrow shows the tint over the white base.
    let tinted = session.export().unwrap().get_pixel(100, 80).0;
    assert!(tinted[0] >= 253 && tinted[1].abs_diff(191) <= 2, "{tinted:?}");
}

#[test]
fn test_undo_while_composing_discards_text() {
    let mut session = open_session();
    drag(&mut session, Tool::Arrow, pos2(0.0, 0.0), pos2(50.0, 50.0));

    session.set_tool(Tool::Text);
    session.pointer_down(pos2(100.0, 100.0));
    session.handle_event(&InputEvent::Text("draft".to_owned()));
    assert_eq!(session.handle_event(&command(Key::Z)), EventOutcome::SceneChanged);

    assert!(session.state().is_idle());
    assert!(session.scene().is_empty());

    session.handle_event(&command(Key::Y));
    assert_eq!(session.scene().len(), 1);
    assert_eq!(session.scene().elements()[0].element_type(), "arrow");
}
