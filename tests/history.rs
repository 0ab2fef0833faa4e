use eframe_annotate::element::{ElementId, ElementStyle, factory};
use eframe_annotate::history::{HISTORY_CAPACITY, History};
use eframe_annotate::Scene;
use egui::{Color32, pos2};

fn scene_with(count: usize) -> Scene {
    let mut scene = Scene::new();
    for i in 0..count {
        let style = ElementStyle::new(Color32::RED, 2.0);
        scene.add_element(factory::create_arrow(ElementId(i + 1), pos2(i as f32, 0.0), style));
    }
    scene
}

#[test]
fn test_capacity_evicts_oldest() {
    let mut history = History::new();
    for i in 0..=HISTORY_CAPACITY {
        history.push(&scene_with(i));
    }

    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.index(), HISTORY_CAPACITY - 1);
    assert_eq!(history.current().map(|s| s.elements().len()), Some(HISTORY_CAPACITY));

    // The empty scene was the oldest snapshot and is gone.
    let mut oldest = None;
    while let Some(scene) = history.undo() {
        oldest = Some(scene);
    }
    assert_eq!(oldest.map(|s| s.len()), Some(1));
}

#[test]
fn test_undo_redo_boundaries() {
    let mut history = History::new();
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());

    history.push(&scene_with(0));
    history.push(&scene_with(1));
    assert!(history.can_undo());
    assert!(!history.can_redo());

    assert_eq!(history.undo().map(|s| s.len()), Some(0));
    assert!(history.undo().is_none());
    assert_eq!(history.index(), 0);

    assert_eq!(history.redo().map(|s| s.len()), Some(1));
    assert!(history.redo().is_none());
}

#[test]
fn test_push_discards_redo_tail() {
    let mut history = History::new();
    history.push(&scene_with(0));
    history.push(&scene_with(1));
    history.push(&scene_with(2));
    history.undo();
    history.undo();

    history.push(&scene_with(5));
    assert_eq!(history.len(), 2);
    assert!(!history.can_redo());
    assert_eq!(history.current().map(|s| s.elements().len()), Some(5));
}

#[test]
fn test_snapshots_do_not_alias_live_scene() {
    let mut history = History::new();
    let mut live = scene_with(1);
    history.push(&live);
    live.clear();
    history.push(&live);

    let mut restored = history.undo().unwrap();
    assert_eq!(restored.len(), 1);
    restored.clear();

    // Mutating the restored scene leaves the snapshot intact.
    assert_eq!(history.current().map(|s| s.elements().len()), Some(1));
    assert_eq!(history.redo().map(|s| s.len()), Some(0));
    assert_eq!(history.undo().map(|s| s.len()), Some(1));
}

#[test]
fn test_small_capacity() {
    let mut history = History::with_capacity(3);
    for i in 0..5 {
        history.push(&scene_with(i));
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.undo().map(|s| s.len()), Some(3));
    assert_eq!(history.undo().map(|s| s.len()), Some(2));
    assert!(history.undo().is_none());
}
