use crate::element::DrawingElement;
use crate::scene::Scene;

/// Number of snapshots kept before the oldest is evicted
pub const HISTORY_CAPACITY: usize = 50;

/// Immutable copy of a scene at one point in editing history
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    elements: Vec<DrawingElement>,
}

impl Snapshot {
    pub fn capture(scene: &Scene) -> Self {
        Self {
            elements: scene.elements().to_vec(),
        }
    }

    pub fn elements(&self) -> &[DrawingElement] {
        &self.elements
    }

    /// Fresh scene that shares nothing with this snapshot
    pub fn to_scene(&self) -> Scene {
        Scene::from_elements(self.elements.clone())
    }
}

/// Bounded list of scene snapshots with a cursor for undo/redo.
///
/// Whenever the history is non-empty, `index < len`.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    /// Creates an empty history holding up to [`HISTORY_CAPACITY`] snapshots
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Records `scene` as the newest state.
    ///
    /// Anything past the cursor (the redo tail) is discarded first. When the
    /// capacity is exceeded the oldest snapshot is dropped.
    pub fn push(&mut self, scene: &Scene) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(Snapshot::capture(scene));
        self.index = self.snapshots.len() - 1;

        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
            self.index -= 1;
        }
    }

    /// Steps back one snapshot and returns a copy of it, or `None` at the start.
    pub fn undo(&mut self) -> Option<Scene> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.snapshots[self.index].to_scene())
    }

    /// Steps forward one snapshot and returns a copy of it, or `None` at the end.
    pub fn redo(&mut self) -> Option<Scene> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(self.snapshots[self.index].to_scene())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
