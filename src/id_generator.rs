use serde::{Deserialize, Serialize};

/// Identifier of a drawing element, unique within one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out element ids for one session.
///
/// The counter never goes backwards, so ids stay unique even after undo
/// brings back an older scene.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: usize,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_id(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut ids = IdGenerator::new();
        let a = ids.generate_id();
        let b = ids.generate_id();
        assert!(b > a);
        assert_eq!(a, ElementId(1));
    }
}
