use crate::element::{DrawingElement, ElementId};

/// Ordered list of committed elements. Later elements are drawn on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: Vec<DrawingElement>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<DrawingElement>) -> Self {
        Self { elements }
    }

    pub fn add_element(&mut self, element: DrawingElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[DrawingElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn find_element_by_id(&self, id: ElementId) -> Option<&DrawingElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Removes the element with the given id, returning it if it was present
    pub fn remove_element(&mut self, id: ElementId) -> Option<DrawingElement> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}
