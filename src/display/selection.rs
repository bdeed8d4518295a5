//! Cells the user has marked as favourites for the next generation.

/// Ordered toggle set of cell indices, in the order they were first marked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `index`, or unmark it if already marked. Returns true if now marked.
    pub fn toggle(&mut self, index: usize) -> bool {
        if let Some(pos) = self.indices.iter().position(|&k| k == index) {
            self.indices.remove(pos);
            false
        } else {
            self.indices.push(index);
            true
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Hand the marked cells over and reset, as done on generation advance.
    pub fn take(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.indices)
    }
}
