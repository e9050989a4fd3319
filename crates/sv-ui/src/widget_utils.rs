//! Widget id helpers
//!
//! Every id a view hands to egui is derived from the view's own id, so two
//! views drawing the same kind of widget in one frame never share one.

use std::hash::Hash;

use egui::Id;

/// Id builder rooted at a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedId {
    id: Id,
}

impl ScopedId {
    pub fn new(scope: impl Hash) -> Self {
        Self { id: Id::new(scope) }
    }

    /// Descend into a named part of the view
    pub fn with(self, part: impl Hash) -> Self {
        Self { id: self.id.with(part) }
    }

    /// Descend into the `index`-th repeated element
    pub fn index(self, index: usize) -> Self {
        self.with(("idx", index))
    }

    pub fn id(self) -> Id {
        self.id
    }
}

impl From<ScopedId> for Id {
    fn from(scoped: ScopedId) -> Self {
        scoped.id
    }
}

/// Id for a named part of a view.
pub fn scoped_id(scope: impl Hash, part: &str) -> Id {
    ScopedId::new(scope).with(part).id()
}

/// Id for the `index`-th element of a repeated part, e.g. one card in a strip.
pub fn indexed_id(scope: impl Hash, part: &str, index: usize) -> Id {
    ScopedId::new(scope).with(part).index(index).id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_ids_differ_between_views() {
        assert_ne!(scoped_id("publishers", "canvas"), scoped_id("games", "canvas"));
        assert_eq!(scoped_id("publishers", "canvas"), scoped_id("publishers", "canvas"));
    }

    #[test]
    fn test_indexed_ids() {
        assert_ne!(indexed_id("cards", "card", 0), indexed_id("cards", "card", 1));
        assert_eq!(
            indexed_id("cards", "card", 3),
            ScopedId::new("cards").with("card").index(3).id()
        );
    }
}
