use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::ids::{AppId, PublisherKey};

/// Selection and filter state shared by every view
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Highlighted game, if any
    pub selected_game: Option<AppId>,

    /// Publisher whose games are being inspected
    pub selected_publisher: Option<PublisherKey>,

    /// Minimum peak concurrent players a publisher/game must reach
    pub peak_threshold: f64,

    /// Whether indie games take part in the views
    pub show_indie: bool,
}

impl SelectionState {
    pub fn new(peak_threshold: f64) -> Self {
        Self {
            selected_game: None,
            selected_publisher: None,
            peak_threshold,
            show_indie: true,
        }
    }
}

/// Single authoritative owner of [`SelectionState`].
///
/// Each setter bumps the revision only when the value actually changes, so
/// views can key their caches on it.
pub struct SelectionStore {
    state: RwLock<SelectionState>,
    revision: AtomicU64,
}

impl SelectionStore {
    /// Create a new selection store
    pub fn new(initial_threshold: f64) -> Self {
        Self {
            state: RwLock::new(SelectionState::new(initial_threshold)),
            revision: AtomicU64::new(0),
        }
    }

    /// Get a copy of the current state
    pub fn snapshot(&self) -> SelectionState {
        self.state.read().clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn selected_game(&self) -> Option<AppId> {
        self.state.read().selected_game
    }

    pub fn selected_publisher(&self) -> Option<PublisherKey> {
        self.state.read().selected_publisher.clone()
    }

    pub fn select_game(&self, game: Option<AppId>) {
        self.update(|state| state.selected_game = game);
    }

    pub fn select_publisher(&self, publisher: Option<PublisherKey>) {
        self.update(|state| state.selected_publisher = publisher);
    }

    pub fn set_peak_threshold(&self, threshold: f64) {
        if !threshold.is_finite() {
            tracing::warn!(threshold, "ignoring non-finite peak threshold");
            return;
        }
        self.update(|state| state.peak_threshold = threshold.max(0.0));
    }

    pub fn set_show_indie(&self, show: bool) {
        self.update(|state| state.show_indie = show);
    }

    /// Leave the per-publisher drill-down: clears publisher and game.
    pub fn return_to_overview(&self) {
        self.update(|state| {
            state.selected_publisher = None;
            state.selected_game = None;
        });
    }

    fn update(&self, mutate: impl FnOnce(&mut SelectionState)) {
        let mut state = self.state.write();
        let before = state.clone();
        mutate(&mut state);
        if *state != before {
            self.revision.fetch_add(1, Ordering::AcqRel);
            tracing::trace!(?state, "selection changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let store = SelectionStore::new(5000.0);
        let state = store.snapshot();
        assert_eq!(state.peak_threshold, 5000.0);
        assert!(state.show_indie);
        assert_eq!(state.selected_game, None);
        assert_eq!(state.selected_publisher, None);
    }

    #[test]
    fn test_revision_only_moves_on_change() {
        let store = SelectionStore::new(5000.0);
        store.set_peak_threshold(5000.0);
        assert_eq!(store.revision(), 0);

        store.set_peak_threshold(12000.0);
        assert_eq!(store.revision(), 1);
        store.select_game(Some(AppId(10)));
        store.select_game(Some(AppId(10)));
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_return_to_overview_clears_drill_down() {
        let store = SelectionStore::new(5000.0);
        store.select_publisher(Some(PublisherKey::named("Valve")));
        store.select_game(Some(AppId(570)));
        store.set_show_indie(false);

        store.return_to_overview();
        let state = store.snapshot();
        assert_eq!(state.selected_publisher, None);
        assert_eq!(state.selected_game, None);
        assert!(!state.show_indie);
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let store = SelectionStore::new(5000.0);
        store.set_peak_threshold(f64::NAN);
        assert_eq!(store.snapshot().peak_threshold, 5000.0);
    }
}
