//! Per-game filtering shared by the game, scatter and card views

use sv_core::{PublisherKey, SelectionState};

use crate::records::{GameRecord, GameRef};

/// Which publisher's games to keep
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublisherScope {
    #[default]
    All,
    Publisher(String),
    Indie,
}

impl PublisherScope {
    pub fn from_key(key: Option<&PublisherKey>) -> Self {
        match key {
            None => Self::All,
            Some(PublisherKey::Indie) => Self::Indie,
            Some(PublisherKey::Named(name)) => Self::Publisher(name.clone()),
        }
    }

    pub fn matches(&self, game: &GameRecord) -> bool {
        match self {
            Self::All => true,
            Self::Publisher(name) => game.has_publisher(name),
            Self::Indie => game.is_indie(),
        }
    }
}

/// Threshold and visibility rules applied to individual games
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameFilter {
    /// Games below this peak CCU are dropped when it is positive
    pub peak_threshold: f64,
    pub show_indie: bool,
    /// Drop games whose peak CCU was never recorded (0)
    pub require_tracked_peak: bool,
}

impl GameFilter {
    pub fn from_selection(selection: &SelectionState) -> Self {
        Self {
            peak_threshold: selection.peak_threshold,
            show_indie: selection.show_indie,
            require_tracked_peak: false,
        }
    }

    pub fn tracked_only(mut self) -> Self {
        self.require_tracked_peak = true;
        self
    }

    pub fn accepts(&self, game: &GameRecord) -> bool {
        if self.require_tracked_peak && game.peak_ccu <= 0.0 {
            return false;
        }
        if self.peak_threshold > 0.0 && game.peak_ccu < self.peak_threshold {
            return false;
        }
        self.show_indie || !game.is_indie()
    }
}

/// Games in `scope` that pass `filter`, in input order.
pub fn scope_games(games: &[GameRef], scope: &PublisherScope, filter: &GameFilter) -> Vec<GameRef> {
    games
        .iter()
        .filter(|game| scope.matches(game) && filter.accepts(game))
        .cloned()
        .collect()
}

/// The `limit` games with the highest peak CCU, ties kept in input order.
pub fn top_games(games: &[GameRef], scope: &PublisherScope, filter: &GameFilter, limit: usize) -> Vec<GameRef> {
    let mut selected = scope_games(games, scope, filter);
    selected.sort_by(|a, b| b.peak_ccu.total_cmp(&a.peak_ccu));
    selected.truncate(limit);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::game;
    use sv_core::AppId;

    fn ids(games: &[GameRef]) -> Vec<u64> {
        games.iter().map(|g| g.app_id.0).collect()
    }

    fn open_filter() -> GameFilter {
        GameFilter {
            peak_threshold: 0.0,
            show_indie: true,
            require_tracked_peak: false,
        }
    }

    #[test]
    fn test_scope_matches_split_publishers() {
        let games = vec![game(1, "Valve", 10.0, 0.9, false), game(2, "Hidden Path, Valve", 20.0, 0.9, false)];
        let scope = PublisherScope::from_key(Some(&PublisherKey::named("Valve")));
        assert_eq!(ids(&scope_games(&games, &scope, &open_filter())), vec![1, 2]);

        let scope = PublisherScope::from_key(Some(&PublisherKey::named("Hidden")));
        assert!(scope_games(&games, &scope, &open_filter()).is_empty());
    }

    #[test]
    fn test_indie_scope() {
        let games = vec![game(1, "A", 10.0, 0.9, true), game(2, "A", 20.0, 0.9, false)];
        let scope = PublisherScope::from_key(Some(&PublisherKey::Indie));
        assert_eq!(ids(&scope_games(&games, &scope, &open_filter())), vec![1]);
    }

    #[test]
    fn test_threshold_and_indie_visibility() {
        let games = vec![
            game(1, "A", 4000.0, 0.9, false),
            game(2, "A", 6000.0, 0.9, false),
            game(3, "A", 9000.0, 0.9, true),
        ];
        let filter = GameFilter {
            peak_threshold: 5000.0,
            show_indie: false,
            require_tracked_peak: false,
        };
        assert_eq!(ids(&scope_games(&games, &PublisherScope::All, &filter)), vec![2]);
    }

    #[test]
    fn test_untracked_peak_only_dropped_when_requested() {
        let games = vec![game(1, "A", 0.0, 0.9, false), game(2, "A", 10.0, 0.9, false)];
        assert_eq!(ids(&scope_games(&games, &PublisherScope::All, &open_filter())), vec![1, 2]);
        assert_eq!(ids(&scope_games(&games, &PublisherScope::All, &open_filter().tracked_only())), vec![2]);
    }

    #[test]
    fn test_top_games_sorted_and_capped() {
        let games: Vec<_> = (0..30).map(|i| game(i, "A", (i % 7) as f64 * 100.0 + 1.0, 0.5, false)).collect();
        let top = top_games(&games, &PublisherScope::All, &open_filter(), 24);
        assert_eq!(top.len(), 24);
        assert!(top.windows(2).all(|pair| pair[0].peak_ccu >= pair[1].peak_ccu));
        assert_eq!(top[0].app_id, AppId(6));
    }

    #[test]
    fn test_filter_from_selection() {
        let mut selection = SelectionState::new(5000.0);
        selection.show_indie = false;
        let filter = GameFilter::from_selection(&selection);
        assert_eq!(filter.peak_threshold, 5000.0);
        assert!(!filter.show_indie);
        assert!(!filter.require_tracked_peak);
    }
}
