use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use sv_core::{AppId, DateExtent, TimeFilter};

use crate::precomputed::PrecomputedAggregates;
use crate::records::GameRef;

/// Everything loaded at startup. Immutable once built.
#[derive(Debug, Default)]
pub struct Dataset {
    games: Vec<GameRef>,
    by_id: AHashMap<AppId, GameRef>,
    aggregates: PrecomputedAggregates,
}

impl Dataset {
    pub fn new(games: Vec<GameRef>, aggregates: PrecomputedAggregates) -> Self {
        let by_id = games.iter().map(|game| (game.app_id, Arc::clone(game))).collect();
        Self { games, by_id, aggregates }
    }

    pub fn games(&self) -> &[GameRef] {
        &self.games
    }

    pub fn game(&self, id: AppId) -> Option<&GameRef> {
        self.by_id.get(&id)
    }

    pub fn aggregates(&self) -> &PrecomputedAggregates {
        &self.aggregates
    }

    /// Date span the timeline works over.
    pub fn extent(&self) -> Option<DateExtent> {
        self.aggregates
            .extent()
            .or_else(|| DateExtent::from_dates(self.games.iter().map(|game| game.release_date)))
    }
}

struct FilteredGames {
    filter: TimeFilter,
    games: Arc<Vec<GameRef>>,
}

/// Holds the dataset and the release-date filtered view of it.
///
/// `set_dataset` and `set_time_filter` are the only mutators; the revision
/// moves whenever the filtered set may have changed.
pub struct DatasetStore {
    dataset: RwLock<Option<Arc<Dataset>>>,
    filtered: RwLock<FilteredGames>,
    revision: AtomicU64,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            dataset: RwLock::new(None),
            filtered: RwLock::new(FilteredGames {
                filter: TimeFilter::All,
                games: Arc::new(Vec::new()),
            }),
            revision: AtomicU64::new(0),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.read().is_some()
    }

    pub fn set_dataset(&self, dataset: Dataset) {
        tracing::info!(games = dataset.games().len(), "dataset ready");
        let dataset = Arc::new(dataset);
        *self.dataset.write() = Some(Arc::clone(&dataset));

        let mut filtered = self.filtered.write();
        filtered.games = Arc::new(apply_filter(&dataset, &filtered.filter));
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.filtered.read().filter
    }

    pub fn set_time_filter(&self, filter: TimeFilter) {
        let mut filtered = self.filtered.write();
        if filtered.filter == filter {
            return;
        }
        filtered.filter = filter;
        if let Some(dataset) = self.dataset() {
            filtered.games = Arc::new(apply_filter(&dataset, &filter));
        }
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    /// Records released inside the current filter.
    pub fn filtered_games(&self) -> Arc<Vec<GameRef>> {
        Arc::clone(&self.filtered.read().games)
    }

    pub fn game(&self, id: AppId) -> Option<GameRef> {
        self.dataset.read().as_ref()?.game(id).cloned()
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_filter(dataset: &Dataset, filter: &TimeFilter) -> Vec<GameRef> {
    dataset
        .games()
        .iter()
        .filter(|game| filter.contains(game.release_date))
        .cloned()
        .collect()
}
