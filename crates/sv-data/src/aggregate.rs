//! Per-publisher metrics with credit split across co-publishers

use indexmap::IndexMap;
use sv_core::PublisherKey;

use crate::records::GameRecord;

/// Label used for games whose publisher list is empty after trimming
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct PublisherAggregate {
    pub key: PublisherKey,
    /// Sum of credit-split peak CCU
    pub total_peak_ccu: f64,
    /// Sum of credit-split review ratios
    pub total_review_ratio: f64,
    /// Fractional number of games credited to this publisher
    pub game_share: f64,
}

impl PublisherAggregate {
    fn new(key: PublisherKey) -> Self {
        Self {
            key,
            total_peak_ccu: 0.0,
            total_review_ratio: 0.0,
            game_share: 0.0,
        }
    }

    pub fn is_indie(&self) -> bool {
        self.key.is_indie()
    }

    pub fn average_review_ratio(&self) -> f64 {
        if self.game_share > 0.0 {
            self.total_review_ratio / self.game_share
        } else {
            0.0
        }
    }

    /// Whole games credited, rounded down for display.
    pub fn game_count(&self) -> u64 {
        // Tolerate float error on shares like 1/3 + 1/3 + 1/3.
        (self.game_share + 1e-9).floor() as u64
    }
}

/// Accumulate publisher metrics.
///
/// Indie games go to the single indie bucket when `include_indie` is set and
/// are left out entirely otherwise. Every other game credits `1/N` of its
/// metrics to each of its N publishers. The indie bucket, when present, is
/// the last entry; named publishers keep first-seen order.
pub fn aggregate_publishers<'a>(
    games: impl IntoIterator<Item = &'a GameRecord>,
    include_indie: bool,
) -> Vec<PublisherAggregate> {
    let mut named: IndexMap<String, PublisherAggregate> = IndexMap::new();
    let mut indie = PublisherAggregate::new(PublisherKey::Indie);

    for game in games {
        if game.is_indie() {
            if include_indie {
                indie.total_peak_ccu += game.peak_ccu;
                indie.total_review_ratio += game.review_ratio;
                indie.game_share += 1.0;
            }
            continue;
        }

        let mut publishers: Vec<&str> = game.publishers().collect();
        if publishers.is_empty() {
            publishers.push(UNKNOWN_PUBLISHER);
        }
        let share = 1.0 / publishers.len() as f64;

        for publisher in publishers {
            let entry = named
                .entry(publisher.to_string())
                .or_insert_with(|| PublisherAggregate::new(PublisherKey::named(publisher)));
            entry.total_peak_ccu += game.peak_ccu * share;
            entry.total_review_ratio += game.review_ratio * share;
            entry.game_share += share;
        }
    }

    let mut aggregates: Vec<PublisherAggregate> = named.into_values().collect();
    if indie.game_share > 0.0 {
        aggregates.push(indie);
    }
    aggregates
}

/// Aggregates at or above `threshold` plus the indie bucket, largest first.
pub fn visible_publishers(aggregates: &[PublisherAggregate], threshold: f64) -> Vec<PublisherAggregate> {
    let mut visible: Vec<PublisherAggregate> = aggregates
        .iter()
        .filter(|aggregate| aggregate.is_indie() || aggregate.total_peak_ccu >= threshold)
        .cloned()
        .collect();
    visible.sort_by(|a, b| b.total_peak_ccu.total_cmp(&a.total_peak_ccu));
    visible
}
