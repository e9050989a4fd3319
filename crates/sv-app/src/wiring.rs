//! Bus subscribers that own every state mutation
//!
//! Views only emit. The stores change here, one subscriber per slice, and the
//! bubble panel switches between publishers and games in response to the
//! same events.

use std::sync::Arc;

use parking_lot::RwLock;
use sv_core::{DashboardEvent, EventBus, EventKind, SelectionStore};
use sv_data::DatasetStore;
use sv_views::BubbleMode;

/// Subscriber that applies time filters to the dataset store
pub const DATASET_SUBSCRIBER: &str = "dataset-store";
/// Subscriber that applies picks and filter settings to the selection store
pub const SELECTION_SUBSCRIBER: &str = "selection-store";
/// Subscriber that swaps the publisher and game bubble charts
pub const VIEW_SWITCH_SUBSCRIBER: &str = "view-switch";
/// Subscriber that logs every interaction
pub const EVENT_LOG_SUBSCRIBER: &str = "event-log";

const ALL_KINDS: [EventKind; 6] = [
    EventKind::TimeRangeChanged,
    EventKind::GameSelected,
    EventKind::PublisherSelected,
    EventKind::ReturnToOverview,
    EventKind::PeakThresholdChanged,
    EventKind::IndieVisibilityChanged,
];

pub fn register_store_subscribers(bus: &EventBus, dataset: Arc<DatasetStore>, selection: Arc<SelectionStore>) {
    bus.subscribe(EventKind::TimeRangeChanged, DATASET_SUBSCRIBER, move |event| {
        if let DashboardEvent::TimeRangeChanged(filter) = event {
            dataset.set_time_filter(*filter);
        }
        Ok(())
    });

    let store = Arc::clone(&selection);
    bus.subscribe(EventKind::GameSelected, SELECTION_SUBSCRIBER, move |event| {
        if let DashboardEvent::GameSelected(game) = event {
            store.select_game(*game);
        }
        Ok(())
    });

    let store = Arc::clone(&selection);
    bus.subscribe(EventKind::PublisherSelected, SELECTION_SUBSCRIBER, move |event| {
        if let DashboardEvent::PublisherSelected(publisher) = event {
            store.select_publisher(publisher.clone());
        }
        Ok(())
    });

    let store = Arc::clone(&selection);
    bus.subscribe(EventKind::ReturnToOverview, SELECTION_SUBSCRIBER, move |_| {
        store.return_to_overview();
        Ok(())
    });

    let store = Arc::clone(&selection);
    bus.subscribe(EventKind::PeakThresholdChanged, SELECTION_SUBSCRIBER, move |event| {
        if let DashboardEvent::PeakThresholdChanged(threshold) = event {
            store.set_peak_threshold(*threshold);
        }
        Ok(())
    });

    bus.subscribe(EventKind::IndieVisibilityChanged, SELECTION_SUBSCRIBER, move |event| {
        if let DashboardEvent::IndieVisibilityChanged(show) = event {
            selection.set_show_indie(*show);
        }
        Ok(())
    });
}

/// Drill down on a publisher pick, come back on `ReturnToOverview`.
pub fn register_view_switching(bus: &EventBus, mode: Arc<RwLock<BubbleMode>>) {
    let target = Arc::clone(&mode);
    bus.subscribe(EventKind::PublisherSelected, VIEW_SWITCH_SUBSCRIBER, move |event| {
        if let DashboardEvent::PublisherSelected(publisher) = event {
            *target.write() = if publisher.is_some() { BubbleMode::Games } else { BubbleMode::Publishers };
        }
        Ok(())
    });

    bus.subscribe(EventKind::ReturnToOverview, VIEW_SWITCH_SUBSCRIBER, move |_| {
        *mode.write() = BubbleMode::Publishers;
        Ok(())
    });
}

pub fn register_event_log(bus: &EventBus) {
    for kind in ALL_KINDS {
        bus.subscribe(kind, EVENT_LOG_SUBSCRIBER, |event| {
            tracing::info!(?event, "dashboard event");
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::{AppId, PublisherKey, TimeFilter, TimeRange};
    use chrono::NaiveDate;

    struct Harness {
        bus: EventBus,
        dataset: Arc<DatasetStore>,
        selection: Arc<SelectionStore>,
        mode: Arc<RwLock<BubbleMode>>,
    }

    fn harness() -> Harness {
        let bus = EventBus::new();
        let dataset = Arc::new(DatasetStore::new());
        let selection = Arc::new(SelectionStore::new(5_000.0));
        let mode = Arc::new(RwLock::new(BubbleMode::Publishers));
        register_store_subscribers(&bus, Arc::clone(&dataset), Arc::clone(&selection));
        register_view_switching(&bus, Arc::clone(&mode));
        register_event_log(&bus);
        Harness { bus, dataset, selection, mode }
    }

    #[test]
    fn test_publisher_pick_drills_down_and_back() {
        let h = harness();
        h.bus
            .emit(DashboardEvent::PublisherSelected(Some(PublisherKey::named("Valve"))))
            .unwrap();
        assert_eq!(*h.mode.read(), BubbleMode::Games);
        assert_eq!(h.selection.selected_publisher(), Some(PublisherKey::named("Valve")));

        h.bus.emit(DashboardEvent::GameSelected(Some(AppId(730)))).unwrap();
        h.bus.emit(DashboardEvent::ReturnToOverview).unwrap();
        assert_eq!(*h.mode.read(), BubbleMode::Publishers);
        assert_eq!(h.selection.selected_publisher(), None);
        assert_eq!(h.selection.selected_game(), None);
    }

    #[test]
    fn test_deselecting_publisher_returns_to_publishers() {
        let h = harness();
        h.bus.emit(DashboardEvent::PublisherSelected(Some(PublisherKey::Indie))).unwrap();
        h.bus.emit(DashboardEvent::PublisherSelected(None)).unwrap();
        assert_eq!(*h.mode.read(), BubbleMode::Publishers);
    }

    #[test]
    fn test_filters_reach_the_stores() {
        let h = harness();
        let range = TimeRange::single_day(NaiveDate::from_ymd_opt(2010, 5, 1).unwrap());
        h.bus.emit(DashboardEvent::TimeRangeChanged(TimeFilter::Range(range))).unwrap();
        assert_eq!(h.dataset.time_filter(), TimeFilter::Range(range));

        h.bus.emit(DashboardEvent::PeakThresholdChanged(20_000.0)).unwrap();
        h.bus.emit(DashboardEvent::IndieVisibilityChanged(false)).unwrap();
        let state = h.selection.snapshot();
        assert_eq!(state.peak_threshold, 20_000.0);
        assert!(!state.show_indie);
    }

    #[test]
    fn test_every_kind_is_logged() {
        let h = harness();
        for kind in ALL_KINDS {
            assert!(h.bus.subscriber_count(kind) >= 2, "{kind:?}");
        }
    }
}
