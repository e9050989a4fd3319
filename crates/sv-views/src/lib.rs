//! Linked views of the Steam games dashboard

mod bubbles;
mod space_view;
mod viewport;
pub mod card_list;
pub mod colors;
pub mod format;
pub mod game_bubbles;
pub mod layout;
pub mod publisher_bubbles;
pub mod scales;
pub mod scatter;
pub mod timeline_detail;
pub mod timeline_overview;

pub use card_list::{CardListConfig, CardListView};
pub use game_bubbles::{GameBubbleConfig, GameBubbleView};
pub use publisher_bubbles::{PublisherBubbleConfig, PublisherBubbleView};
pub use scatter::{ScatterConfig, ScatterView};
pub use space_view::{DashboardView, ViewId};
pub use timeline_detail::DetailTimelineView;
pub use timeline_overview::OverviewTimelineView;
pub use viewport::{BubbleMode, Panel, Viewport, ViewportConfig};

use std::sync::Arc;

use sv_core::{DashboardEvent, EventBus, SelectionStore};
use sv_data::DatasetStore;

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    pub dataset: Arc<DatasetStore>,
    pub selection: Arc<SelectionStore>,
    pub event_bus: Arc<EventBus>,
}

impl ViewerContext {
    pub fn new(dataset: Arc<DatasetStore>, selection: Arc<SelectionStore>, event_bus: Arc<EventBus>) -> Self {
        Self { dataset, selection, event_bus }
    }

    /// Broadcast an interaction. Handler failures are logged, not propagated
    /// into the frame.
    pub fn emit(&self, event: DashboardEvent) {
        if let Err(err) = self.event_bus.emit(event) {
            tracing::error!("event dispatch failed: {err:#}");
        }
    }
}
