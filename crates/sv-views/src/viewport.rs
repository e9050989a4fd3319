//! Viewport - docks the dashboard panels and owns the views

use std::sync::Arc;
use std::time::Duration;

use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};
use parking_lot::RwLock;
use sv_core::BrushConfig;

use crate::{
    CardListConfig, CardListView, DashboardView, DetailTimelineView, GameBubbleConfig, GameBubbleView,
    OverviewTimelineView, PublisherBubbleConfig, PublisherBubbleView, ScatterConfig, ScatterView, ViewerContext,
};

/// Dock tabs of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Overview,
    Detail,
    Bubbles,
    Scatter,
    Cards,
}

/// Which chart occupies the bubble panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BubbleMode {
    #[default]
    Publishers,
    Games,
}

/// Per-view settings handed to [`Viewport::new`]
#[derive(Debug, Clone, Default)]
pub struct ViewportConfig {
    pub brush: BrushConfig,
    pub publishers: PublisherBubbleConfig,
    pub games: GameBubbleConfig,
    pub scatter: ScatterConfig,
    pub cards: CardListConfig,
}

/// Every view of the dashboard, addressed by dock tab
struct DashboardViews {
    bubble_mode: Arc<RwLock<BubbleMode>>,
    overview: OverviewTimelineView,
    detail: DetailTimelineView,
    publishers: PublisherBubbleView,
    games: GameBubbleView,
    scatter: ScatterView,
    cards: CardListView,
}

impl DashboardViews {
    fn view_mut(&mut self, panel: Panel) -> &mut dyn DashboardView {
        let mode = *self.bubble_mode.read();
        match panel {
            Panel::Overview => &mut self.overview,
            Panel::Detail => &mut self.detail,
            Panel::Bubbles => match mode {
                BubbleMode::Publishers => &mut self.publishers,
                BubbleMode::Games => &mut self.games,
            },
            Panel::Scatter => &mut self.scatter,
            Panel::Cards => &mut self.cards,
        }
    }

    fn all(&self) -> [&dyn DashboardView; 6] {
        [
            &self.overview,
            &self.detail,
            &self.publishers,
            &self.games,
            &self.scatter,
            &self.cards,
        ]
    }

    fn all_mut(&mut self) -> [&mut dyn DashboardView; 6] {
        [
            &mut self.overview,
            &mut self.detail,
            &mut self.publishers,
            &mut self.games,
            &mut self.scatter,
            &mut self.cards,
        ]
    }
}

/// The main viewport that lays out the linked views
pub struct Viewport {
    dock_state: DockState<Panel>,
    views: DashboardViews,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            dock_state: default_dock_state(),
            views: DashboardViews {
                bubble_mode: Arc::new(RwLock::new(BubbleMode::default())),
                overview: OverviewTimelineView::new(config.brush),
                detail: DetailTimelineView::new(),
                publishers: PublisherBubbleView::new(config.publishers),
                games: GameBubbleView::new(config.games),
                scatter: ScatterView::new(config.scatter),
                cards: CardListView::new(config.cards),
            },
        }
    }

    /// Shared handle the orchestrator flips on drill-down and back.
    pub fn bubble_mode(&self) -> Arc<RwLock<BubbleMode>> {
        Arc::clone(&self.views.bubble_mode)
    }

    /// Drive timers and animations of every view, visible or not.
    pub fn on_frame_update(&mut self, ctx: &ViewerContext, dt: Duration) {
        for view in self.views.all_mut() {
            view.on_frame_update(ctx, dt);
        }
    }

    pub fn wants_repaint(&self) -> bool {
        self.views.all().iter().any(|view| view.wants_repaint())
    }

    /// Draw the viewport
    pub fn ui(&mut self, ui: &mut Ui, ctx: &ViewerContext) {
        DockArea::new(&mut self.dock_state)
            .show_close_buttons(false)
            .draggable_tabs(true)
            .show_inside(
                ui,
                &mut ViewportTabViewer {
                    views: &mut self.views,
                    ctx,
                },
            );
    }
}

struct ViewportTabViewer<'a> {
    views: &'a mut DashboardViews,
    ctx: &'a ViewerContext,
}

impl TabViewer for ViewportTabViewer<'_> {
    type Tab = Panel;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        self.views.view_mut(*tab).title().into()
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        self.views.view_mut(*tab).ui(self.ctx, ui);
    }
}

/// Overview strip on top, detail timeline, bubbles beside the scatter plot,
/// cards along the bottom.
fn default_dock_state() -> DockState<Panel> {
    let mut dock_state = DockState::new(vec![Panel::Overview]);
    let surface = dock_state.main_surface_mut();
    let [_overview, rest] = surface.split_below(NodeIndex::root(), 0.18, vec![Panel::Detail]);
    let [_detail, rest] = surface.split_below(rest, 0.25, vec![Panel::Bubbles]);
    let [middle, _cards] = surface.split_below(rest, 0.62, vec![Panel::Cards]);
    surface.split_right(middle, 0.6, vec![Panel::Scatter]);
    dock_state
}
