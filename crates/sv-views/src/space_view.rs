//! Base trait for the dashboard panels

use std::time::Duration;

use egui::Ui;
use uuid::Uuid;

use crate::ViewerContext;

/// Unique identifier for a view
pub type ViewId = Uuid;

/// A panel that renders from the shared stores and emits interactions on the bus
pub trait DashboardView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> ViewId;

    /// Get the view type
    fn view_type(&self) -> &str;

    /// Get the title of this view
    fn title(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);

    /// Called once per frame before any view draws, with the frame delta
    fn on_frame_update(&mut self, _ctx: &ViewerContext, _dt: Duration) {}

    /// Whether the view is animating and needs another frame soon
    fn wants_repaint(&self) -> bool {
        false
    }
}
