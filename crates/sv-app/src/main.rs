//! Steam games dashboard entry point

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use eframe::egui::{self, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sv_core::{EventBus, SelectionStore};
use sv_data::{DatasetStore, GameSource};
use sv_ui::Theme;
use sv_views::format::thousands;
use sv_views::{BubbleMode, ViewerContext, Viewport};

mod config;
mod loader;
mod wiring;

use config::DashboardConfig;
use loader::{LoadSlot, LoadStatus};

/// Main application state
struct DashboardApp {
    /// Docked, linked views
    viewport: Viewport,

    /// Stores and bus shared with every view
    viewer_context: ViewerContext,

    /// Outcome of the background load
    load_status: LoadSlot,

    /// Shown on the loading screen
    source_name: String,

    /// Keeps the loader task alive
    _runtime: tokio::runtime::Runtime,

    last_frame: Option<Instant>,
}

impl DashboardApp {
    fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, runtime: tokio::runtime::Runtime) -> Self {
        sv_ui::apply_theme(&cc.egui_ctx, &Theme::default());
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let dataset = Arc::new(DatasetStore::new());
        let selection = Arc::new(SelectionStore::new(config.threshold.initial));
        let event_bus = Arc::new(EventBus::new());
        let viewport = Viewport::new(config.viewport_config());

        wiring::register_store_subscribers(&event_bus, Arc::clone(&dataset), Arc::clone(&selection));
        wiring::register_view_switching(&event_bus, viewport.bubble_mode());
        wiring::register_event_log(&event_bus);

        let load_status = loader::new_slot();
        let source_name = match config.source() {
            Ok(source) => {
                let name = source.source_name().to_string();
                loader::spawn_load(
                    runtime.handle(),
                    Box::new(source),
                    Arc::clone(&dataset),
                    Arc::clone(&load_status),
                    cc.egui_ctx.clone(),
                );
                name
            }
            Err(err) => {
                tracing::error!("invalid data source: {err:#}");
                *load_status.lock() = LoadStatus::Failed(format!("{err:#}"));
                String::new()
            }
        };

        Self {
            viewport,
            viewer_context: ViewerContext::new(dataset, selection, event_bus),
            load_status,
            source_name,
            _runtime: runtime,
            last_frame: None,
        }
    }

    fn frame_delta(&mut self) -> std::time::Duration {
        let now = Instant::now();
        let dt = self.last_frame.map(|last| now - last).unwrap_or_default();
        self.last_frame = Some(now);
        dt
    }

    fn status_bar(&self, ctx: &Context, bubble_mode: BubbleMode) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.viewer_context.selection.snapshot();
                let publisher = state
                    .selected_publisher
                    .as_ref()
                    .map_or("All publishers".to_string(), |key| key.label().to_string());
                ui.label(publisher);
                ui.separator();

                let game = state
                    .selected_game
                    .and_then(|id| self.viewer_context.dataset.game(id))
                    .map_or("No game selected".to_string(), |game| game.name.clone());
                ui.label(game);
                ui.separator();

                ui.label(format!("Min peak players: {}", thousands(state.peak_threshold)));
                ui.separator();
                ui.label(if state.show_indie { "Indie shown" } else { "Indie hidden" });

                if bubble_mode == BubbleMode::Games {
                    ui.separator();
                    if ui.button("Back to publishers").clicked() {
                        self.viewer_context.emit(sv_core::DashboardEvent::ReturnToOverview);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let games = self.viewer_context.dataset.filtered_games().len();
                    ui.label(format!("{} games in range", thousands(games as f64)));
                });
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let dt = self.frame_delta();
        let status = self.load_status.lock().clone();

        match status {
            LoadStatus::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    sv_ui::loading_screen(ui, &self.source_name);
                });
            }
            LoadStatus::Failed(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    sv_ui::error_screen(ui, &message);
                });
            }
            LoadStatus::Ready { .. } => {
                self.viewport.on_frame_update(&self.viewer_context, dt);

                let bubble_mode = *self.viewport.bubble_mode().read();
                self.status_bar(ctx, bubble_mode);
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.viewport.ui(ui, &self.viewer_context);
                });

                if self.viewport.wants_repaint() {
                    ctx.request_repaint();
                }
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = DashboardConfig::path_from_env();
    let config = DashboardConfig::load(config_path.as_deref())?;
    let runtime = tokio::runtime::Runtime::new()?;

    info!("Starting Steam games dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Steam Games Dashboard",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
