//! Drill-down: the top games of the selected publisher as bubbles

use std::collections::HashMap;

use egui::{Color32, RichText, Stroke, Ui};
use sv_core::{AppId, DashboardEvent, PublisherKey, SelectionState};
use sv_data::{top_games, GameFilter, GameRef, PublisherScope};
use sv_ui::widgets::gradient_bar;
use uuid::Uuid;

use crate::bubbles::{bubble_canvas, short_label, BubbleStyle};
use crate::colors::{review_color, with_alpha, SELECTED_COLOR};
use crate::format::{long_date, percent, price, thousands};
use crate::layout::{ForceConfig, ForceLayout};
use crate::scales::{three_band_position, DivergingScale, SqrtScale};
use crate::{DashboardView, ViewId, ViewerContext};

#[derive(Debug, Clone, PartialEq)]
pub struct GameBubbleConfig {
    /// Maximum number of bubbles
    pub limit: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub label_min_radius: f32,
    /// Review ratio domain of the color scale
    pub review_low: f64,
    pub review_high: f64,
    /// Ratio cuts between the right, middle and left bands
    pub band_low_cut: f64,
    pub band_high_cut: f64,
}

impl Default for GameBubbleConfig {
    fn default() -> Self {
        Self {
            limit: 50,
            min_radius: 20.0,
            max_radius: 50.0,
            label_min_radius: 35.0,
            review_low: 0.504,
            review_high: 0.992,
            band_low_cut: 0.666,
            band_high_cut: 0.83,
        }
    }
}

impl GameBubbleConfig {
    pub fn forces(&self) -> ForceConfig {
        ForceConfig {
            charge: 5.0,
            x_strength: 0.1,
            y_strength: 0.05,
            ..ForceConfig::default()
        }
    }

    pub fn color_scale(&self) -> DivergingScale {
        DivergingScale::symmetric(self.review_low, self.review_high)
    }
}

/// Heading for the drill-down of `publisher`.
pub fn drilldown_title(publisher: Option<&PublisherKey>, limit: usize) -> String {
    match publisher {
        Some(PublisherKey::Indie) => format!("Top {limit} Games by Indie Publisher"),
        Some(PublisherKey::Named(name)) => format!("Games by {name}"),
        None => "Games".to_string(),
    }
}

fn game_tooltip(games: &HashMap<AppId, GameRef>, id: &AppId) -> String {
    let Some(game) = games.get(id) else {
        return id.to_string();
    };
    format!(
        "{}\nPeak Players: {}\nReview Rating: {}\nPrice: {}\nReleased: {}",
        game.name,
        thousands(game.peak_ccu),
        percent(game.review_ratio, 1),
        price(game.price),
        long_date(game.release_date)
    )
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    revision: u64,
    publisher: Option<PublisherKey>,
    peak_threshold: f64,
    show_indie: bool,
}

impl CacheKey {
    fn new(revision: u64, selection: &SelectionState) -> Self {
        Self {
            revision,
            publisher: selection.selected_publisher.clone(),
            peak_threshold: selection.peak_threshold,
            show_indie: selection.show_indie,
        }
    }
}

pub struct GameBubbleView {
    id: ViewId,
    title: String,
    config: GameBubbleConfig,
    layout: ForceLayout<AppId>,
    games: HashMap<AppId, GameRef>,
    cache_key: Option<CacheKey>,
}

impl GameBubbleView {
    pub fn new(config: GameBubbleConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Games".to_string(),
            layout: ForceLayout::new(config.forces()),
            config,
            games: HashMap::new(),
            cache_key: None,
        }
    }

    fn rebuild(&mut self, ctx: &ViewerContext, selection: &SelectionState) {
        let key = CacheKey::new(ctx.dataset.revision(), selection);
        if self.cache_key.as_ref() == Some(&key) {
            return;
        }

        let games = ctx.dataset.filtered_games();
        let scope = PublisherScope::from_key(selection.selected_publisher.as_ref());
        let filter = GameFilter::from_selection(selection).tracked_only();
        let top = top_games(&games, &scope, &filter, self.config.limit);

        let max_peak = top.iter().map(|game| game.peak_ccu).fold(0.0_f64, f64::max);
        let radius = SqrtScale::new(max_peak, self.config.min_radius, self.config.max_radius);
        let nodes: Vec<(AppId, f32, f32)> = top
            .iter()
            .map(|game| {
                let x = three_band_position(game.review_ratio, self.config.band_low_cut, self.config.band_high_cut);
                (game.app_id, radius.map(game.peak_ccu), x)
            })
            .collect();

        tracing::debug!(games = nodes.len(), scope = ?scope, "game bubbles rebuilt");
        self.title = drilldown_title(selection.selected_publisher.as_ref(), self.config.limit);
        self.layout.reset(self.config.forces(), nodes);
        self.games = top.into_iter().map(|game| (game.app_id, game)).collect();
        self.cache_key = Some(key);
    }

    fn header_ui(&self, ctx: &ViewerContext, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("⬅ Back").on_hover_text("Return to all publishers").clicked() {
                ctx.emit(DashboardEvent::ReturnToOverview);
            }
            ui.strong(&self.title);
            ui.separator();

            let scale = self.config.color_scale();
            ui.label(RichText::new(percent(self.config.review_low, 0)).small());
            gradient_bar(ui, egui::vec2(100.0, 10.0), |t| {
                let (low, _, high) = scale.domain();
                review_color(&scale, low + (high - low) * t as f64)
            });
            ui.label(RichText::new(percent(self.config.review_high, 0)).small());
            ui.label(RichText::new("Review rating").weak().small());
        });
    }
}

impl Default for GameBubbleView {
    fn default() -> Self {
        Self::new(GameBubbleConfig::default())
    }
}

impl DashboardView for GameBubbleView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn view_type(&self) -> &str {
        "GameBubbleView"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn wants_repaint(&self) -> bool {
        self.layout.is_running()
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let selection = ctx.selection.snapshot();
        if selection.selected_publisher.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label("Select a publisher to see its games");
            });
            return;
        }

        self.rebuild(ctx, &selection);
        self.header_ui(ctx, ui);

        if self.games.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No games match the current filters");
            });
            return;
        }

        let scale = self.config.color_scale();
        let label_min_radius = self.config.label_min_radius;
        let selected_game = selection.selected_game;
        let games = &self.games;

        let style = |id: &AppId, radius: f32, hovered: bool| {
            let ratio = games.get(id).map_or(0.5, |game| game.review_ratio);
            let fill = review_color(&scale, ratio);
            let stroke = if selected_game == Some(*id) {
                Stroke::new(3.0, SELECTED_COLOR)
            } else if hovered {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::new(1.0, Color32::from_gray(60))
            };
            BubbleStyle {
                fill: if hovered { fill } else { with_alpha(fill, 0.9) },
                stroke,
                label: (radius > label_min_radius)
                    .then(|| games.get(id).map(|game| short_label(&game.name, 12)))
                    .flatten(),
            }
        };

        let clicked = ui
            .push_id(sv_ui::scoped_id(self.id, "canvas"), |ui| {
                bubble_canvas(ui, &mut self.layout, style, |id| game_tooltip(games, id))
            })
            .inner;

        if let Some(id) = clicked {
            ctx.emit(DashboardEvent::GameSelected(Some(id)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drilldown_titles() {
        assert_eq!(drilldown_title(Some(&PublisherKey::named("Valve")), 50), "Games by Valve");
        assert_eq!(
            drilldown_title(Some(&PublisherKey::Indie), 50),
            "Top 50 Games by Indie Publisher"
        );
    }

    #[test]
    fn test_tooltip_for_unknown_game_falls_back_to_id() {
        assert_eq!(game_tooltip(&HashMap::new(), &AppId(42)), "42");
    }

    #[test]
    fn test_game_forces() {
        let forces = GameBubbleConfig::default().forces();
        assert_eq!(forces.charge, 5.0);
        assert_eq!(forces.x_strength, 0.1);
        assert_eq!(forces.y_strength, 0.05);
    }
}
