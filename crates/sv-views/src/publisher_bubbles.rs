//! Publisher overview: one bubble per publisher sized by total peak players

use std::collections::HashMap;

use egui::{RichText, Slider, Stroke, Ui};
use sv_core::{DashboardEvent, PublisherKey, SelectionState};
use sv_data::{aggregate_publishers, visible_publishers, GameRecord, PublisherAggregate};
use sv_ui::widgets::gradient_bar;
use uuid::Uuid;

use crate::bubbles::{bubble_canvas, short_label, BubbleStyle};
use crate::colors::{review_color, with_alpha, INDIE_FILL, INDIE_STROKE, SELECTED_COLOR};
use crate::format::{percent, thousands};
use crate::layout::{ForceConfig, ForceLayout};
use crate::scales::{five_band_position, DivergingScale, SqrtScale};
use crate::{DashboardView, ViewId, ViewerContext};

#[derive(Debug, Clone, PartialEq)]
pub struct PublisherBubbleConfig {
    /// Slider bounds for the peak-player threshold
    pub threshold_min: f64,
    pub threshold_max: f64,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Bubbles smaller than this get no label
    pub label_min_radius: f32,
    /// Review ratio domain of the color scale and x bands
    pub review_low: f64,
    pub review_high: f64,
    /// Above this many bubbles the denser force settings are used
    pub dense_above: usize,
}

impl Default for PublisherBubbleConfig {
    fn default() -> Self {
        Self {
            threshold_min: 5_000.0,
            threshold_max: 100_000.0,
            min_radius: 20.0,
            max_radius: 60.0,
            label_min_radius: 35.0,
            review_low: 0.5,
            review_high: 0.992,
            dense_above: 20,
        }
    }
}

impl PublisherBubbleConfig {
    /// Force settings for `count` bubbles.
    pub fn forces(&self, count: usize) -> ForceConfig {
        if count > self.dense_above {
            ForceConfig {
                charge: 3.0,
                x_strength: 0.1,
                y_strength: 0.05,
                alpha_decay: 0.01,
                velocity_decay: 0.6,
                ..ForceConfig::default()
            }
        } else {
            ForceConfig {
                charge: 6.0,
                x_strength: 0.06,
                y_strength: 0.03,
                alpha_decay: 0.005,
                velocity_decay: 0.5,
                ..ForceConfig::default()
            }
        }
    }

    pub fn color_scale(&self) -> DivergingScale {
        DivergingScale::symmetric(self.review_low, self.review_high)
    }
}

/// Horizontal band for a publisher; indie always sits in the middle.
pub fn publisher_target_x(aggregate: &PublisherAggregate, config: &PublisherBubbleConfig) -> f32 {
    if aggregate.is_indie() {
        0.5
    } else {
        five_band_position(aggregate.average_review_ratio(), config.review_low, config.review_high)
    }
}

fn contains_game(key: &PublisherKey, game: &GameRecord) -> bool {
    match key {
        PublisherKey::Indie => game.is_indie(),
        PublisherKey::Named(name) => !game.is_indie() && game.has_publisher(name),
    }
}

fn publisher_tooltip(aggregates: &HashMap<PublisherKey, PublisherAggregate>, key: &PublisherKey) -> String {
    let Some(aggregate) = aggregates.get(key) else {
        return key.label().to_string();
    };
    let avg_peak = if aggregate.game_share > 0.0 {
        aggregate.total_peak_ccu / aggregate.game_share
    } else {
        0.0
    };
    format!(
        "{}\nGames: {}\nAvg Peak Players: {}\nAvg Review Rating: {}",
        key.label(),
        aggregate.game_count(),
        thousands(avg_peak),
        percent(aggregate.average_review_ratio(), 1)
    )
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    revision: u64,
    peak_threshold: f64,
    show_indie: bool,
}

impl CacheKey {
    fn new(revision: u64, selection: &SelectionState) -> Self {
        Self {
            revision,
            peak_threshold: selection.peak_threshold,
            show_indie: selection.show_indie,
        }
    }
}

pub struct PublisherBubbleView {
    id: ViewId,
    title: String,
    config: PublisherBubbleConfig,
    layout: ForceLayout<PublisherKey>,
    aggregates: HashMap<PublisherKey, PublisherAggregate>,
    cache_key: Option<CacheKey>,
}

impl PublisherBubbleView {
    pub fn new(config: PublisherBubbleConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Publishers by Peak Players".to_string(),
            layout: ForceLayout::new(config.forces(0)),
            config,
            aggregates: HashMap::new(),
            cache_key: None,
        }
    }

    fn rebuild(&mut self, ctx: &ViewerContext, selection: &SelectionState) {
        let key = CacheKey::new(ctx.dataset.revision(), selection);
        if self.cache_key.as_ref() == Some(&key) {
            return;
        }

        let games = ctx.dataset.filtered_games();
        let aggregates = aggregate_publishers(games.iter().map(|game| game.as_ref()), selection.show_indie);
        let visible = visible_publishers(&aggregates, selection.peak_threshold);

        let max_peak = visible.iter().map(|a| a.total_peak_ccu).fold(0.0_f64, f64::max);
        let radius = SqrtScale::new(max_peak, self.config.min_radius, self.config.max_radius);
        let nodes: Vec<(PublisherKey, f32, f32)> = visible
            .iter()
            .map(|a| (a.key.clone(), radius.map(a.total_peak_ccu), publisher_target_x(a, &self.config)))
            .collect();

        tracing::debug!(
            publishers = visible.len(),
            threshold = selection.peak_threshold,
            "publisher bubbles rebuilt"
        );
        self.layout.reset(self.config.forces(nodes.len()), nodes);
        self.aggregates = visible.into_iter().map(|a| (a.key.clone(), a)).collect();
        self.cache_key = Some(key);
    }

    fn controls_ui(&self, ctx: &ViewerContext, ui: &mut Ui, selection: &SelectionState) {
        ui.horizontal(|ui| {
            ui.strong(&self.title);
            ui.separator();

            let mut threshold = selection.peak_threshold;
            let slider = Slider::new(&mut threshold, self.config.threshold_min..=self.config.threshold_max)
                .logarithmic(true)
                .integer()
                .text("Min peak players");
            if ui.add(slider).changed() {
                ctx.emit(DashboardEvent::PeakThresholdChanged(threshold.round()));
            }

            let label = if selection.show_indie { "Hide Indie" } else { "Show Indie" };
            if ui.button(label).clicked() {
                ctx.emit(DashboardEvent::IndieVisibilityChanged(!selection.show_indie));
            }

            ui.separator();
            let scale = self.config.color_scale();
            ui.label(RichText::new(percent(self.config.review_low, 0)).small());
            gradient_bar(ui, egui::vec2(100.0, 10.0), |t| {
                let (low, _, high) = scale.domain();
                review_color(&scale, low + (high - low) * t as f64)
            });
            ui.label(RichText::new(percent(self.config.review_high, 0)).small());
            ui.label(RichText::new("Avg review rating").weak().small());
        });
    }
}

impl Default for PublisherBubbleView {
    fn default() -> Self {
        Self::new(PublisherBubbleConfig::default())
    }
}

impl DashboardView for PublisherBubbleView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn view_type(&self) -> &str {
        "PublisherBubbleView"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn wants_repaint(&self) -> bool {
        self.layout.is_running()
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        if !ctx.dataset.is_loaded() {
            ui.centered_and_justified(|ui| {
                ui.label("Loading publishers...");
            });
            return;
        }

        let selection = ctx.selection.snapshot();
        self.rebuild(ctx, &selection);
        self.controls_ui(ctx, ui, &selection);

        if self.aggregates.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No publishers above the threshold");
            });
            return;
        }

        let selected_game = selection.selected_game.and_then(|id| ctx.dataset.game(id));
        let selected_publisher = selection.selected_publisher.clone();
        let scale = self.config.color_scale();
        let label_min_radius = self.config.label_min_radius;
        let aggregates = &self.aggregates;

        let style = |key: &PublisherKey, radius: f32, hovered: bool| {
            let highlighted = selected_publisher.as_ref() == Some(key)
                || selected_game.as_ref().is_some_and(|game| contains_game(key, game));
            let (fill, stroke_color) = match key {
                PublisherKey::Indie => (INDIE_FILL, INDIE_STROKE),
                PublisherKey::Named(_) => {
                    let ratio = aggregates.get(key).map_or(0.5, |a| a.average_review_ratio());
                    (review_color(&scale, ratio), egui::Color32::from_gray(60))
                }
            };
            let stroke = if highlighted {
                Stroke::new(3.0, SELECTED_COLOR)
            } else if hovered {
                Stroke::new(2.0, egui::Color32::WHITE)
            } else {
                Stroke::new(1.0, stroke_color)
            };
            BubbleStyle {
                fill: if hovered { fill } else { with_alpha(fill, 0.9) },
                stroke,
                label: (radius > label_min_radius).then(|| short_label(key.label(), 14)),
            }
        };

        let clicked = ui
            .push_id(sv_ui::scoped_id(self.id, "canvas"), |ui| {
                bubble_canvas(ui, &mut self.layout, style, |key| publisher_tooltip(aggregates, key))
            })
            .inner;

        if let Some(key) = clicked {
            let next = if selected_publisher.as_ref() == Some(&key) { None } else { Some(key) };
            ctx.emit(DashboardEvent::PublisherSelected(next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(key: PublisherKey, peak: f64, ratio_sum: f64, share: f64) -> PublisherAggregate {
        PublisherAggregate {
            key,
            total_peak_ccu: peak,
            total_review_ratio: ratio_sum,
            game_share: share,
        }
    }

    #[test]
    fn test_indie_sits_in_the_middle() {
        let config = PublisherBubbleConfig::default();
        let indie = aggregate(PublisherKey::Indie, 1.0, 0.1, 1.0);
        assert_eq!(publisher_target_x(&indie, &config), 0.5);
    }

    #[test]
    fn test_well_reviewed_publishers_sit_right() {
        let config = PublisherBubbleConfig::default();
        let good = aggregate(PublisherKey::named("Good"), 1.0, 0.99, 1.0);
        let bad = aggregate(PublisherKey::named("Bad"), 1.0, 0.3, 1.0);
        assert!(publisher_target_x(&good, &config) > publisher_target_x(&bad, &config));
    }

    #[test]
    fn test_dense_layout_uses_weaker_charge() {
        let config = PublisherBubbleConfig::default();
        assert_eq!(config.forces(21).charge, 3.0);
        assert_eq!(config.forces(20).charge, 6.0);
        assert_eq!(config.forces(5).alpha_decay, 0.005);
    }

    #[test]
    fn test_contains_game_respects_indie_class() {
        let game = sv_data::GameRecord {
            app_id: sv_core::AppId(1),
            name: "Game".to_string(),
            publisher_field: "Valve, Hidden Path".to_string(),
            release_date: chrono::NaiveDate::from_ymd_opt(2012, 8, 21).unwrap(),
            price: 0.0,
            peak_ccu: 100.0,
            positive: 1.0,
            negative: 0.0,
            review_ratio: 1.0,
            class: sv_data::GameClass::Other("AAA".to_string()),
            header_image: None,
            revenue: None,
        };
        assert!(contains_game(&PublisherKey::named("Hidden Path"), &game));
        assert!(!contains_game(&PublisherKey::Indie, &game));
        assert!(!contains_game(&PublisherKey::named("Ubisoft"), &game));
    }
}
