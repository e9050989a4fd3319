//! Price against revenue for the games in scope

use egui::{Color32, RichText, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoint, PlotPoints, Points};
use rand::Rng;
use sv_core::{DashboardEvent, SelectionState};
use sv_data::{scope_games, GameFilter, GameRef, PublisherScope};
use uuid::Uuid;

use crate::colors::{with_alpha, OVER_CAP_COLOR, POINT_COLOR, SELECTED_COLOR};
use crate::format::{long_date, price, revenue, thousands};
use crate::{DashboardView, ViewId, ViewerContext};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterConfig {
    /// Right edge of the price axis; dearer games are pinned here
    pub price_cap: f64,
    /// Maximum jitter along the price axis, in dollars
    pub price_jitter: f64,
    /// Maximum jitter along the revenue axis, in decades
    pub revenue_jitter: f64,
    pub point_alpha: f32,
    /// Click and hover pick radius as a fraction of the plot size
    pub pick_radius: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            price_cap: 100.0,
            price_jitter: 0.4,
            revenue_jitter: 0.02,
            point_alpha: 0.3,
            pick_radius: 0.02,
        }
    }
}

/// One plotted game, in data coordinates before jitter
#[derive(Debug, Clone)]
pub struct ScatterPoint {
    pub game: GameRef,
    /// Price clamped to the cap
    pub x: f64,
    /// log10 of revenue
    pub y: f64,
    pub over_cap: bool,
}

/// Games with a positive, finite revenue and a non-negative price.
pub fn scatter_points(games: &[GameRef], price_cap: f64) -> Vec<ScatterPoint> {
    games
        .iter()
        .filter_map(|game| {
            let revenue = game.revenue.filter(|r| r.is_finite() && *r > 0.0)?;
            if !game.price.is_finite() || game.price < 0.0 {
                return None;
            }
            Some(ScatterPoint {
                game: game.clone(),
                x: game.price.min(price_cap),
                y: revenue.log10(),
                over_cap: game.price > price_cap,
            })
        })
        .collect()
}

/// Index of the point closest to `target` within `radius`, with distances
/// measured in units of the visible bounds.
fn nearest(points: &[[f64; 2]], target: PlotPoint, bounds: &PlotBounds, radius: f64) -> Option<usize> {
    let width = bounds.width().max(f64::EPSILON);
    let height = bounds.height().max(f64::EPSILON);
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let dx = (p[0] - target.x) / width;
            let dy = (p[1] - target.y) / height;
            (i, dx * dx + dy * dy)
        })
        .filter(|(_, dist)| *dist <= radius * radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn point_tooltip(game: &GameRef) -> String {
    format!(
        "{}\nPrice: {}\nRevenue: {}\nPublisher: {}\nReleased: {}\nPeak Players: {}\nPositive Reviews: {}",
        game.name,
        price(game.price),
        revenue(game.revenue.unwrap_or(0.0)),
        game.publisher_field,
        long_date(game.release_date),
        thousands(game.peak_ccu),
        thousands(game.positive)
    )
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    revision: u64,
    selection: SelectionState,
}

struct ScatterData {
    points: Vec<ScatterPoint>,
    /// Drawn positions, jittered once per rebuild
    positions: Vec<[f64; 2]>,
    over_cap: usize,
    y_range: (f64, f64),
}

pub struct ScatterView {
    id: ViewId,
    title: String,
    config: ScatterConfig,
    data: Option<ScatterData>,
    cache_key: Option<CacheKey>,
}

impl ScatterView {
    pub fn new(config: ScatterConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Price vs Revenue".to_string(),
            config,
            data: None,
            cache_key: None,
        }
    }

    fn rebuild(&mut self, ctx: &ViewerContext, selection: &SelectionState) {
        // The selected game only changes emphasis, not the point set.
        let key = CacheKey {
            revision: ctx.dataset.revision(),
            selection: SelectionState {
                selected_game: None,
                ..selection.clone()
            },
        };
        if self.cache_key.as_ref() == Some(&key) {
            return;
        }

        let games = ctx.dataset.filtered_games();
        let scope = PublisherScope::from_key(selection.selected_publisher.as_ref());
        // Shares the publisher slider's threshold, so it starts at the slider minimum.
        let filter = GameFilter::from_selection(selection);
        let points = scatter_points(&scope_games(&games, &scope, &filter), self.config.price_cap);

        let mut rng = rand::thread_rng();
        let cap = self.config.price_cap;
        let positions = points
            .iter()
            .map(|p| {
                let dx = rng.gen_range(-1.0..=1.0) * self.config.price_jitter;
                let dy = rng.gen_range(-1.0..=1.0) * self.config.revenue_jitter;
                [(p.x + dx).clamp(0.0, cap), p.y + dy]
            })
            .collect();

        let (y_min, y_max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let y_range = if y_min.is_finite() {
            (y_min.floor(), y_max.ceil().max(y_min.floor() + 1.0))
        } else {
            (0.0, 1.0)
        };
        let over_cap = points.iter().filter(|p| p.over_cap).count();

        tracing::debug!(points = points.len(), over_cap, "scatter rebuilt");
        self.data = Some(ScatterData { points, positions, over_cap, y_range });
        self.cache_key = Some(key);
    }
}

impl Default for ScatterView {
    fn default() -> Self {
        Self::new(ScatterConfig::default())
    }
}

impl DashboardView for ScatterView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn view_type(&self) -> &str {
        "ScatterView"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        if !ctx.dataset.is_loaded() {
            ui.centered_and_justified(|ui| {
                ui.label("Loading...");
            });
            return;
        }

        let selection = ctx.selection.snapshot();
        self.rebuild(ctx, &selection);
        let Some(data) = self.data.as_ref() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.strong(&self.title);
            if data.over_cap > 0 {
                ui.separator();
                ui.label(
                    RichText::new(format!("● Over ${:.0}: {} games", self.config.price_cap, data.over_cap))
                        .color(OVER_CAP_COLOR),
                );
            }
        });

        if data.points.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No games with revenue data in the current selection");
            });
            return;
        }

        let mut normal = Vec::new();
        let mut capped = Vec::new();
        let mut selected = Vec::new();
        for (point, position) in data.points.iter().zip(&data.positions) {
            if Some(point.game.app_id) == selection.selected_game {
                selected.push(*position);
            } else if point.over_cap {
                capped.push(*position);
            } else {
                normal.push(*position);
            }
        }

        let cap = self.config.price_cap;
        let alpha = self.config.point_alpha;
        let pick_radius = self.config.pick_radius;
        let (y_min, y_max) = data.y_range;

        let plot_response = Plot::new(self.id)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .label_formatter(|_name, _value| String::new())
            .x_axis_formatter(|value, _max_chars, _range| format!("${value:.0}"))
            .y_axis_formatter(|value, _max_chars, _range| revenue(10f64.powf(value)))
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([-cap * 0.02, y_min], [cap * 1.02, y_max]));

                plot_ui.points(
                    Points::new(PlotPoints::new(normal))
                        .radius(3.0)
                        .color(with_alpha(POINT_COLOR, alpha)),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(capped))
                        .radius(3.0)
                        .color(with_alpha(OVER_CAP_COLOR, alpha.max(0.6))),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(selected))
                        .radius(7.0)
                        .filled(true)
                        .color(SELECTED_COLOR),
                );

                let bounds = plot_ui.plot_bounds();
                let hovered = plot_ui
                    .pointer_coordinate()
                    .and_then(|pointer| nearest(&data.positions, pointer, &bounds, pick_radius));
                if let Some(i) = hovered {
                    let [x, y] = data.positions[i];
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[x, y]]))
                            .radius(5.0)
                            .color(Color32::WHITE),
                    );
                }
                (hovered, plot_ui.response().clicked())
            });

        let (hovered, clicked) = plot_response.inner;
        if let Some(i) = hovered {
            let game = &data.points[i].game;
            if clicked {
                ctx.emit(DashboardEvent::GameSelected(Some(game.app_id)));
            }
            plot_response.response.on_hover_text_at_pointer(point_tooltip(game));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use sv_core::AppId;
    use sv_data::{GameClass, GameRecord};

    fn game(id: u64, price: f64, revenue: Option<f64>) -> GameRef {
        Arc::new(GameRecord {
            app_id: AppId(id),
            name: format!("Game {id}"),
            publisher_field: "Pub".to_string(),
            release_date: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
            price,
            peak_ccu: 10.0,
            positive: 5.0,
            negative: 1.0,
            review_ratio: 0.8,
            class: GameClass::Other("AA".to_string()),
            header_image: None,
            revenue,
        })
    }

    #[test]
    fn test_invalid_revenue_and_price_are_excluded() {
        let games = vec![
            game(1, 10.0, Some(1000.0)),
            game(2, 10.0, Some(0.0)),
            game(3, 10.0, None),
            game(4, -1.0, Some(1000.0)),
            game(5, 10.0, Some(f64::NAN)),
            game(6, 0.0, Some(10.0)),
        ];
        let ids: Vec<u64> = scatter_points(&games, 100.0).iter().map(|p| p.game.app_id.0).collect();
        assert_eq!(ids, vec![1, 6]);
    }

    #[test]
    fn test_over_cap_is_pinned_to_cap() {
        let points = scatter_points(&[game(1, 250.0, Some(1e6))], 100.0);
        assert!(points[0].over_cap);
        assert_eq!(points[0].x, 100.0);
        assert!((points[0].y - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_uses_normalized_distance() {
        let bounds = PlotBounds::from_min_max([0.0, 0.0], [100.0, 10.0]);
        let points = vec![[10.0, 5.0], [50.0, 5.0]];
        assert_eq!(nearest(&points, PlotPoint::new(11.0, 5.1), &bounds, 0.02), Some(0));
        assert_eq!(nearest(&points, PlotPoint::new(30.0, 5.0), &bounds, 0.02), None);
    }
}
