//! Daily release counts inside the brushed window

use egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Points, VLine};
use sv_core::time::{date_to_x, x_to_date};
use sv_core::{Granularity, TimeFilter};
use sv_data::SeriesPoint;
use uuid::Uuid;

use crate::format::{long_date, thousands};
use crate::{DashboardView, ViewId, ViewerContext};

/// Markers are only drawn for sparse series
const MAX_MARKER_POINTS: usize = 100;

/// Keep every n-th point so at most `max_points` remain.
pub fn downsample(points: &[SeriesPoint], max_points: usize) -> Vec<SeriesPoint> {
    let max_points = max_points.max(1);
    if points.len() <= max_points {
        return points.to_vec();
    }
    let step = points.len().div_ceil(max_points);
    points.iter().step_by(step).copied().collect()
}

/// Tick label layout for a visible span of `days`.
pub fn tick_format(days: i64) -> &'static str {
    if days > 730 {
        "%Y"
    } else if days > 60 {
        "%b %Y"
    } else {
        "%b %d"
    }
}

#[derive(Clone, Copy, PartialEq)]
struct DetailKey {
    revision: u64,
    max_points: usize,
}

struct DetailSeries {
    key: DetailKey,
    points: Vec<[f64; 2]>,
    y_max: f64,
    x_bounds: (f64, f64),
    span_days: i64,
}

pub struct DetailTimelineView {
    id: ViewId,
    title: String,
    series: Option<DetailSeries>,
}

impl DetailTimelineView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Releases per Day".to_string(),
            series: None,
        }
    }

    fn rebuild(&mut self, ctx: &ViewerContext, key: DetailKey) {
        if self.series.as_ref().is_some_and(|s| s.key == key) {
            return;
        }
        let Some(dataset) = ctx.dataset.dataset() else {
            self.series = None;
            return;
        };

        let filter = ctx.dataset.time_filter();
        let daily = dataset.aggregates().filtered(Granularity::Daily, &filter);
        let sampled = downsample(&daily, key.max_points);

        let y_max = sampled.iter().map(|p| p.count).fold(0.0_f64, f64::max).max(1.0) * 1.1;
        let range = match filter {
            TimeFilter::Range(range) => Some(range),
            TimeFilter::All => dataset.extent().map(|extent| extent.as_range()),
        };
        let (x_bounds, span_days) = match range {
            Some(range) => {
                let start = date_to_x(range.start());
                ((start, date_to_x(range.end()).max(start + 1.0)), range.span_days())
            }
            None => ((0.0, 1.0), 0),
        };

        self.series = Some(DetailSeries {
            key,
            points: sampled.iter().map(|p| [date_to_x(p.date), p.count]).collect(),
            y_max,
            x_bounds,
            span_days,
        });
    }
}

impl Default for DetailTimelineView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView for DetailTimelineView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn view_type(&self) -> &str {
        "DetailTimelineView"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let key = DetailKey {
            revision: ctx.dataset.revision(),
            max_points: (ui.available_width() / 2.0).max(1.0) as usize,
        };
        self.rebuild(ctx, key);

        let Some(series) = self.series.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.label("Loading...");
            });
            return;
        };
        if series.points.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No releases in the selected period");
            });
            return;
        }

        let format = tick_format(series.span_days);
        let line_color = Color32::from_rgb(102, 192, 244);

        Plot::new(self.id)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .x_axis_formatter(move |value, _max_chars, _range| {
                x_to_date(value).map(|d| d.format(format).to_string()).unwrap_or_default()
            })
            .label_formatter(|_name, value| match x_to_date(value.x) {
                Some(date) => format!("{}\n{} releases", long_date(date), thousands(value.y)),
                None => String::new(),
            })
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [series.x_bounds.0, 0.0],
                    [series.x_bounds.1, series.y_max],
                ));

                plot_ui.line(
                    Line::new(PlotPoints::new(series.points.clone()))
                        .color(line_color)
                        .width(1.5)
                        .name("Releases"),
                );
                if series.points.len() < MAX_MARKER_POINTS {
                    plot_ui.points(
                        Points::new(PlotPoints::new(series.points.clone()))
                            .radius(3.0)
                            .color(line_color)
                            .name("Releases"),
                    );
                }

                if let Some(pointer) = plot_ui.pointer_coordinate() {
                    plot_ui.vline(VLine::new(pointer.x).color(Color32::from_gray(160)).width(1.0));
                }
            });
    }
}
