//! Coarse release timeline with a draggable date brush and the walkthrough

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Polygon, VLine};
use sv_core::time::{date_to_x, x_to_date};
use sv_core::{
    BrushConfig, BrushInput, BrushMachine, BrushState, DashboardEvent, DateExtent, Granularity, TimeFilter,
    TimeRange,
};
use sv_data::Dataset;
use uuid::Uuid;

use crate::format::long_date;
use crate::{DashboardView, ViewId, ViewerContext};

/// In-progress pointer gesture on the brush
#[derive(Debug, Clone, Copy)]
enum BrushGesture {
    /// Dragging out a new selection from `anchor`
    Create { anchor: f64 },
    /// Dragging the existing selection; `grab` is the pointer offset from its start
    Move { grab: f64, width: f64 },
}

struct OverviewSeries {
    granularity: Granularity,
    points: Vec<[f64; 2]>,
    y_max: f64,
}

pub struct OverviewTimelineView {
    id: ViewId,
    title: String,
    machine: BrushMachine,
    start_year: i32,
    dataset: Option<Arc<Dataset>>,
    series: Option<OverviewSeries>,
    gesture: Option<BrushGesture>,
}

impl OverviewTimelineView {
    pub fn new(config: BrushConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Release Timeline".to_string(),
            start_year: config.walkthrough_start_year,
            machine: BrushMachine::new(config),
            dataset: None,
            series: None,
            gesture: None,
        }
    }

    fn apply(&mut self, ctx: &ViewerContext, input: BrushInput) {
        for filter in self.machine.handle(input) {
            ctx.emit(DashboardEvent::TimeRangeChanged(filter));
        }
    }

    fn first_day(&self, extent: &DateExtent) -> NaiveDate {
        let first = NaiveDate::from_ymd_opt(self.start_year, 1, 1).unwrap_or(extent.min);
        if first > extent.max {
            extent.min
        } else {
            first.max(extent.min)
        }
    }

    fn refresh_series(&mut self, dataset: &Dataset, first_day: NaiveDate) {
        let granularity = Granularity::for_filter(&self.machine.filter());
        if self.series.as_ref().is_some_and(|s| s.granularity == granularity) {
            return;
        }

        let points: Vec<[f64; 2]> = dataset
            .aggregates()
            .series(granularity)
            .iter()
            .filter(|point| point.date >= granularity.bucket_start(first_day))
            .map(|point| [date_to_x(point.date), point.count])
            .collect();
        let y_max = points.iter().map(|p| p[1]).fold(0.0_f64, f64::max).max(1.0);

        tracing::debug!(granularity = granularity.as_str(), points = points.len(), "overview series rebuilt");
        self.series = Some(OverviewSeries { granularity, points, y_max });
    }

    fn range_from_x(a: f64, b: f64, bounds: (f64, f64)) -> Option<TimeRange> {
        let clamp = |x: f64| x.clamp(bounds.0, bounds.1);
        Some(TimeRange::new(x_to_date(clamp(a))?, x_to_date(clamp(b))?))
    }

    fn controls_ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.strong(&self.title);
            ui.separator();

            let label = if self.machine.is_walkthrough_active() { "⏹ Stop" } else { "▶ Walkthrough" };
            if ui
                .button(label)
                .on_hover_text("Animate a one-year window across the release history")
                .clicked()
            {
                self.apply(ctx, BrushInput::ToggleWalkthrough);
            }
            if ui.button("Clear").clicked() {
                self.gesture = None;
                self.apply(ctx, BrushInput::Cleared);
            }

            ui.separator();
            let text = match self.machine.state() {
                BrushState::NoSelection => "All release dates".to_string(),
                BrushState::UserSelection(range)
                | BrushState::AppliedDefault(range)
                | BrushState::WalkthroughActive { window: range } => {
                    format!("{} – {}", long_date(range.start()), long_date(range.end()))
                }
            };
            ui.label(RichText::new(text).weak());
        });
    }
}

impl DashboardView for OverviewTimelineView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn view_type(&self) -> &str {
        "OverviewTimelineView"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn on_frame_update(&mut self, ctx: &ViewerContext, dt: Duration) {
        if let Some(dataset) = ctx.dataset.dataset() {
            let fresh = self.dataset.as_ref().map_or(true, |seen| !Arc::ptr_eq(seen, &dataset));
            if fresh {
                self.series = None;
                self.dataset = Some(Arc::clone(&dataset));
                match dataset.extent() {
                    Some(extent) => self.apply(ctx, BrushInput::DataLoaded(extent)),
                    None => tracing::warn!("dataset has no dates, timeline stays empty"),
                }
            }
        }
        self.apply(ctx, BrushInput::Elapsed(dt));
    }

    fn wants_repaint(&self) -> bool {
        self.machine.needs_ticks()
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let Some(dataset) = self.dataset.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label("Loading release timeline...");
            });
            return;
        };
        let Some(extent) = self.machine.extent() else {
            ui.centered_and_justified(|ui| {
                ui.label("No release dates available");
            });
            return;
        };

        self.controls_ui(ctx, ui);

        let first_day = self.first_day(&extent);
        self.refresh_series(&dataset, first_day);
        let Some(series) = self.series.as_ref() else {
            return;
        };

        let bounds = (date_to_x(first_day), date_to_x(extent.max));
        let y_top = series.y_max * 1.05;
        let selection = self.machine.selection();
        let accent = ui.visuals().selection.stroke.color;

        let plot = Plot::new(self.id)
            .height(ui.available_height().max(60.0))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show_y(false)
            .x_axis_formatter(|value, _max_chars, _range| {
                x_to_date(value).map(|d| d.format("%Y").to_string()).unwrap_or_default()
            })
            .label_formatter(|_name, value| x_to_date(value.x).map(long_date).unwrap_or_default());

        let (pointer, started, dragging, released, clicked) = plot
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([bounds.0, 0.0], [bounds.1, y_top]));

                plot_ui.line(
                    Line::new(PlotPoints::new(series.points.clone()))
                        .color(Color32::from_rgb(102, 192, 244))
                        .fill(0.0)
                        .name("Releases"),
                );

                if let Some(range) = selection {
                    let (a, b) = (date_to_x(range.start()), date_to_x(range.end()));
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(vec![[a, 0.0], [b, 0.0], [b, y_top], [a, y_top]]))
                            .fill_color(accent.linear_multiply(0.15))
                            .stroke(Stroke::new(1.0, accent)),
                    );
                    plot_ui.vline(VLine::new(a).color(accent).width(2.0));
                    plot_ui.vline(VLine::new(b).color(accent).width(2.0));
                }

                let response = plot_ui.response();
                (
                    plot_ui.pointer_coordinate(),
                    response.drag_started(),
                    response.dragged(),
                    response.drag_released(),
                    response.clicked(),
                )
            })
            .inner;

        let Some(pointer) = pointer else {
            if released {
                self.gesture = None;
            }
            return;
        };
        let x = pointer.x.clamp(bounds.0, bounds.1);

        if started {
            let inside = selection.map(|range| (date_to_x(range.start()), date_to_x(range.end())));
            self.gesture = Some(match inside {
                Some((a, b)) if a <= x && x <= b && b > a => BrushGesture::Move { grab: x - a, width: b - a },
                _ => BrushGesture::Create { anchor: x },
            });
        }

        if dragging || released {
            let range = match self.gesture {
                Some(BrushGesture::Create { anchor }) => Self::range_from_x(anchor, x, bounds),
                Some(BrushGesture::Move { grab, width }) => {
                    let start = (x - grab).clamp(bounds.0, (bounds.1 - width).max(bounds.0));
                    Self::range_from_x(start, start + width, bounds)
                }
                None => None,
            };
            if let Some(range) = range {
                let input = if released { BrushInput::DragEnded(range) } else { BrushInput::DragMoved(range) };
                self.apply(ctx, input);
            }
            if released {
                self.gesture = None;
            }
        } else if clicked {
            let outside = selection.map_or(true, |range| {
                x < date_to_x(range.start()) || x > date_to_x(range.end())
            });
            if outside && self.machine.filter() != TimeFilter::All {
                self.apply(ctx, BrushInput::Cleared);
            }
        }
    }
}
