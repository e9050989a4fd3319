//! Small custom widgets

use egui::{Color32, Rect, Response, Rounding, Sense, Stroke, Ui, Vec2};

/// Number of slices a gradient bar is drawn with
const GRADIENT_STEPS: usize = 32;

/// Horizontal color ramp, used as a legend for continuous color scales.
///
/// `color_at` receives positions in `[0, 1]` from left to right.
pub fn gradient_bar(ui: &mut Ui, size: Vec2, color_at: impl Fn(f32) -> Color32) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let painter = ui.painter();
    let step = rect.width() / GRADIENT_STEPS as f32;
    for i in 0..GRADIENT_STEPS {
        let t = (i as f32 + 0.5) / GRADIENT_STEPS as f32;
        let slice = Rect::from_min_size(
            egui::pos2(rect.min.x + i as f32 * step, rect.min.y),
            Vec2::new(step + 0.5, rect.height()),
        );
        painter.rect_filled(slice, Rounding::ZERO, color_at(t));
    }
    painter.rect_stroke(rect, Rounding::ZERO, Stroke::new(1.0, Color32::from_gray(70)));
    response
}

/// Button with an icon glyph and a hover explanation
pub fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(icon)).on_hover_text(tooltip)
}
