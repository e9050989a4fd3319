use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
    /// Base font size; the other text styles scale from it
    pub body_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Steam Dark".to_string(),
            body_size: 13.0,
        }
    }
}

/// Apply the dashboard theme: Steam's navy panels with a light-blue accent
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    let bg_color = Color32::from_rgb(23, 26, 33);
    let panel_bg = Color32::from_rgb(27, 40, 56);
    let widget_bg = Color32::from_rgb(42, 71, 94);
    let hover_color = Color32::from_rgb(53, 88, 116);
    let active_color = Color32::from_rgb(62, 104, 137);
    let text_color = Color32::from_rgb(199, 213, 224);

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = bg_color;
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.noninteractive.bg_fill = panel_bg;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(45, 60, 78));
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.weak_bg_fill = widget_bg;
    visuals.widgets.inactive.bg_stroke = Stroke::NONE;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = hover_color;
    visuals.widgets.hovered.weak_bg_fill = hover_color;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = active_color;
    visuals.widgets.active.weak_bg_fill = active_color;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = accent_color().linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);
    style.spacing.slider_width = 160.0;

    let body = theme.body_size;
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(body - 2.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(body, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(body, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(body + 5.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(body - 1.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    tracing::debug!(theme = %theme.name, "applying theme");
    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Steam light blue
pub fn accent_color() -> Color32 {
    Color32::from_rgb(102, 192, 244)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

pub fn muted_text_color() -> Color32 {
    Color32::from_rgb(143, 152, 160)
}
