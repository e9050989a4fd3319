//! Full-screen states shown before the dashboard can be drawn

use egui::{Rect, RichText, Ui};

use crate::theme::{accent_color, error_color, muted_text_color};

fn centered(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    let center = ui.available_rect_before_wrap().center();
    ui.allocate_ui_at_rect(Rect::from_center_size(center, egui::vec2(520.0, 240.0)), |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            add_contents(ui);
        });
    });
}

/// Spinner with the name of what is being loaded
pub fn loading_screen(ui: &mut Ui, source: &str) {
    centered(ui, |ui| {
        ui.heading(RichText::new("Steam Games Dashboard").size(32.0).strong().color(accent_color()));
        ui.add_space(20.0);
        ui.spinner();
        ui.add_space(10.0);
        ui.label(RichText::new(format!("Loading {source}...")).color(muted_text_color()));
    });
}

/// Load failure; the dashboard does not retry
pub fn error_screen(ui: &mut Ui, message: &str) {
    centered(ui, |ui| {
        ui.heading(RichText::new("Could not load the game data").size(24.0).color(error_color()));
        ui.add_space(16.0);
        ui.label(message);
        ui.add_space(10.0);
        ui.label(
            RichText::new("Check the data paths in the configuration file and restart.").color(muted_text_color()),
        );
    });
}
