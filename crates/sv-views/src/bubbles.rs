//! Painter shared by the publisher and game bubble charts

use egui::{Align2, Color32, FontId, Rounding, Sense, Stroke, Ui, Vec2};
use nalgebra::Vector2;

use crate::colors::contrast_text;
use crate::layout::ForceLayout;

pub(crate) struct BubbleStyle {
    pub fill: Color32,
    pub stroke: Stroke,
    pub label: Option<String>,
}

/// Truncate `text` to `max_chars`, adding an ellipsis.
pub(crate) fn short_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Step the layout and paint every node. Returns the clicked key.
pub(crate) fn bubble_canvas<K: Clone + PartialEq>(
    ui: &mut Ui,
    layout: &mut ForceLayout<K>,
    style: impl Fn(&K, f32, bool) -> BubbleStyle,
    tooltip: impl Fn(&K) -> String,
) -> Option<K> {
    let size = ui.available_size().max(Vec2::new(50.0, 50.0));
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    layout.set_size(rect.width(), rect.height());
    if layout.is_running() {
        layout.tick();
        ui.ctx().request_repaint();
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, Rounding::same(4.0), Color32::from_gray(20));

    let to_local = |pos: egui::Pos2| Vector2::new(pos.x - rect.min.x, pos.y - rect.min.y);
    let hovered = response
        .hover_pos()
        .and_then(|pos| layout.hit_test(to_local(pos)).cloned());

    for node in layout.nodes() {
        let center = rect.min + Vec2::new(node.position.x, node.position.y);
        let is_hovered = hovered.as_ref() == Some(&node.key);
        let node_style = style(&node.key, node.radius, is_hovered);

        painter.circle_filled(center, node.radius, node_style.fill);
        painter.circle_stroke(center, node.radius, node_style.stroke);

        if let Some(label) = node_style.label {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                label,
                FontId::proportional((node.radius / 4.0).clamp(9.0, 14.0)),
                contrast_text(node_style.fill),
            );
        }
    }

    let clicked = response.clicked();
    match hovered {
        Some(key) => {
            response.on_hover_text(tooltip(&key));
            clicked.then_some(key)
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Valve", 12), "Valve");
        assert_eq!(short_label("Electronic Arts", 8), "Electro…");
    }
}
