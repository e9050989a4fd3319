//! Color utilities for the dashboard views

use egui::Color32;

use crate::scales::DivergingScale;

/// Fill of the indie bubble
pub const INDIE_FILL: Color32 = Color32::from_rgb(138, 43, 226);

/// Outline of the indie bubble
pub const INDIE_STROKE: Color32 = Color32::from_rgb(102, 51, 153);

/// Regular scatter point
pub const POINT_COLOR: Color32 = Color32::from_rgb(101, 192, 244);

/// Scatter point priced above the axis cap
pub const OVER_CAP_COLOR: Color32 = Color32::from_rgb(242, 142, 43);

/// Selected game in every view
pub const SELECTED_COLOR: Color32 = Color32::from_rgb(230, 57, 70);

const NEGATIVE: Color32 = Color32::from_rgb(215, 48, 39);
const NEUTRAL: Color32 = Color32::from_rgb(245, 245, 245);
const POSITIVE: Color32 = Color32::from_rgb(26, 152, 80);

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

/// Red, white, green colormap for `t` in `[0, 1]`
pub fn diverging_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp_color(NEGATIVE, NEUTRAL, t * 2.0)
    } else {
        lerp_color(NEUTRAL, POSITIVE, (t - 0.5) * 2.0)
    }
}

/// Fill color for a review ratio under `scale`.
pub fn review_color(scale: &DivergingScale, ratio: f64) -> Color32 {
    diverging_color(scale.ratio(ratio))
}

/// Same color with a new alpha, for hover/dim states.
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::from_gray(20)
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging_color(0.0), NEGATIVE);
        assert_eq!(diverging_color(0.5), NEUTRAL);
        assert_eq!(diverging_color(1.0), POSITIVE);
        assert_eq!(diverging_color(7.0), POSITIVE);
    }

    #[test]
    fn test_review_color_uses_scale() {
        let scale = DivergingScale::symmetric(0.5, 0.992);
        assert_eq!(review_color(&scale, 0.2), NEGATIVE);
        assert_eq!(review_color(&scale, 0.999), POSITIVE);
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(NEUTRAL), Color32::from_gray(20));
        assert_eq!(contrast_text(INDIE_FILL), Color32::WHITE);
    }
}
