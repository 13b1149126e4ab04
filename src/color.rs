use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar colours
// ---------------------------------------------------------------------------

/// Histogram fill, a translucent green.
pub const HISTOGRAM_FILL: Color32 = Color32::from_rgba_premultiplied(40, 120, 40, 100);

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// One colour per value: larger values get a deeper blue, the smallest
/// a pale one. Equal values share a colour.
pub fn shade_by_value(values: &[f64]) -> Vec<Color32> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            let t = if range > f64::EPSILON {
                ((v - min) / range) as f32
            } else {
                1.0
            };
            hsl_to_color32(210.0, 0.70, 0.80 - 0.40 * t)
        })
        .collect()
}
