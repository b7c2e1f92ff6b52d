use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging scale for correlation cells
// ---------------------------------------------------------------------------

/// Map a correlation coefficient in [-1, 1] to a blue–white–red diverging
/// scale: strong negative → blue, zero → near-white, strong positive → red.
pub fn correlation_color(r: f64) -> Color32 {
    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;

    let blue = LinSrgb::new(0.05f32, 0.22, 0.55);
    let white = LinSrgb::new(0.92f32, 0.92, 0.92);
    let red = LinSrgb::new(0.60f32, 0.05, 0.10);

    let mixed = if t < 0.5 {
        blue.mix(white, t * 2.0)
    } else {
        white.mix(red, (t - 0.5) * 2.0)
    };
    let srgb: Srgb = Srgb::from_linear(mixed);
    Color32::from_rgb(
        (srgb.red * 255.0) as u8,
        (srgb.green * 255.0) as u8,
        (srgb.blue * 255.0) as u8,
    )
}

/// Cell colour for an undefined correlation.
pub fn undefined_cell_color() -> Color32 {
    Color32::from_gray(90)
}

// ---------------------------------------------------------------------------
// Color mapping: group value → Color32
// ---------------------------------------------------------------------------

/// Maps unique values of a chosen grouping column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &std::collections::BTreeSet<Value>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<Value, Color32> = unique_values
            .iter()
            .zip(palette.into_iter())
            .map(|(v, c): (&Value, Color32)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given group value.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colors() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for i in 0..palette.len() {
            for j in (i + 1)..palette.len() {
                assert_ne!(palette[i], palette[j]);
            }
        }
    }

    #[test]
    fn diverging_scale_endpoints() {
        let negative = correlation_color(-1.0);
        let positive = correlation_color(1.0);
        // Blue end vs red end
        assert!(negative.b() > negative.r());
        assert!(positive.r() > positive.b());
    }
}
