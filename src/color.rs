use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// `offset` rotates the wheel (in degrees) so neighbouring charts do not
/// start on the same colour.
pub fn generate_palette(n: usize, offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of a categorical column to distinct colours, so a bar
/// keeps its colour while filters come and go.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &[String]) -> Self {
        let palette = generate_palette(unique_values.len(), 0.0);
        let mapping = unique_values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
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
    fn palette_has_requested_size_and_distinct_colours() {
        let colours = generate_palette(4, 0.0);
        assert_eq!(colours.len(), 4);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0, 90.0).is_empty());
    }

    #[test]
    fn unknown_value_gets_default_colour() {
        let map = ColorMap::new(&["Shoes".to_string(), "Clothing".to_string()]);
        assert_ne!(map.color_for("Shoes"), Color32::GRAY);
        assert_eq!(map.color_for("Outerwear"), Color32::GRAY);
    }
}
