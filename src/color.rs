use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.75, 0.45);
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
// Color mapping: row label → Color32
// ---------------------------------------------------------------------------

/// Maps row labels to distinct colours so a label keeps its colour across
/// both plots. Duplicate labels share one colour.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map assigning hues in first-appearance order.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ordered: Vec<&str> = Vec::new();
        for label in labels {
            if !ordered.iter().any(|seen| *seen == label) {
                ordered.push(label);
            }
        }

        let palette = generate_palette(ordered.len());
        let mapping: BTreeMap<String, Color32> = ordered
            .into_iter()
            .zip(palette)
            .map(|(label, color)| (label.to_string(), color))
            .collect();

        ColorMap { mapping }
    }

    /// Look up the colour for a label; unknown labels fall back to grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_labels_share_a_color() {
        let map = ColorMap::new(["a", "b", "a"]);
        assert_eq!(map.color_for("a"), map.color_for("a"));
        assert_ne!(map.color_for("a"), map.color_for("b"));
    }

    #[test]
    fn unknown_labels_fall_back_to_grey() {
        let map = ColorMap::new(["a"]);
        assert_eq!(map.color_for("zzz"), Color32::GRAY);
    }
}
