use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use bikeshare_dashboard::Measure;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours, evenly spaced in hue from `start_hue`.
pub fn generate_palette(n: usize, start_hue: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (start_hue + (i as f32 / n as f32) * 360.0) % 360.0;
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
// Series colours: one per measure in the grouped bar charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MeasureColors {
    casual: Color32,
    registered: Color32,
}

impl Default for MeasureColors {
    fn default() -> Self {
        // blue for casual, its complement for registered
        let palette = generate_palette(Measure::ALL.len(), 215.0);
        MeasureColors {
            casual: palette.first().copied().unwrap_or(Color32::LIGHT_BLUE),
            registered: palette.get(1).copied().unwrap_or(Color32::LIGHT_GREEN),
        }
    }
}

impl MeasureColors {
    pub fn color_for(&self, measure: Measure) -> Color32 {
        match measure {
            Measure::Casual => self.casual,
            Measure::Registered => self.registered,
        }
    }
}
