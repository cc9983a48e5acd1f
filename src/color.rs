use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::category::AqiCategory;

// ---------------------------------------------------------------------------
// Hex → Color32
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` into an egui colour, falling back to gray.
pub fn hex_to_color32(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("Invalid colour '{hex}': {e}");
            Color32::GRAY
        }
    }
}

/// Black or white, whichever reads better on top of `bg`.
pub fn label_color_on(bg: Color32) -> Color32 {
    let rgb: Srgb = Srgb::new(bg.r(), bg.g(), bg.b()).into_format();
    let hsl: Hsl = rgb.into_color();
    if hsl.lightness > 0.55 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Category legend
// ---------------------------------------------------------------------------

/// Category → colour table in fixed legend order.
#[derive(Debug, Clone)]
pub struct CategoryLegend {
    entries: Vec<(AqiCategory, Color32)>,
}

impl Default for CategoryLegend {
    fn default() -> Self {
        CategoryLegend {
            entries: AqiCategory::ALL
                .iter()
                .map(|&cat| (cat, hex_to_color32(cat.hex())))
                .collect(),
        }
    }
}

impl CategoryLegend {
    /// Look up the colour for a category.
    pub fn color_for(&self, cat: AqiCategory) -> Color32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == cat)
            .map(|(_, color)| *color)
            .unwrap_or(Color32::GRAY)
    }

    /// Return the legend entries (label → colour) for the UI, Good first.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&'static str, Color32)> + '_ {
        self.entries.iter().map(|(cat, color)| (cat.label(), *color))
    }
}
