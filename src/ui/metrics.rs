use eframe::egui::{RichText, Ui};

use crate::data::category::AqiCategory;
use crate::data::stats::summarize;
use crate::state::AppState;
use crate::ui::panels::category_badge;

/// Headline numbers above the map, recomputed every frame from the view.
pub fn summary_row(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        return;
    };
    let summary = summarize(&dataset.records, &view.indices);

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Records", &format!("{} / {}", summary.count, dataset.len()));
        ui.separator();

        match (summary.max_aqi, summary.max_aqi_station()) {
            (Some(max), Some(station)) => {
                metric(ui, "Highest AQI", &format!("{max} at {station}"));
                let cat = AqiCategory::from_aqi(max as i64);
                category_badge(ui, cat.label(), state.legend.color_for(cat));
                let others = summary.max_aqi_stations.len() - 1;
                if others > 0 {
                    ui.weak(format!("(+{others} more)"));
                }
            }
            _ => metric(ui, "Highest AQI", "–"),
        }
        ui.separator();

        let mean = summary
            .mean_pm25
            .map(|m| format!("{m:.1} µg/m³"))
            .unwrap_or_else(|| "–".to_string());
        metric(ui, "Mean PM2.5", &mean);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.weak(label);
        ui.label(RichText::new(value).strong().size(18.0));
    });
}
