use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::data::projection::{hover_text, map_points};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Station map (central panel)
// ---------------------------------------------------------------------------

/// Render the station scatter map, coloured by AQI category and sized by PM2.5.
pub fn aqi_map(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        return;
    };

    if view.is_empty() {
        ui.label(
            RichText::new(
                "No stations match the selected filter criteria. Try widening the PM2.5 range or date range.",
            )
            .color(Color32::YELLOW),
        );
        return;
    }

    let points = map_points(&dataset.records, &view.indices);
    if points.is_empty() {
        ui.label("None of the matching records have coordinates.");
        return;
    }

    // Owned copy for the formatter: (lon, lat, tooltip).
    let tooltips: Vec<(f64, f64, String)> = points
        .iter()
        .map(|p| (p.longitude, p.latitude, hover_text(&dataset.records[p.index])))
        .collect();

    Plot::new("aqi_map")
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                return format!("{:.3}°N {:.3}°E", value.y, value.x);
            }
            match nearest(&tooltips, value) {
                Some((_, _, text)) => text.clone(),
                None => name.to_string(),
            }
        })
        .show(ui, |plot_ui| {
            for p in &points {
                let marker = Points::new(PlotPoints::new(vec![[p.longitude, p.latitude]]))
                    .name(p.category.label())
                    .color(state.legend.color_for(p.category))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(p.radius);
                plot_ui.points(marker);
            }
        });
}

fn nearest<'p>(tooltips: &'p [(f64, f64, String)], at: &PlotPoint) -> Option<&'p (f64, f64, String)> {
    tooltips.iter().min_by(|a, b| {
        let da = (a.0 - at.x).powi(2) + (a.1 - at.y).powi(2);
        let db = (b.0 - at.x).powi(2) + (b.1 - at.y).powi(2);
        da.total_cmp(&db)
    })
}
