use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::color::label_color_on;
use crate::state::AppState;

const ALL_TYPES: &str = "All types";
const ALL_STATIONS: &str = "All Stations";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter & View Options");
    ui.separator();

    // Cheap Arc clone so we can mutate state inside the widgets.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Record type ----
            ui.strong("Record type");
            let current = state.spec.record_type.clone();
            let mut chosen = current.clone();
            egui::ComboBox::from_id_salt("record_type")
                .selected_text(current.as_deref().unwrap_or(ALL_TYPES))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut chosen, None, ALL_TYPES);
                    for t in &dataset.record_types {
                        ui.selectable_value(&mut chosen, Some(t.clone()), t.as_str());
                    }
                });
            if chosen != current {
                state.set_record_type(chosen);
            }
            ui.separator();

            // ---- Station ----
            ui.strong("Select Station Location");
            let current = state.spec.station.clone();
            let mut chosen = current.clone();
            egui::ComboBox::from_id_salt("station")
                .selected_text(current.as_deref().unwrap_or(ALL_STATIONS))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut chosen, None, ALL_STATIONS);
                    for s in &dataset.stations {
                        ui.selectable_value(&mut chosen, Some(s.clone()), s.as_str());
                    }
                });
            if chosen != current {
                state.set_station(chosen);
            }
            ui.separator();

            // ---- Date range ----
            ui.strong("Date range");
            date_pickers(ui, state);
            ui.separator();

            // ---- PM2.5 range ----
            ui.strong("PM2.5 range (µg/m³)");
            match dataset.pm25_range {
                Some((lo, hi)) => {
                    let mut min = state.spec.pm25_min;
                    let mut max = state.spec.pm25_max;
                    let min_changed = ui.add(pm25_slider(&mut min, lo, hi, "min")).changed();
                    let max_changed = ui.add(pm25_slider(&mut max, lo, hi, "max")).changed();
                    if min_changed || max_changed {
                        state.set_pm25_bounds(min, max);
                    }
                }
                None => {
                    ui.label("No PM2.5 readings in this dataset.");
                }
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }

            // ---- Recovered conditions ----
            if let Some(view) = &state.view {
                for warning in &view.warnings {
                    ui.label(RichText::new(warning.to_string()).color(Color32::YELLOW));
                }
            }
            ui.separator();

            category_legend(ui, state);
        });
}

/// One-decimal display without rounding the stored value, so the ends of the
/// slider stay exactly on the observed extremes.
fn pm25_slider<'a>(value: &'a mut f64, lo: f64, hi: f64, text: &str) -> egui::Slider<'a> {
    egui::Slider::new(value, lo..=hi)
        .smart_aim(false)
        .custom_formatter(|v, _| format!("{v:.1}"))
        .text(text)
}

fn date_pickers(ui: &mut Ui, state: &mut AppState) {
    let (Some(mut from), Some(mut to)) = (state.dates.from(), state.dates.to()) else {
        ui.label("No valid dates in this dataset.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        let before = from;
        ui.add(DatePickerButton::new(&mut from).id_salt("date_from"));
        if from != before {
            state.pick_date_from(from);
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        let before = to;
        ui.add(DatePickerButton::new(&mut to).id_salt("date_to"));
        if to != before {
            state.pick_date_to(to);
        }
    });

    if state.dates.is_overridden() {
        if ui.small_button("Use full date range").clicked() {
            state.dates.reset();
            state.refilter();
        }
    } else {
        ui.weak("Showing all dates, including rows without one.");
    }
}

/// Fixed-order AQI colour key.
fn category_legend(ui: &mut Ui, state: &AppState) {
    ui.strong("AQI category");
    for (label, color) in state.legend.legend_entries() {
        ui.horizontal(|ui: &mut Ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, color);
            ui.label(label);
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_count()
            ));
        }

        if let Some(path) = &state.source {
            ui.separator();
            ui.weak(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Coloured badge with the category name, used by the metrics row.
pub fn category_badge(ui: &mut Ui, text: &str, bg: Color32) {
    ui.label(
        RichText::new(format!(" {text} "))
            .background_color(bg)
            .color(label_color_on(bg)),
    );
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open air-quality data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are already logged and surfaced through `state`.
        let _ = state.open(&path);
    }
}
