use eframe::egui::{self, Color32, RichText};

use crate::state::AppState;
use crate::ui::{map, metrics, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AqiViewerApp {
    pub state: AppState,
}

impl AqiViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AqiViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A dataset that could not be read ends the session: show why, nothing else.
        if let Some(err) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(format!("Error: {err}")).color(Color32::RED).heading());
                });
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: data table ----
        egui::TopBottomPanel::bottom("table_panel")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| {
                table::data_table(ui, &self.state);
            });

        // ---- Central panel: metrics + map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view air quality  (File → Open…)");
                });
                return;
            }
            ui.heading("Air Quality Map (colour by AQI category, size by PM2.5)");
            metrics::summary_row(ui, &self.state);
            ui.separator();
            map::aqi_map(ui, &self.state);
        });
    }
}
