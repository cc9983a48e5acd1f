use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::projection::{TableColumn, TABLE_COLUMNS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filtered data table (bottom panel)
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        return;
    };

    ui.heading("Filtered Data Table");
    ui.label(format!("Showing {} of {} records.", view.len(), dataset.len()));

    if view.is_empty() {
        ui.label("No matching records.");
        return;
    }

    let row_height = egui::TextStyle::Body.resolve(ui.style()).size + 6.0;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center));
    for col in TABLE_COLUMNS {
        table = table.column(match col {
            TableColumn::Station | TableColumn::Category => Column::initial(150.0).at_least(60.0),
            TableColumn::TimeUtc => Column::initial(140.0).at_least(60.0),
            _ => Column::auto().at_least(50.0),
        });
    }

    table
        .header(20.0, |mut header| {
            for col in TABLE_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.header());
                });
            }
        })
        .body(|body| {
            body.rows(row_height, view.indices.len(), |mut row| {
                let rec = &dataset.records[view.indices[row.index()]];
                for col in TABLE_COLUMNS {
                    row.col(|ui: &mut Ui| {
                        let text = col.cell(rec);
                        if col == TableColumn::Category {
                            ui.colored_label(state.legend.color_for(rec.category), text);
                        } else if col.is_numeric() {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                                ui.label(text);
                            });
                        } else {
                            ui.label(text);
                        }
                    });
                }
            });
        });
}
