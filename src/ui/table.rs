use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use screener_filter::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the headers and the currently visible rows.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(controller) = &state.controller else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view data  (File → Open dataset…)");
        });
        return;
    };

    let dataset = controller.dataset();
    let view = controller.sink();

    if view.shows_no_match() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(16.0);
            ui.label(egui::RichText::new("No data matches your filters.").weak());
        });
    }

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0), view.headers.len())
            .min_scrolled_height(0.0)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for h in &view.headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.visible.len(), |mut row| {
                    let data_row = view.visible[row.index()];
                    for col in 0..view.headers.len() {
                        let text = dataset.cell(data_row, col).unwrap_or_default();
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
