use eframe::egui;

use screener_filter::state::AppState;

use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ScreenerApp {
    pub state: AppState,
}

impl ScreenerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ScreenerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Filter controls ----
        egui::TopBottomPanel::top("filter_panel")
            .resizable(true)
            .show(ctx, |ui| {
                panels::filter_panel(ui, &mut self.state);
            });

        // ---- Central panel: data table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::data_table(ui, &self.state);
        });
    }
}
