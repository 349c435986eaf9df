use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Filter row ----
        egui::TopBottomPanel::top("filter_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::filter_row(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // ---- Central panel: metric cards and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::metric_cards(ui, &self.state.bundle.cards);
                    ui.add_space(12.0);
                    charts::chart_grid(ui, &self.state);
                });
        });
    }
}
