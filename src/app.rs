use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HousePriceApp {
    pub state: AppState,
}

impl HousePriceApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HousePriceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: data preview ----
        if self.state.show_preview {
            egui::TopBottomPanel::bottom("preview")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    panels::preview_table(ui, &self.state);
                });
        }

        // ---- Central panel: description and figures ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                panels::feature_section(ui, &self.state);
                plot::histogram_plot(ui, &self.state);
                ui.separator();
                panels::model_section(ui, &self.state);
                plot::evaluation_plot(ui, &self.state);
            });
        });
    }
}
