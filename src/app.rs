use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{heatmap, panels, regression, scatter};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CorrLensApp {
    pub state: AppState,
}

impl Default for CorrLensApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for CorrLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and view switcher ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors and filters ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Heatmap => heatmap::heatmap_view(ui, &self.state),
            View::ScatterMatrix => scatter::scatter_matrix(ui, &self.state),
            View::Regression => regression::regression_plot(ui, &self.state),
        });
    }
}
