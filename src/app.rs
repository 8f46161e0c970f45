use eframe::egui;

use crate::data::filter;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// Every frame redraws from the current criteria; nothing is cached
/// between frames except the loaded dataset.
pub struct ShoppingTrendsApp {
    pub state: AppState,
}

impl ShoppingTrendsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ShoppingTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // One filter pass per frame, shared by the counts label and the
        // charts. The view holds its own dataset handle so the panels below
        // can still mutate the state.
        let dataset = self.state.dataset.clone();
        let criteria = self.state.criteria.clone();
        let view = dataset.as_deref().map(|ds| filter::apply(ds, &criteria));

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, view.as_ref());
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Edits made this frame show up on the next one.
        if self.state.differs_from(dataset.as_ref(), &criteria) {
            ctx.request_repaint();
        }

        // ---- Central panel: table and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state, view.as_ref());
        });
    }
}
