mod app;
mod cli;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use app::ShoppingTrendsApp;
use cli::Args;
use config::DashboardConfig;
use state::AppState;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = DashboardConfig::from_args(&args)?;
    let state = initial_state(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Shopping Trends Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(ShoppingTrendsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}

/// Load the configured dataset once, before the first frame.
///
/// A load failure is not fatal: the dashboard opens empty with the error in
/// the status line, as File → Open would.
fn initial_state(config: DashboardConfig) -> AppState {
    let path = config.data_path.clone();
    let mut state = AppState::new(config);

    if let Some(path) = path {
        match data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                state.set_dataset(Arc::new(dataset));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Błąd: {e}"));
            }
        }
    }
    state
}
