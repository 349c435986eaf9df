mod app;
mod color;
mod config;
mod data;
mod export;
mod pipeline;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env()?;
    let path = match config.workbook {
        Some(path) => path,
        None => pick_workbook()?,
    };

    // Loading is the only I/O; any failure here ends the process.
    let store = data::loader::load_workbook(&path)
        .with_context(|| format!("loading workbook {}", path.display()))?;

    if let Some(out) = &config.export {
        let bundle = pipeline::recompute(&store, &config.selection);
        export::write_json(out, &bundle)?;
        log::info!("Wrote dashboard bundle to {}", out.display());
        return Ok(());
    }

    let state = AppState::new(store, config.selection);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 950.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::TITLE,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(DashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}

fn pick_workbook() -> Result<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open productivity workbook")
        .add_filter("Workbooks", &["xlsx", "xlsm", "xlsb", "xls", "ods", "json"])
        .pick_file()
        .context("no workbook selected")
}
