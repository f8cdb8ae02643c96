mod app;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::ScreenerApp;
use screener_filter::config::{self, DEFAULT_LOG_LEVEL};
use screener_filter::controller::{FilterRowController, TableView};
use screener_filter::data::export::write_csv;
use screener_filter::data::filter::FilterRow;
use screener_filter::data::loader::{load_dataset, load_filter_preset};
use screener_filter::state::AppState;

/// Screener Filter - interactively filter a table by column conditions.
#[derive(Parser, Debug)]
#[command(name = "screener-filter", version, about)]
struct Cli {
    /// Data file to open (.csv, .json or .parquet).
    data: Option<PathBuf>,

    /// CSV whose first row lists the filterable columns.
    #[arg(short = 'c', long = "columns")]
    columns: Option<PathBuf>,

    /// JSON file with preset filter rows.
    #[arg(short = 'f', long = "filters")]
    filters: Option<PathBuf>,

    /// Apply the preset filters and print matching rows as CSV, no window.
    #[arg(long = "headless")]
    headless: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Priority: RUST_LOG > --debug > config level > default.
fn init_logging(debug: bool, config_level: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(spec) => {
            builder.parse_filters(&spec);
        }
        Err(_) if debug => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        Err(_) => {
            builder.parse_filters(config_level.unwrap_or(DEFAULT_LOG_LEVEL));
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_warnings) = config::load_config(&config::config_dir());
    init_logging(cli.debug, config.log_level.as_deref());
    for warning in &config_warnings {
        log::warn!("{warning}");
    }

    let data_path = cli.data.clone().or_else(|| config.data_path.clone());
    let columns_path = cli.columns.clone().or_else(|| config.columns_path.clone());
    let preset: Vec<FilterRow> = match &cli.filters {
        Some(path) => load_filter_preset(path)?,
        None => Vec::new(),
    };

    if cli.headless {
        let path = data_path.context("--headless needs a data file")?;
        return run_headless(&path, columns_path, preset);
    }

    let mut state = AppState::new(columns_path, config.initial_filter_row);
    if !config_warnings.is_empty() {
        state.status_message = Some(config_warnings.join(" "));
    }
    if let Some(path) = &data_path {
        state.load(path, preset);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    eframe::run_native(
        "Screener Filter",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(ScreenerApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("Failed to launch GUI: {e}"))
}

fn run_headless(
    data_path: &std::path::Path,
    columns_path: Option<PathBuf>,
    preset: Vec<FilterRow>,
) -> Result<()> {
    let dataset = load_dataset(data_path, columns_path.as_deref())?;
    let controller = FilterRowController::new(dataset, TableView::default()).with_filters(preset);
    for (id, reason) in &controller.report().skipped {
        log::warn!("Skipping {id}: {reason}");
    }
    let stdout = std::io::stdout();
    write_csv(controller.dataset(), &controller.sink().visible, stdout.lock())
}
