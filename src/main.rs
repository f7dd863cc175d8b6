mod app;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use bikeshare_dashboard::cli::{Cli, OutputFormat};
use bikeshare_dashboard::data::loader::load_file;
use bikeshare_dashboard::DashboardReport;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.report {
        return run_report(&cli);
    }

    let mut state = AppState::new(cli.selection(), cli.scope());
    if let Some(path) = cli.data_path() {
        state.open(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 850.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rent Bike Analysis Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}

/// Headless mode: load, compute both tabs once, print, exit.
fn run_report(cli: &Cli) -> Result<()> {
    let path = cli
        .data_path()
        .context("no dataset given and ./hour.csv not found")?;
    let dataset = load_file(&path)?;
    let report = DashboardReport::build(&dataset, &cli.selection(), cli.scope());

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        ),
    }
    Ok(())
}
