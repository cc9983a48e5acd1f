mod app;
mod cli;
mod color;
mod data;
mod report;
mod state;
mod ui;

use anyhow::Context;
use app::AqiViewerApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if cli.print {
        return print_report(&cli);
    }

    let mut state = AppState::default();
    if state.open(&cli.data).is_ok() {
        apply_cli_filters(&mut state, &cli);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Current Air Quality Map",
        options,
        Box::new(|_cc| Ok(Box::new(AqiViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}

/// Headless mode: one pipeline pass, text to stdout.
fn print_report(cli: &Cli) -> anyhow::Result<()> {
    let dataset = data::cache::load_cached(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;
    let spec = cli.filter_spec(&dataset);
    let outcome = data::filter::filtered_indices(&dataset.records, &spec);
    print!("{}", report::build_report(&dataset, &spec, &outcome));
    Ok(())
}

/// Seed the dashboard selectors from command-line flags.
fn apply_cli_filters(state: &mut AppState, cli: &Cli) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    let spec = cli.filter_spec(&dataset);
    state.spec.station = spec.station;
    state.spec.record_type = spec.record_type;
    state.spec.pm25_min = spec.pm25_min;
    state.spec.pm25_max = spec.pm25_max;
    if let Some(from) = spec.date_from {
        state.dates.pick_from(from);
    }
    if let Some(to) = spec.date_to {
        state.dates.pick_to(to);
    }
    state.refilter();
}
