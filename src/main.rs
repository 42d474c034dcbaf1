mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use genenet_explorer::network::DataSources;
use genenet_explorer::settings::{EngineSettings, load_settings};
use genenet_explorer::view::{Tissue, ViewConfig, ViewMode};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Full network JSON; the bundled demo network is used when omitted.
    #[arg(long)]
    network: Option<PathBuf>,
    /// Neighborhood JSON shown in neighborhood mode.
    #[arg(long)]
    neighbors: Option<PathBuf>,
    /// Normal and tumor path traces.
    #[arg(long)]
    paths: Option<PathBuf>,
    /// Layout, animation and camera tuning.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ViewMode::Full)]
    mode: ViewMode,
    #[arg(long, value_enum, default_value_t = Tissue::Normal)]
    tissue: Tissue,
    /// Gene id selected at startup.
    #[arg(long)]
    select: Option<String>,
    /// Gene id flashed at startup.
    #[arg(long)]
    highlight: Option<String>,
    /// Fixed layout seed for reproducible placements.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("genenet_explorer=info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => load_settings(path).unwrap_or_else(|error| {
            warn!("{error}; using default settings");
            EngineSettings::default()
        }),
        None => EngineSettings::default(),
    };
    info!(mode = %args.mode, tissue = args.tissue.label(), "starting explorer");

    let launch = app::Launch {
        sources: DataSources {
            network: args.network,
            neighbors: args.neighbors,
            paths: args.paths,
        },
        settings,
        config: ViewConfig {
            mode: args.mode,
            tissue: args.tissue,
            selected: args.select,
            highlighted: args.highlight,
        },
        seed: args.seed,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "genenet-explorer",
        options,
        Box::new(move |cc| Ok(Box::new(app::GeneNetworkApp::new(cc, launch)))),
    )
}
