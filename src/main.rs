mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::HousePriceApp;
use house_price_dashboard::config::StorageConfig;
use house_price_dashboard::data::loader;
use house_price_dashboard::data::model::Dataset;
use house_price_dashboard::data::prepare::prepare;
use house_price_dashboard::data::remote::{DatasetName, DatasetSource, ObjectStoreSource};
use state::AppState;

/// Interactive dashboard over the house price training data.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Local CSV / JSON / Parquet file to open instead of the remote store
    #[arg(long)]
    data: Option<PathBuf>,

    /// Storage configuration file (environment variables override it)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn startup_dataset(args: &Args) -> anyhow::Result<(Dataset, String)> {
    if let Some(path) = &args.data {
        let ds = loader::load_file(path)?;
        return Ok((ds, path.display().to_string()));
    }

    let config = StorageConfig::load(args.config.as_deref())
        .context("Storage configuration is incomplete")?;
    let source = ObjectStoreSource::from_config(&config)?;
    let raw = source.fetch(DatasetName::Train)?;
    let label = format!("s3://{}/{}", config.bucket, config.prefix);
    Ok((prepare(&raw)?, label))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (dataset, label) = startup_dataset(&args)?;
    log::info!(
        "Loaded {} houses with {} columns from {label}",
        dataset.height(),
        dataset.width()
    );

    let mut state = AppState::default();
    state.set_dataset(dataset, label);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "House Prices – Data & Models",
        options,
        Box::new(|_cc| Ok(Box::new(HousePriceApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard failed: {e}"))
}
