//! Scores a CSV with a saved model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use house_price_dashboard::data::loader::load_csv;
use house_price_dashboard::data::prepare::{prepare, ID_COLUMN};
use house_price_dashboard::model::TrainedModel;
use house_price_dashboard::pipeline;

#[derive(Parser, Debug)]
#[command(name = "predict_model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict sale prices with a trained model", long_about = None)]
struct Args {
    /// Model written by train_model
    #[arg(long)]
    model: PathBuf,

    /// CSV of houses to score
    #[arg(long)]
    data: PathBuf,

    /// Output CSV with a single Predicted_Value column
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let model = TrainedModel::load(&args.model)
        .with_context(|| format!("Failed to load model from {}", args.model.display()))?;
    let mut data = load_csv(&args.data)?;
    if data.has_column(ID_COLUMN) {
        data = prepare(&data)?;
    }

    let predictions = pipeline::predict_to_csv(&model, &data, &args.output)?;
    log::info!("{} predictions written", predictions.height());
    if data.has_column(model.label()) {
        let rmse = model.evaluate(&data)?;
        log::info!("{}: RMSE {rmse:.2} against '{}'", model.family(), model.label());
    }
    Ok(())
}
