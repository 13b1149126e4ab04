//! Trains one decision-forest family on processed CSVs and saves the model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use house_price_dashboard::data::prepare::LABEL_COLUMN;
use house_price_dashboard::model::ModelFamily;
use house_price_dashboard::pipeline;
use house_price_dashboard::viz::export::save_figures;
use house_price_dashboard::viz::figure::{error_curve, importance_chart, Figure};

#[derive(Parser, Debug)]
#[command(name = "train_model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train a house price regressor", long_about = None)]
struct Args {
    /// Training CSV (output of make_dataset)
    #[arg(long)]
    train: PathBuf,

    /// Validation CSV used for the per-checkpoint RMSE log
    #[arg(long)]
    valid: PathBuf,

    /// Where to write the trained model (JSON)
    #[arg(long)]
    model_out: PathBuf,

    /// Model family: random-forest, gradient-boosted-trees, cart or distributed-gradient-boosted-trees
    #[arg(long, default_value = "random-forest")]
    family: ModelFamily,

    /// Number of trees (family default when omitted)
    #[arg(long)]
    trees: Option<usize>,

    /// Seed for the learner
    #[arg(long)]
    seed: Option<u64>,

    /// Save the evaluation figures as JSON in this directory
    #[arg(long)]
    figures: Option<PathBuf>,

    /// Number of bars in the feature importance figure
    #[arg(long, default_value = "20")]
    top: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut options = args.family.default_options();
    if let Some(trees) = args.trees {
        options.n_trees = trees;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }

    let run = pipeline::train_from_files(
        args.family,
        &args.train,
        &args.valid,
        LABEL_COLUMN,
        &options,
    )?;
    run.training
        .model
        .save(&args.model_out)
        .with_context(|| format!("Failed to save model to {}", args.model_out.display()))?;

    if let Some(dir) = &args.figures {
        let importances = run
            .training
            .model
            .feature_importances(&run.valid, options.seed)?;
        let figures = [
            ("model_evaluation", Figure::Curve(error_curve(&run.training.logs))),
            (
                "variable_importances",
                Figure::BarChart(importance_chart(&importances, args.top)),
            ),
        ];
        save_figures(&figures, dir)?;
    }

    Ok(())
}
