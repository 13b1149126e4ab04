//! Turns the raw train/test data into the processed train, test and
//! validation CSVs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use house_price_dashboard::config::StorageConfig;
use house_price_dashboard::data::remote::{DatasetSource, LocalSource, ObjectStoreSource};
use house_price_dashboard::data::split::DEFAULT_TEST_RATIO;
use house_price_dashboard::pipeline;

#[derive(Parser, Debug)]
#[command(name = "make_dataset")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build processed house price datasets from raw data", long_about = None)]
struct Args {
    /// Directory receiving train_df.csv, test_df.csv and val_df.csv
    output_dir: PathBuf,

    /// Storage configuration file (environment variables override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read train.csv and test.csv from this directory instead of the object store
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Expected fraction of labelled rows moved to the test set
    #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
    ratio: f64,

    /// Seed for the row split; a random split when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let source: Box<dyn DatasetSource> = match &args.source_dir {
        Some(dir) => Box::new(LocalSource::new(dir)),
        None => {
            let config = StorageConfig::load(args.config.as_deref())
                .context("Storage configuration is incomplete")?;
            Box::new(ObjectStoreSource::from_config(&config)?)
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let data = pipeline::make_dataset(source.as_ref(), args.ratio, &mut rng)?;

    pipeline::save_processed(&data, &args.output_dir)?;
    Ok(())
}
