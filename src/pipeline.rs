//! End-to-end steps shared by the batch binaries and the dashboard.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::data::loader::load_csv;
use crate::data::prepare::prepare;
use crate::data::remote::{DatasetName, DatasetSource};
use crate::data::split::split_dataset;
use crate::data::model::{Column, Dataset, Value};
use crate::data::writer::{save_csv, save_splits};
use crate::error::Result;
use crate::model::{
    self, FeatureImportance, ModelFamily, TrainedModel, TrainingLog, TrainingOptions,
    ValidatedTraining,
};

/// Column written by [`predict_to_csv`].
pub const PREDICTION_COLUMN: &str = "Predicted_Value";

/// Processed datasets produced by one run of [`make_dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedData {
    pub train: Dataset,
    pub test: Dataset,
    pub val: Dataset,
}

/// Fetch the raw train and test sets, drop their id columns and split the
/// labelled rows into train/test at `ratio`. The raw test set becomes `val`.
pub fn make_dataset<R: Rng + ?Sized>(
    source: &dyn DatasetSource,
    ratio: f64,
    rng: &mut R,
) -> Result<ProcessedData> {
    log::info!("making final data set from raw data");

    log::info!("loading raw data");
    let raw_train = source.fetch(DatasetName::Train)?;
    let raw_val = source.fetch(DatasetName::Test)?;

    log::info!("performing data processing");
    let train = prepare(&raw_train)?;
    let val = prepare(&raw_val)?;

    log::info!("splitting dataset into train and test sets");
    let split = split_dataset(&train, ratio, rng)?;
    log::info!(
        "{} training rows, {} test rows, {} validation rows",
        split.remaining.height(),
        split.selected.height(),
        val.height()
    );

    Ok(ProcessedData {
        train: split.remaining,
        test: split.selected,
        val,
    })
}

/// Write the processed layout into `dir`.
pub fn save_processed(data: &ProcessedData, dir: &Path) -> Result<[PathBuf; 3]> {
    log::info!("saving processed data");
    save_splits(&data.train, &data.test, &data.val, dir)
}

/// Load train/validation CSVs and fit `family`. The loaded validation set
/// is handed back with the training run.
pub fn train_from_files(
    family: ModelFamily,
    train_path: &Path,
    valid_path: &Path,
    label: &str,
    options: &TrainingOptions,
) -> Result<ValidatedTraining> {
    let train = load_csv(train_path)?;
    log::info!("Data loaded from {}", train_path.display());
    let valid = load_csv(valid_path)?;
    log::info!("Data loaded from {}", valid_path.display());
    let training = model::train(family, &train, &valid, label, options)?;
    Ok(ValidatedTraining { training, valid })
}

/// Predict every row of `data` and write a single-column CSV to `output`.
pub fn predict_to_csv(model: &TrainedModel, data: &Dataset, output: &Path) -> Result<Dataset> {
    let predictions = model.predict(data)?;
    log::info!("Predictions made for {} rows", predictions.len());
    let out = Dataset::new(vec![Column::new(
        PREDICTION_COLUMN,
        predictions.into_iter().map(Value::Float).collect(),
    )])?;
    save_csv(&out, output)?;
    log::info!("Predictions saved to {}", output.display());
    Ok(out)
}

/// Everything the dashboard shows about one trained family.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub family: ModelFamily,
    pub logs: Vec<TrainingLog>,
    pub importances: Vec<FeatureImportance>,
}

/// Split `dataset` (seeded), train `family` on the remaining rows and
/// inspect it on the held-out rows.
pub fn evaluate_family(
    family: ModelFamily,
    dataset: &Dataset,
    label: &str,
    options: &TrainingOptions,
) -> Result<Evaluation> {
    let ValidatedTraining { training, valid } =
        model::train_and_evaluate(family, dataset, label, options)?;
    let importances = training.model.feature_importances(&valid, options.seed)?;
    Ok(Evaluation {
        family,
        logs: training.logs,
        importances,
    })
}
