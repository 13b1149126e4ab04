//! Model layer: decision-forest training and evaluation.
//!
//! The learners themselves live in `smartcore` and `gbdt`; this module only
//! turns datasets into matrices, drives the fits and records the results.
//!
//! ```text
//!  train split ──► FeatureEncoder ──► backend::Regressor (checkpoint sizes)
//!                                          │
//!  valid split ──────────────────────────► RMSE per checkpoint = TrainingLog
//!                                          │
//!                                          ▼
//!                              TrainedModel ──► predict / save / inspect
//! ```

pub mod backend;
pub mod features;
pub mod inspect;
pub mod metrics;

use std::fmt;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::Dataset;
use crate::data::split::split_seeded;
use crate::error::{Error, Result};
use backend::Regressor;
use features::FeatureEncoder;
pub use inspect::FeatureImportance;

// ---------------------------------------------------------------------------
// ModelFamily – the closed set of selectable learners
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    RandomForest,
    GradientBoostedTrees,
    Cart,
    DistributedGradientBoostedTrees,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::RandomForest,
        ModelFamily::GradientBoostedTrees,
        ModelFamily::Cart,
        ModelFamily::DistributedGradientBoostedTrees,
    ];

    /// Name shown in the dashboard.
    pub fn name(self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "RandomForestModel",
            ModelFamily::GradientBoostedTrees => "GradientBoostedTreesModel",
            ModelFamily::Cart => "CartModel",
            ModelFamily::DistributedGradientBoostedTrees => "DistributedGradientBoostedTreesModel",
        }
    }

    /// Command-line spelling.
    pub fn slug(self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "random-forest",
            ModelFamily::GradientBoostedTrees => "gradient-boosted-trees",
            ModelFamily::Cart => "cart",
            ModelFamily::DistributedGradientBoostedTrees => "distributed-gradient-boosted-trees",
        }
    }

    pub fn description(self) -> &'static [&'static str] {
        match self {
            ModelFamily::RandomForest => &[
                "A random forest combines many decision trees for classification or regression.",
                "Each tree is trained on a random sample of the training rows, drawn with replacement.",
                "The ensemble resists overfitting and needs little tuning.",
                "It copes with many features and handles both regression and classification.",
            ],
            ModelFamily::GradientBoostedTrees => &[
                "Gradient boosting builds decision trees one after another to minimise a loss.",
                "Each new tree corrects the errors left by the previous ones.",
                "Often more accurate than a random forest, but more prone to overfitting.",
            ],
            ModelFamily::Cart => &[
                "A single decision tree grown with the CART algorithm.",
                "It recursively splits the rows on one feature at a time to reduce node variance.",
                "Best suited to small and medium datasets.",
            ],
            ModelFamily::DistributedGradientBoostedTrees => &[
                "A distributed variant of gradient boosting meant for very large datasets.",
                "Training work is spread across workers when the data does not fit on one machine.",
                "In this application it runs in-process with the same booster as gradient boosting.",
            ],
        }
    }

    /// Default options tuned per family.
    pub fn default_options(self) -> TrainingOptions {
        let base = TrainingOptions::default();
        match self {
            ModelFamily::RandomForest => base,
            ModelFamily::Cart => TrainingOptions {
                n_trees: 1,
                ..base
            },
            ModelFamily::GradientBoostedTrees | ModelFamily::DistributedGradientBoostedTrees => {
                TrainingOptions {
                    max_depth: 6,
                    ..base
                }
            }
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ModelFamily::ALL
            .into_iter()
            .find(|f| f.slug() == s || f.name() == s)
            .ok_or_else(|| {
                let known: Vec<_> = ModelFamily::ALL.iter().map(|f| f.slug()).collect();
                format!("unknown model family '{s}' (expected one of {})", known.join(", "))
            })
    }
}

// ---------------------------------------------------------------------------
// Training options and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    /// Ensemble size of the final model (ignored for a single tree).
    pub n_trees: usize,
    pub max_depth: u16,
    /// Shrinkage of the boosted families.
    pub learning_rate: f64,
    /// Number of ensemble sizes evaluated for the training log.
    pub checkpoints: usize,
    pub seed: u64,
    /// Share of rows held out by [`train_and_evaluate`].
    pub validation_ratio: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 16,
            learning_rate: 0.1,
            checkpoints: 10,
            seed: 42,
            validation_ratio: crate::data::split::DEFAULT_TEST_RATIO,
        }
    }
}

/// Out-of-sample error after `num_trees` ensemble members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    pub num_trees: usize,
    pub rmse: f64,
}

/// Result of one training run.
#[derive(Debug)]
pub struct Training {
    pub model: TrainedModel,
    pub logs: Vec<TrainingLog>,
}

/// Evenly spaced ensemble sizes ending at `n_trees`.
pub fn checkpoint_sizes(family: ModelFamily, n_trees: usize, checkpoints: usize) -> Vec<usize> {
    if family == ModelFamily::Cart {
        return vec![1];
    }
    let n_trees = n_trees.max(1);
    let k = checkpoints.clamp(1, n_trees);
    (1..=k).map(|i| (n_trees * i).div_ceil(k)).collect()
}

fn training_error(family: ModelFamily, dataset: &Dataset, message: impl Into<String>) -> Error {
    let err = Error::Training {
        family,
        dataset: format!("{} rows x {} columns", dataset.height(), dataset.width()),
        message: message.into(),
    };
    log::error!("{err}");
    err
}

/// Fit `family` on `train`, logging validation RMSE at each checkpoint. The
/// model of the last checkpoint is returned.
pub fn train(
    family: ModelFamily,
    train: &Dataset,
    valid: &Dataset,
    label: &str,
    options: &TrainingOptions,
) -> Result<Training> {
    let encoder = FeatureEncoder::fit(train, label)?;
    if encoder.features().is_empty() {
        return Err(training_error(family, train, "no feature columns"));
    }
    if valid.is_empty() {
        return Err(training_error(family, valid, "validation set is empty"));
    }
    let x_train = encoder.encode(train)?;
    let y_train = encoder.labels(train)?;
    let x_valid = encoder.encode(valid)?;
    let y_valid = encoder.labels(valid)?;

    log::info!(
        "Training {family} on {} rows, {} features, validating on {} rows",
        x_train.len(),
        encoder.features().len(),
        x_valid.len()
    );

    let mut logs = Vec::new();
    let mut fitted = None;
    for size in checkpoint_sizes(family, options.n_trees, options.checkpoints) {
        let regressor = Regressor::fit(family, &x_train, &y_train, size, options)
            .map_err(|m| training_error(family, train, m))?;
        let predicted = regressor
            .predict(&x_valid)
            .map_err(|m| training_error(family, valid, m))?;
        let record = TrainingLog {
            num_trees: size,
            rmse: metrics::rmse(&y_valid, &predicted),
        };
        log::debug!("{family}: {} trees, RMSE {:.2}", record.num_trees, record.rmse);
        logs.push(record);
        fitted = Some(regressor);
    }

    let regressor = fitted.ok_or_else(|| training_error(family, train, "no checkpoints"))?;
    if let Some(last) = logs.last() {
        log::info!("{family}: validation RMSE {:.2} with {} trees", last.rmse, last.num_trees);
    }

    Ok(Training {
        model: TrainedModel {
            family,
            encoder,
            regressor,
        },
        logs,
    })
}

/// A training run and the rows its logs were measured on.
#[derive(Debug)]
pub struct ValidatedTraining {
    pub training: Training,
    pub valid: Dataset,
}

/// Hold out `options.validation_ratio` of `dataset` (seeded) and train on the rest.
pub fn train_and_evaluate(
    family: ModelFamily,
    dataset: &Dataset,
    label: &str,
    options: &TrainingOptions,
) -> Result<ValidatedTraining> {
    let split = split_seeded(dataset, options.validation_ratio, options.seed)?;
    let training = train(family, &split.remaining, &split.selected, label, options)?;
    Ok(ValidatedTraining {
        training,
        valid: split.selected,
    })
}

// ---------------------------------------------------------------------------
// TrainedModel – fitted learner plus its column encodings
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedModel {
    family: ModelFamily,
    encoder: FeatureEncoder,
    regressor: Regressor,
}

impl TrainedModel {
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn label(&self) -> &str {
        self.encoder.label()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.encoder.feature_names()
    }

    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        let x = self.encoder.encode(dataset)?;
        self.regressor
            .predict(&x)
            .map_err(|m| training_error(self.family, dataset, m))
    }

    /// RMSE against the label column of `dataset`.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<f64> {
        let actual = self.encoder.labels(dataset)?;
        Ok(metrics::rmse(&actual, &self.predict(dataset)?))
    }

    /// Permutation importances measured on `valid`, most important first.
    pub fn feature_importances(&self, valid: &Dataset, seed: u64) -> Result<Vec<FeatureImportance>> {
        inspect::permutation_importance(self, valid, seed)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        log::info!("Model saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        log::info!("Loaded {} model from {}", model.family, path.display());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoints_end_at_full_size() {
        assert_eq!(
            checkpoint_sizes(ModelFamily::RandomForest, 100, 10),
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]
        );
        assert_eq!(checkpoint_sizes(ModelFamily::GradientBoostedTrees, 3, 10), vec![1, 2, 3]);
        assert_eq!(checkpoint_sizes(ModelFamily::RandomForest, 7, 2), vec![4, 7]);
        assert_eq!(checkpoint_sizes(ModelFamily::Cart, 100, 10), vec![1]);
    }

    #[test]
    fn family_parses_slug_and_name() {
        for family in ModelFamily::ALL {
            assert_eq!(family.slug().parse::<ModelFamily>().unwrap(), family);
            assert_eq!(family.name().parse::<ModelFamily>().unwrap(), family);
        }
        assert!("xgboost".parse::<ModelFamily>().is_err());
    }
}
