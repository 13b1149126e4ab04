use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{metrics, training_error, TrainedModel};
use crate::data::model::Dataset;
use crate::error::Result;

/// Importance of one input column for a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Increase in validation RMSE when a single feature column is shuffled.
///
/// Only the model's predictions are used, so every family is inspected the
/// same way. Results are sorted by descending importance; ties keep the
/// encoder's column order.
pub fn permutation_importance(
    model: &TrainedModel,
    valid: &Dataset,
    seed: u64,
) -> Result<Vec<FeatureImportance>> {
    let x = model.encoder.encode(valid)?;
    let y = model.encoder.labels(valid)?;
    if x.is_empty() {
        return Err(training_error(model.family, valid, "no rows to inspect"));
    }

    let predict = |rows: &[Vec<f64>]| {
        model
            .regressor
            .predict(rows)
            .map_err(|m| training_error(model.family, valid, m))
    };
    let baseline = metrics::rmse(&y, &predict(&x)?);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut importances = Vec::with_capacity(model.encoder.features().len());
    for (j, feature) in model.encoder.features().iter().enumerate() {
        let mut column: Vec<f64> = x.iter().map(|row| row[j]).collect();
        column.shuffle(&mut rng);

        let permuted: Vec<Vec<f64>> = x
            .iter()
            .zip(&column)
            .map(|(row, &v)| {
                let mut row = row.clone();
                row[j] = v;
                row
            })
            .collect();

        importances.push(FeatureImportance {
            feature: feature.name.clone(),
            importance: metrics::rmse(&y, &predict(&permuted)?) - baseline,
        });
    }

    importances.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    log::debug!(
        "Top features: {:?}",
        importances.iter().take(5).map(|f| &f.feature).collect::<Vec<_>>()
    );
    Ok(importances)
}
