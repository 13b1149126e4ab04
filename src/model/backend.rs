use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

use super::{ModelFamily, TrainingOptions};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// A fitted learner from one of the decision-forest libraries.
///
/// Forests and single trees come from `smartcore`; both boosted families use
/// the `gbdt` booster with squared-error loss.
#[derive(Serialize, Deserialize)]
pub enum Regressor {
    Forest(Forest),
    Tree(Tree),
    Boosted {
        booster: GBDT,
        /// Training label mean; the booster fits the centred labels.
        offset: f64,
    },
}

impl std::fmt::Debug for Regressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regressor::Forest(_) => f.write_str("Regressor::Forest"),
            Regressor::Tree(_) => f.write_str("Regressor::Tree"),
            Regressor::Boosted { offset, .. } => write!(f, "Regressor::Boosted(offset={offset})"),
        }
    }
}

impl Regressor {
    /// Fit an ensemble of `n_trees` members. Errors are the backend's message.
    pub fn fit(
        family: ModelFamily,
        x: &[Vec<f64>],
        y: &[f64],
        n_trees: usize,
        options: &TrainingOptions,
    ) -> Result<Self, String> {
        if x.is_empty() {
            return Err("no training rows".to_string());
        }
        match family {
            ModelFamily::RandomForest => {
                let params = RandomForestRegressorParameters::default()
                    .with_n_trees(n_trees as _)
                    .with_max_depth(options.max_depth)
                    .with_seed(options.seed);
                let forest = Forest::fit(&matrix(x), &y.to_vec(), params)
                    .map_err(|e| e.to_string())?;
                Ok(Regressor::Forest(forest))
            }
            ModelFamily::Cart => {
                let params =
                    DecisionTreeRegressorParameters::default().with_max_depth(options.max_depth);
                let tree = Tree::fit(&matrix(x), &y.to_vec(), params).map_err(|e| e.to_string())?;
                Ok(Regressor::Tree(tree))
            }
            ModelFamily::GradientBoostedTrees | ModelFamily::DistributedGradientBoostedTrees => {
                let offset = y.iter().sum::<f64>() / y.len() as f64;

                let mut cfg = Config::new();
                cfg.set_feature_size(x[0].len());
                cfg.set_max_depth(options.max_depth as u32);
                cfg.set_iterations(n_trees);
                cfg.set_shrinkage(options.learning_rate as f32);
                cfg.set_loss("SquaredError");
                cfg.set_data_sample_ratio(1.0);
                cfg.set_feature_sample_ratio(1.0);
                cfg.set_training_optimization_level(2);
                cfg.set_debug(false);

                let mut data: DataVec = x
                    .iter()
                    .zip(y)
                    .map(|(row, &label)| {
                        Data::new_training_data(to_f32(row), 1.0, (label - offset) as f32, None)
                    })
                    .collect();

                let mut booster = GBDT::new(&cfg);
                booster.fit(&mut data);
                Ok(Regressor::Boosted { booster, offset })
            }
        }
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, String> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Regressor::Forest(forest) => forest.predict(&matrix(x)).map_err(|e| e.to_string()),
            Regressor::Tree(tree) => tree.predict(&matrix(x)).map_err(|e| e.to_string()),
            Regressor::Boosted { booster, offset } => {
                let data: DataVec = x
                    .iter()
                    .map(|row| Data::new_test_data(to_f32(row), None))
                    .collect();
                Ok(booster
                    .predict(&data)
                    .into_iter()
                    .map(|p| p as f64 + offset)
                    .collect())
            }
        }
    }
}

fn matrix(x: &[Vec<f64>]) -> DenseMatrix<f64> {
    DenseMatrix::from_2d_vec(&x.to_vec())
}

fn to_f32(row: &[f64]) -> Vec<f32> {
    row.iter().map(|&v| v as f32).collect()
}
