use std::collections::HashMap;
use std::path::Path;

use house_price_dashboard::catalog;
use house_price_dashboard::data::model::Dataset;
use house_price_dashboard::data::prepare::{prepare, ID_COLUMN, LABEL_COLUMN};
use house_price_dashboard::model::ModelFamily;
use house_price_dashboard::pipeline::{evaluate_family, Evaluation};
use house_price_dashboard::viz::export::save_figures;
use house_price_dashboard::viz::figure::{
    error_curve, histogram, importance_chart, BarChart, Curve, Figure, Histogram, DEFAULT_BINS,
};

/// Number of bars in the feature importance chart.
pub const TOP_FEATURES: usize = 20;

/// Which evaluation figure the results section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationView {
    ErrorByTrees,
    FeatureImportance,
}

impl EvaluationView {
    pub const ALL: [EvaluationView; 2] =
        [EvaluationView::ErrorByTrees, EvaluationView::FeatureImportance];

    pub fn label(self) -> &'static str {
        match self {
            EvaluationView::ErrorByTrees => "RMSE / number of trees",
            EvaluationView::FeatureImportance => "Feature importance",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Prepared dataset (identifier column removed).
    pub dataset: Option<Dataset>,

    /// Where the dataset came from, shown in the top bar.
    pub source_label: String,

    /// Feature whose distribution is plotted.
    pub feature: String,

    /// Histogram of `feature` (cached).
    pub histogram: Option<Histogram>,

    pub family: ModelFamily,

    pub view: EvaluationView,

    /// Finished training runs, one per family.
    pub evaluations: HashMap<ModelFamily, Evaluation>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the data preview table is expanded.
    pub show_preview: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_label: String::new(),
            feature: LABEL_COLUMN.to_string(),
            histogram: None,
            family: ModelFamily::RandomForest,
            view: EvaluationView::ErrorByTrees,
            evaluations: HashMap::new(),
            status_message: None,
            show_preview: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset everything derived from it.
    pub fn set_dataset(&mut self, dataset: Dataset, source_label: String) {
        // Processed files have no identifier column; raw ones still do.
        let dataset = if dataset.has_column(ID_COLUMN) {
            match prepare(&dataset) {
                Ok(prepared) => prepared,
                Err(e) => {
                    log::error!("Failed to prepare {source_label}: {e:#}");
                    self.status_message = Some(format!("Error: {e}"));
                    return;
                }
            }
        } else {
            log::info!("{source_label} has no '{ID_COLUMN}' column, using it as loaded");
            dataset
        };

        self.evaluations.clear();
        self.source_label = source_label;
        self.dataset = Some(dataset);
        self.status_message = None;
        let feature = self.feature.clone();
        self.select_feature(feature);
    }

    /// Pick the histogram feature and rebuild its figure.
    pub fn select_feature(&mut self, feature: String) {
        self.feature = feature;
        self.histogram = None;
        let Some(ds) = &self.dataset else {
            return;
        };
        match histogram(ds, &self.feature, DEFAULT_BINS) {
            Ok(h) => {
                self.histogram = Some(h);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("No histogram for '{}': {e}", self.feature);
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Features offered in the selector that exist in the loaded dataset.
    pub fn available_features(&self) -> Vec<&'static str> {
        catalog::FEATURES
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| self.dataset.as_ref().is_some_and(|ds| ds.has_column(name)))
            .collect()
    }

    /// Train and inspect the selected family. Blocks until done.
    pub fn train_selected(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let family = self.family;
        log::info!("Training {family} from the dashboard");
        match evaluate_family(family, ds, LABEL_COLUMN, &family.default_options()) {
            Ok(evaluation) => {
                self.evaluations.insert(family, evaluation);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Training {family} failed: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn current_evaluation(&self) -> Option<&Evaluation> {
        self.evaluations.get(&self.family)
    }

    pub fn error_curve(&self) -> Option<Curve> {
        self.current_evaluation().map(|e| error_curve(&e.logs))
    }

    pub fn importance_chart(&self) -> Option<BarChart> {
        self.current_evaluation()
            .map(|e| importance_chart(&e.importances, TOP_FEATURES))
    }

    /// Save every figure currently available as JSON files in `dir`.
    pub fn export_figures(&mut self, dir: &Path) {
        let mut figures = Vec::new();
        if let Some(h) = &self.histogram {
            figures.push(("feature_distribution", Figure::Histogram(h.clone())));
        }
        if let Some(c) = self.error_curve() {
            figures.push(("model_evaluation", Figure::Curve(c)));
        }
        if let Some(b) = self.importance_chart() {
            figures.push(("variable_importances", Figure::BarChart(b)));
        }

        match save_figures(&figures, dir) {
            Ok(paths) => {
                self.status_message = Some(format!("Saved {} figures", paths.len()));
            }
            Err(e) => {
                log::error!("Failed to export figures: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
