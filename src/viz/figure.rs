use serde::{Deserialize, Serialize};

use crate::data::model::Dataset;
use crate::error::{Error, Result};
use crate::model::{FeatureImportance, TrainingLog};

// ---------------------------------------------------------------------------
// Figure types – plain data, rendered by the dashboard or saved to disk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Distribution of one numeric column, with a KDE curve scaled to counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<Bin>,
    pub kde: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Value as printed next to the bar.
    pub text: String,
}

/// Horizontal bars, first bar drawn on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Histogram(Histogram),
    Curve(Curve),
    BarChart(BarChart),
}

pub const DEFAULT_BINS: usize = 100;
const KDE_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Histogram of `column` with `bins` equal-width bins over its range.
pub fn histogram(dataset: &Dataset, column: &str, bins: usize) -> Result<Histogram> {
    let col = dataset.column(column)?;
    let mut values = Vec::with_capacity(col.values.len());
    for (row, v) in col.values.iter().enumerate() {
        if v.is_null() {
            continue;
        }
        match v.as_f64() {
            Some(x) if x.is_finite() => values.push(x),
            Some(_) => {}
            None => {
                return Err(Error::NonNumeric {
                    column: column.to_string(),
                    row,
                    value: v.to_string(),
                })
            }
        }
    }

    if values.is_empty() {
        return Ok(Histogram {
            column: column.to_string(),
            bins: Vec::new(),
            kde: Vec::new(),
        });
    }

    let bins = bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (start, width) = if max > min {
        (min, (max - min) / bins as f64)
    } else {
        (min - 0.5, 1.0 / bins as f64)
    };

    let mut counts = vec![0usize; bins];
    for &x in &values {
        let idx = (((x - start) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins_out = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: start + i as f64 * width,
            end: start + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Ok(Histogram {
        column: column.to_string(),
        bins: bins_out,
        kde: kde_curve(&values, min, max, width),
    })
}

/// Gaussian KDE with Scott's bandwidth, scaled so it overlays the counts.
fn kde_curve(values: &[f64], min: f64, max: f64, bin_width: f64) -> Vec<[f64; 2]> {
    let n = values.len() as f64;
    if values.len() < 2 || max <= min {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let h = var.sqrt() * n.powf(-0.2);
    if h <= 0.0 {
        return Vec::new();
    }

    let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());
    let step = (max - min) / (KDE_POINTS - 1) as f64;
    (0..KDE_POINTS)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * n * bin_width]
        })
        .collect()
}

/// Out-of-sample RMSE against the number of trees.
pub fn error_curve(logs: &[TrainingLog]) -> Curve {
    Curve {
        title: "Model performance by number of trees".to_string(),
        x_label: "Number of trees".to_string(),
        y_label: "RMSE (out-of-sample)".to_string(),
        points: logs
            .iter()
            .map(|l| [l.num_trees as f64, l.rmse])
            .collect(),
    }
}

/// The `top` most important features, ranked, labelled to four decimals.
pub fn importance_chart(importances: &[FeatureImportance], top: usize) -> BarChart {
    let mut ranked = importances.to_vec();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    BarChart {
        title: "Feature importance (permutation)".to_string(),
        x_label: "Increase in RMSE when shuffled".to_string(),
        bars: ranked
            .into_iter()
            .take(top)
            .map(|fi| Bar {
                text: format!("{:.4}", fi.importance),
                label: fi.feature,
                value: fi.importance,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};

    fn prices(values: Vec<Value>) -> Dataset {
        Dataset::new(vec![Column::new("SalePrice", values)]).unwrap()
    }

    #[test]
    fn histogram_counts_every_value() {
        let ds = prices(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(2),
            Value::Null,
            Value::Integer(5),
        ]);
        let h = histogram(&ds, "SalePrice", 4).unwrap();

        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(h.bins[0].start, 1.0);
        assert_eq!(h.bins[3].end, 5.0);
        // the maximum falls in the last bin
        assert_eq!(h.bins[3].count, 1);
        assert_eq!(h.kde.len(), KDE_POINTS);
    }

    #[test]
    fn constant_column_gets_one_filled_bin() {
        let ds = prices(vec![Value::Float(3.0); 3]);
        let h = histogram(&ds, "SalePrice", 1).unwrap();
        assert_eq!(h.bins[0].count, 3);
        assert!(h.kde.is_empty());
    }

    #[test]
    fn text_column_is_rejected() {
        let ds = prices(vec![Value::String("cheap".into())]);
        assert!(matches!(histogram(&ds, "SalePrice", 10), Err(Error::NonNumeric { .. })));
    }

    #[test]
    fn importance_chart_ranks_and_truncates() {
        let importances = vec![
            FeatureImportance { feature: "LotArea".into(), importance: 0.5 },
            FeatureImportance { feature: "OverallQual".into(), importance: 2.25 },
            FeatureImportance { feature: "MoSold".into(), importance: 0.0 },
        ];
        let chart = importance_chart(&importances, 2);
        let labels: Vec<_> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["OverallQual", "LotArea"]);
        assert_eq!(chart.bars[0].text, "2.2500");
    }

    #[test]
    fn error_curve_follows_logs() {
        let logs = vec![
            TrainingLog { num_trees: 10, rmse: 40_000.0 },
            TrainingLog { num_trees: 20, rmse: 35_000.0 },
        ];
        assert_eq!(error_curve(&logs).points, vec![[10.0, 40_000.0], [20.0, 35_000.0]]);
    }
}
