use serde::{Deserialize, Serialize};

use crate::data::model::{Column, Dataset, Value};
use crate::error::{Error, Result};

/// How one column becomes a number for the tree learners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Encoding {
    /// Numeric cell, missing values replaced by the training median.
    Numeric { fill: f64 },
    /// Ordinal code over the sorted training levels; unseen or missing is -1.
    Categorical { levels: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub encoding: Encoding,
}

/// Column encodings learned from a training split, reused unchanged for
/// validation, test and prediction data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    label: String,
    features: Vec<Feature>,
}

impl FeatureEncoder {
    /// Learn an encoding for every column except `label`.
    pub fn fit(train: &Dataset, label: &str) -> Result<Self> {
        train.column(label)?;
        let features = train
            .columns()
            .iter()
            .filter(|c| c.name != label)
            .map(|c| Feature {
                name: c.name.clone(),
                encoding: learn_encoding(c),
            })
            .collect();
        Ok(Self {
            label: label.to_string(),
            features,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Row-major feature matrix. The label column, if present, is ignored.
    pub fn encode(&self, dataset: &Dataset) -> Result<Vec<Vec<f64>>> {
        let columns = self
            .features
            .iter()
            .map(|f| dataset.column(&f.name))
            .collect::<Result<Vec<_>>>()?;

        Ok((0..dataset.height())
            .map(|row| {
                self.features
                    .iter()
                    .zip(&columns)
                    .map(|(f, col)| encode_cell(&f.encoding, &col.values[row]))
                    .collect()
            })
            .collect())
    }

    /// Label values. Every cell must be numeric.
    pub fn labels(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        let column = dataset.column(&self.label)?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, v)| {
                v.as_f64().ok_or_else(|| Error::NonNumeric {
                    column: self.label.clone(),
                    row,
                    value: v.to_string(),
                })
            })
            .collect()
    }
}

fn learn_encoding(column: &Column) -> Encoding {
    if column.is_numeric() {
        let mut present: Vec<f64> = column.values.iter().filter_map(Value::as_f64).collect();
        Encoding::Numeric {
            fill: median(&mut present),
        }
    } else {
        let levels = column
            .unique_values()
            .iter()
            .map(level_key)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        Encoding::Categorical { levels }
    }
}

fn encode_cell(encoding: &Encoding, value: &Value) -> f64 {
    match encoding {
        Encoding::Numeric { fill } => value.as_f64().unwrap_or(*fill),
        Encoding::Categorical { levels } => {
            if value.is_null() {
                return -1.0;
            }
            levels
                .binary_search(&level_key(value))
                .map_or(-1.0, |i| i as f64)
        }
    }
}

fn level_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn houses() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "LotFrontage",
                vec![Value::Float(60.0), Value::Null, Value::Float(80.0), Value::Float(70.0)],
            ),
            Column::new(
                "Street",
                vec![
                    Value::String("Pave".into()),
                    Value::String("Grvl".into()),
                    Value::Null,
                    Value::String("Pave".into()),
                ],
            ),
            Column::new(
                "SalePrice",
                (1..=4).map(|i| Value::Integer(i * 100_000)).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn encodes_numeric_and_categorical_columns() {
        let enc = FeatureEncoder::fit(&houses(), "SalePrice").unwrap();
        assert_eq!(enc.feature_names(), vec!["LotFrontage", "Street"]);

        let x = enc.encode(&houses()).unwrap();
        // median of 60, 70, 80
        assert_eq!(x[1], vec![70.0, 0.0]);
        assert_eq!(x[0], vec![60.0, 1.0]);
        assert_eq!(x[2], vec![80.0, -1.0]);
        assert_eq!(
            enc.labels(&houses()).unwrap(),
            vec![100_000.0, 200_000.0, 300_000.0, 400_000.0]
        );
    }

    #[test]
    fn unseen_level_encodes_as_minus_one() {
        let enc = FeatureEncoder::fit(&houses(), "SalePrice").unwrap();
        let other = Dataset::new(vec![
            Column::new("LotFrontage", vec![Value::Integer(50)]),
            Column::new("Street", vec![Value::String("Dirt".into())]),
        ])
        .unwrap();
        assert_eq!(enc.encode(&other).unwrap(), vec![vec![50.0, -1.0]]);
        assert!(matches!(enc.labels(&other), Err(Error::MissingColumn(_))));
    }

    #[test]
    fn missing_feature_column_is_reported() {
        let enc = FeatureEncoder::fit(&houses(), "SalePrice").unwrap();
        let partial = houses().drop_column("Street").unwrap();
        assert!(matches!(enc.encode(&partial), Err(Error::MissingColumn(c)) if c == "Street"));
    }

    #[test]
    fn text_label_is_rejected() {
        let ds = Dataset::new(vec![Column::new("SalePrice", vec![Value::String("n/a".into())])])
            .unwrap();
        let enc = FeatureEncoder::fit(&ds, "SalePrice").unwrap();
        assert!(matches!(enc.labels(&ds), Err(Error::NonNumeric { row: 0, .. })));
    }
}
