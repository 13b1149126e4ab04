use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Value – a single cell of a tabular dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe reader infers.
/// Used as a `BTreeSet` key downstream so `Value` must be `Ord`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

// Same relation as `cmp`; a NaN cell equals itself.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Numeric view of the cell. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed sequence of cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Whether every non-null cell has a numeric view.
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .all(|v| v.is_null() || v.as_f64().is_some())
    }

    /// Sorted set of the distinct non-null cells.
    pub fn unique_values(&self) -> BTreeSet<Value> {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – ordered named columns sharing a row count
// ---------------------------------------------------------------------------

/// An in-memory table. Every transformation returns a fresh `Dataset`, the
/// source is never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, checking that columns are unique and equally long.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Schema(format!("duplicate column '{}'", col.name)));
            }
        }
        if let Some(first) = columns.first() {
            let height = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != height) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} rows, expected {height}",
                    bad.name,
                    bad.values.len()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Copy of the dataset without `name`. Absence of the column is an error.
    pub fn drop_column(&self, name: &str) -> Result<Self> {
        if !self.has_column(name) {
            return Err(Error::MissingColumn(name.to_string()));
        }
        let columns = self
            .columns
            .iter()
            .filter(|c| c.name != name)
            .cloned()
            .collect();
        Ok(Self { columns })
    }

    /// Rows at `indices`, in the order given.
    pub fn take(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Self { columns }
    }

    /// Split rows by a mask into `(unmasked, masked)`, keeping relative order.
    pub fn partition(&self, mask: &[bool]) -> Result<(Self, Self)> {
        if mask.len() != self.height() {
            return Err(Error::Schema(format!(
                "mask has {} entries for {} rows",
                mask.len(),
                self.height()
            )));
        }
        let (selected, remaining): (Vec<usize>, Vec<usize>) =
            (0..mask.len()).partition(|&i| mask[i]);
        Ok((self.take(&remaining), self.take(&selected)))
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.height());
        self.take(&(0..n).collect::<Vec<_>>())
    }

    /// Cells of row `row` in column order.
    pub fn row(&self, row: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[row]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new("Id", vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]),
            Column::new(
                "Street",
                vec![
                    Value::String("Pave".into()),
                    Value::Null,
                    Value::String("Grvl".into()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::new("a", vec![Value::Integer(1)]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Dataset::new(vec![Column::new("a", vec![]), Column::new("a", vec![])])
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn partition_keeps_relative_order() {
        let ds = sample();
        let (rest, picked) = ds.partition(&[true, false, true]).unwrap();
        assert_eq!(rest.column("Id").unwrap().values, vec![Value::Integer(2)]);
        assert_eq!(
            picked.column("Id").unwrap().values,
            vec![Value::Integer(1), Value::Integer(3)]
        );
        assert_eq!(picked.column_names(), vec!["Id", "Street"]);
    }

    #[test]
    fn partition_checks_mask_length() {
        assert!(sample().partition(&[true]).is_err());
    }

    #[test]
    fn drop_column_leaves_source_untouched() {
        let ds = sample();
        let dropped = ds.drop_column("Id").unwrap();
        assert_eq!(dropped.column_names(), vec!["Street"]);
        assert_eq!(ds.width(), 2);
        assert!(matches!(
            dropped.drop_column("Id"),
            Err(Error::MissingColumn(c)) if c == "Id"
        ));
    }

    #[test]
    fn value_ordering_groups_by_type() {
        let mut vals = vec![
            Value::String("b".into()),
            Value::Float(0.5),
            Value::Null,
            Value::Integer(3),
        ];
        vals.sort();
        assert_eq!(vals[0], Value::Null);
        assert_eq!(vals[3], Value::String("b".into()));
    }

    #[test]
    fn nan_cells_are_equal_to_themselves() {
        use std::collections::HashSet;

        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, Value::Float(f64::NAN));
        assert_eq!(nan.cmp(&Value::Float(f64::NAN)), std::cmp::Ordering::Equal);

        let set: HashSet<Value> = [nan.clone(), Value::Float(f64::NAN)].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(Value::Float(1.0), Value::Integer(1));
    }
}
