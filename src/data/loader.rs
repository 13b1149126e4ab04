use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, Dataset, Value};
use crate::error::Result;

/// Cell contents read as missing, following the usual dataframe defaults.
pub const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "LotArea": 8450, "SalePrice": 208500, ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> anyhow::Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => Ok(load_csv(path).with_context(|| format!("loading {}", path.display()))?),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a comma-separated dataset whose first row names the columns.
/// Types are inferred per column, see [`infer_column`].
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, &cells))
        .collect();
    Dataset::new(columns)
}

pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let dataset = read_csv(file)?;
    log::debug!(
        "Read {} rows x {} columns from {}",
        dataset.height(),
        dataset.width(),
        path.display()
    );
    Ok(dataset)
}

/// Pick one type for a whole column: Integer, then Float, then Bool, else
/// String. Missing markers become `Null` regardless of the chosen type.
pub fn infer_column(name: String, cells: &[String]) -> Column {
    let present: Vec<&str> = cells
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !is_missing(s))
        .collect();

    let parse: fn(&str) -> Value = if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        |s| s.parse().map(Value::Integer).unwrap_or(Value::Null)
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        |s| s.parse().map(Value::Float).unwrap_or(Value::Null)
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        |s| parse_bool(s).map(Value::Bool).unwrap_or(Value::Null)
    } else {
        |s| Value::String(s.to_string())
    };

    let values = cells
        .iter()
        .map(|s| if is_missing(s) { Value::Null } else { parse(s) })
        .collect();
    Column::new(name, values)
}

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Column order follows first appearance; keys absent from a record are null.
fn load_json(path: &Path) -> anyhow::Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map_or(Value::Null, json_to_value))
                .collect();
            Column::new(name, values)
        })
        .collect();

    Ok(Dataset::new(columns)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns, as written by
/// `df.to_parquet()` in Pandas or `df.write_parquet()` in Polars.
fn load_parquet(path: &Path) -> anyhow::Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, cells) in values.iter_mut().enumerate() {
            let col = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                cells.push(
                    extract_value(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{}'", names[col_idx]))?,
                );
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Dataset::new(columns)?)
}

// -- Parquet / Arrow helpers --

/// Extract a single scalar from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = downcast::<StringArray>(col)?;
            Value::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

fn downcast<T: Array + 'static>(col: &Arc<dyn Array>) -> anyhow::Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array for {:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_types_per_column() {
        let csv = "Id,LotFrontage,Street,CentralAir\n1,65.0,Pave,True\n2,NA,Grvl,False\n3,80,Pave,\n";
        let ds = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(ds.height(), 3);
        assert_eq!(
            ds.column("Id").unwrap().values,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
        assert_eq!(
            ds.column("LotFrontage").unwrap().values,
            vec![Value::Float(65.0), Value::Null, Value::Float(80.0)]
        );
        assert_eq!(
            ds.column("Street").unwrap().values[1],
            Value::String("Grvl".into())
        );
        assert_eq!(
            ds.column("CentralAir").unwrap().values,
            vec![Value::Bool(true), Value::Bool(false), Value::Null]
        );
    }

    #[test]
    fn mixed_column_falls_back_to_text() {
        let ds = read_csv("MSZoning\n20\nRL\n".as_bytes()).unwrap();
        assert_eq!(
            ds.column("MSZoning").unwrap().values,
            vec![Value::String("20".into()), Value::String("RL".into())]
        );
    }

    #[test]
    fn header_only_is_empty_with_columns() {
        let ds = read_csv("Id,SalePrice\n".as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names(), vec!["Id", "SalePrice"]);
    }

    #[test]
    fn json_records_fill_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"LotArea": 8450, "Street": "Pave"}, {"LotArea": 9600.5}]"#)
            .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), vec!["LotArea", "Street"]);
        assert_eq!(ds.column("LotArea").unwrap().values[1], Value::Float(9600.5));
        assert_eq!(ds.column("Street").unwrap().values[1], Value::Null);
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(load_file(Path::new("houses.xlsx")).is_err());
    }
}
