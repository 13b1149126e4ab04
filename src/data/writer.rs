use std::io::Write;
use std::path::{Path, PathBuf};

use super::model::{Dataset, Value};
use crate::error::Result;

/// File names of the processed layout, one per split.
pub const TRAIN_FILE: &str = "train_df.csv";
pub const TEST_FILE: &str = "test_df.csv";
pub const VAL_FILE: &str = "val_df.csv";

/// Write `dataset` as CSV: header row, no index column, nulls as empty cells.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    if dataset.width() == 0 {
        return Ok(());
    }
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.column_names())?;
    for row in 0..dataset.height() {
        out.write_record(dataset.row(row).into_iter().map(format_cell))?;
    }
    out.flush()?;
    Ok(())
}

pub fn save_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(dataset, std::io::BufWriter::new(file))
}

/// Write the three processed splits into `dir`, creating it if needed.
/// Returns the paths written, in train/test/val order.
pub fn save_splits(
    train: &Dataset,
    test: &Dataset,
    val: &Dataset,
    dir: &Path,
) -> Result<[PathBuf; 3]> {
    std::fs::create_dir_all(dir)?;
    let paths = [dir.join(TRAIN_FILE), dir.join(TEST_FILE), dir.join(VAL_FILE)];
    for (dataset, path) in [train, test, val].into_iter().zip(&paths) {
        save_csv(dataset, path)?;
        log::info!("Wrote {} rows to {}", dataset.height(), path.display());
    }
    Ok(paths)
}

// `{:?}` keeps the fractional part (`2.0`), so floats read back as floats.
fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float(f) if f.is_nan() => String::new(),
        Value::Float(f) => format!("{f:?}"),
        Value::Integer(i) => i.to_string(),
        Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Value::String(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::Column;

    #[test]
    fn round_trips_through_csv() {
        let ds = Dataset::new(vec![
            Column::new("LotArea", vec![Value::Integer(8450), Value::Integer(9600)]),
            Column::new("LotFrontage", vec![Value::Float(65.0), Value::Null]),
            Column::new(
                "Street",
                vec![Value::String("Pave".into()), Value::String("a, b".into())],
            ),
            Column::new("CentralAir", vec![Value::Bool(true), Value::Bool(false)]),
        ])
        .unwrap();

        let mut buf = Vec::new();
        write_csv(&ds, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("LotArea,LotFrontage,Street,CentralAir\n"));

        assert_eq!(read_csv(buf.as_slice()).unwrap(), ds);
    }

    #[test]
    fn save_splits_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let ds = Dataset::new(vec![Column::new("SalePrice", vec![Value::Integer(1)])]).unwrap();
        let out = dir.path().join("processed");
        let paths = save_splits(&ds, &ds, &Dataset::default(), &out).unwrap();

        assert!(paths.iter().all(|p| p.exists() && p.starts_with(&out)));
        assert_eq!(paths[0].file_name().unwrap(), TRAIN_FILE);
        assert_eq!(std::fs::read_to_string(&paths[2]).unwrap(), "");
    }
}
