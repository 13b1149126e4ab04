//! Raw data to processed CSVs, end to end.

use house_price_dashboard::data::loader::load_csv;
use house_price_dashboard::data::model::{Column, Dataset, Value};
use house_price_dashboard::data::prepare::{prepare, ID_COLUMN};
use house_price_dashboard::data::remote::LocalSource;
use house_price_dashboard::data::split::split_seeded;
use house_price_dashboard::data::writer::{save_csv, TEST_FILE, TRAIN_FILE, VAL_FILE};
use house_price_dashboard::pipeline::{make_dataset, save_processed};
use house_price_dashboard::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn raw_houses(n: usize) -> Dataset {
    Dataset::new(vec![
        Column::new(ID_COLUMN, (1..=n as i64).map(Value::Integer).collect()),
        Column::new(
            "LotArea",
            (0..n).map(|i| Value::Integer(5_000 + (i as i64 * 37) % 9_000)).collect(),
        ),
        Column::new(
            "SalePrice",
            (0..n).map(|i| Value::Integer(100_000 + i as i64 * 250)).collect(),
        ),
    ])
    .unwrap()
}

#[test]
fn prepare_then_split_covers_every_row() {
    let prepared = prepare(&raw_houses(1000)).unwrap();
    let split = split_seeded(&prepared, 0.3, 42).unwrap();

    assert_eq!(split.remaining.height() + split.selected.height(), 1000);
    for part in [&split.remaining, &split.selected] {
        assert!(!part.has_column(ID_COLUMN));
        assert_eq!(part.column_names(), vec!["LotArea", "SalePrice"]);
    }
    // a 30% Bernoulli split of 1000 rows lands well inside this band
    assert!((200..400).contains(&split.selected.height()));
}

#[test]
fn seeded_runs_write_identical_files() {
    let prepared = prepare(&raw_houses(1000)).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut outputs = Vec::new();
    for run in 0..2 {
        let split = split_seeded(&prepared, 0.3, 42).unwrap();
        let path = dir.path().join(format!("train_{run}.csv"));
        save_csv(&split.remaining, &path).unwrap();
        outputs.push(std::fs::read(&path).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn make_dataset_from_local_directory() {
    let raw = tempfile::tempdir().unwrap();
    save_csv(&raw_houses(200), &raw.path().join("train.csv")).unwrap();
    let unlabelled = raw_houses(50).drop_column("SalePrice").unwrap();
    save_csv(&unlabelled, &raw.path().join("test.csv")).unwrap();

    let source = LocalSource::new(raw.path());
    let data = make_dataset(&source, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(data.train.height() + data.test.height(), 200);
    assert_eq!(data.val.height(), 50);
    assert_eq!(data.val.column_names(), vec!["LotArea"]);

    let out = tempfile::tempdir().unwrap();
    let paths = save_processed(&data, out.path()).unwrap();
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![TRAIN_FILE, TEST_FILE, VAL_FILE]);

    let reloaded = load_csv(&out.path().join(TRAIN_FILE)).unwrap();
    assert_eq!(reloaded, data.train);
}

#[test]
fn make_dataset_reports_missing_raw_data() {
    let empty = tempfile::tempdir().unwrap();
    let source = LocalSource::new(empty.path());
    let err = make_dataset(&source, 0.3, &mut StdRng::seed_from_u64(7)).unwrap_err();
    assert!(matches!(err, Error::DataUnavailable { .. }));
}

#[test]
fn invalid_ratio_is_rejected_before_writing() {
    let raw = tempfile::tempdir().unwrap();
    save_csv(&raw_houses(10), &raw.path().join("train.csv")).unwrap();
    save_csv(&raw_houses(10), &raw.path().join("test.csv")).unwrap();

    let source = LocalSource::new(raw.path());
    let err = make_dataset(&source, 1.5, &mut StdRng::seed_from_u64(7)).unwrap_err();
    assert!(matches!(err, Error::InvalidRatio(r) if r == 1.5));
}
