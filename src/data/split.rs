use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::model::Dataset;
use crate::error::{Error, Result};

/// Default probability that a row lands in the selected (held-out) subset.
pub const DEFAULT_TEST_RATIO: f64 = 0.30;

/// Two disjoint datasets covering every source row.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    /// Rows whose draw was `>= ratio`.
    pub remaining: Dataset,
    /// Rows whose draw was `< ratio`.
    pub selected: Dataset,
}

/// One independent uniform draw per row; `true` means selected.
///
/// The number of selected rows is Binomial(n, ratio), not `ratio * n`.
pub fn split_mask<R: Rng + ?Sized>(n: usize, ratio: f64, rng: &mut R) -> Result<Vec<bool>> {
    check_ratio(ratio)?;
    Ok((0..n).map(|_| rng.gen::<f64>() < ratio).collect())
}

/// Partition `dataset` by a per-row Bernoulli draw. Column order and the
/// relative row order are preserved in both outputs.
pub fn split_dataset<R: Rng + ?Sized>(
    dataset: &Dataset,
    ratio: f64,
    rng: &mut R,
) -> Result<SplitResult> {
    let mask = split_mask(dataset.height(), ratio, rng)?;
    let (remaining, selected) = dataset.partition(&mask)?;
    log::debug!(
        "Split {} rows at ratio {ratio}: {} remaining, {} selected",
        dataset.height(),
        remaining.height(),
        selected.height()
    );
    Ok(SplitResult {
        remaining,
        selected,
    })
}

/// [`split_dataset`] driven by a `StdRng` seeded from `seed`.
pub fn split_seeded(dataset: &Dataset, ratio: f64, seed: u64) -> Result<SplitResult> {
    split_dataset(dataset, ratio, &mut StdRng::seed_from_u64(seed))
}

// [0, 1] is accepted so that 0 and 1 give the degenerate all/none splits.
fn check_ratio(ratio: f64) -> Result<()> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(Error::InvalidRatio(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};
    use proptest::prelude::*;

    fn numbered(n: usize) -> Dataset {
        Dataset::new(vec![
            Column::new("row", (0..n as i64).map(Value::Integer).collect()),
            Column::new("SalePrice", (0..n).map(|i| Value::Float(i as f64 * 1.5)).collect()),
        ])
        .unwrap()
    }

    fn row_ids(ds: &Dataset) -> Vec<i64> {
        ds.column("row")
            .unwrap()
            .values
            .iter()
            .map(|v| match v {
                Value::Integer(i) => *i,
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn empty_dataset_splits_into_two_empties() {
        let split = split_seeded(&numbered(0), 0.3, 1).unwrap();
        assert!(split.remaining.is_empty());
        assert!(split.selected.is_empty());
        assert_eq!(split.selected.column_names(), vec!["row", "SalePrice"]);
    }

    #[test]
    fn zero_ratio_selects_nothing() {
        let split = split_seeded(&numbered(50), 0.0, 3).unwrap();
        assert!(split.selected.is_empty());
        assert_eq!(split.remaining.height(), 50);
    }

    #[test]
    fn unit_ratio_selects_everything() {
        let split = split_seeded(&numbered(50), 1.0, 3).unwrap();
        assert!(split.remaining.is_empty());
        assert_eq!(split.selected.height(), 50);
    }

    #[test]
    fn out_of_range_ratios_are_rejected() {
        for ratio in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                split_seeded(&numbered(5), ratio, 0),
                Err(Error::InvalidRatio(_))
            ));
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let ds = numbered(200);
        assert_eq!(split_seeded(&ds, 0.3, 42).unwrap(), split_seeded(&ds, 0.3, 42).unwrap());
    }

    #[test]
    fn selected_fraction_tracks_ratio() {
        let ds = numbered(1000);
        for seed in 0..5 {
            let split = split_seeded(&ds, 0.3, seed).unwrap();
            let frac = split.selected.height() as f64 / 1000.0;
            assert!((0.25..=0.35).contains(&frac), "seed {seed}: fraction {frac}");
        }
    }

    #[test]
    fn mask_follows_the_draws() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let mask = split_mask(100, 0.4, &mut a).unwrap();
        let expected: Vec<bool> = (0..100).map(|_| b.gen::<f64>() < 0.4).collect();
        assert_eq!(mask, expected);
    }

    proptest! {
        #[test]
        fn split_is_a_partition(n in 0usize..300, ratio in 0.0f64..=1.0, seed in any::<u64>()) {
            let ds = numbered(n);
            let split = split_seeded(&ds, ratio, seed).unwrap();
            let rest = row_ids(&split.remaining);
            let picked = row_ids(&split.selected);

            prop_assert_eq!(rest.len() + picked.len(), n);
            prop_assert!(rest.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));

            let mut all: Vec<i64> = rest.iter().chain(&picked).copied().collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..n as i64).collect::<Vec<_>>());
        }
    }
}
