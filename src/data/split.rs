use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::dataset::Dataset;
use crate::error::{LrError, Result};

/// Shuffles `dataset` with a seeded RNG and holds out `test_size` of it.
///
/// The held-out count is `ceil(test_size * n)`, capped so at least one
/// training row remains. The same seed always yields the same split.
///
/// # Panics
/// Panics if `test_size` is outside `[0, 1)`.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    assert!(
        (0.0..1.0).contains(&test_size),
        "test_size must be in [0, 1), got {test_size}"
    );
    let n = dataset.len();
    if n == 0 {
        return Err(LrError::EmptyData("cannot split an empty dataset".into()));
    }

    let n_test = ((test_size * n as f64).ceil() as usize).min(n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let (test_idx, train_idx) = indices.split_at(n_test);
    let pick = |idx: &[usize]| Dataset::new(idx.iter().map(|&i| dataset.records[i]).collect());

    Ok((pick(train_idx), pick(test_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::template::template_dataset;

    #[test]
    fn holds_out_ceiling_fraction() {
        let ds = template_dataset();
        let (train, test) = train_test_split(&ds, 0.2, 42).unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn same_seed_same_split() {
        let ds = template_dataset();
        let a = train_test_split(&ds, 0.3, 7).unwrap();
        let b = train_test_split(&ds, 0.3, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn always_keeps_a_training_row() {
        let ds = Dataset::new(template_dataset().records[..1].to_vec());
        let (train, test) = train_test_split(&ds, 0.9, 1).unwrap();
        assert_eq!((train.len(), test.len()), (1, 0));
    }

    #[test]
    fn zero_test_size_keeps_everything() {
        let ds = template_dataset();
        let (train, test) = train_test_split(&ds, 0.0, 42).unwrap();
        assert_eq!((train.len(), test.len()), (10, 0));
    }
}
