use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{LabError, Result};

/// Row indices of the training and holdout partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded ChaCha stream and hold out
/// `ceil(test_fraction * n)` rows, keeping at least one row on each side.
///
/// The same `(n, test_fraction, seed)` always yields the same partition.
pub fn holdout_split(n: usize, test_fraction: f64, seed: u64) -> Result<Split> {
    if n < 2 {
        return Err(LabError::InsufficientRows { rows: n });
    }

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    log::debug!("holdout split: {} train / {} test rows", train.len(), n_test);
    Ok(Split {
        train,
        test: indices,
    })
}
