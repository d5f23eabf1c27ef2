#![deny(clippy::disallowed_method)]

//! Diagnostics for how evenly a hash function spreads keys across buckets,
//! plus a random-key workload generator for exercising one.

use std::num::NonZeroUsize;

use rand::Rng;
use thiserror::Error;


#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error("bucket index {index} out of range for {num_buckets} buckets")]
    IndexOutOfRange { index: usize, num_buckets: usize },
}

/// Scores the clustering of a sequence of bucket indices as
/// `Σ count[i]² / N − N / num_buckets`.
///
/// The score is 0.0 for a perfectly even spread and grows as keys pile
/// into fewer buckets, topping out at `N − N / num_buckets` when every
/// key shares one bucket. The subtracted term uses real division; the
/// formula this derives from divided in integer arithmetic, which
/// truncated the term to zero for any bucket count above one.
///
/// An empty index sequence scores 0.0.
pub fn clustering_score(
    indices: &[usize],
    num_buckets: NonZeroUsize,
) -> Result<f64, DistributionError> {
    if indices.is_empty() {
        return Ok(0.0);
    }
    let mut counts = vec![0usize; num_buckets.get()];
    for &index in indices {
        match counts.get_mut(index) {
            Some(count) => *count += 1,
            None => {
                return Err(DistributionError::IndexOutOfRange {
                    index,
                    num_buckets: num_buckets.get(),
                })
            }
        }
    }
    let n = indices.len() as f64;
    let sum_squares: usize = counts.iter().map(|&count| count * count).sum();
    Ok(sum_squares as f64 / n - n / num_buckets.get() as f64)
}

/// Generates `count` strings of `len` uniformly random lowercase ASCII
/// letters from a caller-owned random source, so workloads are
/// reproducible under a seeded generator.
pub fn random_strings<R: Rng + ?Sized>(rng: &mut R, count: usize, len: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            (0..len)
                .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
                .collect()
        })
        .collect()
}
