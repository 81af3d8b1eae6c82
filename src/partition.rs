use std::path::Path;

use ndarray::{Array, Array1, Axis, RemoveAxis, Slice};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::parsing::{self, Dataset, SourceFormat};

/// Reorder `samples` and `labels` with one shared random permutation.
///
/// `Axis(0)` is the sample axis; any element type and dimensionality works.
/// With `seed` given the permutation is reproducible; with `None` it is
/// drawn from OS entropy. Every (sample, label) pair of the input appears
/// exactly once in the output.
pub fn shuffle<A, B, D>(
    samples: &Array<A, D>,
    labels: &Array1<B>,
    seed: Option<u64>,
) -> Result<(Array<A, D>, Array1<B>)>
where
    A: Clone,
    B: Clone,
    D: RemoveAxis,
{
    let n = samples.len_of(Axis(0));
    if n != labels.len() {
        return Err(Error::InvariantViolation(format!(
            "{} samples paired with {} labels",
            n,
            labels.len()
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    order.shuffle(&mut rng);

    Ok((samples.select(Axis(0), &order), labels.select(Axis(0), &order)))
}

/// Cut `samples` and `labels` into `num_splits` contiguous equal shards.
///
/// Relative order within each shard is preserved, so concatenating the
/// shards in order reproduces the input. The sample count must divide
/// evenly into `num_splits`.
pub fn split<A, B, D>(
    samples: &Array<A, D>,
    labels: &Array1<B>,
    num_splits: usize,
) -> Result<(Vec<Array<A, D>>, Vec<Array1<B>>)>
where
    A: Clone,
    B: Clone,
    D: RemoveAxis,
{
    let n = samples.len_of(Axis(0));
    if num_splits == 0 {
        return Err(Error::InvariantViolation(
            "cannot split into 0 shards".to_string(),
        ));
    }
    if n != labels.len() {
        return Err(Error::InvariantViolation(format!(
            "{} samples paired with {} labels",
            n,
            labels.len()
        )));
    }
    if n % num_splits != 0 {
        return Err(Error::InvariantViolation(format!(
            "{} samples do not divide into {} equal shards",
            n, num_splits
        )));
    }

    let per_shard = n / num_splits;
    if per_shard == 0 {
        // n == 0: every shard is an empty slice of the right shape.
        let samples_out = (0..num_splits)
            .map(|_| samples.slice_axis(Axis(0), Slice::from(0..0)).to_owned())
            .collect();
        let labels_out = (0..num_splits)
            .map(|_| labels.slice_axis(Axis(0), Slice::from(0..0)).to_owned())
            .collect();
        return Ok((samples_out, labels_out));
    }

    let samples_out = samples
        .axis_chunks_iter(Axis(0), per_shard)
        .map(|chunk| chunk.to_owned())
        .collect();
    let labels_out = labels
        .axis_chunks_iter(Axis(0), per_shard)
        .map(|chunk| chunk.to_owned())
        .collect();

    Ok((samples_out, labels_out))
}

/// Load MNIST, shuffle the training set, and cut it into `num_splits`
/// client shards. The held-out test set is returned untouched.
pub fn load_splits(
    dir: impl AsRef<Path>,
    format: SourceFormat,
    num_splits: usize,
    seed: Option<u64>,
) -> Result<(Vec<Dataset>, Dataset)> {
    let (train, test) = parsing::load(dir, format)?;

    // Fail before shuffling: a shard count that does not divide the
    // training set is a usage error, not something to degrade around.
    if num_splits == 0 || train.len() % num_splits != 0 {
        return Err(Error::InvariantViolation(format!(
            "{} training samples do not divide into {} equal shards",
            train.len(),
            num_splits
        )));
    }

    let (images, labels) = shuffle(&train.images, &train.labels, seed)?;
    let (image_shards, label_shards) = split(&images, &labels, num_splits)?;

    let shards = image_shards
        .into_iter()
        .zip(label_shards)
        .map(|(images, labels)| Dataset { images, labels })
        .collect();

    Ok((shards, test))
}
