use std::path::Path;

use ndarray::{Array1, Array3, Axis};

use crate::error::{Error, Result};

pub mod kaggle;
pub mod mnist;

/// Which on-disk distribution of MNIST to read.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// The original IDX binary files (train-images-idx3-ubyte, ...)
    Idx,
    /// The Kaggle mnist-in-csv files (mnist_train.csv, mnist_test.csv)
    Csv,
}

/// A labeled image set: `images[i]` is the sample carrying `labels[i]`.
///
/// Pixels are kept as raw greyscale bytes, exactly as they appear on disk.
#[derive(Debug)]
pub struct Dataset {
    pub images: Array3<u8>,
    pub labels: Array1<u8>,
}

impl Dataset {
    /// Pair an image stack with its label vector.
    ///
    /// The counts must agree; loaders call this after decoding both files.
    pub fn new(images: Array3<u8>, labels: Array1<u8>) -> Result<Self> {
        if images.len_of(Axis(0)) != labels.len() {
            return Err(Error::DataUnavailable(format!(
                "{} images paired with {} labels",
                images.len_of(Axis(0)),
                labels.len()
            )));
        }

        Ok(Dataset { images, labels })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.images.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (rows, cols) of a single image.
    pub fn image_dims(&self) -> (usize, usize) {
        let shape = self.images.shape();
        (shape[1], shape[2])
    }
}

/// Load the train and test sets from `dir` in the given format.
pub fn load(dir: impl AsRef<Path>, format: SourceFormat) -> Result<(Dataset, Dataset)> {
    match format {
        SourceFormat::Idx => mnist::load(dir.as_ref()),
        SourceFormat::Csv => kaggle::load(dir.as_ref()),
    }
}
