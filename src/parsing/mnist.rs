use std::fs;
use std::path::Path;

use ndarray::{Array1, Array3};

use crate::error::{Error, Result};
use crate::parsing::Dataset;

// The canonical IDX distribution of MNIST: four binary files, integers in
// big-endian order.
//
// Images: magic 2051 | count | rows | cols | one byte per pixel.
// Labels: magic 2049 | count | one byte per label.

const IMAGE_MAGIC: u32 = 2051;
const LABEL_MAGIC: u32 = 2049;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Load the train and test sets from the four standard IDX files in `dir`.
pub fn load(dir: &Path) -> Result<(Dataset, Dataset)> {
    let train = load_pair(dir, TRAIN_IMAGES, TRAIN_LABELS)?;
    let test = load_pair(dir, TEST_IMAGES, TEST_LABELS)?;

    Ok((train, test))
}

fn load_pair(dir: &Path, image_file: &str, label_file: &str) -> Result<Dataset> {
    let images = decode_images(&read_file(dir, image_file)?)?;
    let labels = decode_labels(&read_file(dir, label_file)?)?;

    Dataset::new(images, labels)
}

fn read_file(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    fs::read(&path).map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))
}

/// Decode an IDX image file into an `(n, rows, cols)` array.
pub fn decode_images(bytes: &[u8]) -> Result<Array3<u8>> {
    if bytes.len() < 16 {
        return Err(Error::DataUnavailable(
            "image file shorter than its header".to_string(),
        ));
    }

    let magic = be_u32(bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(Error::DataUnavailable(format!(
            "image magic {:#06x}, want {:#06x}",
            magic, IMAGE_MAGIC
        )));
    }

    let count = be_u32(bytes, 4) as usize;
    let rows = be_u32(bytes, 8) as usize;
    let cols = be_u32(bytes, 12) as usize;
    let payload = &bytes[16..];
    if payload.len() != count * rows * cols {
        return Err(Error::DataUnavailable(format!(
            "image payload holds {} bytes, header promises {}",
            payload.len(),
            count * rows * cols
        )));
    }

    Array3::from_shape_vec((count, rows, cols), payload.to_vec())
        .map_err(|e| Error::DataUnavailable(e.to_string()))
}

/// Decode an IDX label file.
pub fn decode_labels(bytes: &[u8]) -> Result<Array1<u8>> {
    if bytes.len() < 8 {
        return Err(Error::DataUnavailable(
            "label file shorter than its header".to_string(),
        ));
    }

    let magic = be_u32(bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(Error::DataUnavailable(format!(
            "label magic {:#06x}, want {:#06x}",
            magic, LABEL_MAGIC
        )));
    }

    let count = be_u32(bytes, 4) as usize;
    let payload = &bytes[8..];
    if payload.len() != count {
        return Err(Error::DataUnavailable(format!(
            "label payload holds {} bytes, header promises {}",
            payload.len(),
            count
        )));
    }

    Ok(Array1::from_vec(payload.to_vec()))
}

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Build IDX image bytes from an image stack. Used to produce fixture files.
pub fn encode_images(images: &Array3<u8>) -> Vec<u8> {
    let (n, rows, cols) = images.dim();
    let mut buf = Vec::with_capacity(16 + images.len());
    buf.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
    buf.extend_from_slice(&(n as u32).to_be_bytes());
    buf.extend_from_slice(&(rows as u32).to_be_bytes());
    buf.extend_from_slice(&(cols as u32).to_be_bytes());
    buf.extend(images.iter().copied());
    buf
}

/// Build IDX label bytes from a label vector. Used to produce fixture files.
pub fn encode_labels(labels: &Array1<u8>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + labels.len());
    buf.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
    buf.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    buf.extend(labels.iter().copied());
    buf
}
