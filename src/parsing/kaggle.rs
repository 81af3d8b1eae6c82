use std::path::Path;

use csv::ReaderBuilder;
use ndarray::{Array1, Array3};

use crate::error::{Error, Result};
use crate::parsing::Dataset;

/// The Kaggle mnist-in-csv distribution: a header line, then one sample per
/// row in the form `<label>,<pix 0,0>,...,<pix 27,27>`.
/// https://www.kaggle.com/datasets/oddrationale/mnist-in-csv
pub const ROWS: usize = 28;
pub const COLS: usize = 28;
const PIXELS: usize = ROWS * COLS;

const TRAIN_FILE: &str = "mnist_train.csv";
const TEST_FILE: &str = "mnist_test.csv";

/// Load the train and test sets from the two Kaggle CSV files in `dir`.
pub fn load(dir: &Path) -> Result<(Dataset, Dataset)> {
    let train = read_csv(&dir.join(TRAIN_FILE))?;
    let test = read_csv(&dir.join(TEST_FILE))?;

    Ok((train, test))
}

/// Read one CSV file into a [`Dataset`].
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;

    let mut pixels = Vec::new();
    let mut labels = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != PIXELS + 1 {
            return Err(Error::DataUnavailable(format!(
                "row {}: {} fields, want {}",
                row + 1,
                record.len(),
                PIXELS + 1
            )));
        }

        let label = parse_cell(&record[0], row)?;
        if label > 9 {
            return Err(Error::DataUnavailable(format!(
                "row {}: label {} is not a digit",
                row + 1,
                label
            )));
        }
        labels.push(label);

        for cell in record.iter().skip(1) {
            pixels.push(parse_cell(cell, row)?);
        }
    }

    let images = Array3::from_shape_vec((labels.len(), ROWS, COLS), pixels)
        .map_err(|e| Error::DataUnavailable(e.to_string()))?;

    Dataset::new(images, Array1::from_vec(labels))
}

fn parse_cell(cell: &str, row: usize) -> Result<u8> {
    cell.trim()
        .parse::<u8>()
        .map_err(|_| Error::DataUnavailable(format!("row {}: {:?} is not a byte", row + 1, cell)))
}
