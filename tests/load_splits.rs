use std::fs;
use std::path::Path;

use ndarray::{Array1, Array3, Axis};
use rust_fedsplit::parsing::{mnist, SourceFormat};
use rust_fedsplit::partition::load_splits;
use rust_fedsplit::Error;

// Fixture images are 4x4 to keep files small; sample i is filled with the
// byte i and carries the label i % 10, so reorderings stay checkable.
const ROWS: usize = 4;
const COLS: usize = 4;

fn fixture(n: usize) -> (Array3<u8>, Array1<u8>) {
    let images = Array3::from_shape_fn((n, ROWS, COLS), |(i, _, _)| i as u8);
    let labels = Array1::from_shape_fn(n, |i| (i % 10) as u8);
    (images, labels)
}

fn write_idx_dir(dir: &Path, train_n: usize, test_n: usize) {
    let (train_images, train_labels) = fixture(train_n);
    let (test_images, test_labels) = fixture(test_n);

    fs::write(
        dir.join("train-images-idx3-ubyte"),
        mnist::encode_images(&train_images),
    )
    .unwrap();
    fs::write(
        dir.join("train-labels-idx1-ubyte"),
        mnist::encode_labels(&train_labels),
    )
    .unwrap();
    fs::write(
        dir.join("t10k-images-idx3-ubyte"),
        mnist::encode_images(&test_images),
    )
    .unwrap();
    fs::write(
        dir.join("t10k-labels-idx1-ubyte"),
        mnist::encode_labels(&test_labels),
    )
    .unwrap();
}

fn csv_rows(n: usize) -> String {
    let mut out = String::from("label");
    for p in 0..784 {
        out.push_str(&format!(",pixel{}", p));
    }
    out.push('\n');
    for i in 0..n {
        // pixel (0,0) identifies the sample
        out.push_str(&format!("{},{}{}\n", i % 10, i, ",0".repeat(783)));
    }
    out
}

fn write_csv_dir(dir: &Path, train_n: usize, test_n: usize) {
    fs::write(dir.join("mnist_train.csv"), csv_rows(train_n)).unwrap();
    fs::write(dir.join("mnist_test.csv"), csv_rows(test_n)).unwrap();
}

#[test]
fn equal_shards_and_untouched_test_set() {
    let dir = tempfile::tempdir().unwrap();
    write_idx_dir(dir.path(), 60, 10);

    let (shards, test) = load_splits(dir.path(), SourceFormat::Idx, 3, Some(99)).unwrap();

    assert_eq!(shards.len(), 3);
    for shard in &shards {
        assert_eq!(shard.len(), 20);
        assert_eq!(shard.image_dims(), (ROWS, COLS));
    }

    // The shards together hold every training sample exactly once.
    let mut seen: Vec<u8> = shards
        .iter()
        .flat_map(|shard| shard.images.axis_iter(Axis(0)).map(|img| img[[0, 0]]))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..60).map(|i| i as u8).collect::<Vec<_>>());

    // Pairings survive the shuffle: every image still carries its own label.
    for shard in &shards {
        for (img, label) in shard.images.axis_iter(Axis(0)).zip(shard.labels.iter()) {
            assert_eq!(img[[0, 0]] % 10, *label);
        }
    }

    // The held-out test set passes through unshuffled.
    let (test_images, test_labels) = fixture(10);
    assert_eq!(test.images, test_images);
    assert_eq!(test.labels, test_labels);
}

#[test]
fn same_seed_same_shards() {
    let dir = tempfile::tempdir().unwrap();
    write_idx_dir(dir.path(), 30, 5);

    let (a, _) = load_splits(dir.path(), SourceFormat::Idx, 3, Some(7)).unwrap();
    let (b, _) = load_splits(dir.path(), SourceFormat::Idx, 3, Some(7)).unwrap();

    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.images, y.images);
        assert_eq!(x.labels, y.labels);
    }
}

#[test]
fn uneven_shard_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_idx_dir(dir.path(), 100, 10);

    let err = load_splits(dir.path(), SourceFormat::Idx, 3, None).unwrap_err();
    assert!(matches!(err, Error::InvariantViolation(_)));
}

#[test]
fn zero_shards_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_idx_dir(dir.path(), 30, 5);

    let err = load_splits(dir.path(), SourceFormat::Idx, 0, None).unwrap_err();
    assert!(matches!(err, Error::InvariantViolation(_)));
}

#[test]
fn missing_directory_is_data_unavailable() {
    let err = load_splits("/definitely/not/here", SourceFormat::Idx, 3, None).unwrap_err();
    assert!(matches!(err, Error::DataUnavailable(_)));
}

#[test]
fn csv_source_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_csv_dir(dir.path(), 20, 4);

    let (shards, test) = load_splits(dir.path(), SourceFormat::Csv, 4, Some(3)).unwrap();

    assert_eq!(shards.len(), 4);
    for shard in &shards {
        assert_eq!(shard.len(), 5);
        assert_eq!(shard.image_dims(), (28, 28));
    }
    assert_eq!(test.len(), 4);

    let mut seen: Vec<u8> = shards
        .iter()
        .flat_map(|shard| shard.images.axis_iter(Axis(0)).map(|img| img[[0, 0]]))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..20).map(|i| i as u8).collect::<Vec<_>>());
}
