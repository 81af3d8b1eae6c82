use clap::Parser;
use json::object;
use rust_fedsplit::parsing::{Dataset, SourceFormat};
use rust_fedsplit::{parsing, partition};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the MNIST files
    #[arg(short, long)]
    data_dir: PathBuf,

    /// On-disk format of the dataset
    #[arg(short, long, value_enum, default_value = "idx")]
    format: SourceFormat,

    /// Number of equally-sized client shards to cut the training set into
    #[arg(short, long, default_value_t = 3)]
    num_splits: usize,

    /// Seed for the shuffle permutation
    /// If this parameter is not provided, the permutation is non-deterministic
    #[arg(short, long, default_value = None)]
    seed: Option<u64>,

    /// Where to write a JSON summary of the produced shards
    #[arg(short = 'o', long, default_value = None)]
    summary_path: Option<String>,
}

/// Print the shape of a dataset the way numpy would report it
fn report(dataset: &Dataset) {
    let (rows, cols) = dataset.image_dims();
    println!("\timages: ({}, {}, {})", dataset.len(), rows, cols);
    println!("\tlabels: ({},)", dataset.len());
}

/// Write the shard layout in JSON format
/// The keys are e.g. shard_0, shard_1. The values are per-shard sample counts
fn write_summary(
    path: &str,
    shards: &[Dataset],
    test: &Dataset,
    seed: Option<u64>,
) -> std::io::Result<()> {
    let mut data = object! {};
    let mut file = File::create(path)?;

    data["num_splits"] = shards.len().into();
    if let Some(seed) = seed {
        data["seed"] = seed.into();
    }
    for (i, shard) in shards.iter().enumerate() {
        let key = format!("shard_{}", i);
        data[key] = shard.len().into();
    }
    data["test"] = test.len().into();

    file.write_all(data.dump().as_bytes())?;

    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (train, test) = parsing::load(&args.data_dir, args.format)?;
    println!("Training set before split:");
    report(&train);

    let (images, labels) = partition::shuffle(&train.images, &train.labels, args.seed)?;
    let train = Dataset { images, labels };
    println!("Training set after shuffle:");
    report(&train);

    let (image_shards, label_shards) =
        partition::split(&train.images, &train.labels, args.num_splits)?;
    let shards: Vec<Dataset> = image_shards
        .into_iter()
        .zip(label_shards)
        .map(|(images, labels)| Dataset { images, labels })
        .collect();

    println!("Training set after split:");
    for (i, shard) in shards.iter().enumerate() {
        let (rows, cols) = shard.image_dims();
        println!("\t{} images: ({}, {}, {})", i, shard.len(), rows, cols);
        println!("\t{} labels: ({},)", i, shard.len());
    }

    println!("Test set:");
    report(&test);

    if let Some(path) = &args.summary_path {
        write_summary(path, &shards, &test, args.seed)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
