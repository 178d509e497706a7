//! CRAG dataset preparation: JSON splits in, parquet training files out.

pub mod hdfs;
pub mod output;
pub mod record;

pub use record::{CragExample, TrainingRecord};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const TRAIN_FILE: &str = "task1_split_0_no_link.json";
pub const VALIDATION_FILE: &str = "task1_split_1_no_link.json";

/// Options for a `prepare` run.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Directory holding the raw splits; outputs are written here too.
    pub local_dir: PathBuf,
    /// Optional mirror location (hdfs:// or local path).
    pub hdfs_dir: Option<String>,
    pub train_size: Option<usize>,
    pub val_size: Option<usize>,
    /// Seed for reproducible sampling.
    pub seed: Option<u64>,
}

/// Row counts written by a `prepare` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareSummary {
    pub train_rows: usize,
    pub validation_rows: usize,
}

const PREVIEW_CHARS: usize = 500;

/// Read a CRAG split as raw JSON objects.
pub fn load_raw_split(path: &Path) -> Result<Vec<serde_json::Value>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {} as a JSON array", path.display()))
}

/// Load a CRAG split (a JSON array of objects).
pub fn load_split(path: &Path) -> Result<Vec<CragExample>> {
    Ok(load_raw_split(path)?.iter().map(CragExample::from_json).collect())
}

/// Pretty-printed JSON of a raw record, cut to the first 500 characters.
pub fn preview(record: &serde_json::Value) -> Result<String> {
    let pretty = serde_json::to_string_pretty(record)?;
    Ok(pretty.chars().take(PREVIEW_CHARS).collect())
}

/// Draw `size` rows without replacement. `None` keeps every row in order.
pub fn sample_rows<T: Clone, R: Rng + ?Sized>(rows: &[T], size: Option<usize>, rng: &mut R) -> Vec<T> {
    let Some(size) = size else {
        return rows.to_vec();
    };
    let amount = if size > rows.len() {
        warn!(
            "Requested {} samples but only {} rows are available; keeping all",
            size,
            rows.len()
        );
        rows.len()
    } else {
        size
    };

    rand::seq::index::sample(rng, rows.len(), amount)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect()
}

/// Map a sampled split into training records, indexed by position.
pub fn to_records(examples: &[CragExample], split: &str) -> Vec<TrainingRecord> {
    examples
        .iter()
        .enumerate()
        .map(|(idx, ex)| TrainingRecord::from_example(ex, split, idx))
        .collect()
}

/// Run the full preparation job.
pub fn prepare(opts: &PrepareOptions) -> Result<PrepareSummary> {
    std::fs::create_dir_all(&opts.local_dir)
        .with_context(|| format!("Failed to create {}", opts.local_dir.display()))?;

    let train_raw = load_raw_split(&opts.local_dir.join(TRAIN_FILE))?;
    let validation = load_split(&opts.local_dir.join(VALIDATION_FILE))?;
    info!(
        "Loaded {} train / {} validation examples",
        train_raw.len(),
        validation.len()
    );

    if let Some(first) = train_raw.first() {
        info!("Sample data structure: {}...", preview(first)?);
    }
    let train: Vec<CragExample> = train_raw.iter().map(CragExample::from_json).collect();

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let train = sample_rows(&train, opts.train_size, &mut rng);
    let validation = sample_rows(&validation, opts.val_size, &mut rng);

    let train_records = to_records(&train, "train");
    let validation_records = to_records(&validation, "validation");

    output::write_records(&train_records, &opts.local_dir.join("train.parquet"))?;
    output::write_records(&validation_records, &opts.local_dir.join("validation.parquet"))?;
    info!(
        "Wrote {} train / {} validation records to {}",
        train_records.len(),
        validation_records.len(),
        opts.local_dir.display()
    );

    if let Some(hdfs_dir) = &opts.hdfs_dir {
        hdfs::makedirs(hdfs_dir)?;
        hdfs::copy(&opts.local_dir, hdfs_dir)?;
    }

    Ok(PrepareSummary {
        train_rows: train_records.len(),
        validation_rows: validation_records.len(),
    })
}
