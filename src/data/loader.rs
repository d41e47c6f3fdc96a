//! Metadata Loader Module
//! Loads the CORD-19 metadata CSV with Polars, with an optional seeded
//! row sample and a synthetic fallback so callers always receive a table.

use crate::data::synthetic;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Seed for the uniform row sample, so repeated loads agree.
const SAMPLE_SEED: u64 = 42;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("CSV contained no rows")]
    Empty,
}

/// Why the loader fell back to the synthetic dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntheticReason {
    /// No input path was given.
    NoPathGiven,
    /// The file could not be read; the message describes the failure.
    LoadFailed(String),
}

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TableOrigin {
    File { path: PathBuf, sampled: bool },
    Synthetic { reason: SyntheticReason },
}

impl TableOrigin {
    /// One-line description for status lines and reports.
    pub fn describe(&self) -> String {
        match self {
            TableOrigin::File { path, sampled } => {
                if *sampled {
                    format!("sampled from {}", path.display())
                } else {
                    format!("loaded from {}", path.display())
                }
            }
            TableOrigin::Synthetic {
                reason: SyntheticReason::NoPathGiven,
            } => "built-in sample dataset (no input file given)".to_string(),
            TableOrigin::Synthetic {
                reason: SyntheticReason::LoadFailed(msg),
            } => format!("built-in sample dataset (load failed: {msg})"),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, TableOrigin::Synthetic { .. })
    }
}

/// A raw table plus a record of where it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub frame: DataFrame,
    pub origin: TableOrigin,
}

/// Load the metadata table.
///
/// With a path, reads the CSV and optionally retains a uniform random sample
/// of `sample_size` rows (seeded, drawn without replacement, original row
/// order preserved). Without a path, or when the read fails, returns the
/// deterministic synthetic dataset instead; this function never errors.
pub fn load(path: Option<&Path>, sample_size: Option<usize>) -> LoadedTable {
    let Some(path) = path else {
        return synthetic_table(SyntheticReason::NoPathGiven);
    };

    match load_csv(path, sample_size) {
        Ok((frame, sampled)) => LoadedTable {
            frame,
            origin: TableOrigin::File {
                path: path.to_path_buf(),
                sampled,
            },
        },
        Err(e) => synthetic_table(SyntheticReason::LoadFailed(e.to_string())),
    }
}

fn synthetic_table(reason: SyntheticReason) -> LoadedTable {
    LoadedTable {
        frame: synthetic::synthetic_frame(),
        origin: TableOrigin::Synthetic { reason },
    }
}

fn load_csv(path: &Path, sample_size: Option<usize>) -> Result<(DataFrame, bool), LoaderError> {
    let path_str = path.to_string_lossy().to_string();

    // Schema inference runs over the first 10k rows; malformed rows are skipped
    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    if df.height() == 0 {
        return Err(LoaderError::Empty);
    }

    match sample_size {
        Some(n) if n < df.height() => {
            let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
            let sampled = sample_rows(&df, n, &mut rng)?;
            Ok((sampled, true))
        }
        _ => Ok((df, false)),
    }
}

/// Take `n` distinct rows, keeping their original order.
fn sample_rows(df: &DataFrame, n: usize, rng: &mut StdRng) -> Result<DataFrame, LoaderError> {
    let mut picks = rand::seq::index::sample(rng, df.height(), n).into_vec();
    picks.sort_unstable();
    let indices: Vec<IdxSize> = picks.into_iter().map(|i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("sample".into(), indices);
    Ok(df.take(&idx)?)
}
