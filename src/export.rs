//! Export Module
//! Writes a year-filtered slice of the cleaned table back out as CSV, for
//! use in spreadsheets or downstream scripts.

use crate::stats::filter_by_year_range;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Write rows whose year falls within `year_range` (inclusive) to
/// `cord19_filtered_{from}_{to}.csv` inside `out_dir`. Returns the path of
/// the file written.
pub fn write_filtered_csv(
    df: &DataFrame,
    year_range: (i32, i32),
    out_dir: &Path,
) -> crate::Result<PathBuf> {
    let (year_from, year_to) = year_range;
    let mut filtered = filter_by_year_range(df, year_from, year_to)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("cord19_filtered_{year_from}_{year_to}.csv"));
    let mut file = fs::File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut filtered)?;
    Ok(path)
}
