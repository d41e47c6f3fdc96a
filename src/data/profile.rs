//! Table Profile Module
//! Pre-clean snapshot of a table: shape, dtypes, and missing counts.

use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    /// Columns that have at least one missing value, worst first.
    pub fn incomplete_columns(&self) -> Vec<&ColumnProfile> {
        let mut incomplete: Vec<&ColumnProfile> = self
            .columns
            .iter()
            .filter(|c| c.null_count > 0)
            .collect();
        incomplete.sort_by(|a, b| b.null_count.cmp(&a.null_count));
        incomplete
    }
}

/// Describe a table column by column.
pub fn profile(df: &DataFrame) -> TableProfile {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| ColumnProfile {
            name: col.name().to_string(),
            dtype: col.dtype().to_string(),
            null_count: col.null_count(),
        })
        .collect();

    TableProfile {
        rows: df.height(),
        columns,
    }
}
