//! CordScope: analysis of CORD-19 style research paper metadata.
//!
//! The pipeline loads a metadata CSV (or falls back to a deterministic
//! synthetic dataset), cleans it into a stable column set, and computes
//! descriptive aggregates. Results are presented either as a batch report
//! with static charts or in an interactive egui dashboard.

pub mod charts;
pub mod cli;
pub mod data;
pub mod export;
pub mod gui;
pub mod report;
pub mod stats;

// Re-export public items for easier access
pub use cli::{Cli, Command};
pub use data::{clean, load, profile, CleanReport, CleanedTable, LoadedTable, TableOrigin};
pub use stats::{
    counts_by_year, filter_by_year_range, source_distribution, summary_statistics,
    title_word_frequencies, title_word_stats, top_journals, AggregateError, JournalCount,
    SourceCount, SummaryStats, WordCount, YearCount,
};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
