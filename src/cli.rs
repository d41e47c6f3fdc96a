//! Command-line interface definitions and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CORD-19 research metadata explorer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the batch analysis and write report artifacts
    Report(ReportArgs),
    /// Open the interactive dashboard (default)
    Dashboard(DashboardArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Dashboard(DashboardArgs::default())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Path to the metadata CSV file; omit to use the built-in sample dataset
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Randomly sample this many rows from the input file
    #[arg(short, long)]
    pub sample_size: Option<usize>,

    /// Directory for charts, the text report, and the JSON summary
    #[arg(short, long, default_value = "cordscope_report")]
    pub out_dir: PathBuf,

    /// Number of journals to include in rankings
    #[arg(short = 'n', long, default_value = "10")]
    pub top_n: usize,

    /// Lower bound of the publication year filter (inclusive)
    #[arg(long)]
    pub year_from: Option<i32>,

    /// Upper bound of the publication year filter (inclusive)
    #[arg(long)]
    pub year_to: Option<i32>,

    /// Also write the filtered rows as a CSV file
    #[arg(long)]
    pub export_csv: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DashboardArgs {
    /// Path to the metadata CSV file; omit to use the built-in sample dataset
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Randomly sample this many rows from the input file
    #[arg(short, long)]
    pub sample_size: Option<usize>,
}

impl ReportArgs {
    /// Validate the optional year bounds.
    ///
    /// Returns `None` when neither bound is set. A single bound is allowed;
    /// the caller fills the missing side from the data's own year range.
    pub fn year_range(&self) -> crate::Result<Option<(Option<i32>, Option<i32>)>> {
        match (self.year_from, self.year_to) {
            (None, None) => Ok(None),
            (from, to) => {
                if let (Some(lo), Some(hi)) = (from, to) {
                    if lo > hi {
                        anyhow::bail!("--year-from ({lo}) must not exceed --year-to ({hi})");
                    }
                }
                Ok(Some((from, to)))
            }
        }
    }
}
