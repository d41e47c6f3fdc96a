//! Report Module
//! Renders the analysis results as a plain-text report and a JSON summary.
//! Both files land in the report output directory next to the chart PNGs.

use crate::data::{CleanReport, TableProfile};
use crate::stats::{JournalCount, SourceCount, SummaryStats, TitleWordStats, WordCount, YearCount};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "report.txt";
pub const SUMMARY_FILE: &str = "summary.json";

/// Everything the report needs, gathered once so the text and JSON outputs
/// always agree.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub generated_at: String,
    pub origin: String,
    pub profile: TableProfile,
    pub cleaning: CleanReport,
    pub summary: SummaryStats,
    pub title_words: TitleWordStats,
    pub counts_by_year: Vec<YearCount>,
    pub top_journals: Vec<JournalCount>,
    pub source_distribution: Option<Vec<SourceCount>>,
    pub frequent_words: Vec<WordCount>,
}

/// Local wall-clock timestamp used in report headers.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn render_text_report(report: &ReportSummary) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(60));
    lines.push("CORD-19 RESEARCH METADATA REPORT".to_string());
    lines.push("=".repeat(60));
    lines.push(format!("Generated: {}", report.generated_at));
    lines.push(format!("Data source: {}", report.origin));
    lines.push(String::new());

    lines.push("--- Dataset Profile ---".to_string());
    lines.push(format!("Rows loaded: {}", report.profile.rows));
    lines.push(format!("Columns: {}", report.profile.columns.len()));
    let incomplete = report.profile.incomplete_columns();
    if !incomplete.is_empty() {
        lines.push("Columns with missing values:".to_string());
        for col in incomplete {
            lines.push(format!(
                "  {} ({}): {} missing",
                col.name, col.dtype, col.null_count
            ));
        }
    }
    lines.push(String::new());

    lines.push("--- Cleaning Summary ---".to_string());
    let c = &report.cleaning;
    lines.push(format!("Rows in: {}", c.rows_in));
    lines.push(format!("Rows out: {}", c.rows_out));
    lines.push(format!(
        "Dropped (missing title): {}",
        c.dropped_missing_title
    ));
    lines.push(format!("Dropped (invalid date): {}", c.dropped_invalid_date));
    lines.push(format!("Filled abstracts: {}", c.filled_abstract));
    lines.push(format!("Filled journals: {}", c.filled_journal));
    lines.push(String::new());

    lines.push("--- Key Findings ---".to_string());
    let s = &report.summary;
    lines.push(format!("Total papers: {}", s.total_papers));
    lines.push(format!("Year range: {} - {}", s.year_min, s.year_max));
    lines.push(format!("Distinct journals: {}", s.distinct_journals));
    lines.push(format!(
        "Top journal: {} ({} papers)",
        s.top_journal.journal, s.top_journal.count
    ));
    lines.push(format!(
        "Peak year: {} ({} papers)",
        s.peak_year.year, s.peak_year.count
    ));
    lines.push(format!(
        "Title length (words): mean {:.1}, median {:.1}, std {:.1}",
        report.title_words.mean, report.title_words.median, report.title_words.std_dev
    ));
    lines.push(String::new());

    lines.push("--- Publications by Year ---".to_string());
    let total_years: u32 = report.counts_by_year.iter().map(|y| y.count).sum();
    for yc in &report.counts_by_year {
        let pct = if total_years > 0 {
            yc.count as f64 / total_years as f64 * 100.0
        } else {
            0.0
        };
        lines.push(format!("  {}: {} papers ({:.1}%)", yc.year, yc.count, pct));
    }
    lines.push(String::new());

    lines.push("--- Top Journals ---".to_string());
    for (i, jc) in report.top_journals.iter().enumerate() {
        lines.push(format!("  {:>2}. {} ({} papers)", i + 1, jc.journal, jc.count));
    }
    lines.push(String::new());

    lines.push("--- Source Distribution ---".to_string());
    match &report.source_distribution {
        Some(sources) if !sources.is_empty() => {
            let total: u32 = sources.iter().map(|s| s.count).sum();
            for sc in sources {
                let pct = if total > 0 {
                    sc.count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                lines.push(format!("  {}: {} papers ({:.1}%)", sc.source, sc.count, pct));
            }
        }
        _ => lines.push("  Source information not available".to_string()),
    }
    lines.push(String::new());

    lines.push("--- Frequent Title Words ---".to_string());
    for wc in &report.frequent_words {
        lines.push(format!("  {}: {}", wc.word, wc.count));
    }
    lines.push(String::new());

    lines.join("\n")
}

/// Write the plain-text report into `out_dir`, returning the file path.
pub fn write_text_report(report: &ReportSummary, out_dir: &Path) -> crate::Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(REPORT_FILE);
    fs::write(&path, render_text_report(report))?;
    Ok(path)
}

/// Write the machine-readable JSON summary into `out_dir`, returning the
/// file path.
pub fn write_json_summary(report: &ReportSummary, out_dir: &Path) -> crate::Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;
    Ok(path)
}
