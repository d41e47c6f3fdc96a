//! CordScope - CORD-19 Research Metadata Explorer & Dashboard
//!
//! Loads research paper metadata from CSV (or a built-in sample dataset),
//! cleans it, and either writes a report with charts or opens an
//! interactive dashboard.

use anyhow::Result;
use clap::Parser;
use cordscope::charts::{render_all, ChartSet};
use cordscope::cli::{Cli, Command, DashboardArgs, ReportArgs};
use cordscope::gui::CordScopeApp;
use cordscope::report::{self, ReportSummary};
use cordscope::{
    clean, counts_by_year, export, filter_by_year_range, load, profile, source_distribution,
    summary_statistics, title_word_frequencies, title_word_stats, top_journals,
};
use eframe::egui;
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Command::Report(args) => run_report(&args),
        Command::Dashboard(args) => run_dashboard(args),
    }
}

/// Run the batch pipeline: load, clean, aggregate, render charts, and write
/// the report artifacts.
fn run_report(args: &ReportArgs) -> Result<()> {
    println!("=== CordScope Report ===\n");
    let start_time = Instant::now();
    let year_args = args.year_range()?;

    // Step 1: Load
    if args.verbose {
        println!("Step 1: Loading metadata");
        match &args.input {
            Some(path) => println!("  Input file: {}", path.display()),
            None => println!("  Input file: none, using the built-in sample dataset"),
        }
        if let Some(n) = args.sample_size {
            println!("  Sample size: {n}");
        }
    }

    let load_start = Instant::now();
    let loaded = load(args.input.as_deref(), args.sample_size);
    let table_profile = profile(&loaded.frame);
    println!(
        "✓ Data loaded: {} rows ({})",
        table_profile.rows,
        loaded.origin.describe()
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", load_start.elapsed().as_secs_f64());
        for col in table_profile.incomplete_columns() {
            println!("  Missing values in {}: {}", col.name, col.null_count);
        }
    }

    // Step 2: Clean
    if args.verbose {
        println!("\nStep 2: Cleaning");
    }
    let clean_start = Instant::now();
    let cleaned = clean(&loaded.frame)?;
    println!(
        "✓ Data cleaned: {} of {} rows kept",
        cleaned.report.rows_out, cleaned.report.rows_in
    );
    if args.verbose {
        println!("  Cleaning time: {:.2}s", clean_start.elapsed().as_secs_f64());
        println!(
            "  Dropped (missing title): {}",
            cleaned.report.dropped_missing_title
        );
        println!(
            "  Dropped (invalid date): {}",
            cleaned.report.dropped_invalid_date
        );
        println!("  Filled abstracts: {}", cleaned.report.filled_abstract);
        println!("  Filled journals: {}", cleaned.report.filled_journal);
    }

    // Step 3: Aggregate, optionally within the requested year window
    if args.verbose {
        println!("\nStep 3: Aggregating");
    }
    let year_window = match year_args {
        Some((from, to)) => {
            let bounds = summary_statistics(&cleaned.frame)?;
            Some((
                from.unwrap_or(bounds.year_min),
                to.unwrap_or(bounds.year_max),
            ))
        }
        None => None,
    };
    let frame = match year_window {
        Some((lo, hi)) => {
            println!("Applying year filter: {lo} - {hi}");
            filter_by_year_range(&cleaned.frame, lo, hi)?
        }
        None => cleaned.frame.clone(),
    };

    let summary = summary_statistics(&frame)?;
    let counts = counts_by_year(&frame, None)?;
    let journals = top_journals(&frame, args.top_n)?;
    let sources = source_distribution(&frame)?;
    let words = title_word_frequencies(&frame, args.top_n)?;
    let word_stats = title_word_stats(&frame)?;
    println!(
        "✓ Aggregates computed: {} papers across {} - {}",
        summary.total_papers, summary.year_min, summary.year_max
    );

    // Step 4: Charts
    if args.verbose {
        println!("\nStep 4: Rendering charts");
        println!("  Output directory: {}", args.out_dir.display());
    }
    let charts_start = Instant::now();
    let chart_set = ChartSet {
        years: &counts,
        journals: &journals,
        sources: sources.as_deref(),
        words: &words,
    };
    let chart_paths = render_all(&chart_set, &args.out_dir)?;
    println!("✓ Charts rendered: {} files", chart_paths.len());
    if !sources.as_deref().is_some_and(|s| !s.is_empty()) {
        println!("  Source chart skipped: the input has no source column");
    }
    if args.verbose {
        for path in &chart_paths {
            println!("  {}", path.display());
        }
        println!(
            "  Rendering time: {:.2}s",
            charts_start.elapsed().as_secs_f64()
        );
    }

    // Step 5: Report artifacts
    let report_summary = ReportSummary {
        generated_at: report::timestamp(),
        origin: loaded.origin.describe(),
        profile: table_profile,
        cleaning: cleaned.report.clone(),
        summary,
        title_words: word_stats,
        counts_by_year: counts,
        top_journals: journals,
        source_distribution: sources,
        frequent_words: words,
    };
    let report_path = report::write_text_report(&report_summary, &args.out_dir)?;
    let summary_path = report::write_json_summary(&report_summary, &args.out_dir)?;
    println!("✓ Report written: {}", report_path.display());
    println!("✓ Summary written: {}", summary_path.display());

    if args.export_csv {
        let (lo, hi) = year_window.unwrap_or((
            report_summary.summary.year_min,
            report_summary.summary.year_max,
        ));
        let csv_path = export::write_filtered_csv(&cleaned.frame, (lo, hi), &args.out_dir)?;
        println!("✓ Filtered CSV written: {}", csv_path.display());
    }

    println!("\n{}", report::render_text_report(&report_summary));

    println!("\n=== Report Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    println!("Artifacts saved to: {}", args.out_dir.display());

    Ok(())
}

/// Open the interactive dashboard.
fn run_dashboard(args: DashboardArgs) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("CordScope"),
        ..Default::default()
    };

    let DashboardArgs { input, sample_size } = args;
    eframe::run_native(
        "CordScope",
        options,
        Box::new(move |cc| Ok(Box::new(CordScopeApp::new(cc, input, sample_size)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start dashboard: {e}"))
}
