//! Integration tests for CordScope

use cordscope::charts::{render_all, ChartSet};
use cordscope::data::{COL_JOURNAL, COL_TITLE, COL_YEAR};
use cordscope::report::{self, ReportSummary};
use cordscope::{
    clean, counts_by_year, filter_by_year_range, load, profile, source_distribution,
    summary_statistics, title_word_frequencies, title_word_stats, top_journals,
};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

/// Create a test CSV file with metadata rows, including dirty ones
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "cord_uid,title,abstract,authors,journal,publish_time,source_x"
    )
    .unwrap();

    // Clean rows across three years
    writeln!(
        file,
        "ua1,COVID-19 vaccine efficacy in adults,Large trial results,Smith J,Nature,2020-05-11,PMC"
    )
    .unwrap();
    writeln!(
        file,
        "ua2,Transmission dynamics of SARS-CoV-2,Model based study,Lee K,Science,2020-07-02,PMC"
    )
    .unwrap();

    // Missing abstract, gets filled with an empty string
    writeln!(file, "ua3,Long covid outcomes,,Chen L,Nature,2021-03-15,Medline").unwrap();

    // Missing journal, gets filled with the placeholder
    writeln!(
        file,
        "ua4,Mask usage and infection rates,Observational data,Park S,,2021-08-20,PMC"
    )
    .unwrap();

    // Missing title, dropped
    writeln!(file, "ua5,,No title here,Nobody,BMJ,2021-01-01,PMC").unwrap();

    // Unparseable date, dropped
    writeln!(
        file,
        "ua6,Strange date row,Some abstract,Kim H,JAMA,not-a-date,PMC"
    )
    .unwrap();

    writeln!(
        file,
        "ua7,Vaccine hesitancy survey,Cross sectional,Ng P,The Lancet,2022-02-28,bioRxiv"
    )
    .unwrap();
    writeln!(
        file,
        "ua8,Hospital capacity modelling,Simulation study,Diaz R,JAMA,2022-11-05,Medline"
    )
    .unwrap();

    file
}

#[test]
fn test_end_to_end_csv_pipeline() {
    let test_file = create_test_csv();

    let loaded = load(Some(test_file.path()), None);
    assert!(!loaded.origin.is_synthetic());
    assert_eq!(loaded.frame.height(), 8);

    let cleaned = clean(&loaded.frame).unwrap();
    assert_eq!(cleaned.report.rows_in, 8);
    assert_eq!(cleaned.report.rows_out, 6);
    assert_eq!(cleaned.report.dropped_missing_title, 1);
    assert_eq!(cleaned.report.dropped_invalid_date, 1);
    assert_eq!(cleaned.report.filled_abstract, 1);
    assert_eq!(cleaned.report.filled_journal, 1);

    let counts = counts_by_year(&cleaned.frame, None).unwrap();
    assert_eq!(counts.len(), 3);
    assert!(counts.iter().all(|c| c.count == 2));

    let journals = top_journals(&cleaned.frame, 10).unwrap();
    assert!(journals.iter().any(|j| j.journal == "Unknown Journal"));

    let sources = source_distribution(&cleaned.frame).unwrap().unwrap();
    assert_eq!(sources[0].source, "PMC");
    assert_eq!(sources[0].count, 3);

    let summary = summary_statistics(&cleaned.frame).unwrap();
    assert_eq!(summary.total_papers, 6);
    assert_eq!((summary.year_min, summary.year_max), (2020, 2022));
}

#[test]
fn test_sampling_is_deterministic() {
    let test_file = create_test_csv();

    let a = load(Some(test_file.path()), Some(4));
    let b = load(Some(test_file.path()), Some(4));

    assert_eq!(a.frame.height(), 4);
    assert!(a.frame.equals_missing(&b.frame));
}

#[test]
fn test_synthetic_pipeline_invariants() {
    let loaded = load(None, None);
    assert!(loaded.origin.is_synthetic());
    assert_eq!(loaded.frame.height(), 1000);

    let cleaned = clean(&loaded.frame).unwrap();
    assert_eq!(cleaned.report.rows_in, 1000);
    assert_eq!(cleaned.report.rows_out, 1000);

    // Every cleaned row satisfies the output contract.
    let titles = cleaned
        .frame
        .column(COL_TITLE)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .clone();
    for title in titles.into_iter() {
        let title = title.unwrap();
        assert!(!title.trim().is_empty());
    }

    let journals = cleaned
        .frame
        .column(COL_JOURNAL)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .clone();
    for journal in journals.into_iter() {
        assert!(!journal.unwrap().is_empty());
    }

    let years = cleaned
        .frame
        .column(COL_YEAR)
        .unwrap()
        .as_materialized_series()
        .i32()
        .unwrap()
        .clone();
    for year in years.into_iter() {
        assert!((2020..=2023).contains(&year.unwrap()));
    }

    let counts = counts_by_year(&cleaned.frame, None).unwrap();
    let total: u32 = counts.iter().map(|c| c.count).sum();
    assert_eq!(total as usize, 1000);
}

#[test]
fn test_filter_and_export_roundtrip() {
    let test_file = create_test_csv();
    let loaded = load(Some(test_file.path()), None);
    let cleaned = clean(&loaded.frame).unwrap();

    let filtered = filter_by_year_range(&cleaned.frame, 2021, 2022).unwrap();
    assert_eq!(filtered.height(), 4);

    let out_dir = tempdir().unwrap();
    let path =
        cordscope::export::write_filtered_csv(&cleaned.frame, (2021, 2022), out_dir.path())
            .unwrap();
    assert_eq!(path.file_name().unwrap(), "cord19_filtered_2021_2022.csv");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 5); // header + four rows
    assert!(raw.contains("Vaccine hesitancy survey"));
    assert!(!raw.contains("COVID-19 vaccine efficacy"));
}

#[test]
fn test_report_artifacts() {
    let loaded = load(None, None);
    let table_profile = profile(&loaded.frame);
    let cleaned = clean(&loaded.frame).unwrap();

    let summary = summary_statistics(&cleaned.frame).unwrap();
    let counts = counts_by_year(&cleaned.frame, None).unwrap();
    let journals = top_journals(&cleaned.frame, 10).unwrap();
    let sources = source_distribution(&cleaned.frame).unwrap();
    let words = title_word_frequencies(&cleaned.frame, 10).unwrap();

    let dir = tempdir().unwrap();
    let chart_set = ChartSet {
        years: &counts,
        journals: &journals,
        sources: sources.as_deref(),
        words: &words,
    };
    let chart_paths = render_all(&chart_set, dir.path()).unwrap();
    assert_eq!(chart_paths.len(), 4);
    for path in &chart_paths {
        assert!(path.exists());
    }

    let summary_report = ReportSummary {
        generated_at: report::timestamp(),
        origin: loaded.origin.describe(),
        profile: table_profile,
        cleaning: cleaned.report.clone(),
        summary,
        title_words: title_word_stats(&cleaned.frame).unwrap(),
        counts_by_year: counts,
        top_journals: journals,
        source_distribution: sources,
        frequent_words: words,
    };

    let report_path = report::write_text_report(&summary_report, dir.path()).unwrap();
    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("CORD-19 RESEARCH METADATA REPORT"));
    assert!(text.contains("Total papers: 1000"));

    let summary_path = report::write_json_summary(&summary_report, dir.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(value["summary"]["total_papers"], 1000);
    assert_eq!(value["cleaning"]["rows_out"], 1000);
}
