//! Metadata Cleaner Module
//! Normalizes a raw metadata table into the stable column set the
//! aggregations and presentation layers rely on.

use crate::data::{
    COL_ABSTRACT, COL_ABSTRACT_WORDS, COL_AUTHORS, COL_ID, COL_JOURNAL, COL_PUBLISH_TIME,
    COL_SOURCE, COL_SOURCE_ALT, COL_TITLE, COL_TITLE_WORDS, COL_YEAR, UNKNOWN_JOURNAL,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// What happened while cleaning, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped_missing_title: usize,
    pub dropped_invalid_date: usize,
    pub filled_abstract: usize,
    pub filled_journal: usize,
}

/// A cleaned table plus the report describing how it got that way.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub frame: DataFrame,
    pub report: CleanReport,
}

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid year regex"));

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Clean a raw metadata table.
///
/// In order: rows without a usable title are dropped; missing abstracts
/// become empty strings and missing journals become [`UNKNOWN_JOURNAL`];
/// a `year` column is derived from `publish_time` and rows where no year
/// can be derived are dropped; title and abstract word counts are added.
/// Identifiers are generated as `rec_NNNNNN` where the input has none.
/// Cleaning an already-clean table changes nothing.
pub fn clean(raw: &DataFrame) -> Result<CleanedTable, CleanError> {
    let rows_in = raw.height();

    let ids = utf8_column(raw, COL_ID);
    let titles = utf8_column(raw, COL_TITLE);
    let abstracts = utf8_column(raw, COL_ABSTRACT);
    let authors = utf8_column(raw, COL_AUTHORS);
    let journals = utf8_column(raw, COL_JOURNAL);
    let publish = utf8_column(raw, COL_PUBLISH_TIME);
    let (source_name, sources) = source_column(raw);

    let mut report = CleanReport {
        rows_in,
        ..CleanReport::default()
    };

    let mut out_ids: Vec<String> = Vec::new();
    let mut out_titles: Vec<String> = Vec::new();
    let mut out_abstracts: Vec<String> = Vec::new();
    let mut out_authors: Vec<String> = Vec::new();
    let mut out_journals: Vec<String> = Vec::new();
    let mut out_publish: Vec<String> = Vec::new();
    let mut out_years: Vec<i32> = Vec::new();
    let mut out_title_words: Vec<u32> = Vec::new();
    let mut out_abstract_words: Vec<u32> = Vec::new();
    let mut out_sources: Vec<Option<String>> = Vec::new();

    for i in 0..rows_in {
        let title = get(&titles, i).map(str::trim).unwrap_or("");
        if title.is_empty() {
            report.dropped_missing_title += 1;
            continue;
        }

        let abstract_text = match get(&abstracts, i) {
            Some(text) => text.to_string(),
            None => {
                report.filled_abstract += 1;
                String::new()
            }
        };

        let journal = match get(&journals, i).map(str::trim).filter(|j| !j.is_empty()) {
            Some(journal) => journal.to_string(),
            None => {
                report.filled_journal += 1;
                UNKNOWN_JOURNAL.to_string()
            }
        };

        // The drop decision is made on the derived year, never on the raw
        // date string, so empty and corrupt dates fall under the same rule.
        let Some(year) = get(&publish, i).and_then(parse_year) else {
            report.dropped_invalid_date += 1;
            continue;
        };

        let id = match get(&ids, i).map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => format!("rec_{:06}", out_titles.len()),
        };

        out_title_words.push(word_count(title));
        out_abstract_words.push(word_count(&abstract_text));
        out_ids.push(id);
        out_titles.push(title.to_string());
        out_abstracts.push(abstract_text);
        out_authors.push(get(&authors, i).unwrap_or("").to_string());
        out_journals.push(journal);
        out_publish.push(get(&publish, i).unwrap_or("").to_string());
        out_years.push(year);
        if source_name.is_some() {
            out_sources.push(get(&sources, i).map(str::to_string));
        }
    }

    let mut columns = vec![
        Column::new(COL_ID.into(), out_ids),
        Column::new(COL_TITLE.into(), out_titles),
        Column::new(COL_ABSTRACT.into(), out_abstracts),
        Column::new(COL_AUTHORS.into(), out_authors),
        Column::new(COL_JOURNAL.into(), out_journals),
        Column::new(COL_PUBLISH_TIME.into(), out_publish),
        Column::new(COL_YEAR.into(), out_years),
        Column::new(COL_TITLE_WORDS.into(), out_title_words),
        Column::new(COL_ABSTRACT_WORDS.into(), out_abstract_words),
    ];
    if let Some(name) = source_name {
        columns.push(Column::new(name.into(), out_sources));
    }

    let frame = DataFrame::new(columns)?;
    report.rows_out = frame.height();

    Ok(CleanedTable { frame, report })
}

/// Derive a publication year from a raw date string.
///
/// Tries the common date and datetime layouts first; anything else with a
/// recognizable four-digit year (bare years, partial dates, odd locales)
/// resolves through the year literal it contains.
fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.year());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date().year());
        }
    }

    YEAR_RE.find(trimmed).and_then(|m| m.as_str().parse().ok())
}

fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Fetch a column as strings regardless of its loaded dtype.
fn utf8_column(df: &DataFrame, name: &str) -> Option<StringChunked> {
    let col = df.column(name).ok()?;
    let casted = col.cast(&DataType::String).ok()?;
    Some(casted.as_materialized_series().str().ok()?.clone())
}

fn source_column(df: &DataFrame) -> (Option<&'static str>, Option<StringChunked>) {
    for name in [COL_SOURCE, COL_SOURCE_ALT] {
        if let Some(ca) = utf8_column(df, name) {
            return (Some(name), Some(ca));
        }
    }
    (None, None)
}

fn get<'a>(column: &'a Option<StringChunked>, i: usize) -> Option<&'a str> {
    column.as_ref().and_then(|ca| ca.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic_frame;

    fn raw_three_rows() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                COL_TITLE.into(),
                vec![
                    Some("Covid vaccine".to_string()),
                    None,
                    Some("Immune response in patients".to_string()),
                ],
            ),
            Column::new(
                COL_ABSTRACT.into(),
                vec![None, Some("left behind".to_string()), None],
            ),
            Column::new(
                COL_JOURNAL.into(),
                vec![None, Some("Nature".to_string()), Some("Science".to_string())],
            ),
            Column::new(
                COL_PUBLISH_TIME.into(),
                vec![
                    Some("2021-03-01".to_string()),
                    Some("2020-01-01".to_string()),
                    Some("not-a-date".to_string()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_and_fill_rules() {
        let cleaned = clean(&raw_three_rows()).unwrap();

        assert_eq!(cleaned.report.rows_in, 3);
        assert_eq!(cleaned.report.rows_out, 1);
        assert_eq!(cleaned.report.dropped_missing_title, 1);
        assert_eq!(cleaned.report.dropped_invalid_date, 1);
        // Fills are applied to every row that still has a title, including
        // the one later dropped for its date.
        assert_eq!(cleaned.report.filled_abstract, 2);
        assert_eq!(cleaned.report.filled_journal, 1);

        let df = &cleaned.frame;
        assert_eq!(df.height(), 1);
        let titles = df.column(COL_TITLE).unwrap();
        let titles = titles.as_materialized_series().str().unwrap();
        assert_eq!(titles.get(0), Some("Covid vaccine"));
        let journals = df.column(COL_JOURNAL).unwrap();
        let journals = journals.as_materialized_series().str().unwrap();
        assert_eq!(journals.get(0), Some(UNKNOWN_JOURNAL));
        let years = df.column(COL_YEAR).unwrap();
        let years = years.as_materialized_series().i32().unwrap();
        assert_eq!(years.get(0), Some(2021));
        let words = df.column(COL_TITLE_WORDS).unwrap();
        let words = words.as_materialized_series().u32().unwrap();
        assert_eq!(words.get(0), Some(2));
        let abstract_words = df.column(COL_ABSTRACT_WORDS).unwrap();
        let abstract_words = abstract_words.as_materialized_series().u32().unwrap();
        assert_eq!(abstract_words.get(0), Some(0));
        let ids = df.column(COL_ID).unwrap();
        let ids = ids.as_materialized_series().str().unwrap();
        assert_eq!(ids.get(0), Some("rec_000000"));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = clean(&synthetic_frame()).unwrap();
        let twice = clean(&once.frame).unwrap();

        assert!(once.frame.equals(&twice.frame));
        assert_eq!(twice.report.rows_in, twice.report.rows_out);
        assert_eq!(twice.report.dropped_missing_title, 0);
        assert_eq!(twice.report.dropped_invalid_date, 0);
        assert_eq!(twice.report.filled_abstract, 0);
        assert_eq!(twice.report.filled_journal, 0);
    }

    #[test]
    fn test_whitespace_title_counts_as_missing() {
        let raw = DataFrame::new(vec![
            Column::new(COL_TITLE.into(), vec!["   ".to_string()]),
            Column::new(COL_PUBLISH_TIME.into(), vec!["2020-05-01".to_string()]),
        ])
        .unwrap();
        let cleaned = clean(&raw).unwrap();
        assert_eq!(cleaned.report.rows_out, 0);
        assert_eq!(cleaned.report.dropped_missing_title, 1);
    }

    #[test]
    fn test_missing_date_column_drops_all_rows() {
        let raw = DataFrame::new(vec![Column::new(
            COL_TITLE.into(),
            vec!["One".to_string(), "Two".to_string()],
        )])
        .unwrap();
        let cleaned = clean(&raw).unwrap();
        assert_eq!(cleaned.report.rows_out, 0);
        assert_eq!(cleaned.report.dropped_invalid_date, 2);
        // The stable column set is present even on an empty result.
        assert!(cleaned.frame.column(COL_YEAR).is_ok());
        assert!(cleaned.frame.column(COL_TITLE_WORDS).is_ok());
        assert_eq!(cleaned.frame.height(), 0);
    }

    #[test]
    fn test_date_format_variants() {
        assert_eq!(parse_year("2021-05-04"), Some(2021));
        assert_eq!(parse_year("2021/05/04"), Some(2021));
        assert_eq!(parse_year("2021-05-04T10:30:00"), Some(2021));
        assert_eq!(parse_year("2021-05-04 10:30:00"), Some(2021));
        assert_eq!(parse_year("2021"), Some(2021));
        assert_eq!(parse_year("May 2021"), Some(2021));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("not-a-date"), None);
        assert_eq!(parse_year("12/31/2023"), Some(2023));
    }

    #[test]
    fn test_existing_identifiers_pass_through() {
        let raw = DataFrame::new(vec![
            Column::new(COL_ID.into(), vec!["abc123".to_string()]),
            Column::new(COL_TITLE.into(), vec!["A title".to_string()]),
            Column::new(COL_PUBLISH_TIME.into(), vec!["2022-01-01".to_string()]),
        ])
        .unwrap();
        let cleaned = clean(&raw).unwrap();
        let ids = cleaned.frame.column(COL_ID).unwrap();
        let ids = ids.as_materialized_series().str().unwrap();
        assert_eq!(ids.get(0), Some("abc123"));
    }

    #[test]
    fn test_unknown_columns_are_not_carried() {
        let raw = DataFrame::new(vec![
            Column::new(COL_TITLE.into(), vec!["A title".to_string()]),
            Column::new(COL_PUBLISH_TIME.into(), vec!["2022-01-01".to_string()]),
            Column::new("who_covidence_id".into(), vec!["#441".to_string()]),
        ])
        .unwrap();
        let cleaned = clean(&raw).unwrap();
        assert!(cleaned.frame.column("who_covidence_id").is_err());
    }

    #[test]
    fn test_source_column_prefers_source_x() {
        let raw = DataFrame::new(vec![
            Column::new(COL_TITLE.into(), vec!["A title".to_string()]),
            Column::new(COL_PUBLISH_TIME.into(), vec!["2022-01-01".to_string()]),
            Column::new(COL_SOURCE.into(), vec!["PMC".to_string()]),
            Column::new(COL_SOURCE_ALT.into(), vec!["other".to_string()]),
        ])
        .unwrap();
        let cleaned = clean(&raw).unwrap();
        assert!(cleaned.frame.column(COL_SOURCE).is_ok());
        assert!(cleaned.frame.column(COL_SOURCE_ALT).is_err());
    }

    #[test]
    fn test_alternate_source_name_is_kept() {
        let raw = DataFrame::new(vec![
            Column::new(COL_TITLE.into(), vec!["A title".to_string()]),
            Column::new(COL_PUBLISH_TIME.into(), vec!["2022-01-01".to_string()]),
            Column::new(COL_SOURCE_ALT.into(), vec!["Medline".to_string()]),
        ])
        .unwrap();
        let cleaned = clean(&raw).unwrap();
        assert!(cleaned.frame.column(COL_SOURCE_ALT).is_ok());
    }
}
