//! Aggregation Module
//! Pure descriptive statistics over a cleaned metadata table. Every function
//! recomputes from the frame it is given; nothing here caches.

use crate::data::{COL_JOURNAL, COL_SOURCE, COL_SOURCE_ALT, COL_TITLE, COL_TITLE_WORDS, COL_YEAR};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("column '{0}' not found; run the cleaning step first")]
    MissingColumn(&'static str),
    #[error("the table has no rows")]
    EmptyTable,
    #[error("top_n must be at least 1")]
    InvalidTopN,
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalCount {
    pub journal: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

/// Headline numbers for a cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_papers: usize,
    pub year_min: i32,
    pub year_max: i32,
    pub distinct_journals: usize,
    pub top_journal: JournalCount,
    pub peak_year: YearCount,
    pub mean_title_words: f64,
}

/// Descriptive statistics of the title word counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleWordStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

static TOKEN_CLEANUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid token regex"));

const STOPWORDS: [&str; 24] = [
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "this", "to", "was", "were", "will", "with",
];

/// Papers per publication year, ascending, optionally limited to an
/// inclusive year range.
pub fn counts_by_year(
    df: &DataFrame,
    year_range: Option<(i32, i32)>,
) -> Result<Vec<YearCount>, AggregateError> {
    let years = int_column(df, COL_YEAR)?;

    let mut counts: BTreeMap<i32, u32> = BTreeMap::new();
    for year in years.into_iter().flatten() {
        if let Some((lo, hi)) = year_range {
            if year < lo || year > hi {
                continue;
            }
        }
        *counts.entry(year).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect())
}

/// The `top_n` most frequent journals, descending by count. Journals with
/// equal counts keep the order they first appear in the table.
pub fn top_journals(df: &DataFrame, top_n: usize) -> Result<Vec<JournalCount>, AggregateError> {
    if top_n == 0 {
        return Err(AggregateError::InvalidTopN);
    }

    let journals = str_column(df, COL_JOURNAL)?;
    let mut entries = count_first_seen(journals.into_iter().flatten());
    entries.truncate(top_n);

    Ok(entries
        .into_iter()
        .map(|(journal, count)| JournalCount { journal, count })
        .collect())
}

/// Papers per source, descending. Returns `Ok(None)` when the table carries
/// no source column at all, so callers can tell "no data" from "none loaded".
pub fn source_distribution(df: &DataFrame) -> Result<Option<Vec<SourceCount>>, AggregateError> {
    let name = [COL_SOURCE, COL_SOURCE_ALT]
        .into_iter()
        .find(|name| df.column(name).is_ok());
    let Some(name) = name else {
        return Ok(None);
    };

    let sources = str_column(df, name)?;
    let entries = count_first_seen(
        sources
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty()),
    );

    Ok(Some(
        entries
            .into_iter()
            .map(|(source, count)| SourceCount { source, count })
            .collect(),
    ))
}

/// Headline statistics; errors on an empty table. Callers wanting a year
/// window apply [`filter_by_year_range`] first.
pub fn summary_statistics(df: &DataFrame) -> Result<SummaryStats, AggregateError> {
    if df.height() == 0 {
        return Err(AggregateError::EmptyTable);
    }

    let counts = counts_by_year(df, None)?;
    let (year_min, year_max) = match (counts.first(), counts.last()) {
        (Some(first), Some(last)) => (first.year, last.year),
        _ => return Err(AggregateError::EmptyTable),
    };

    // Ties resolve to the earliest year because counts are ascending.
    let mut peak_year = YearCount {
        year: year_min,
        count: 0,
    };
    for yc in &counts {
        if yc.count > peak_year.count {
            peak_year = yc.clone();
        }
    }

    let journals = str_column(df, COL_JOURNAL)?;
    let entries = count_first_seen(journals.into_iter().flatten());
    let distinct_journals = entries.len();
    let top_journal = entries
        .into_iter()
        .next()
        .map(|(journal, count)| JournalCount { journal, count })
        .ok_or(AggregateError::EmptyTable)?;

    let word_values = title_word_values(df)?;
    if word_values.is_empty() {
        return Err(AggregateError::EmptyTable);
    }
    let mean_title_words = word_values.iter().mean();

    Ok(SummaryStats {
        total_papers: df.height(),
        year_min,
        year_max,
        distinct_journals,
        top_journal,
        peak_year,
        mean_title_words,
    })
}

/// Mean, median, and sample standard deviation of title lengths in words.
pub fn title_word_stats(df: &DataFrame) -> Result<TitleWordStats, AggregateError> {
    let values = title_word_values(df)?;
    if values.is_empty() {
        return Err(AggregateError::EmptyTable);
    }

    let mean = values.iter().mean();
    let std_dev = if values.len() > 1 {
        values.iter().std_dev()
    } else {
        0.0
    };
    let median = Data::new(values).median();

    Ok(TitleWordStats {
        mean,
        median,
        std_dev,
    })
}

/// Rows whose year falls within `year_from..=year_to`.
pub fn filter_by_year_range(
    df: &DataFrame,
    year_from: i32,
    year_to: i32,
) -> Result<DataFrame, AggregateError> {
    if df.column(COL_YEAR).is_err() {
        return Err(AggregateError::MissingColumn(COL_YEAR));
    }

    let filtered = df
        .clone()
        .lazy()
        .filter(
            col(COL_YEAR)
                .gt_eq(lit(year_from))
                .and(col(COL_YEAR).lt_eq(lit(year_to))),
        )
        .collect()?;
    Ok(filtered)
}

/// The `top_n` most frequent title words after lowercasing, stripping
/// punctuation, and removing stopwords and bare numbers.
pub fn title_word_frequencies(
    df: &DataFrame,
    top_n: usize,
) -> Result<Vec<WordCount>, AggregateError> {
    if top_n == 0 {
        return Err(AggregateError::InvalidTopN);
    }

    let titles = str_column(df, COL_TITLE)?;
    let mut words: Vec<String> = Vec::new();
    for title in titles.into_iter().flatten() {
        let cleaned = TOKEN_CLEANUP_RE.replace_all(title, " ").to_lowercase();
        for token in cleaned.split_whitespace() {
            if token.len() < 2
                || STOPWORDS.contains(&token)
                || token.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }
            words.push(token.to_string());
        }
    }

    let mut entries = count_first_seen(words);
    entries.truncate(top_n);

    Ok(entries
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect())
}

/// Count occurrences, then sort descending. The sort is stable, so equal
/// counts keep first-appearance order.
fn count_first_seen<I, S>(values: I) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, u32)> = Vec::new();

    for value in values {
        let value = value.as_ref();
        if let Some(&i) = index.get(value) {
            entries[i].1 += 1;
        } else {
            index.insert(value.to_string(), entries.len());
            entries.push((value.to_string(), 1));
        }
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

fn int_column<'a>(
    df: &'a DataFrame,
    name: &'static str,
) -> Result<&'a Int32Chunked, AggregateError> {
    let col = df
        .column(name)
        .map_err(|_| AggregateError::MissingColumn(name))?;
    Ok(col.as_materialized_series().i32()?)
}

fn str_column<'a>(
    df: &'a DataFrame,
    name: &'static str,
) -> Result<&'a StringChunked, AggregateError> {
    let col = df
        .column(name)
        .map_err(|_| AggregateError::MissingColumn(name))?;
    Ok(col.as_materialized_series().str()?)
}

fn title_word_values(df: &DataFrame) -> Result<Vec<f64>, AggregateError> {
    let col = df
        .column(COL_TITLE_WORDS)
        .map_err(|_| AggregateError::MissingColumn(COL_TITLE_WORDS))?;
    let casted = col.cast(&DataType::Float64)?;
    let ca = casted.as_materialized_series().f64()?;
    Ok(ca.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{clean, COL_PUBLISH_TIME};

    fn raw_fixture() -> DataFrame {
        let years = [
            2020, 2020, 2020, 2021, 2021, 2021, 2021, 2022, 2022, 2022, 2022, 2022, 2023,
        ];
        let journals = [
            "Nature", "Science", "Nature", "Science", "Nature", "Science", "Nature", "Science",
            "Nature", "Science", "Cell", "Cell", "Cell",
        ];
        let sources = [
            "PMC", "PMC", "PMC", "PMC", "PMC", "PMC", "PMC", "Medline", "Medline", "Medline",
            "Medline", "bioRxiv", "bioRxiv",
        ];
        let titles: Vec<String> = (0..13)
            .map(|i| match i {
                1 => "Vaccine response".to_string(),
                2 => "Vaccine response in hospitalized older adults".to_string(),
                _ => "Vaccine response in adults".to_string(),
            })
            .collect();
        let publish: Vec<String> = years.iter().map(|y| format!("{y}-06-01")).collect();

        DataFrame::new(vec![
            Column::new(COL_TITLE.into(), titles),
            Column::new(
                COL_JOURNAL.into(),
                journals.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(COL_PUBLISH_TIME.into(), publish),
            Column::new(
                COL_SOURCE.into(),
                sources.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            ),
        ])
        .unwrap()
    }

    fn cleaned_fixture() -> DataFrame {
        clean(&raw_fixture()).unwrap().frame
    }

    #[test]
    fn test_counts_by_year_ascending_and_complete() {
        let df = cleaned_fixture();
        let counts = counts_by_year(&df, None).unwrap();
        let expected = [(2020, 3), (2021, 4), (2022, 5), (2023, 1)];
        assert_eq!(counts.len(), expected.len());
        for (got, (year, count)) in counts.iter().zip(expected) {
            assert_eq!((got.year, got.count), (year, count));
        }
        let total: u32 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total as usize, df.height());
    }

    #[test]
    fn test_counts_by_year_range_is_inclusive() {
        let df = cleaned_fixture();
        let counts = counts_by_year(&df, Some((2021, 2022))).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!((counts[0].year, counts[0].count), (2021, 4));
        assert_eq!((counts[1].year, counts[1].count), (2022, 5));
    }

    #[test]
    fn test_top_journals_orders_ties_by_first_appearance() {
        let df = cleaned_fixture();

        let top2 = top_journals(&df, 2).unwrap();
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].journal, "Nature");
        assert_eq!(top2[0].count, 5);
        assert_eq!(top2[1].journal, "Science");
        assert_eq!(top2[1].count, 5);

        let all = top_journals(&df, 10).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(all[2].journal, "Cell");
    }

    #[test]
    fn test_top_journals_rejects_zero() {
        let df = cleaned_fixture();
        assert!(matches!(
            top_journals(&df, 0),
            Err(AggregateError::InvalidTopN)
        ));
    }

    #[test]
    fn test_top_journals_requires_journal_column() {
        let df = DataFrame::new(vec![Column::new(COL_YEAR.into(), vec![2020i32])]).unwrap();
        assert!(matches!(
            top_journals(&df, 3),
            Err(AggregateError::MissingColumn(COL_JOURNAL))
        ));
    }

    #[test]
    fn test_source_distribution_orders_descending() {
        let df = cleaned_fixture();
        let sources = source_distribution(&df).unwrap().unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!((sources[0].source.as_str(), sources[0].count), ("PMC", 7));
        assert_eq!(
            (sources[1].source.as_str(), sources[1].count),
            ("Medline", 4)
        );
        assert_eq!(
            (sources[2].source.as_str(), sources[2].count),
            ("bioRxiv", 2)
        );
    }

    #[test]
    fn test_source_distribution_unavailable_without_column() {
        let df = DataFrame::new(vec![Column::new(COL_YEAR.into(), vec![2020i32])]).unwrap();
        assert_eq!(source_distribution(&df).unwrap(), None);
    }

    #[test]
    fn test_source_distribution_accepts_alternate_name() {
        let df = DataFrame::new(vec![Column::new(
            COL_SOURCE_ALT.into(),
            vec!["PMC".to_string(), "PMC".to_string()],
        )])
        .unwrap();
        let sources = source_distribution(&df).unwrap().unwrap();
        assert_eq!(sources[0].count, 2);
    }

    #[test]
    fn test_summary_statistics_headline_numbers() {
        let df = cleaned_fixture();
        let summary = summary_statistics(&df).unwrap();
        assert_eq!(summary.total_papers, 13);
        assert_eq!(summary.year_min, 2020);
        assert_eq!(summary.year_max, 2023);
        assert_eq!(summary.distinct_journals, 3);
        assert_eq!(summary.top_journal.journal, "Nature");
        assert_eq!(summary.top_journal.count, 5);
        assert_eq!((summary.peak_year.year, summary.peak_year.count), (2022, 5));
        assert!((summary.mean_title_words - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_peak_year_tie_prefers_earliest() {
        let raw = DataFrame::new(vec![
            Column::new(
                COL_TITLE.into(),
                vec!["T one".to_string(); 4],
            ),
            Column::new(COL_JOURNAL.into(), vec!["J".to_string(); 4]),
            Column::new(
                COL_PUBLISH_TIME.into(),
                vec![
                    "2020-01-01".to_string(),
                    "2020-02-01".to_string(),
                    "2021-01-01".to_string(),
                    "2021-02-01".to_string(),
                ],
            ),
        ])
        .unwrap();
        let df = clean(&raw).unwrap().frame;
        let summary = summary_statistics(&df).unwrap();
        assert_eq!((summary.peak_year.year, summary.peak_year.count), (2020, 2));
    }

    #[test]
    fn test_summary_statistics_rejects_empty_table() {
        let df = DataFrame::empty();
        assert!(matches!(
            summary_statistics(&df),
            Err(AggregateError::EmptyTable)
        ));
    }

    #[test]
    fn test_title_word_stats_fixture() {
        let df = cleaned_fixture();
        let stats = title_word_stats(&df).unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-9);
        assert!((stats.median - 4.0).abs() < 1e-9);
        assert!(stats.std_dev > 0.0);
    }

    #[test]
    fn test_filter_by_year_range_is_inclusive() {
        let df = cleaned_fixture();
        assert_eq!(filter_by_year_range(&df, 2021, 2021).unwrap().height(), 4);
        assert_eq!(filter_by_year_range(&df, 2020, 2023).unwrap().height(), 13);
        assert_eq!(filter_by_year_range(&df, 1990, 1999).unwrap().height(), 0);
    }

    #[test]
    fn test_title_word_frequencies_counts_and_order() {
        let df = cleaned_fixture();
        let words = title_word_frequencies(&df, 3).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!((words[0].word.as_str(), words[0].count), ("vaccine", 13));
        assert_eq!((words[1].word.as_str(), words[1].count), ("response", 13));
        assert_eq!((words[2].word.as_str(), words[2].count), ("adults", 12));

        let all = title_word_frequencies(&df, 50).unwrap();
        assert!(all.iter().all(|w| w.word != "in"));
        assert!(matches!(
            title_word_frequencies(&df, 0),
            Err(AggregateError::InvalidTopN)
        ));
    }

    #[test]
    fn test_title_word_frequencies_strip_punctuation_and_numbers() {
        let raw = DataFrame::new(vec![
            Column::new(
                COL_TITLE.into(),
                vec!["COVID-19: vaccine trials (phase 3)".to_string()],
            ),
            Column::new(COL_JOURNAL.into(), vec!["J".to_string()]),
            Column::new(COL_PUBLISH_TIME.into(), vec!["2021-01-01".to_string()]),
        ])
        .unwrap();
        let df = clean(&raw).unwrap().frame;
        let words = title_word_frequencies(&df, 10).unwrap();
        let tokens: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert!(tokens.contains(&"covid"));
        assert!(tokens.contains(&"vaccine"));
        assert!(tokens.contains(&"trials"));
        assert!(tokens.contains(&"phase"));
        assert!(!tokens.contains(&"19"));
        assert!(!tokens.contains(&"3"));
    }
}
