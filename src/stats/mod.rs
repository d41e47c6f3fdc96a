//! Stats module - descriptive aggregations over cleaned metadata

mod aggregator;

pub use aggregator::{
    counts_by_year, filter_by_year_range, source_distribution, summary_statistics,
    title_word_frequencies, title_word_stats, top_journals, AggregateError, JournalCount,
    SourceCount, SummaryStats, TitleWordStats, WordCount, YearCount,
};
