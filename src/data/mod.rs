//! Data module - loading, synthetic fallback, cleaning, and profiling

mod cleaner;
mod loader;
mod profile;
mod synthetic;

pub use cleaner::{clean, CleanError, CleanReport, CleanedTable};
pub use loader::{load, LoadedTable, SyntheticReason, TableOrigin};
pub use profile::{profile, ColumnProfile, TableProfile};
pub use synthetic::{synthetic_frame, SYNTHETIC_ROWS};

/// Identifier column; generated as `rec_NNNNNN` when the input lacks one.
pub const COL_ID: &str = "cord_uid";
pub const COL_TITLE: &str = "title";
pub const COL_ABSTRACT: &str = "abstract";
pub const COL_AUTHORS: &str = "authors";
pub const COL_JOURNAL: &str = "journal";
pub const COL_PUBLISH_TIME: &str = "publish_time";
/// Publication year derived from [`COL_PUBLISH_TIME`] during cleaning.
pub const COL_YEAR: &str = "year";
pub const COL_SOURCE: &str = "source_x";
/// Alternate name some exports use for the source column.
pub const COL_SOURCE_ALT: &str = "source";
pub const COL_TITLE_WORDS: &str = "title_word_count";
pub const COL_ABSTRACT_WORDS: &str = "abstract_word_count";

/// Fill value for rows without a journal.
pub const UNKNOWN_JOURNAL: &str = "Unknown Journal";
