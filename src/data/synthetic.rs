//! Synthetic Dataset Module
//! Deterministic stand-in metadata used whenever no real CSV is available.

use crate::data::{COL_ABSTRACT, COL_AUTHORS, COL_ID, COL_JOURNAL, COL_PUBLISH_TIME, COL_SOURCE, COL_TITLE};
use chrono::NaiveDate;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of rows in the synthetic dataset.
pub const SYNTHETIC_ROWS: usize = 1000;

/// Fixed seed, so every fallback load produces the same table.
const SYNTHETIC_SEED: u64 = 42;

const JOURNALS: [&str; 10] = [
    "Nature",
    "Science",
    "Cell",
    "The Lancet",
    "NEJM",
    "PLOS ONE",
    "BMJ",
    "JAMA",
    "Nature Medicine",
    "Cell Host & Microbe",
];

const COVID_TERMS: [&str; 10] = [
    "COVID-19",
    "SARS-CoV-2",
    "coronavirus",
    "pandemic",
    "vaccine",
    "antiviral",
    "respiratory",
    "infection",
    "immunity",
    "treatment",
];

const TITLE_ACTIONS: [&str; 4] = ["study", "analysis", "research", "investigation"];
const TITLE_SUBJECTS: [&str; 5] = ["patients", "treatment", "vaccine", "therapy", "diagnosis"];
const ABSTRACT_SETTINGS: [&str; 3] = ["clinical", "laboratory", "epidemiological"];
const ABSTRACT_OUTCOMES: [&str; 3] = ["improvement", "correlation", "reduction"];
const SOURCES: [&str; 4] = ["PMC", "Medline", "bioRxiv", "medRxiv"];

/// Build the synthetic metadata table.
///
/// Rows carry composed titles and abstracts drawn from fixed vocabularies,
/// cycled author pairs, and publish dates spaced evenly over 2020..=2023.
/// The generator is seeded, so two calls return equal frames.
pub fn synthetic_frame() -> DataFrame {
    let mut rng = StdRng::seed_from_u64(SYNTHETIC_SEED);

    let ids: Vec<String> = (0..SYNTHETIC_ROWS).map(|i| format!("cord_{i:06}")).collect();

    let titles: Vec<String> = (0..SYNTHETIC_ROWS)
        .map(|_| {
            format!(
                "{} {} of {}",
                pick(&mut rng, &COVID_TERMS),
                pick(&mut rng, &TITLE_ACTIONS),
                pick(&mut rng, &TITLE_SUBJECTS)
            )
        })
        .collect();

    let abstracts: Vec<String> = (0..SYNTHETIC_ROWS)
        .map(|_| {
            format!(
                "This study investigates {} in {} settings. Results show significant {}.",
                pick(&mut rng, &COVID_TERMS).to_lowercase(),
                pick(&mut rng, &ABSTRACT_SETTINGS),
                pick(&mut rng, &ABSTRACT_OUTCOMES)
            )
        })
        .collect();

    let authors: Vec<String> = (0..SYNTHETIC_ROWS)
        .map(|i| format!("Author{}, A.; Author{}, B.", i % 20 + 1, (i + 1) % 20 + 1))
        .collect();

    let journals: Vec<String> = (0..SYNTHETIC_ROWS)
        .map(|_| pick(&mut rng, &JOURNALS).to_string())
        .collect();

    let publish_times = publish_dates();

    let sources: Vec<String> = (0..SYNTHETIC_ROWS)
        .map(|_| pick(&mut rng, &SOURCES).to_string())
        .collect();

    DataFrame::new(vec![
        Column::new(COL_ID.into(), ids),
        Column::new(COL_TITLE.into(), titles),
        Column::new(COL_ABSTRACT.into(), abstracts),
        Column::new(COL_AUTHORS.into(), authors),
        Column::new(COL_JOURNAL.into(), journals),
        Column::new(COL_PUBLISH_TIME.into(), publish_times),
        Column::new(COL_SOURCE.into(), sources),
    ])
    .expect("synthetic columns share one length")
}

fn pick<'a>(rng: &mut StdRng, options: &'a [&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Dates spaced evenly from 2020-01-01 through 2023-12-31, as `YYYY-MM-DD`.
fn publish_dates() -> Vec<String> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid start date");
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid end date");
    let span_days = (end - start).num_days();

    (0..SYNTHETIC_ROWS)
        .map(|i| {
            let offset = (i as i64 * span_days) / (SYNTHETIC_ROWS as i64 - 1);
            let date = start + chrono::Duration::days(offset);
            date.format("%Y-%m-%d").to_string()
        })
        .collect()
}
