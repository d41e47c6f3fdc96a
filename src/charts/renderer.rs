//! Static Chart Renderer
//! Writes the report chart set as PNG files using plotters. The same files
//! back the CLI report and the dashboard's chart export.

use crate::stats::{JournalCount, SourceCount, WordCount, YearCount};
use plotters::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub const YEAR_CHART_FILE: &str = "publications_by_year.png";
pub const JOURNAL_CHART_FILE: &str = "top_journals.png";
pub const SOURCE_CHART_FILE: &str = "source_distribution.png";
pub const WORD_CHART_FILE: &str = "title_words.png";

const BAR_BLUE: RGBColor = RGBColor(52, 152, 219);
const BAR_GREEN: RGBColor = RGBColor(46, 204, 113);

const PIE_COLORS: [RGBColor; 8] = [
    RGBColor(52, 152, 219),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(231, 76, 60),
    RGBColor(0, 188, 212),
    RGBColor(96, 125, 139),
];

/// Aggregates to render. Slices borrow from the caller; `sources` is `None`
/// when the table carries no source column.
pub struct ChartSet<'a> {
    pub years: &'a [YearCount],
    pub journals: &'a [JournalCount],
    pub sources: Option<&'a [SourceCount]>,
    pub words: &'a [WordCount],
}

enum ChartJob<'a> {
    Years(&'a [YearCount]),
    Journals(&'a [JournalCount]),
    Sources(&'a [SourceCount]),
    Words(&'a [WordCount]),
}

/// Render every chart in the set into `out_dir`, in parallel. Returns the
/// paths of the files written.
pub fn render_all(set: &ChartSet<'_>, out_dir: &Path) -> crate::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut jobs: Vec<(PathBuf, ChartJob)> = vec![
        (out_dir.join(YEAR_CHART_FILE), ChartJob::Years(set.years)),
        (
            out_dir.join(JOURNAL_CHART_FILE),
            ChartJob::Journals(set.journals),
        ),
        (out_dir.join(WORD_CHART_FILE), ChartJob::Words(set.words)),
    ];
    if let Some(sources) = set.sources.filter(|s| !s.is_empty()) {
        jobs.push((out_dir.join(SOURCE_CHART_FILE), ChartJob::Sources(sources)));
    }

    let rendered: Vec<crate::Result<PathBuf>> = jobs
        .par_iter()
        .map(|(path, job)| {
            match job {
                ChartJob::Years(years) => render_year_chart(years, path)?,
                ChartJob::Journals(journals) => render_journal_chart(journals, path)?,
                ChartJob::Sources(sources) => render_source_chart(sources, path)?,
                ChartJob::Words(words) => render_word_chart(words, path)?,
            }
            Ok(path.clone())
        })
        .collect();

    let mut paths = Vec::with_capacity(rendered.len());
    for result in rendered {
        paths.push(result?);
    }
    Ok(paths)
}

/// Vertical bar chart of papers per year, one bar per year with the count
/// printed above it.
pub fn render_year_chart(years: &[YearCount], path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = years.iter().map(|c| c.count).max().unwrap_or(1).max(1) as f64;
    let (x_min, x_max) = match (years.first(), years.last()) {
        (Some(first), Some(last)) => (first.year as f64 - 0.5, last.year as f64 + 0.5),
        _ => (0.0, 1.0),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Publications by Year", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..(max_count * 1.15))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Papers")
        .x_label_formatter(&|x| format!("{}", x.round() as i64))
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for yc in years {
        let x = yc.year as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.4, 0.0), (x + 0.4, yc.count as f64)],
            BAR_BLUE.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            yc.count.to_string(),
            (x, yc.count as f64 + max_count * 0.03),
            ("sans-serif", 14),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Horizontal bar chart of the most frequent journals, largest on top.
pub fn render_journal_chart(journals: &[JournalCount], path: &Path) -> crate::Result<()> {
    let entries: Vec<(String, u32)> = journals
        .iter()
        .map(|j| (j.journal.clone(), j.count))
        .collect();
    render_hbar("Top Journals", "Papers", &entries, BAR_BLUE, path)
}

/// Horizontal bar chart of the most frequent title words, largest on top.
pub fn render_word_chart(words: &[WordCount], path: &Path) -> crate::Result<()> {
    let entries: Vec<(String, u32)> = words.iter().map(|w| (w.word.clone(), w.count)).collect();
    render_hbar("Frequent Title Words", "Occurrences", &entries, BAR_GREEN, path)
}

/// Pie chart of papers per source with percentage labels.
pub fn render_source_chart(sources: &[SourceCount], path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(path, (700, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Source Distribution", ("sans-serif", 30))?;

    if sources.is_empty() {
        root.present()?;
        return Ok(());
    }

    let dims = root.dim_in_pixel();
    let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
    let radius = 230.0;
    let sizes: Vec<f64> = sources.iter().map(|s| s.count as f64).collect();
    let labels: Vec<String> = sources.iter().map(|s| s.source.clone()).collect();
    let colors: Vec<RGBColor> = (0..sources.len())
        .map(|i| PIE_COLORS[i % PIE_COLORS.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

fn render_hbar(
    title: &str,
    x_desc: &str,
    entries: &[(String, u32)],
    color: RGBColor,
    path: &Path,
) -> crate::Result<()> {
    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = entries.len().max(1);
    let max_count = entries.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1) as f64;
    let labels: Vec<String> = entries
        .iter()
        .map(|(label, _)| truncate_label(label, 28))
        .collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..(max_count * 1.15), -0.5f64..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_labels(n)
        .y_label_formatter(&|y: &f64| {
            let rounded = y.round();
            if (y - rounded).abs() > 0.3 {
                return String::new();
            }
            let idx = rounded as i64;
            if idx < 0 || idx as usize >= labels.len() {
                return String::new();
            }
            // Row 0 sits at the bottom, so the label order is reversed.
            labels[labels.len() - 1 - idx as usize].clone()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, (_, count)) in entries.iter().enumerate() {
        let y = (n - 1 - i) as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y - 0.35), (*count as f64, y + 0.35)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            count.to_string(),
            (*count as f64 + max_count * 0.02, y - 0.1),
            ("sans-serif", 14),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
