//! Dashboard Panel
//! Central scrollable area with metric cards, aggregate charts, insight
//! lines, and a sample of the cleaned rows.

use crate::charts::ChartPlotter;
use crate::stats::{JournalCount, SourceCount, SummaryStats, WordCount, YearCount};
use egui::{Color32, RichText, ScrollArea};

const METRIC_BLUE: Color32 = Color32::from_rgb(52, 152, 219);
const METRIC_GREEN: Color32 = Color32::from_rgb(46, 204, 113);
const METRIC_PURPLE: Color32 = Color32::from_rgb(155, 89, 182);
const METRIC_ORANGE: Color32 = Color32::from_rgb(243, 156, 18);

const TITLE_PREVIEW_CHARS: usize = 60;

/// One row of the sample table.
#[derive(Debug, Clone)]
pub struct SampleRow {
    pub title: String,
    pub journal: String,
    pub year: i32,
    pub title_words: u32,
}

/// Everything the dashboard draws for the current year window and top-N
/// selection. Rebuilt whenever the filters change.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub year_range: Option<(i32, i32)>,
    pub filtered_count: usize,
    pub counts: Vec<YearCount>,
    pub journals: Vec<JournalCount>,
    pub sources: Option<Vec<SourceCount>>,
    pub summary: Option<SummaryStats>,
    pub words: Vec<WordCount>,
    pub sample: Vec<SampleRow>,
}

/// Central dashboard area.
pub struct DashboardPanel {
    pub view: Option<DashboardView>,
}

impl Default for DashboardPanel {
    fn default() -> Self {
        Self { view: None }
    }
}

impl DashboardPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(view) = self.view.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Loading data...").size(20.0).color(Color32::GRAY));
            });
            return;
        };

        if view.filtered_count == 0 {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No papers in the selected year range")
                        .size(20.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        }

        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("CORD-19 Research Explorer").size(20.0).strong());
            if let Some((lo, hi)) = view.year_range {
                ui.label(
                    RichText::new(format!("Showing {} papers from {} to {}", view.filtered_count, lo, hi))
                        .size(12.0)
                        .color(Color32::GRAY),
                );
            }
            ui.add_space(10.0);

            Self::draw_metric_cards(ui, view);
            ui.add_space(15.0);

            // Charts, two per row
            ui.columns(2, |columns| {
                columns[0].label(RichText::new("📈 Publications by Year").size(14.0).strong());
                ChartPlotter::draw_year_chart(&mut columns[0], &view.counts, false);

                columns[1].label(RichText::new("🏆 Top Journals").size(14.0).strong());
                ChartPlotter::draw_journal_chart(&mut columns[1], &view.journals, false);
            });
            ui.add_space(10.0);

            ui.columns(2, |columns| {
                columns[0].label(RichText::new("🗂 Source Distribution").size(14.0).strong());
                match view.sources.as_deref() {
                    Some(sources) if !sources.is_empty() => {
                        ChartPlotter::draw_source_chart(&mut columns[0], sources, false);
                    }
                    _ => {
                        columns[0].add_space(10.0);
                        columns[0].label(
                            RichText::new("Source information not available")
                                .size(12.0)
                                .color(Color32::GRAY),
                        );
                    }
                }

                columns[1].label(RichText::new("🔤 Frequent Title Words").size(14.0).strong());
                ChartPlotter::draw_word_chart(&mut columns[1], &view.words, false);
            });
            ui.add_space(15.0);

            Self::draw_insights(ui, view);
            ui.add_space(15.0);

            Self::draw_sample_table(ui, view);
            ui.add_space(10.0);
        });
    }

    fn draw_metric_cards(ui: &mut egui::Ui, view: &DashboardView) {
        let Some(summary) = view.summary.as_ref() else {
            return;
        };

        ui.columns(4, |columns| {
            Self::metric_card(
                &mut columns[0],
                "Total Papers",
                &summary.total_papers.to_string(),
                METRIC_BLUE,
            );
            Self::metric_card(
                &mut columns[1],
                "Year Range",
                &format!("{} - {}", summary.year_min, summary.year_max),
                METRIC_GREEN,
            );
            Self::metric_card(
                &mut columns[2],
                "Unique Journals",
                &summary.distinct_journals.to_string(),
                METRIC_PURPLE,
            );
            Self::metric_card(
                &mut columns[3],
                "Avg Title Words",
                &format!("{:.1}", summary.mean_title_words),
                METRIC_ORANGE,
            );
        });
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: &str, color: Color32) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(value).size(22.0).strong().color(color));
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                });
            });
    }

    fn draw_insights(ui: &mut egui::Ui, view: &DashboardView) {
        let lines = Self::insight_lines(view);
        if lines.is_empty() {
            return;
        }

        ui.label(RichText::new("💡 Insights").size(14.0).strong());
        ui.add_space(5.0);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                for line in &lines {
                    ui.label(RichText::new(format!("• {line}")).size(12.0));
                }
            });
    }

    /// Short findings derived from the current view.
    fn insight_lines(view: &DashboardView) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(summary) = &view.summary {
            lines.push(format!(
                "Publication volume peaked in {} with {} papers.",
                summary.peak_year.year, summary.peak_year.count
            ));
            lines.push(format!(
                "{} leads with {} papers across {} journals.",
                summary.top_journal.journal, summary.top_journal.count, summary.distinct_journals
            ));
            lines.push(format!(
                "Titles average {:.1} words.",
                summary.mean_title_words
            ));
        }

        if let Some(sources) = &view.sources {
            if let Some(first) = sources.first() {
                let total: u32 = sources.iter().map(|s| s.count).sum();
                if total > 0 {
                    lines.push(format!(
                        "{} is the primary source at {:.1}% of papers.",
                        first.source,
                        first.count as f64 / total as f64 * 100.0
                    ));
                }
            }
        }

        if let Some(word) = view.words.first() {
            lines.push(format!(
                "\"{}\" is the most frequent title word ({} occurrences).",
                word.word, word.count
            ));
        }

        lines
    }

    fn draw_sample_table(ui: &mut egui::Ui, view: &DashboardView) {
        if view.sample.is_empty() {
            return;
        }

        ui.label(RichText::new("📄 Sample Papers").size(14.0).strong());
        ui.add_space(5.0);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("sample_papers")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Title").strong().size(11.0));
                        ui.label(RichText::new("Journal").strong().size(11.0));
                        ui.label(RichText::new("Year").strong().size(11.0));
                        ui.label(RichText::new("Words").strong().size(11.0));
                        ui.end_row();

                        for row in &view.sample {
                            ui.label(
                                RichText::new(Self::preview(&row.title, TITLE_PREVIEW_CHARS))
                                    .size(11.0),
                            );
                            ui.label(RichText::new(&row.journal).size(11.0));
                            ui.label(RichText::new(row.year.to_string()).size(11.0));
                            ui.label(RichText::new(row.title_words.to_string()).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }

    fn preview(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let head: String = text.chars().take(max_chars).collect();
            format!("{head}...")
        }
    }
}
