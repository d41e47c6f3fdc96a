//! Chart Plotter Module
//! Creates interactive dashboard visualizations using egui_plot.

use crate::stats::{JournalCount, SourceCount, WordCount, YearCount};
use egui::Color32;
use egui_plot::{Bar, BarChart, Plot};

/// Primary bar color
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Creates aggregate charts for the dashboard using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Vertical bar chart of papers per year.
    pub fn draw_year_chart(ui: &mut egui::Ui, counts: &[YearCount], full_size: bool) {
        let height = if full_size { 300.0 } else { 220.0 };

        let bars: Vec<Bar> = counts
            .iter()
            .map(|yc| {
                Bar::new(yc.year as f64, yc.count as f64)
                    .width(0.7)
                    .fill(BAR_COLOR)
                    .name(format!("{}: {} papers", yc.year, yc.count))
            })
            .collect();

        Plot::new("publications_by_year")
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Year")
            .y_axis_label("Papers")
            .x_axis_formatter(|mark, _range| {
                let year = mark.value.round();
                if (mark.value - year).abs() < 0.3 {
                    format!("{}", year as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Papers"));
            });
    }

    /// Horizontal bar chart of the most frequent journals, largest on top.
    pub fn draw_journal_chart(ui: &mut egui::Ui, journals: &[JournalCount], full_size: bool) {
        let height = if full_size { 300.0 } else { 220.0 };
        let n = journals.len();

        let labels: Vec<String> = journals
            .iter()
            .map(|j| Self::short_label(&j.journal, 24))
            .collect();
        let bars: Vec<Bar> = journals
            .iter()
            .enumerate()
            .map(|(i, jc)| {
                Bar::new((n - 1 - i) as f64, jc.count as f64)
                    .width(0.6)
                    .fill(PALETTE[i % PALETTE.len()])
                    .name(format!("{}: {} papers", jc.journal, jc.count))
            })
            .collect();

        Plot::new("top_journals")
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .include_x(0.0)
            .include_y(-0.5)
            .include_y(n as f64 - 0.5)
            .x_axis_label("Papers")
            .y_axis_formatter(move |mark, _range| {
                let rounded = mark.value.round();
                if (mark.value - rounded).abs() > 0.3 {
                    return String::new();
                }
                let idx = rounded as i64;
                if idx < 0 || idx as usize >= labels.len() {
                    return String::new();
                }
                // Row 0 sits at the bottom, so the label order is reversed.
                labels[labels.len() - 1 - idx as usize].clone()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    /// Vertical bar chart of papers per source with percentage hover labels.
    pub fn draw_source_chart(ui: &mut egui::Ui, sources: &[SourceCount], full_size: bool) {
        let height = if full_size { 300.0 } else { 220.0 };
        let total: u32 = sources.iter().map(|s| s.count).sum();

        let labels: Vec<String> = sources
            .iter()
            .map(|s| Self::short_label(&s.source, 16))
            .collect();
        let bars: Vec<Bar> = sources
            .iter()
            .enumerate()
            .map(|(i, sc)| {
                let pct = if total > 0 {
                    sc.count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                Bar::new(i as f64, sc.count as f64)
                    .width(0.6)
                    .fill(PALETTE[i % PALETTE.len()])
                    .name(format!("{}: {} ({:.1}%)", sc.source, sc.count, pct))
            })
            .collect();

        Plot::new("source_distribution")
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Papers")
            .x_axis_formatter(move |mark, _range| {
                let rounded = mark.value.round();
                if (mark.value - rounded).abs() > 0.3 {
                    return String::new();
                }
                let idx = rounded as i64;
                if idx < 0 || idx as usize >= labels.len() {
                    return String::new();
                }
                labels[idx as usize].clone()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Horizontal bar chart of the most frequent title words.
    pub fn draw_word_chart(ui: &mut egui::Ui, words: &[WordCount], full_size: bool) {
        let height = if full_size { 300.0 } else { 220.0 };
        let n = words.len();

        let labels: Vec<String> = words.iter().map(|w| w.word.clone()).collect();
        let bars: Vec<Bar> = words
            .iter()
            .enumerate()
            .map(|(i, wc)| {
                Bar::new((n - 1 - i) as f64, wc.count as f64)
                    .width(0.6)
                    .fill(Color32::from_rgb(46, 204, 113))
                    .name(format!("{}: {}", wc.word, wc.count))
            })
            .collect();

        Plot::new("title_words")
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .include_x(0.0)
            .include_y(-0.5)
            .include_y(n as f64 - 0.5)
            .x_axis_label("Occurrences")
            .y_axis_formatter(move |mark, _range| {
                let rounded = mark.value.round();
                if (mark.value - rounded).abs() > 0.3 {
                    return String::new();
                }
                let idx = rounded as i64;
                if idx < 0 || idx as usize >= labels.len() {
                    return String::new();
                }
                labels[labels.len() - 1 - idx as usize].clone()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    fn short_label(label: &str, max_chars: usize) -> String {
        if label.chars().count() <= max_chars {
            label.to_string()
        } else {
            let head: String = label.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{head}...")
        }
    }
}
