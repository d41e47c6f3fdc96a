//! CordScope Main Application
//! Main window with control panel and dashboard. Loading and cleaning run
//! on a background thread; finished snapshots are cached per data source.

use crate::charts::{render_all, ChartSet};
use crate::data::{clean, load, CleanedTable, TableOrigin};
use crate::data::{COL_JOURNAL, COL_TITLE, COL_TITLE_WORDS, COL_YEAR};
use crate::export;
use crate::gui::{ControlAction, ControlPanel, DashboardPanel, DashboardView, SampleRow};
use crate::stats::{
    counts_by_year, filter_by_year_range, source_distribution, summary_statistics,
    title_word_frequencies, top_journals,
};
use egui::SidePanel;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

const SAMPLE_TABLE_ROWS: usize = 10;
const WORD_CHART_ENTRIES: usize = 10;

type CacheKey = (Option<PathBuf>, Option<usize>);

/// Pipeline result from the background thread
enum PipelineEvent {
    Progress(f32, String),
    Complete(AnalysisSnapshot),
    Error(String),
}

/// A loaded-and-cleaned table plus the year bounds the filter sliders snap to.
struct AnalysisSnapshot {
    origin: TableOrigin,
    cleaned: CleanedTable,
    year_bounds: Option<(i32, i32)>,
}

/// Main application window.
pub struct CordScopeApp {
    control_panel: ControlPanel,
    dashboard: DashboardPanel,

    cache: HashMap<CacheKey, Arc<AnalysisSnapshot>>,
    snapshot: Option<Arc<AnalysisSnapshot>>,
    pending_key: Option<CacheKey>,

    // Async pipeline
    pipeline_rx: Option<Receiver<PipelineEvent>>,
    is_loading: bool,
    view_dirty: bool,
}

impl CordScopeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        input: Option<PathBuf>,
        sample_size: Option<usize>,
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(),
            dashboard: DashboardPanel::new(),
            cache: HashMap::new(),
            snapshot: None,
            pending_key: None,
            pipeline_rx: None,
            is_loading: false,
            view_dirty: false,
        };

        app.control_panel.settings.csv_path = input;
        if let Some(n) = sample_size {
            app.control_panel.settings.sample_size = n.clamp(100, 2000);
        }
        app.start_pipeline();
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.csv_path = Some(path);
            self.start_pipeline();
        }
    }

    /// Load and clean in a background thread, or reuse a cached snapshot.
    fn start_pipeline(&mut self) {
        if self.is_loading {
            return;
        }

        let path = self.control_panel.settings.csv_path.clone();
        let sample_size = Some(self.control_panel.settings.sample_size);
        let key = cache_key(&path, sample_size);

        if let Some(snapshot) = self.cache.get(&key) {
            let snapshot = Arc::clone(snapshot);
            let rows = snapshot.cleaned.report.rows_out;
            self.install_snapshot(snapshot);
            self.control_panel
                .set_progress(100.0, &format!("Complete! {} papers ready (cached)", rows));
            return;
        }

        self.control_panel.set_progress(5.0, "Loading data...");
        self.is_loading = true;
        self.pending_key = Some(key);

        let (tx, rx) = channel();
        self.pipeline_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(PipelineEvent::Progress(10.0, "Loading data...".to_string()));
            let loaded = load(path.as_deref(), sample_size);

            let _ = tx.send(PipelineEvent::Progress(
                50.0,
                format!("Cleaning {} rows...", loaded.frame.height()),
            ));
            match clean(&loaded.frame) {
                Ok(cleaned) => {
                    let _ = tx.send(PipelineEvent::Progress(
                        90.0,
                        "Preparing dashboard...".to_string(),
                    ));
                    let bounds = year_bounds(&cleaned.frame);
                    let _ = tx.send(PipelineEvent::Complete(AnalysisSnapshot {
                        origin: loaded.origin,
                        cleaned,
                        year_bounds: bounds,
                    }));
                }
                Err(e) => {
                    let _ = tx.send(PipelineEvent::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for pipeline results
    fn check_pipeline_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.pipeline_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(event) = rx.try_recv() {
                match event {
                    PipelineEvent::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    PipelineEvent::Complete(snapshot) => {
                        let snapshot = Arc::new(snapshot);
                        if let Some(key) = self.pending_key.take() {
                            self.cache.insert(key, Arc::clone(&snapshot));
                        }
                        let rows = snapshot.cleaned.report.rows_out;
                        self.install_snapshot(snapshot);
                        self.control_panel
                            .set_progress(100.0, &format!("Complete! {} papers ready", rows));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    PipelineEvent::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        self.pending_key = None;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.pipeline_rx = Some(rx);
            }
        }
    }

    fn install_snapshot(&mut self, snapshot: Arc<AnalysisSnapshot>) {
        self.control_panel.origin = snapshot.origin.describe();
        self.control_panel.set_year_bounds(snapshot.year_bounds);
        self.control_panel.export_enabled = true;
        self.snapshot = Some(snapshot);
        self.view_dirty = true;
    }

    /// Recompute the dashboard aggregates for the current filters.
    fn rebuild_view(&mut self) {
        let Some(snapshot) = self.snapshot.clone() else {
            return;
        };
        let year_window = self.control_panel.year_window();
        let top_n = self.control_panel.settings.top_n;

        match build_view(&snapshot.cleaned.frame, year_window, top_n) {
            Ok(view) => {
                self.dashboard.view = Some(view);
            }
            Err(e) => {
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
        self.view_dirty = false;
    }

    /// Export the rows in the selected year window as CSV.
    fn handle_export_csv(&mut self) {
        let Some(snapshot) = self.snapshot.clone() else {
            self.control_panel.set_progress(0.0, "No data to export");
            return;
        };
        let window = self.control_panel.year_window().or(snapshot.year_bounds);
        let Some(window) = window else {
            self.control_panel.set_progress(0.0, "No year range to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match export::write_filtered_csv(&snapshot.cleaned.frame, window, &dir) {
            Ok(path) => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! CSV saved to {}", path.display()));
            }
            Err(e) => {
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Render the current charts as PNG files and open the folder.
    fn handle_export_charts(&mut self) {
        let has_charts = self
            .dashboard
            .view
            .as_ref()
            .is_some_and(|v| v.filtered_count > 0);
        if !has_charts {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let Some(view) = self.dashboard.view.as_ref() else {
            return;
        };
        let set = ChartSet {
            years: &view.counts,
            journals: &view.journals,
            sources: view.sources.as_deref(),
            words: &view.words,
        };
        match render_all(&set, &dir) {
            Ok(paths) => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! {} charts saved", paths.len()));
                let _ = open::that(&dir);
            }
            Err(e) => {
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for CordScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_pipeline_results();

        // Request repaint while the pipeline runs
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlAction::BrowseCsv => self.handle_browse_csv(),
                        ControlAction::UseSampleData => {
                            if !self.is_loading {
                                self.control_panel.settings.csv_path = None;
                                self.start_pipeline();
                            }
                        }
                        ControlAction::Reload => {
                            if !self.is_loading {
                                self.start_pipeline();
                            }
                        }
                        ControlAction::ViewChanged => {
                            self.view_dirty = true;
                        }
                        ControlAction::ExportCsv => self.handle_export_csv(),
                        ControlAction::ExportCharts => self.handle_export_charts(),
                        ControlAction::None => {}
                    }
                });
            });

        if self.view_dirty && !self.is_loading {
            self.rebuild_view();
        }

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}

/// Cache key for a data source. Synthetic data ignores the sample size, so
/// every synthetic load shares one entry.
fn cache_key(path: &Option<PathBuf>, sample_size: Option<usize>) -> CacheKey {
    match path {
        Some(p) => (Some(p.clone()), sample_size),
        None => (None, None),
    }
}

fn year_bounds(frame: &DataFrame) -> Option<(i32, i32)> {
    let counts = counts_by_year(frame, None).ok()?;
    match (counts.first(), counts.last()) {
        (Some(first), Some(last)) => Some((first.year, last.year)),
        _ => None,
    }
}

/// Compute everything the dashboard shows for one filter selection.
fn build_view(
    frame: &DataFrame,
    year_window: Option<(i32, i32)>,
    top_n: usize,
) -> crate::Result<DashboardView> {
    let filtered = match year_window {
        Some((lo, hi)) => filter_by_year_range(frame, lo, hi)?,
        None => frame.clone(),
    };

    if filtered.height() == 0 {
        return Ok(DashboardView {
            year_range: year_window,
            ..Default::default()
        });
    }

    let counts = counts_by_year(&filtered, None)?;
    let journals = top_journals(&filtered, top_n.max(1))?;
    let sources = source_distribution(&filtered)?;
    let summary = summary_statistics(&filtered)?;
    let words = title_word_frequencies(&filtered, WORD_CHART_ENTRIES)?;
    let sample = sample_rows(&filtered, SAMPLE_TABLE_ROWS)?;

    Ok(DashboardView {
        year_range: year_window,
        filtered_count: filtered.height(),
        counts,
        journals,
        sources,
        summary: Some(summary),
        words,
        sample,
    })
}

fn sample_rows(df: &DataFrame, limit: usize) -> crate::Result<Vec<SampleRow>> {
    let head = df.head(Some(limit.min(df.height())));

    let titles = head.column(COL_TITLE)?.as_materialized_series().str()?;
    let journals = head.column(COL_JOURNAL)?.as_materialized_series().str()?;
    let years = head.column(COL_YEAR)?.as_materialized_series().i32()?;
    let words = head.column(COL_TITLE_WORDS)?.as_materialized_series().u32()?;

    let mut rows = Vec::with_capacity(head.height());
    for i in 0..head.height() {
        rows.push(SampleRow {
            title: titles.get(i).unwrap_or_default().to_string(),
            journal: journals.get(i).unwrap_or_default().to_string(),
            year: years.get(i).unwrap_or_default(),
            title_words: words.get(i).unwrap_or_default(),
        });
    }
    Ok(rows)
}
