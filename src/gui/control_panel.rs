//! Control Panel Widget
//! Left side panel with data source selection, analysis controls, and
//! export buttons.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// User settings for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub csv_path: Option<PathBuf>,
    pub sample_size: usize,
    pub top_n: usize,
    pub year_from: i32,
    pub year_to: i32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            sample_size: 1000,
            top_n: 10,
            year_from: 0,
            year_to: 0,
        }
    }
}

/// Left side control panel with data source and filter controls.
pub struct ControlPanel {
    pub settings: DashboardSettings,
    pub year_bounds: Option<(i32, i32)>,
    pub origin: String,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: DashboardSettings::default(),
            year_bounds: None,
            origin: String::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the year slider bounds after a load and snap the selection to the
    /// full range.
    pub fn set_year_bounds(&mut self, bounds: Option<(i32, i32)>) {
        self.year_bounds = bounds;
        if let Some((lo, hi)) = bounds {
            self.settings.year_from = lo;
            self.settings.year_to = hi;
        }
    }

    /// Currently selected year window; `None` until data has loaded.
    pub fn year_window(&self) -> Option<(i32, i32)> {
        self.year_bounds
            .map(|_| (self.settings.year_from, self.settings.year_to))
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlAction {
        let mut action = ControlAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 CordScope")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("CORD-19 Metadata Explorer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Built-in sample data".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("🔄 Reload").clicked() {
                action = ControlAction::Reload;
            }
            if ui.small_button("Use sample data").clicked() {
                action = ControlAction::UseSampleData;
            }
        });
        if !self.origin.is_empty() {
            ui.label(RichText::new(&self.origin).size(11.0).color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Analysis Controls Section =====
        ui.label(RichText::new("⚙️ Analysis Controls").size(14.0).strong());
        ui.add_space(8.0);

        ui.label("Sample size (file loads):");
        let sample_response = ui.add(
            egui::Slider::new(&mut self.settings.sample_size, 100..=2000)
                .step_by(100.0)
                .text("rows"),
        );
        if sample_response.drag_stopped() {
            action = ControlAction::Reload;
        }

        ui.add_space(5.0);

        ui.label("Journals / words in rankings:");
        let top_n_response = ui.add(egui::Slider::new(&mut self.settings.top_n, 5..=20).text("top"));
        if top_n_response.changed() {
            action = ControlAction::ViewChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Range Section =====
        ui.label(RichText::new("📅 Year Range").size(14.0).strong());
        ui.add_space(5.0);

        if let Some((min_year, max_year)) = self.year_bounds {
            let from_response = ui.add(
                egui::Slider::new(&mut self.settings.year_from, min_year..=max_year).text("from"),
            );
            let to_response = ui.add(
                egui::Slider::new(&mut self.settings.year_to, min_year..=max_year).text("to"),
            );

            // Keep from <= to while dragging either end
            if from_response.changed() {
                self.settings.year_to = self.settings.year_to.max(self.settings.year_from);
                action = ControlAction::ViewChanged;
            }
            if to_response.changed() {
                self.settings.year_from = self.settings.year_from.min(self.settings.year_to);
                action = ControlAction::ViewChanged;
            }
        } else {
            ui.label(
                RichText::new("Load data to enable year filtering")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let csv_button = egui::Button::new(RichText::new("📄 Export Filtered CSV").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(csv_button).clicked() {
                    action = ControlAction::ExportCsv;
                }

                ui.add_space(8.0);

                let charts_button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(charts_button).clicked() {
                    action = ControlAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    None,
    BrowseCsv,
    UseSampleData,
    Reload,
    ViewChanged,
    ExportCsv,
    ExportCharts,
}
