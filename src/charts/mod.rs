//! Charts module - interactive egui_plot widgets for the dashboard and
//! static PNG rendering for reports and chart exports.

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{render_all, ChartSet};
