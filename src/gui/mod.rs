//! GUI module - User interface components

mod app;
mod control_panel;
mod dashboard;

pub use app::CordScopeApp;
pub use control_panel::{ControlAction, ControlPanel};
pub use dashboard::{DashboardPanel, DashboardView, SampleRow};
