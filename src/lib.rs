pub mod app;
pub mod config;
pub mod controller;
pub mod encoding;
pub mod errors;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod projection;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::ConsoleConfig;
pub use controller::{DashboardController, Trigger, ViewState, ViewStatus};
pub use fetch::{DashboardClient, DashboardSource};
pub use projection::build_view_model;
pub use state::AppState;
