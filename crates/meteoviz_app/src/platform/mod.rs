mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod theme;
mod ui;

pub use app::run_app;
pub use cli::Cli;
