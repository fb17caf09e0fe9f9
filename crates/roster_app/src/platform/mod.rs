//! Terminal front end: configuration, logging, rendering and effect execution.
mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
