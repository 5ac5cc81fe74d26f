pub mod cli;
pub mod logging;
pub mod tui;

pub use dewy_core as core;
pub use dewy_core::{api, cache, config, format, model, todoist};

pub use dewy_core::AppConfig;
