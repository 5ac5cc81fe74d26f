pub use dewy_tui::cli;
pub use dewy_tui::logging;
pub use dewy_tui::tui;
pub use dewy_tui::AppConfig;

pub use dewy_core as core;
pub use dewy_core::api;
pub use dewy_core::config;
pub use dewy_core::format;
pub use dewy_core::model;
