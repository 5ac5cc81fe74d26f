use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "dewy",
    version,
    about = "A keyboard-driven terminal client for Todoist.",
    after_help = "Configuration is read from config.json in the dewy config directory\n(override with DEWY_CONFIG_DIR) or the TODOIST_API_TOKEN environment variable."
)]
pub struct Cli {
    /// Override the tracing filter written to dewy.log (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,
}
