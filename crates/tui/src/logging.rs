use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "DEWY_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Sends tracing output to `log_path`, since the terminal belongs to the UI.
///
/// An explicit `filter` wins over `DEWY_LOG`. If the log file cannot be opened,
/// logging stays disabled and startup carries on.
pub fn init_tracing(filter: Option<String>, log_path: &Path) -> Result<()> {
    let directive: Directive = filter
        .as_deref()
        .unwrap_or(DEFAULT_DIRECTIVE)
        .parse()?;
    let builder = EnvFilter::builder().with_default_directive(directive);
    let env_filter = match filter {
        Some(_) => builder.parse_lossy(""),
        None => builder.with_env_var(LOG_ENV).from_env_lossy(),
    };

    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_path) else {
        return Ok(());
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
