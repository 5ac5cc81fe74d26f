use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = dewy::cli::Cli::parse();

    let config = match dewy::AppConfig::discover() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    dewy::logging::init_tracing(cli.log_filter.clone(), &config.log_path())?;
    dewy::tui::run(config)
}
