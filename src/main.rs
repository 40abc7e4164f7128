use clap::Parser;
use std::path::PathBuf;
use toolbelt::AppError;
use toolbelt::cli::dispatcher::Dispatcher;
use toolbelt::cli::main_types::Cli;
use toolbelt::storage::config::Config;
use toolbelt::utils::logging::VerboseLogger;

fn report(error: &AppError) {
    eprintln!("{} {}", error.severity().emoji(), error.display_friendly());
    if let Some(hint) = error.troubleshooting_hint() {
        eprintln!("💡 {}", hint);
    }
    log::debug!("{}", error);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Err(err) = VerboseLogger::new(cli.verbose).init() {
        eprintln!("Warning: logging unavailable: {}", err);
    }

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            report(&err.into());
            std::process::exit(1);
        }
    };

    if let Some(path) = &config_path {
        log::info!("Using config file: {}", path.display());
    }

    let dispatcher = Dispatcher::new(config, config_path, cli.verbose);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}
