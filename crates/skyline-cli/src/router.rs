//! Command routing logic for CLI

use skyline_core::config::LoggingConfig;
use std::path::Path;

use crate::args::{Cli, Commands};
use crate::commands::generate::GenerateOptions;
use crate::commands::{self, load_config, resolve_config_path};
use crate::logging;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config_file.as_deref());
    let verbose = cli.verbose;

    match cli.command {
        Commands::Config { action } => {
            logging::init(&LoggingConfig::default(), verbose);
            commands::config::run(action, &config_path, verbose).await
        }
        command => route_analysis(command, &config_path, verbose).await,
    }
}

/// Commands that scan a project
async fn route_analysis(command: Commands, config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    logging::init(&config.logging, verbose);
    tracing::debug!(config = %config_path.display(), "Configuration loaded");

    match command {
        Commands::Analyze { analysis, json } => {
            commands::analyze::run(config, analysis, json, verbose).await
        }
        Commands::Generate {
            analysis,
            output,
            image,
            domain,
            review,
        } => {
            let options = GenerateOptions {
                output,
                image,
                domain,
                review,
            };
            commands::generate::run(config, analysis, options, verbose).await
        }
        Commands::Report {
            analysis,
            output,
            json,
        } => commands::report::run(config, analysis, output, json, verbose).await,
        Commands::Config { action } => commands::config::run(action, config_path, verbose).await,
    }
}
