//! Configuration management commands

use anyhow::bail;
use colored::*;
use skyline_core::SkylineConfig;
use skyline_core::config::{render_config, save_to_file};
use std::path::Path;

use super::load_config;
use crate::args::ConfigAction;
use crate::console::CliConsole;

/// Dispatch a config subcommand
pub async fn run(action: ConfigAction, config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init { force } => init(config_path, force, verbose),
        ConfigAction::Show => show(config_path, verbose),
        ConfigAction::Validate => validate(config_path, verbose),
    }
}

/// Initialize a new configuration file
fn init(config_path: &Path, force: bool, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    console.print_header("Configuration Initialization");

    if config_path.exists() && !force {
        console.error(&format!(
            "Configuration file already exists: {}",
            config_path.display()
        ));
        bail!("Use --force to overwrite {}", config_path.display());
    }

    save_to_file(&SkylineConfig::default(), config_path)?;
    console.success(&format!(
        "Created configuration file: {}",
        config_path.display()
    ));
    println!(
        "Set {} or {} to enable external inference",
        "SKYLINE_API_KEY".cyan(),
        "ANTHROPIC_API_KEY".cyan()
    );
    Ok(())
}

/// Show the effective configuration
fn show(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    console.print_header("Configuration");

    if config_path.exists() {
        console.field("File", &config_path.display().to_string());
    } else {
        console.warn(&format!(
            "Configuration file not found: {}, using defaults",
            config_path.display()
        ));
    }

    let config = load_config(config_path)?;
    let key_state = if config.inference.has_api_key() {
        "set".green()
    } else {
        "not set".yellow()
    };
    console.field("API key", &key_state.to_string());
    println!();
    println!("{}", render_config(&config, config_path)?);
    Ok(())
}

/// Validate the configuration
fn validate(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    console.print_header("Configuration Validation");

    let config = load_config(config_path)?;
    match config.validate() {
        Ok(()) => {
            console.success("Configuration is valid");
            console.field("Project", &config.deployment.project_name);
            console.field("Region", &config.deployment.region);
            console.field(
                "Inference",
                if config.inference.enabled {
                    "enabled"
                } else {
                    "disabled"
                },
            );
            Ok(())
        }
        Err(e) => {
            console.error(&format!("Configuration validation failed: {e}"));
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skyline.toml");

        init(&path, false, false).unwrap();
        assert!(path.exists());
        assert!(init(&path, false, false).is_err());
        init(&path, true, false).unwrap();
    }

    #[test]
    fn test_validate_reports_bad_project_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skyline.toml");
        std::fs::write(&path, "[deployment]\nproject_name = \"Not A Label\"\n").unwrap();

        assert!(validate(&path, false).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skyline.yaml");
        std::fs::write(&path, "deployment:\n  project_name: orders\n").unwrap();

        validate(&path, false).unwrap();
    }
}
