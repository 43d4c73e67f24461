//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "skyline")]
#[command(about = "Skyline - infer infrastructure from a source tree")]
#[command(
    long_about = r#"Skyline - infer infrastructure from a source tree

USAGE:
  skyline analyze <path>                  # Classify a project
  skyline generate <path> -o <dir>        # Render Terraform and Kubernetes files
  skyline report <path>                   # Print the analysis report

CONFIGURATION:
  skyline config init                     # Create skyline.toml
  skyline config show                     # Show the effective configuration
  skyline config validate                 # Check the configuration"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (toml, json or yaml)
    #[arg(long, global = true)]
    pub config_file: Option<String>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the commands that run the analysis
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisArgs {
    /// Project directory
    pub path: String,

    /// Classify with the external inference endpoint, falling back locally
    #[arg(long)]
    pub use_inference: bool,

    /// Project name for generated resources
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a project and print its signature
    Analyze {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the signature as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render configuration files into a directory
    Generate {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output directory
        #[arg(long, short)]
        output: String,

        /// Container image reference
        #[arg(long)]
        image: Option<String>,

        /// Public host name for the ingress
        #[arg(long)]
        domain: Option<String>,

        /// Stage a review request next to the generated files
        #[arg(long)]
        review: bool,
    },

    /// Produce the analysis report
    Report {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<String>,

        /// Emit the JSON summary instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Create a new configuration file with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the effective configuration
    Show,

    /// Validate the configuration
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_args() {
        let cli = Cli::try_parse_from(["skyline", "analyze", "./app", "--json"]).unwrap();
        match cli.command {
            Commands::Analyze { analysis, json } => {
                assert_eq!(analysis.path, "./app");
                assert!(json);
                assert!(!analysis.use_inference);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_generate_requires_output() {
        assert!(Cli::try_parse_from(["skyline", "generate", "./app"]).is_err());

        let cli = Cli::try_parse_from([
            "skyline",
            "generate",
            "./app",
            "-o",
            "./infra",
            "--use-inference",
            "--review",
            "--project",
            "shop",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                analysis,
                output,
                review,
                ..
            } => {
                assert_eq!(output, "./infra");
                assert!(review);
                assert!(analysis.use_inference);
                assert_eq!(analysis.project.as_deref(), Some("shop"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "skyline",
            "config",
            "validate",
            "--config-file",
            "custom.yaml",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config_file.as_deref(), Some("custom.yaml"));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Validate
            }
        ));
    }

    #[test]
    fn test_report_defaults_to_stdout() {
        let cli = Cli::try_parse_from(["skyline", "report", "."]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report { output: None, json: false, .. }
        ));
    }
}
