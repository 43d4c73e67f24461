//! Command implementations

pub mod analyze;
pub mod config;
pub mod generate;
pub mod report;

use anyhow::Context as _;
use skyline_core::config::{DEFAULT_CONFIG_FILE, apply_env_overrides, load_from_file};
use skyline_core::llm::AnthropicEndpoint;
use skyline_core::{
    DeploymentParams, HeuristicClassifier, InferenceClassifier, Pipeline, PipelineOutcome,
    SkylineConfig,
};
use std::path::{Path, PathBuf};

use crate::args::AnalysisArgs;
use crate::console::CliConsole;

/// Expand `~` and environment references in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Config file to use: explicit flag, then `./skyline.toml`, then the user config dir
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return expand_path(path);
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|dir| dir.join("skyline").join(DEFAULT_CONFIG_FILE))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Load configuration and apply environment overrides
pub fn load_config(path: &Path) -> anyhow::Result<SkylineConfig> {
    let mut config = load_from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Deployment parameters with command-line overrides applied
pub fn deployment_params(config: &SkylineConfig, analysis: &AnalysisArgs) -> DeploymentParams {
    let mut params = config.deployment.clone();
    if let Some(project) = &analysis.project {
        params.project_name = project.clone();
    }
    params
}

/// Build a pipeline with the requested classification strategy
pub fn build_pipeline(
    config: &mut SkylineConfig,
    analysis: &AnalysisArgs,
    params: DeploymentParams,
) -> anyhow::Result<Pipeline> {
    if analysis.use_inference {
        config.inference.enabled = true;
    }
    let mut checked = config.clone();
    checked.deployment = params.clone();
    checked.validate()?;

    let pipeline = if config.inference.enabled {
        let endpoint = AnthropicEndpoint::from_config(&config.inference)?;
        Pipeline::new(
            InferenceClassifier::new(
                endpoint,
                config.inference.model.clone(),
                config.inference.max_tokens,
            ),
            params,
        )
    } else {
        Pipeline::new(HeuristicClassifier::new(), params)
    };

    Ok(pipeline.with_scan_config(config.scan.clone()))
}

/// Run the pipeline behind a spinner
pub async fn run_pipeline(
    console: &mut CliConsole,
    pipeline: &Pipeline,
    root: &Path,
) -> anyhow::Result<PipelineOutcome> {
    console.start_spinner(&format!("Analyzing {}", root.display()));
    let outcome = pipeline.run(root).await;
    console.finish_spinner();
    Ok(outcome?)
}
