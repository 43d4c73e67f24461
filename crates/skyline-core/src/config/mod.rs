//! Configuration management for Skyline

pub mod deployment;
pub mod env_loader;
pub mod file_loader;
pub mod inference;
pub mod logging;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::scanner::ScanConfig;

pub use deployment::DeploymentParams;
pub use env_loader::apply_env_overrides;
pub use file_loader::{DEFAULT_CONFIG_FILE, load_from_file, render_config, save_to_file};
pub use inference::InferenceConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use validation::ConfigValidator;

/// Complete Skyline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkylineConfig {
    pub scan: ScanConfig,
    pub deployment: DeploymentParams,
    pub inference: InferenceConfig,
    pub logging: LoggingConfig,
}

impl SkylineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> crate::error::SkylineResult<()> {
        ConfigValidator::validate(self)
    }
}
