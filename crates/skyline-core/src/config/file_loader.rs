//! File-based configuration loading

use std::fs;
use std::path::Path;

use super::SkylineConfig;
use crate::error::{SkylineError, SkylineResult};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "skyline.toml";

/// Load configuration from a file
///
/// Supports TOML, JSON and YAML by extension. A missing file yields defaults.
pub fn load_from_file(path: &Path) -> SkylineResult<SkylineConfig> {
    if !path.exists() {
        return Ok(SkylineConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        SkylineError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            SkylineError::config(format!("Failed to parse JSON config '{}': {}", path.display(), e))
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            SkylineError::config(format!("Failed to parse YAML config '{}': {}", path.display(), e))
        })?,
        _ => toml::from_str(&content).map_err(|e| {
            SkylineError::config(format!("Failed to parse TOML config '{}': {}", path.display(), e))
        })?,
    };

    Ok(config)
}

/// Serialize configuration in the format implied by the extension
pub fn render_config(config: &SkylineConfig, path: &Path) -> SkylineResult<String> {
    let text = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::to_string_pretty(config)?,
        Some("yaml") | Some("yml") => serde_yaml::to_string(config)?,
        _ => toml::to_string_pretty(config)?,
    };
    Ok(text)
}

/// Write configuration to a file, creating parent directories
pub fn save_to_file(config: &SkylineConfig, path: &Path) -> SkylineResult<()> {
    let text = render_config(config, path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SkylineError::write(parent, e.to_string()))?;
    }
    fs::write(path, text).map_err(|e| SkylineError::write(path, e.to_string()))
}
