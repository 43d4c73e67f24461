//! Configuration renderers
//!
//! Pure functions of a [`ProjectSignature`] and [`DeploymentParams`]. The same
//! inputs always produce byte-identical output, in a fixed order.

pub mod kubernetes;
pub mod terraform;
pub mod writer;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::DeploymentParams;
use crate::signature::ProjectSignature;

pub use writer::ArtifactWriter;

/// Label value stamped on every generated resource
pub const MANAGED_BY: &str = "skyline";

/// One generated configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    /// Path relative to the output directory
    pub relative_path: String,
    pub content: String,
}

impl RenderedArtifact {
    /// Create a new artifact
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

/// Render every artifact for a signature
#[instrument(skip_all, fields(project = %params.project_name, framework = %signature.framework))]
pub fn render_all(signature: &ProjectSignature, params: &DeploymentParams) -> Vec<RenderedArtifact> {
    let mut artifacts = terraform::render(signature, params);
    artifacts.extend(kubernetes::render(signature, params));
    info!(count = artifacts.len(), "Rendered artifacts");
    artifacts
}

/// Double-quoted scalar, valid in both YAML and HCL
pub(crate) fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("plain"), "\"plain\"");
        assert_eq!(quoted("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }
}
