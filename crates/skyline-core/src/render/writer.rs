//! Filesystem output for rendered artifacts

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::RenderedArtifact;
use crate::error::{SkylineError, SkylineResult};

/// Writes rendered artifacts under an output root
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every artifact, replacing existing files
    ///
    /// Stops at the first failure; files already written are left in place.
    #[instrument(skip(self, artifacts), fields(root = %self.root.display(), count = artifacts.len()))]
    pub fn write_all(&self, artifacts: &[RenderedArtifact]) -> SkylineResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            written.push(self.write(artifact)?);
        }
        Ok(written)
    }

    /// Write one artifact
    pub fn write(&self, artifact: &RenderedArtifact) -> SkylineResult<PathBuf> {
        let relative = Path::new(&artifact.relative_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(SkylineError::write(
                &artifact.relative_path,
                "artifact path escapes the output directory",
            ));
        }

        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SkylineError::write(parent.display().to_string(), e.to_string()))?;
        }
        std::fs::write(&path, &artifact.content)
            .map_err(|e| SkylineError::write(path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), bytes = artifact.content.len(), "Wrote artifact");
        Ok(path)
    }
}
