//! Data models for artifact scanning

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Build descriptors and runtime configuration files collected regardless of count
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "go.mod",
    "Cargo.toml",
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
    ".env.example",
];

/// Source extensions that are sampled and counted toward complexity
pub const SOURCE_EXTENSIONS: &[&str] = &["java", "kt", "js", "jsx", "ts", "tsx", "py", "go", "rs"];

/// Extensions accepted for `application.*` runtime configuration
const APPLICATION_CONFIG_EXTENSIONS: &[&str] = &["yml", "yaml", "properties", "json", "toml", "conf"];

/// Per-file constant added to the line count when scoring complexity
pub const COMPLEXITY_PER_FILE: usize = 10;

/// Artifact scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum directory depth for scanning
    pub max_depth: usize,
    /// Maximum number of source files sampled per extension
    pub max_files_per_extension: usize,
    /// Maximum number of bytes read from any single file
    pub max_bytes_per_file: usize,
    /// Include hidden files and directories
    pub include_hidden: bool,
    /// Exclude patterns (exact names or globs)
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_files_per_extension: 10,
            max_bytes_per_file: 4096,
            include_hidden: false,
            exclude_patterns: vec![
                "node_modules".to_string(),
                "target".to_string(),
                ".git".to_string(),
                "__pycache__".to_string(),
                "venv".to_string(),
                ".venv".to_string(),
                "dist".to_string(),
                "build".to_string(),
                ".next".to_string(),
                ".nuxt".to_string(),
                "coverage".to_string(),
                "vendor".to_string(),
            ],
        }
    }
}

/// Artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Config,
    Source,
}

/// Bounded text read from one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedArtifact {
    /// Path relative to the scan root, `/`-separated
    pub path: String,
    /// At most `max_bytes_per_file` bytes of UTF-8 text
    pub content: String,
    pub kind: ArtifactKind,
    /// Whether the file was longer than the read bound
    #[serde(default)]
    pub truncated: bool,
}

impl ScannedArtifact {
    /// Create a new artifact
    pub fn new(path: impl Into<String>, content: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind,
            truncated: false,
        }
    }

    /// Create a config artifact
    pub fn config(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, ArtifactKind::Config)
    }

    /// Create a source artifact
    pub fn source(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, ArtifactKind::Source)
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased extension, if any
    pub fn extension(&self) -> Option<String> {
        extension_of(self.file_name())
    }

    /// Whether the file sits directly in the scan root
    pub fn is_root_level(&self) -> bool {
        !self.path.contains('/')
    }

    /// Whether this is a container build file
    pub fn is_dockerfile(&self) -> bool {
        is_dockerfile_name(self.file_name())
    }

    /// Whether this is a runtime configuration file (`application.*`, compose, env template)
    pub fn is_runtime_config(&self) -> bool {
        let name = self.file_name();
        is_application_config_name(name)
            || name == ".env.example"
            || name.starts_with("docker-compose.")
            || name.starts_with("compose.")
    }
}

/// Scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Recognized source files in the tree (sampled or not)
    pub source_files: usize,
    /// Lines across all recognized source files
    pub source_lines: usize,
    /// Recognized source files by extension
    pub files_by_extension: BTreeMap<String, usize>,
    /// Entries that could not be read and were skipped
    pub skipped: usize,
}

/// Scanned artifacts keyed by relative path, plus tree statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    root: PathBuf,
    artifacts: BTreeMap<String, ScannedArtifact>,
    stats: ScanStats,
}

impl ArtifactSet {
    /// Create an empty set for `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            artifacts: BTreeMap::new(),
            stats: ScanStats::default(),
        }
    }

    /// Build a set from in-memory artifacts
    pub fn from_artifacts(
        root: impl AsRef<Path>,
        artifacts: impl IntoIterator<Item = ScannedArtifact>,
    ) -> Self {
        let mut set = Self::new(root);
        for artifact in artifacts {
            set.insert(artifact);
        }
        set
    }

    /// Replace the statistics
    pub fn with_stats(mut self, stats: ScanStats) -> Self {
        self.stats = stats;
        self
    }

    pub(crate) fn insert(&mut self, artifact: ScannedArtifact) {
        self.artifacts.insert(artifact.path.clone(), artifact);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ScanStats {
        &mut self.stats
    }

    /// Scan root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up an artifact by relative path
    pub fn get(&self, path: &str) -> Option<&ScannedArtifact> {
        self.artifacts.get(path)
    }

    /// Whether an artifact exists at `path`
    pub fn contains(&self, path: &str) -> bool {
        self.artifacts.contains_key(path)
    }

    /// All artifacts in path order
    pub fn iter(&self) -> impl Iterator<Item = &ScannedArtifact> {
        self.artifacts.values()
    }

    /// Config artifacts in path order
    pub fn configs(&self) -> impl Iterator<Item = &ScannedArtifact> {
        self.iter().filter(|a| a.kind == ArtifactKind::Config)
    }

    /// Source artifacts in path order
    pub fn sources(&self) -> impl Iterator<Item = &ScannedArtifact> {
        self.iter().filter(|a| a.kind == ArtifactKind::Source)
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether nothing was read
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Tree statistics
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Complexity score: source lines plus a per-file constant
    pub fn complexity(&self) -> usize {
        self.stats.source_lines + self.stats.source_files * COMPLEXITY_PER_FILE
    }

    /// Sampled artifacts grouped by extension
    pub fn sampled_by_extension(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for artifact in self.sources() {
            if let Some(ext) = artifact.extension() {
                *counts.entry(ext).or_default() += 1;
            }
        }
        counts
    }
}

/// Lowercased extension of a file name
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether the name is a container build file
pub fn is_dockerfile_name(name: &str) -> bool {
    name == "Dockerfile" || name.starts_with("Dockerfile.") || name.ends_with(".dockerfile")
}

/// Whether the name is an `application.*` / `application-<profile>.*` config file
pub fn is_application_config_name(name: &str) -> bool {
    if !(name.starts_with("application.") || name.starts_with("application-")) {
        return false;
    }
    extension_of(name)
        .map(|ext| APPLICATION_CONFIG_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Whether the name is collected as a config artifact
pub fn is_config_name(name: &str) -> bool {
    CONFIG_FILE_NAMES.contains(&name) || is_dockerfile_name(name) || is_application_config_name(name)
}

/// Whether the extension marks a recognized source file
pub fn is_source_extension(ext: &str) -> bool {
    SOURCE_EXTENSIONS.contains(&ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_name_recognition() {
        assert!(is_config_name("pom.xml"));
        assert!(is_config_name("Dockerfile"));
        assert!(is_config_name("Dockerfile.prod"));
        assert!(is_config_name("application.yml"));
        assert!(is_config_name("application-prod.properties"));
        assert!(!is_config_name("application.java"));
        assert!(!is_config_name("README.md"));
    }

    #[test]
    fn test_artifact_path_helpers() {
        let artifact = ScannedArtifact::config("src/main/resources/application.yml", "");
        assert_eq!(artifact.file_name(), "application.yml");
        assert_eq!(artifact.extension().as_deref(), Some("yml"));
        assert!(!artifact.is_root_level());
        assert!(artifact.is_runtime_config());

        let pom = ScannedArtifact::config("pom.xml", "");
        assert!(pom.is_root_level());
        assert!(!pom.is_runtime_config());
    }

    #[test]
    fn test_complexity_adds_per_file_constant() {
        let set = ArtifactSet::new("/repo").with_stats(ScanStats {
            source_files: 3,
            source_lines: 42,
            ..Default::default()
        });
        assert_eq!(set.complexity(), 72);
    }

    #[test]
    fn test_extension_of_dotfile_has_none() {
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("Main.JAVA").as_deref(), Some("java"));
    }
}
