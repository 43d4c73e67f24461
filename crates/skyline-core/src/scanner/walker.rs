//! Directory walk that collects bounded artifacts

use glob::Pattern;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use super::models::{
    ArtifactKind, ArtifactSet, ScanConfig, ScannedArtifact, extension_of, is_config_name,
    is_source_extension,
};
use super::reader::{count_lines, read_bounded};
use crate::error::{SkylineError, SkylineResult};

/// Pattern for excluding files from scanning
pub enum ExcludePattern {
    /// Exact string match
    Exact(String),
    /// Glob pattern match
    Glob(Pattern),
}

/// Walks a project tree and collects bounded config and source artifacts
pub struct ArtifactScanner {
    root: PathBuf,
    config: ScanConfig,
}

impl ArtifactScanner {
    /// Create a new scanner
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config: ScanConfig::default(),
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Scan the tree.
    ///
    /// Fails only when the root itself is unusable; unreadable entries below
    /// it are skipped and counted.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> SkylineResult<ArtifactSet> {
        if !self.root.exists() {
            return Err(SkylineError::scan(format!(
                "Directory not found: {}",
                self.root.display()
            )));
        }
        if !self.root.is_dir() {
            return Err(SkylineError::scan(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }

        let mut walk = Walk {
            config: &self.config,
            exclude_patterns: build_exclude_patterns(&self.config),
            sampled: HashMap::new(),
            set: ArtifactSet::new(&self.root),
        };
        walk.visit(&self.root, "", 0);

        let set = walk.set;
        info!(
            artifacts = set.len(),
            source_files = set.stats().source_files,
            source_lines = set.stats().source_lines,
            skipped = set.stats().skipped,
            "Scan complete"
        );
        Ok(set)
    }
}

struct Walk<'a> {
    config: &'a ScanConfig,
    exclude_patterns: Vec<ExcludePattern>,
    sampled: HashMap<String, usize>,
    set: ArtifactSet,
}

impl Walk<'_> {
    fn visit(&mut self, dir: &Path, prefix: &str, depth: usize) {
        if depth > self.config.max_depth {
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                self.set.stats_mut().skipped += 1;
                return;
            }
        };

        // Sorted so sampling and results never depend on directory order
        let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                self.set.stats_mut().skipped += 1;
                continue;
            };

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping entry without file type");
                    self.set.stats_mut().skipped += 1;
                    continue;
                }
            };

            let relative = if prefix.is_empty() {
                file_name.clone()
            } else {
                format!("{}/{}", prefix, file_name)
            };

            if file_type.is_dir() {
                if self.is_hidden(&file_name) || should_exclude(&file_name, &self.exclude_patterns)
                {
                    continue;
                }
                self.visit(&path, &relative, depth + 1);
            } else if file_type.is_file() {
                // Env templates are hidden files but still configuration
                if self.is_hidden(&file_name) && !is_config_name(&file_name) {
                    continue;
                }
                if should_exclude(&file_name, &self.exclude_patterns) {
                    continue;
                }
                self.visit_file(&path, relative, &file_name);
            }
        }
    }

    fn visit_file(&mut self, path: &Path, relative: String, file_name: &str) {
        let is_config = is_config_name(file_name);
        if is_config {
            self.collect(path, relative.clone(), ArtifactKind::Config);
        }

        let Some(ext) = extension_of(file_name) else {
            return;
        };
        if !is_source_extension(&ext) {
            return;
        }

        match count_lines(path) {
            Ok(lines) => {
                let stats = self.set.stats_mut();
                stats.source_files += 1;
                stats.source_lines += lines;
                *stats.files_by_extension.entry(ext.clone()).or_default() += 1;
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping uncountable source file");
                self.set.stats_mut().skipped += 1;
                return;
            }
        }

        if is_config {
            return;
        }

        let sampled = self.sampled.get(&ext).copied().unwrap_or(0);
        if sampled >= self.config.max_files_per_extension {
            return;
        }
        if self.collect(path, relative, ArtifactKind::Source) {
            self.sampled.insert(ext, sampled + 1);
        }
    }

    fn collect(&mut self, path: &Path, relative: String, kind: ArtifactKind) -> bool {
        match read_bounded(path, self.config.max_bytes_per_file) {
            Ok(bounded) => {
                let mut artifact = ScannedArtifact::new(relative, bounded.text, kind);
                artifact.truncated = bounded.truncated;
                self.set.insert(artifact);
                true
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable file");
                self.set.stats_mut().skipped += 1;
                false
            }
        }
    }

    fn is_hidden(&self, name: &str) -> bool {
        !self.config.include_hidden && name.starts_with('.')
    }
}

/// Check if a file/directory should be excluded
fn should_exclude(name: &str, exclude_patterns: &[ExcludePattern]) -> bool {
    exclude_patterns.iter().any(|pattern| match pattern {
        ExcludePattern::Exact(exact) => name == exact,
        ExcludePattern::Glob(glob) => glob.matches(name),
    })
}

fn build_exclude_patterns(config: &ScanConfig) -> Vec<ExcludePattern> {
    config
        .exclude_patterns
        .iter()
        .filter_map(|pattern| {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).ok().map(ExcludePattern::Glob)
            } else {
                Some(ExcludePattern::Exact(pattern.clone()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_collects_config_and_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "pom.xml", "<project/>");
        write(root, "src/main/java/App.java", "class App {}\n");
        write(root, "src/main/resources/application.yml", "server:\n  port: 8081\n");
        write(root, "README.md", "# readme");

        let set = ArtifactScanner::new(root).scan().unwrap();

        assert!(set.contains("pom.xml"));
        assert!(set.contains("src/main/java/App.java"));
        assert!(set.contains("src/main/resources/application.yml"));
        assert!(!set.contains("README.md"));
        assert_eq!(set.get("pom.xml").unwrap().kind, ArtifactKind::Config);
        assert_eq!(set.stats().source_files, 1);
        assert_eq!(set.stats().source_lines, 1);
    }

    #[test]
    fn test_scan_caps_files_per_extension_but_counts_all_lines() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..5 {
            write(root, &format!("src/mod{i}.py"), "a = 1\nb = 2\n");
        }

        let config = ScanConfig {
            max_files_per_extension: 2,
            ..Default::default()
        };
        let set = ArtifactScanner::new(root).with_config(config).scan().unwrap();

        assert_eq!(set.sources().count(), 2);
        assert_eq!(set.sampled_by_extension().get("py"), Some(&2));
        assert!(set.contains("src/mod0.py"));
        assert!(set.contains("src/mod1.py"));
        assert_eq!(set.stats().source_files, 5);
        assert_eq!(set.stats().source_lines, 10);
        assert_eq!(set.complexity(), 10 + 5 * 10);
    }

    #[test]
    fn test_scan_bounds_bytes_per_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", &"x".repeat(10_000));

        let config = ScanConfig {
            max_bytes_per_file: 128,
            ..Default::default()
        };
        let set = ArtifactScanner::new(root).with_config(config).scan().unwrap();

        let artifact = set.get("package.json").unwrap();
        assert_eq!(artifact.content.len(), 128);
        assert!(artifact.truncated);
    }

    #[test]
    fn test_scan_skips_binary_and_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("Dockerfile"), [b'F', b'R', 0, 0]).unwrap();
        write(root, "node_modules/react/index.js", "module.exports = {}");
        write(root, ".git/config", "[core]");
        write(root, "index.js", "console.log('hi')");

        let set = ArtifactScanner::new(root).scan().unwrap();

        assert!(!set.contains("Dockerfile"));
        assert!(!set.contains("node_modules/react/index.js"));
        assert!(set.contains("index.js"));
        assert_eq!(set.stats().skipped, 1);
    }

    #[test]
    fn test_scan_keeps_env_template() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, ".env.example", "PORT=3000\n");
        write(root, ".secret", "nope");

        let set = ArtifactScanner::new(root).scan().unwrap();
        assert!(set.contains(".env.example"));
        assert!(!set.contains(".secret"));
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let err = ArtifactScanner::new(&missing).scan().unwrap_err();
        assert!(matches!(err, SkylineError::Scan(_)));
    }

    #[test]
    fn test_scan_glob_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "app.test.js", "test()");
        write(root, "app.js", "run()");

        let config = ScanConfig {
            exclude_patterns: vec!["*.test.js".to_string()],
            ..Default::default()
        };
        let set = ArtifactScanner::new(root).with_config(config).scan().unwrap();
        assert!(set.contains("app.js"));
        assert!(!set.contains("app.test.js"));
    }
}
