//! Build tool and language version

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scanner::ArtifactSet;
use crate::signature::{AppType, BuildConfig};

struct VersionProbe {
    file: &'static str,
    pattern: Regex,
}

impl VersionProbe {
    fn new(file: &'static str, pattern: &str) -> Self {
        Self {
            file,
            pattern: Regex::new(pattern).expect("valid version regex"),
        }
    }

    fn probe(&self, artifacts: &ArtifactSet) -> Option<String> {
        let artifact = artifacts.get(self.file)?;
        let caps = self.pattern.captures(&artifact.content)?;
        let version = caps.get(1)?.as_str().trim();
        (!version.is_empty()).then(|| version.to_string())
    }
}

static JVM_PROBES: Lazy<Vec<VersionProbe>> = Lazy::new(|| {
    vec![
        VersionProbe::new("pom.xml", r"<java\.version>\s*([^<\s]+)\s*</java\.version>"),
        VersionProbe::new(
            "pom.xml",
            r"<maven\.compiler\.(?:source|release)>\s*([^<\s]+)\s*</maven\.compiler\.(?:source|release)>",
        ),
        VersionProbe::new("build.gradle", r"JavaLanguageVersion\.of\(\s*(\d+)\s*\)"),
        VersionProbe::new("build.gradle.kts", r"JavaLanguageVersion\.of\(\s*(\d+)\s*\)"),
        VersionProbe::new(
            "build.gradle",
            r#"sourceCompatibility\s*=\s*['"]?(?:JavaVersion\.VERSION_)?([0-9][0-9._]*)"#,
        ),
        VersionProbe::new(
            "build.gradle.kts",
            r#"sourceCompatibility\s*=\s*['"]?(?:JavaVersion\.VERSION_)?([0-9][0-9._]*)"#,
        ),
    ]
});

static NODE_PROBES: Lazy<Vec<VersionProbe>> = Lazy::new(|| {
    vec![VersionProbe::new(
        "package.json",
        r#""engines"\s*:\s*\{[^}]*"node"\s*:\s*"([^"]+)""#,
    )]
});

static PYTHON_PROBES: Lazy<Vec<VersionProbe>> = Lazy::new(|| {
    vec![
        VersionProbe::new("pyproject.toml", r#"requires-python\s*=\s*"([^"]+)""#),
        VersionProbe::new("setup.py", r#"python_requires\s*=\s*['"]([^'"]+)['"]"#),
    ]
});

static GO_PROBES: Lazy<Vec<VersionProbe>> =
    Lazy::new(|| vec![VersionProbe::new("go.mod", r"(?m)^go\s+(\d+\.\d+(?:\.\d+)?)\s*$")]);

static RUST_PROBES: Lazy<Vec<VersionProbe>> =
    Lazy::new(|| vec![VersionProbe::new("Cargo.toml", r#"rust-version\s*=\s*"([^"]+)""#)]);

fn probes(app_type: AppType) -> &'static [VersionProbe] {
    match app_type {
        AppType::JavaMaven | AppType::JavaGradle => &JVM_PROBES,
        AppType::Nodejs => &NODE_PROBES,
        AppType::Python => &PYTHON_PROBES,
        AppType::Golang => &GO_PROBES,
        AppType::Rust => &RUST_PROBES,
        AppType::Unknown => &[],
    }
}

/// Build settings for the detected application type
pub fn detect_build_config(artifacts: &ArtifactSet, app_type: AppType) -> BuildConfig {
    BuildConfig {
        build_tool: app_type.build_tool(),
        language_version: probes(app_type)
            .iter()
            .find_map(|probe| probe.probe(artifacts)),
        docker_required: artifacts.configs().any(|a| a.is_dockerfile()),
    }
}
