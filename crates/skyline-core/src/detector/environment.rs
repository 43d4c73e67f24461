//! Environment variable discovery

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::scanner::ArtifactSet;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::[^}]*)?\}").expect("valid placeholder regex")
});

static ENV_TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("valid env line regex")
});

/// Variable names referenced by configuration
///
/// `${NAME}` and `${NAME:default}` placeholders in runtime configuration,
/// plus every key declared in an `.env.example` template. Build descriptors
/// and Dockerfiles interpolate at build time and are skipped.
pub fn detect_environment(artifacts: &ArtifactSet) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for artifact in artifacts.configs().filter(|a| a.is_runtime_config()) {
        names.extend(
            PLACEHOLDER_RE
                .captures_iter(&artifact.content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        );
        if artifact.file_name() == ".env.example" {
            names.extend(
                ENV_TEMPLATE_RE
                    .captures_iter(&artifact.content)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
            );
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScannedArtifact;

    #[test]
    fn test_placeholders_with_and_without_defaults() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [ScannedArtifact::config(
                "application.yml",
                "url: jdbc:mysql://${DB_HOST:localhost}:${DB_PORT}/app\nkey: ${api.key}\n",
            )],
        );
        let names = detect_environment(&set);
        assert_eq!(
            names,
            BTreeSet::from(["DB_HOST".to_string(), "DB_PORT".to_string()])
        );
    }

    #[test]
    fn test_env_template_keys() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [ScannedArtifact::config(
                ".env.example",
                "# comment\nPORT=3000\nexport REDIS_URL=redis://cache\n\n",
            )],
        );
        let names = detect_environment(&set);
        assert!(names.contains("PORT"));
        assert!(names.contains("REDIS_URL"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_build_time_interpolation_is_ignored() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [
                ScannedArtifact::config(
                    "build.gradle",
                    "implementation \"org.springframework.boot:spring-boot-starter-web:${springBootVersion}\"\n",
                ),
                ScannedArtifact::config("pom.xml", "<version>${revision}</version>"),
                ScannedArtifact::config("Dockerfile", "ARG NODE_VERSION\nFROM node:${NODE_VERSION}\n"),
                ScannedArtifact::config(
                    "docker-compose.yml",
                    "services:\n  api:\n    environment:\n      TOKEN: ${API_TOKEN}\n",
                ),
            ],
        );
        assert_eq!(detect_environment(&set), BTreeSet::from(["API_TOKEN".to_string()]));
    }

    #[test]
    fn test_sources_are_ignored() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [ScannedArtifact::source("index.js", "const x = `${NAME}`")],
        );
        assert!(detect_environment(&set).is_empty());
    }
}
