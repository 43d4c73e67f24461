//! Listening port extraction

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::scanner::{ArtifactSet, ScannedArtifact};

static PORT_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([A-Za-z0-9_.\-]*)\bport\b"?\s*[:=]\s*"?(\d{1,5})\b"#)
        .expect("valid port key regex")
});

/// Key segments that put a `port` under a backing service instead of the application
const BACKING_SERVICE_KEYS: &[&str] = &[
    "datasource",
    "database",
    "db",
    "redis",
    "rabbitmq",
    "kafka",
    "mongodb",
    "mongo",
    "elasticsearch",
    "cassandra",
    "mail",
    "smtp",
];

static EXPOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*EXPOSE\s+(.+)$").expect("valid expose regex"));

/// Enclosing YAML keys of the line holding `offset`, outermost first
fn parent_keys(content: &str, offset: usize) -> Vec<&str> {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &content[line_start..];
    let mut indent = line.len() - line.trim_start_matches(' ').len();
    let mut parents = Vec::new();

    for previous in content[..line_start].lines().rev() {
        if indent == 0 {
            break;
        }
        let trimmed = previous.trim_start_matches(' ');
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let previous_indent = previous.len() - trimmed.len();
        if previous_indent < indent {
            if let Some((key, _)) = trimmed.trim_start_matches("- ").split_once(':') {
                parents.push(key.trim().trim_matches('"'));
            }
            indent = previous_indent;
        }
    }

    parents.reverse();
    parents
}

fn names_backing_service(prefix: &str, parents: &[&str]) -> bool {
    parents
        .iter()
        .copied()
        .flat_map(|key| key.split('.'))
        .chain(prefix.split('.'))
        .any(|segment| {
            BACKING_SERVICE_KEYS
                .iter()
                .any(|service| segment.eq_ignore_ascii_case(service))
        })
}

fn parse_port(token: &str) -> Option<u16> {
    let token = token
        .trim()
        .trim_end_matches("/tcp")
        .trim_end_matches("/udp");
    match token.parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => Some(port as u16),
        _ => None,
    }
}

/// Ports declared by key/value configuration
///
/// Keys nested under a backing service (`spring.data.redis.port`, a YAML
/// `datasource:` block) describe a dependency and are not counted.
pub fn config_ports(artifact: &ScannedArtifact) -> BTreeSet<u16> {
    let content = artifact.content.as_str();
    PORT_KEY_RE
        .captures_iter(content)
        .filter(|caps| match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(prefix)) => {
                !names_backing_service(prefix.as_str(), &parent_keys(content, whole.start()))
            }
            _ => false,
        })
        .filter_map(|caps| caps.get(2))
        .filter_map(|m| parse_port(m.as_str()))
        .collect()
}

/// Ports exposed by a container build file
pub fn exposed_ports(artifact: &ScannedArtifact) -> BTreeSet<u16> {
    EXPOSE_RE
        .captures_iter(&artifact.content)
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| m.as_str().split_whitespace().filter_map(parse_port))
        .collect()
}

/// Every declared port in the tree; empty when nothing declares one
pub fn detect_ports(artifacts: &ArtifactSet) -> BTreeSet<u16> {
    let mut ports = BTreeSet::new();
    for artifact in artifacts.configs() {
        if artifact.is_dockerfile() {
            ports.extend(exposed_ports(artifact));
        } else if artifact.is_runtime_config() {
            ports.extend(config_ports(artifact));
        }
    }
    ports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_tokens() {
        let dockerfile = ScannedArtifact::config(
            "Dockerfile",
            "FROM eclipse-temurin:17\nEXPOSE 9090 8443/tcp 53/udp $PORT\nexpose 70000\n",
        );
        let ports = exposed_ports(&dockerfile);
        assert_eq!(ports, BTreeSet::from([53, 8443, 9090]));
    }

    #[test]
    fn test_config_port_keys() {
        let props = ScannedArtifact::config(
            "src/main/resources/application.properties",
            "server.port=8081\nmanagement.server.port: 9001\nport = 0\nsupport=1\n",
        );
        assert_eq!(config_ports(&props), BTreeSet::from([8081, 9001]));

        let json = ScannedArtifact::config("application.json", r#"{"port": 4000}"#);
        assert_eq!(config_ports(&json), BTreeSet::from([4000]));
    }

    #[test]
    fn test_backing_service_ports_are_skipped() {
        let props = ScannedArtifact::config(
            "application.properties",
            "server.port=8081\nspring.data.redis.port=6379\nspring.rabbitmq.port=5672\n",
        );
        assert_eq!(config_ports(&props), BTreeSet::from([8081]));

        let yaml = ScannedArtifact::config(
            "src/main/resources/application.yml",
            "spring:\n  data:\n    redis:\n      host: cache\n\n      port: 6379\n  kafka:\n    port: 9092\nserver:\n  port: 8081\n",
        );
        assert_eq!(config_ports(&yaml), BTreeSet::from([8081]));

        let compose = ScannedArtifact::config(
            "docker-compose.yml",
            "services:\n  api:\n    environment:\n      PORT: 7000\n  redis:\n    environment:\n      PORT: 6379\n",
        );
        assert_eq!(config_ports(&compose), BTreeSet::from([7000]));
    }

    #[test]
    fn test_only_runtime_config_and_dockerfiles_count() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [
                ScannedArtifact::config("package.json", r#"{"config":{"port": 1234}}"#),
                ScannedArtifact::config(".env.example", "PORT=3001\n"),
                ScannedArtifact::config("docker/Dockerfile", "EXPOSE 9090\n"),
                ScannedArtifact::config(
                    "docker-compose.yml",
                    "services:\n  api:\n    environment:\n      PORT: 7000\n",
                ),
            ],
        );
        assert_eq!(detect_ports(&set), BTreeSet::from([3001, 7000, 9090]));
    }

    #[test]
    fn test_nothing_declared() {
        let set = ArtifactSet::from_artifacts("/repo", [ScannedArtifact::config("pom.xml", "")]);
        assert!(detect_ports(&set).is_empty());
    }
}
