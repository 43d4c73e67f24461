//! External services, third-party APIs and security markers
//!
//! Unlike the precedence tables, every matching rule contributes here.

use once_cell::sync::Lazy;

use super::rules::{Evidence, Indicator, Rule, RuleSet};
use crate::signature::DependencyProfile;

use Indicator::{AnyContains, AnyOf};

fn keyword(name: &'static str) -> Rule<&'static str> {
    Rule::new(name, AnyContains(name), name)
}

fn keywords(name: &'static str, needles: &[&'static str]) -> Rule<&'static str> {
    Rule::new(
        name,
        AnyOf(needles.iter().copied().map(AnyContains).collect()),
        name,
    )
}

pub static SERVICE_RULES: Lazy<RuleSet<&'static str>> = Lazy::new(|| {
    RuleSet::new(vec![
        keyword("redis"),
        keyword("memcached"),
        keyword("elasticsearch"),
        keyword("opensearch"),
        keyword("kafka"),
        keywords("rabbitmq", &["rabbitmq", "spring-boot-starter-amqp", "amqplib"]),
    ])
});

pub static API_RULES: Lazy<RuleSet<&'static str>> = Lazy::new(|| {
    RuleSet::new(vec![
        keyword("stripe"),
        keyword("twilio"),
        keyword("sendgrid"),
        keywords("slack", &["hooks.slack.com", "slack-sdk", "slack_sdk", "@slack/"]),
        keyword("openai"),
        keywords(
            "aws",
            &["aws-sdk", "@aws-sdk/", "boto3", "software.amazon.awssdk", "aws-sdk-go"],
        ),
    ])
});

pub static SECURITY_RULES: Lazy<RuleSet<&'static str>> = Lazy::new(|| {
    RuleSet::new(vec![
        keywords(
            "spring-security",
            &["spring-boot-starter-security", "spring-security"],
        ),
        keyword("oauth2"),
        keywords("jwt", &["jsonwebtoken", "jjwt", "pyjwt", "jwt"]),
        keywords(
            "tls",
            &["server.ssl", "key-store", "https.createserver", "ssl_certfile"],
        ),
    ])
});

fn matched(rules: &RuleSet<&'static str>, evidence: &Evidence<'_>) -> impl Iterator<Item = String> {
    rules
        .all_matches(evidence)
        .into_iter()
        .map(|rule| rule.outcome.to_string())
}

/// Collect every dependency marker present in the tree
pub fn detect_dependencies(evidence: &Evidence<'_>) -> DependencyProfile {
    DependencyProfile {
        external_services: matched(&SERVICE_RULES, evidence).collect(),
        third_party_apis: matched(&API_RULES, evidence).collect(),
        security_requirements: matched(&SECURITY_RULES, evidence).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ArtifactSet, ScannedArtifact};

    #[test]
    fn test_services_from_config_and_source() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [
                ScannedArtifact::config("package.json", r#"{"dependencies":{"ioredis":"5","stripe":"14"}}"#),
                ScannedArtifact::source("src/events.ts", "import { Kafka } from 'kafkajs'"),
            ],
        );
        let profile = detect_dependencies(&Evidence::new(&set));

        assert!(profile.uses("redis"));
        assert!(profile.uses("kafka"));
        assert!(!profile.uses("rabbitmq"));
        assert!(profile.third_party_apis.contains("stripe"));
        assert!(profile.security_requirements.is_empty());
    }

    #[test]
    fn test_security_markers() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [ScannedArtifact::config(
                "pom.xml",
                "<artifactId>spring-boot-starter-security</artifactId><artifactId>jjwt-api</artifactId>",
            )],
        );
        let profile = detect_dependencies(&Evidence::new(&set));
        let security: Vec<&str> = profile.security_requirements.iter().map(String::as_str).collect();
        assert_eq!(security, vec!["jwt", "spring-security"]);
    }

    #[test]
    fn test_empty_tree() {
        let set = ArtifactSet::new("/repo");
        assert!(detect_dependencies(&Evidence::new(&set)).is_empty());
    }
}
