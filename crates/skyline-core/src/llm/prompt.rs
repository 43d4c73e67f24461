//! Prompt construction for the inference delegate

use crate::scanner::ArtifactSet;
use crate::signature::AppType;

/// Maximum characters quoted from any one artifact
pub const EXCERPT_CHARS: usize = 500;

const RESPONSE_SCHEMA: &str = r#"{
  "app_type": "<app types>",
  "framework": "<framework name>",
  "database": {
    "required": true,
    "type": "mysql|postgresql|mariadb|oracle|h2|mongodb|none",
    "estimated_size": "small|medium|large"
  },
  "resources": {
    "cpu_request": "250m",
    "cpu_limit": "500m",
    "memory_request": "512Mi",
    "memory_limit": "1Gi",
    "replicas": 2
  },
  "ports": [8080],
  "environment": ["DB_HOST"],
  "dependencies": {
    "external_services": ["redis"],
    "third_party_apis": [],
    "security_requirements": []
  },
  "build_config": {
    "build_tool": "maven|gradle|npm|pip|go|cargo",
    "language_version": "17",
    "docker_required": true
  }
}"#;

/// First `max` characters of `text`, on a character boundary
pub fn excerpt(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Build the analysis prompt for an artifact set
pub fn build_analysis_prompt(artifacts: &ArtifactSet) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a DevOps engineer sizing cloud infrastructure for an application.\n\
         Analyze the files below and describe what the application needs to run.\n\n",
    );

    // Configs first: descriptors carry the strongest signal
    for artifact in artifacts.configs().chain(artifacts.sources()) {
        let quoted = excerpt(&artifact.content, EXCERPT_CHARS);
        prompt.push_str(&format!("=== {} ===\n{}", artifact.path, quoted));
        if quoted.len() < artifact.content.len() || artifact.truncated {
            prompt.push_str("\n...");
        }
        prompt.push_str("\n\n");
    }

    let stats = artifacts.stats();
    prompt.push_str(&format!(
        "The tree holds {} source files with {} lines in total.\n\n",
        stats.source_files, stats.source_lines
    ));

    let app_types: Vec<&str> = AppType::ALL.iter().map(AppType::name).collect();
    prompt.push_str("Respond with a single JSON object in exactly this shape:\n\n");
    prompt.push_str(&RESPONSE_SCHEMA.replace("<app types>", &app_types.join("|")));
    prompt.push_str(
        "\n\nUse the framework names spring-boot, spring, java, nextjs, react, vue, angular, \
         express, nodejs, django, fastapi, flask, python, gin, echo, fiber, golang, actix, \
         axum, rocket, rust or unknown.\nProvide only the JSON object, no additional text.\n",
    );

    prompt
}
