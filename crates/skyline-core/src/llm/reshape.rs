//! Turning a loosely typed reply object into signature parts
//!
//! Field by field: a field that is absent or has the wrong type takes the
//! same default the matcher would use, instead of failing the whole reply.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::assembler::SignatureParts;
use crate::signature::{
    AppType, BuildConfig, BuildTool, DatabaseKind, DatabaseRequirement, DatabaseSize,
    DependencyProfile, Framework, ResourceTier,
};

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn string_set(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn port(value: &Value) -> Option<u16> {
    let number = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u16::try_from(number).ok().filter(|p| *p > 0)
}

fn reshape_database(value: Option<&Value>) -> DatabaseRequirement {
    let Some(object) = value.and_then(Value::as_object) else {
        return DatabaseRequirement::default();
    };

    let kind = string_field(object, "type").and_then(DatabaseKind::parse);
    let required = object
        .get("required")
        .and_then(Value::as_bool)
        .unwrap_or(kind.is_some());

    DatabaseRequirement {
        required,
        kind: kind.filter(|_| required),
        estimated_size: string_field(object, "estimated_size")
            .and_then(DatabaseSize::parse)
            .unwrap_or_default(),
        orm: None,
    }
}

fn reshape_resources(value: Option<&Value>) -> Option<ResourceTier> {
    let object = value.and_then(Value::as_object)?;
    let field = |key: &str| string_field(object, key).unwrap_or_default().to_string();

    Some(ResourceTier {
        cpu_request: field("cpu_request"),
        cpu_limit: field("cpu_limit"),
        memory_request: field("memory_request"),
        memory_limit: field("memory_limit"),
        // Zero marks "absent"; the assembler substitutes the tier default
        replicas: object
            .get("replicas")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
    })
}

fn reshape_dependencies(value: Option<&Value>) -> DependencyProfile {
    let Some(object) = value.and_then(Value::as_object) else {
        return DependencyProfile::default();
    };
    DependencyProfile {
        external_services: string_set(object.get("external_services")),
        third_party_apis: string_set(object.get("third_party_apis")),
        security_requirements: string_set(object.get("security_requirements")),
    }
}

fn reshape_build(value: Option<&Value>, app_type: AppType) -> BuildConfig {
    let Some(object) = value.and_then(Value::as_object) else {
        return BuildConfig {
            build_tool: app_type.build_tool(),
            ..Default::default()
        };
    };

    let language_version = match object.get("language_version") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    BuildConfig {
        build_tool: string_field(object, "build_tool")
            .and_then(BuildTool::parse)
            .or_else(|| app_type.build_tool()),
        language_version,
        docker_required: object
            .get("docker_required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Reshape a reply object; `complexity` comes from the local scan
pub fn reshape_reply(object: &Map<String, Value>, complexity: usize) -> SignatureParts {
    let app_type = string_field(object, "app_type")
        .and_then(AppType::parse)
        .unwrap_or(AppType::Unknown);

    let framework = string_field(object, "framework")
        .and_then(Framework::parse)
        .filter(|framework| app_type.admits(*framework))
        .unwrap_or_else(|| app_type.default_framework());

    let ports = object
        .get("ports")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(port).collect())
        .unwrap_or_default();

    SignatureParts {
        app_type,
        framework,
        database: reshape_database(object.get("database")),
        resources: reshape_resources(object.get("resources")),
        ports,
        environment: string_set(object.get("environment")),
        dependencies: reshape_dependencies(object.get("dependencies")),
        build_config: reshape_build(object.get("build_config"), app_type),
        complexity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_complete_reply() {
        let reply = object(json!({
            "app_type": "java-maven",
            "framework": "spring-boot",
            "database": {"required": true, "type": "postgresql", "estimated_size": "medium"},
            "resources": {"cpu_request": "500m", "cpu_limit": "1000m",
                          "memory_request": "1Gi", "memory_limit": "2Gi", "replicas": 3},
            "ports": [8080, "9090"],
            "environment": ["SPRING_PROFILES_ACTIVE"],
            "dependencies": {"external_services": ["redis"], "third_party_apis": [], "security_requirements": ["jwt"]},
            "build_config": {"build_tool": "maven", "language_version": 17, "docker_required": true}
        }));
        let parts = reshape_reply(&reply, 0);

        assert_eq!(parts.app_type, AppType::JavaMaven);
        assert_eq!(parts.framework, Framework::SpringBoot);
        assert_eq!(parts.database.kind, Some(DatabaseKind::Postgresql));
        assert_eq!(parts.database.estimated_size, DatabaseSize::Medium);
        assert_eq!(parts.resources.as_ref().map(|r| r.replicas), Some(3));
        assert_eq!(parts.ports, BTreeSet::from([8080, 9090]));
        assert_eq!(parts.build_config.language_version.as_deref(), Some("17"));
        assert!(parts.dependencies.uses("redis"));
    }

    #[test]
    fn test_wrong_types_fall_back_per_field() {
        let reply = object(json!({
            "app_type": "nodejs",
            "framework": "spring-boot",
            "database": "yes please",
            "resources": {"replicas": "many"},
            "ports": "8080",
            "environment": [1, "API_KEY", ""],
        }));
        let parts = reshape_reply(&reply, 250);

        assert_eq!(parts.framework, Framework::NodeJs);
        assert!(!parts.database.required);
        assert_eq!(parts.resources.as_ref().map(|r| r.replicas), Some(0));
        assert!(parts.ports.is_empty());
        assert_eq!(parts.environment, BTreeSet::from(["API_KEY".to_string()]));
        assert_eq!(parts.build_config.build_tool, Some(BuildTool::Npm));
        assert_eq!(parts.complexity, 250);
    }

    #[test]
    fn test_empty_object_is_unknown() {
        let parts = reshape_reply(&Map::new(), 0);
        assert_eq!(parts.app_type, AppType::Unknown);
        assert_eq!(parts.framework, Framework::Unknown);
        assert!(parts.resources.is_none());
        assert_eq!(parts.database, DatabaseRequirement::default());
    }

    #[test]
    fn test_database_type_none() {
        let reply = object(json!({"database": {"required": false, "type": "none"}}));
        let parts = reshape_reply(&reply, 0);
        assert_eq!(parts.database.kind, None);
        assert!(!parts.database.required);
    }

    #[test]
    fn test_out_of_range_ports_are_dropped() {
        let reply = object(json!({"ports": [0, 70000, -1, 443]}));
        assert_eq!(reshape_reply(&reply, 0).ports, BTreeSet::from([443]));
    }
}
