//! Application type and framework rule tables

use once_cell::sync::Lazy;

use super::rules::{Evidence, Indicator, JVM_SOURCES, Rule, RuleSet};
use crate::signature::{AppType, Framework};

use Indicator::{AnyOf, FileContains, FilePresent, SourceContains};

/// Root-level build descriptors, first match decides the application type
pub static APP_TYPE_RULES: Lazy<RuleSet<AppType>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new("maven descriptor", FilePresent("pom.xml"), AppType::JavaMaven),
        Rule::new(
            "gradle descriptor",
            AnyOf(vec![
                FilePresent("build.gradle"),
                FilePresent("build.gradle.kts"),
            ]),
            AppType::JavaGradle,
        ),
        Rule::new("npm manifest", FilePresent("package.json"), AppType::Nodejs),
        Rule::new(
            "python project",
            AnyOf(vec![
                FilePresent("requirements.txt"),
                FilePresent("pyproject.toml"),
                FilePresent("setup.py"),
            ]),
            AppType::Python,
        ),
        Rule::new("go module", FilePresent("go.mod"), AppType::Golang),
        Rule::new("cargo manifest", FilePresent("Cargo.toml"), AppType::Rust),
    ])
});

fn jvm_descriptor_contains(needle: &'static str) -> Indicator {
    AnyOf(vec![
        FileContains("pom.xml", needle),
        FileContains("build.gradle", needle),
        FileContains("build.gradle.kts", needle),
    ])
}

fn python_descriptor_contains(needle: &'static str) -> Indicator {
    AnyOf(vec![
        FileContains("requirements.txt", needle),
        FileContains("pyproject.toml", needle),
        FileContains("setup.py", needle),
    ])
}

static JAVA_FRAMEWORK_RULES: Lazy<RuleSet<Framework>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "spring boot application annotation",
            SourceContains(JVM_SOURCES, "@SpringBootApplication"),
            Framework::SpringBoot,
        ),
        Rule::new(
            "spring boot dependency",
            jvm_descriptor_contains("spring-boot"),
            Framework::SpringBoot,
        ),
        Rule::new(
            "spring controller annotation",
            AnyOf(vec![
                SourceContains(JVM_SOURCES, "@RestController"),
                SourceContains(JVM_SOURCES, "@Controller"),
            ]),
            Framework::Spring,
        ),
        Rule::new(
            "spring dependency",
            jvm_descriptor_contains("spring"),
            Framework::Spring,
        ),
    ])
});

// Quoted keys so "react-dom" alone or a truncated prefix still behaves
static NODE_FRAMEWORK_RULES: Lazy<RuleSet<Framework>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "next dependency",
            FileContains("package.json", "\"next\""),
            Framework::NextJs,
        ),
        Rule::new(
            "react dependency",
            FileContains("package.json", "\"react\""),
            Framework::React,
        ),
        Rule::new(
            "vue dependency",
            FileContains("package.json", "\"vue\""),
            Framework::Vue,
        ),
        Rule::new(
            "angular dependency",
            AnyOf(vec![
                FileContains("package.json", "\"@angular/core\""),
                FileContains("package.json", "\"angular\""),
            ]),
            Framework::Angular,
        ),
        Rule::new(
            "express dependency",
            FileContains("package.json", "\"express\""),
            Framework::Express,
        ),
    ])
});

static PYTHON_FRAMEWORK_RULES: Lazy<RuleSet<Framework>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "django dependency",
            python_descriptor_contains("django"),
            Framework::Django,
        ),
        Rule::new(
            "fastapi dependency",
            python_descriptor_contains("fastapi"),
            Framework::FastApi,
        ),
        Rule::new(
            "flask dependency",
            python_descriptor_contains("flask"),
            Framework::Flask,
        ),
    ])
});

static GO_FRAMEWORK_RULES: Lazy<RuleSet<Framework>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "gin module",
            FileContains("go.mod", "github.com/gin-gonic/gin"),
            Framework::Gin,
        ),
        Rule::new(
            "echo module",
            FileContains("go.mod", "github.com/labstack/echo"),
            Framework::Echo,
        ),
        Rule::new(
            "fiber module",
            FileContains("go.mod", "github.com/gofiber/fiber"),
            Framework::Fiber,
        ),
    ])
});

static RUST_FRAMEWORK_RULES: Lazy<RuleSet<Framework>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "actix crate",
            FileContains("Cargo.toml", "actix-web"),
            Framework::Actix,
        ),
        Rule::new("axum crate", FileContains("Cargo.toml", "axum"), Framework::Axum),
        Rule::new(
            "rocket crate",
            FileContains("Cargo.toml", "rocket"),
            Framework::Rocket,
        ),
    ])
});

static NO_FRAMEWORK_RULES: Lazy<RuleSet<Framework>> = Lazy::new(RuleSet::empty);

/// Framework rule table for an application type
pub fn framework_rules(app_type: AppType) -> &'static RuleSet<Framework> {
    match app_type {
        AppType::JavaMaven | AppType::JavaGradle => &JAVA_FRAMEWORK_RULES,
        AppType::Nodejs => &NODE_FRAMEWORK_RULES,
        AppType::Python => &PYTHON_FRAMEWORK_RULES,
        AppType::Golang => &GO_FRAMEWORK_RULES,
        AppType::Rust => &RUST_FRAMEWORK_RULES,
        AppType::Unknown => &NO_FRAMEWORK_RULES,
    }
}

/// Decide the application type
pub fn detect_app_type(evidence: &Evidence<'_>) -> AppType {
    APP_TYPE_RULES
        .first_match(evidence)
        .map(|rule| rule.outcome)
        .unwrap_or(AppType::Unknown)
}

/// Decide the framework within an application type
pub fn detect_framework(evidence: &Evidence<'_>, app_type: AppType) -> Framework {
    framework_rules(app_type)
        .first_match(evidence)
        .map(|rule| rule.outcome)
        .unwrap_or_else(|| app_type.default_framework())
}
