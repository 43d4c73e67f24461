//! Persistence detection
//!
//! Two independent tables: persistence framework markers in sources and build
//! descriptors, and engine names in configuration. Either one marks the
//! database as required.

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{
    Evidence, GO_SOURCES, Indicator, JS_SOURCES, JVM_SOURCES, PY_SOURCES, RS_SOURCES, Rule,
    RuleSet,
};
use crate::signature::{DatabaseKind, DatabaseRequirement, DatabaseSize, Orm};

use Indicator::{AnyOf, ConfigContains, ConfigMatches, FileContains, SourceContains};

/// Persistence framework markers
pub static ORM_RULES: Lazy<RuleSet<Orm>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "jpa annotations",
            AnyOf(vec![
                SourceContains(JVM_SOURCES, "@Entity"),
                SourceContains(JVM_SOURCES, "@Repository"),
                SourceContains(JVM_SOURCES, "JpaRepository"),
                ConfigContains("spring-boot-starter-data-jpa"),
            ]),
            Orm::Jpa,
        ),
        Rule::new(
            "mybatis mapper",
            AnyOf(vec![
                SourceContains(JVM_SOURCES, "@Mapper"),
                FileContains("pom.xml", "mybatis"),
                FileContains("build.gradle", "mybatis"),
                FileContains("build.gradle.kts", "mybatis"),
            ]),
            Orm::Mybatis,
        ),
        Rule::new(
            "jdbc template",
            AnyOf(vec![
                SourceContains(JVM_SOURCES, "JdbcTemplate"),
                SourceContains(JVM_SOURCES, "DataSource"),
            ]),
            Orm::Jdbc,
        ),
        Rule::new(
            "django models",
            SourceContains(PY_SOURCES, "models.Model"),
            Orm::DjangoOrm,
        ),
        Rule::new(
            "sqlalchemy",
            AnyOf(vec![
                SourceContains(PY_SOURCES, "sqlalchemy"),
                FileContains("requirements.txt", "sqlalchemy"),
                FileContains("pyproject.toml", "sqlalchemy"),
            ]),
            Orm::Sqlalchemy,
        ),
        Rule::new(
            "prisma client",
            AnyOf(vec![
                SourceContains(JS_SOURCES, "@prisma/client"),
                FileContains("package.json", "\"@prisma/client\""),
            ]),
            Orm::Prisma,
        ),
        Rule::new(
            "typeorm",
            AnyOf(vec![
                SourceContains(JS_SOURCES, "typeorm"),
                FileContains("package.json", "\"typeorm\""),
            ]),
            Orm::Typeorm,
        ),
        Rule::new(
            "sequelize",
            AnyOf(vec![
                SourceContains(JS_SOURCES, "sequelize"),
                FileContains("package.json", "\"sequelize\""),
            ]),
            Orm::Sequelize,
        ),
        Rule::new(
            "mongoose",
            AnyOf(vec![
                SourceContains(JS_SOURCES, "mongoose"),
                FileContains("package.json", "\"mongoose\""),
            ]),
            Orm::Mongoose,
        ),
        Rule::new(
            "gorm",
            AnyOf(vec![
                SourceContains(GO_SOURCES, "gorm.io/gorm"),
                FileContains("go.mod", "gorm.io/gorm"),
            ]),
            Orm::Gorm,
        ),
        Rule::new(
            "diesel",
            AnyOf(vec![
                SourceContains(RS_SOURCES, "diesel::"),
                FileContains("Cargo.toml", "diesel"),
            ]),
            Orm::Diesel,
        ),
        Rule::new(
            "sqlx",
            AnyOf(vec![
                SourceContains(RS_SOURCES, "sqlx::"),
                FileContains("Cargo.toml", "sqlx"),
            ]),
            Orm::Sqlx,
        ),
    ])
});

static H2_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bh2(database)?\b").expect("valid regex"));

/// Engine names in configuration, most specific first
pub static ENGINE_RULES: Lazy<RuleSet<DatabaseKind>> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "postgres",
            AnyOf(vec![ConfigContains("postgres"), ConfigContains("psycopg")]),
            DatabaseKind::Postgresql,
        ),
        Rule::new("mariadb", ConfigContains("mariadb"), DatabaseKind::Mariadb),
        Rule::new("mysql", ConfigContains("mysql"), DatabaseKind::Mysql),
        Rule::new("oracle", ConfigContains("oracle"), DatabaseKind::Oracle),
        Rule::new("h2", ConfigMatches(H2_PATTERN.clone()), DatabaseKind::H2),
        Rule::new("mongodb", ConfigContains("mongodb"), DatabaseKind::Mongodb),
    ])
});

/// Derive the database requirement
pub fn detect_database(evidence: &Evidence<'_>) -> DatabaseRequirement {
    let orm = ORM_RULES.first_match(evidence).map(|rule| rule.outcome);
    let kind = ENGINE_RULES.first_match(evidence).map(|rule| rule.outcome);

    DatabaseRequirement {
        required: orm.is_some() || kind.is_some(),
        kind,
        estimated_size: DatabaseSize::Small,
        orm,
    }
}
