//! Closed enumerations used by the project signature

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application type, decided by the root build descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    JavaMaven,
    JavaGradle,
    Nodejs,
    Python,
    Golang,
    Rust,
    Unknown,
}

impl AppType {
    /// Every application type, in detection order
    pub const ALL: [AppType; 7] = [
        Self::JavaMaven,
        Self::JavaGradle,
        Self::Nodejs,
        Self::Python,
        Self::Golang,
        Self::Rust,
        Self::Unknown,
    ];

    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaMaven => "java-maven",
            Self::JavaGradle => "java-gradle",
            Self::Nodejs => "nodejs",
            Self::Python => "python",
            Self::Golang => "golang",
            Self::Rust => "rust",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire name, tolerating a few spellings seen in model replies
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let app_type = match normalized.as_str() {
            "java-maven" | "maven" => Self::JavaMaven,
            "java-gradle" | "gradle" => Self::JavaGradle,
            "nodejs" | "node" | "node.js" | "javascript" | "typescript" => Self::Nodejs,
            "python" => Self::Python,
            "golang" | "go" => Self::Golang,
            "rust" => Self::Rust,
            "unknown" => Self::Unknown,
            _ => return None,
        };
        Some(app_type)
    }

    /// Frameworks that may be reported for this application type
    pub fn framework_candidates(&self) -> &'static [Framework] {
        match self {
            Self::JavaMaven | Self::JavaGradle => {
                &[Framework::SpringBoot, Framework::Spring, Framework::Java]
            }
            Self::Nodejs => &[
                Framework::NextJs,
                Framework::React,
                Framework::Vue,
                Framework::Angular,
                Framework::Express,
                Framework::NodeJs,
            ],
            Self::Python => &[
                Framework::Django,
                Framework::FastApi,
                Framework::Flask,
                Framework::Python,
            ],
            Self::Golang => &[
                Framework::Gin,
                Framework::Echo,
                Framework::Fiber,
                Framework::Golang,
            ],
            Self::Rust => &[
                Framework::Actix,
                Framework::Axum,
                Framework::Rocket,
                Framework::Rust,
            ],
            Self::Unknown => &[Framework::Unknown],
        }
    }

    /// Generic framework used when no framework rule matches
    pub fn default_framework(&self) -> Framework {
        match self {
            Self::JavaMaven | Self::JavaGradle => Framework::Java,
            Self::Nodejs => Framework::NodeJs,
            Self::Python => Framework::Python,
            Self::Golang => Framework::Golang,
            Self::Rust => Framework::Rust,
            Self::Unknown => Framework::Unknown,
        }
    }

    /// Whether `framework` belongs to this application type
    pub fn admits(&self, framework: Framework) -> bool {
        self.framework_candidates().contains(&framework)
    }

    /// Build tool implied by the application type
    pub fn build_tool(&self) -> Option<BuildTool> {
        match self {
            Self::JavaMaven => Some(BuildTool::Maven),
            Self::JavaGradle => Some(BuildTool::Gradle),
            Self::Nodejs => Some(BuildTool::Npm),
            Self::Python => Some(BuildTool::Pip),
            Self::Golang => Some(BuildTool::Go),
            Self::Rust => Some(BuildTool::Cargo),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource tier class a framework falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierClass {
    Base,
    Backend,
    Frontend,
}

/// Framework type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Framework {
    // JVM
    #[serde(rename = "spring-boot")]
    SpringBoot,
    #[serde(rename = "spring")]
    Spring,
    #[serde(rename = "java")]
    Java,
    // Node
    #[serde(rename = "nextjs")]
    NextJs,
    #[serde(rename = "react")]
    React,
    #[serde(rename = "vue")]
    Vue,
    #[serde(rename = "angular")]
    Angular,
    #[serde(rename = "express")]
    Express,
    #[serde(rename = "nodejs")]
    NodeJs,
    // Python
    #[serde(rename = "django")]
    Django,
    #[serde(rename = "fastapi")]
    FastApi,
    #[serde(rename = "flask")]
    Flask,
    #[serde(rename = "python")]
    Python,
    // Go
    #[serde(rename = "gin")]
    Gin,
    #[serde(rename = "echo")]
    Echo,
    #[serde(rename = "fiber")]
    Fiber,
    #[serde(rename = "golang")]
    Golang,
    // Rust
    #[serde(rename = "actix")]
    Actix,
    #[serde(rename = "axum")]
    Axum,
    #[serde(rename = "rocket")]
    Rocket,
    #[serde(rename = "rust")]
    Rust,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Framework {
    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpringBoot => "spring-boot",
            Self::Spring => "spring",
            Self::Java => "java",
            Self::NextJs => "nextjs",
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Express => "express",
            Self::NodeJs => "nodejs",
            Self::Django => "django",
            Self::FastApi => "fastapi",
            Self::Flask => "flask",
            Self::Python => "python",
            Self::Gin => "gin",
            Self::Echo => "echo",
            Self::Fiber => "fiber",
            Self::Golang => "golang",
            Self::Actix => "actix",
            Self::Axum => "axum",
            Self::Rocket => "rocket",
            Self::Rust => "rust",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a framework name, accepting the spellings models tend to produce
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let framework = match normalized.as_str() {
            "spring-boot" | "springboot" => Self::SpringBoot,
            "spring" | "spring-mvc" => Self::Spring,
            "java" => Self::Java,
            "nextjs" | "next.js" | "next" => Self::NextJs,
            "react" | "reactjs" => Self::React,
            "vue" | "vuejs" | "vue.js" => Self::Vue,
            "angular" => Self::Angular,
            "express" | "expressjs" => Self::Express,
            "nodejs" | "node" | "node.js" => Self::NodeJs,
            "django" => Self::Django,
            "fastapi" | "fast-api" => Self::FastApi,
            "flask" => Self::Flask,
            "python" => Self::Python,
            "gin" => Self::Gin,
            "echo" => Self::Echo,
            "fiber" => Self::Fiber,
            "golang" | "go" => Self::Golang,
            "actix" | "actix-web" => Self::Actix,
            "axum" => Self::Axum,
            "rocket" => Self::Rocket,
            "rust" => Self::Rust,
            "unknown" => Self::Unknown,
            _ => return None,
        };
        Some(framework)
    }

    /// Tier class selected by exact framework match
    pub fn tier_class(&self) -> TierClass {
        match self {
            Self::SpringBoot => TierClass::Backend,
            Self::React | Self::Vue | Self::Angular => TierClass::Frontend,
            _ => TierClass::Base,
        }
    }

    /// Port assumed when nothing in the tree declares one
    pub fn default_port(&self) -> u16 {
        match self {
            Self::React | Self::Vue | Self::Angular | Self::NextJs | Self::Express => 3000,
            Self::Django | Self::FastApi | Self::Rocket => 8000,
            Self::Flask => 5000,
            _ => 8080,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Postgresql,
    Mysql,
    Mariadb,
    Oracle,
    H2,
    Mongodb,
}

impl DatabaseKind {
    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Oracle => "oracle",
            Self::H2 => "h2",
            Self::Mongodb => "mongodb",
        }
    }

    /// Parse an engine name; "none" and unknown engines yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "aurora-postgresql" => Self::Postgresql,
            "mysql" | "aurora-mysql" | "aurora" => Self::Mysql,
            "mariadb" => Self::Mariadb,
            "oracle" => Self::Oracle,
            "h2" => Self::H2,
            "mongodb" | "mongo" | "documentdb" => Self::Mongodb,
            _ => return None,
        };
        Some(kind)
    }

    /// Default listener port of the engine
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgresql => 5432,
            Self::Mysql | Self::Mariadb | Self::H2 => 3306,
            Self::Oracle => 1521,
            Self::Mongodb => 27017,
        }
    }

    /// RDS engine identifier used in Terraform
    pub fn rds_engine(&self) -> &'static str {
        match self {
            Self::Postgresql => "postgres",
            Self::Mariadb => "mariadb",
            Self::Oracle => "oracle-se2",
            // h2 is an embedded engine; provision mysql for the managed instance
            Self::Mysql | Self::H2 => "mysql",
            Self::Mongodb => "docdb",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Estimated database size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl DatabaseSize {
    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Parse a size name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }

    /// RDS instance class for the size
    pub fn instance_class(&self) -> &'static str {
        match self {
            Self::Small => "db.t3.micro",
            Self::Medium => "db.t3.medium",
            Self::Large => "db.r6g.large",
        }
    }
}

/// Persistence framework that implied a database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orm {
    Jpa,
    Mybatis,
    Jdbc,
    Sqlalchemy,
    DjangoOrm,
    Prisma,
    Sequelize,
    Typeorm,
    Mongoose,
    Gorm,
    Diesel,
    Sqlx,
}

impl Orm {
    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jpa => "jpa",
            Self::Mybatis => "mybatis",
            Self::Jdbc => "jdbc",
            Self::Sqlalchemy => "sqlalchemy",
            Self::DjangoOrm => "django-orm",
            Self::Prisma => "prisma",
            Self::Sequelize => "sequelize",
            Self::Typeorm => "typeorm",
            Self::Mongoose => "mongoose",
            Self::Gorm => "gorm",
            Self::Diesel => "diesel",
            Self::Sqlx => "sqlx",
        }
    }
}

/// Build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
    Npm,
    Pip,
    Go,
    Cargo,
}

impl BuildTool {
    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::Npm => "npm",
            Self::Pip => "pip",
            Self::Go => "go",
            Self::Cargo => "cargo",
        }
    }

    /// Parse a build tool name
    pub fn parse(value: &str) -> Option<Self> {
        let tool = match value.trim().to_ascii_lowercase().as_str() {
            "maven" | "mvn" => Self::Maven,
            "gradle" => Self::Gradle,
            "npm" | "yarn" | "pnpm" => Self::Npm,
            "pip" | "poetry" | "uv" => Self::Pip,
            "go" => Self::Go,
            "cargo" => Self::Cargo,
            _ => return None,
        };
        Some(tool)
    }
}

/// Which classification path produced a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Heuristic,
    ExternalInference,
    ExternalInferenceFallback,
}

impl Provenance {
    /// Get the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::ExternalInference => "external-inference",
            Self::ExternalInferenceFallback => "external-inference-fallback",
        }
    }

    /// Confidence attached to signatures of this provenance
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Heuristic | Self::ExternalInferenceFallback => 0.85,
            Self::ExternalInference => 0.95,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
