//! Terraform rendering: VPC, EKS, optional database and cache

use super::{MANAGED_BY, RenderedArtifact, quoted};
use crate::config::DeploymentParams;
use crate::signature::{DatabaseKind, ProjectSignature};

/// HCL string literal; template sequences are escaped
fn hcl(value: &str) -> String {
    quoted(value).replace("${", "$${").replace("%{", "%%{")
}

fn engine_version(kind: DatabaseKind) -> &'static str {
    match kind {
        DatabaseKind::Postgresql => "16.3",
        DatabaseKind::Mysql | DatabaseKind::H2 => "8.0",
        DatabaseKind::Mariadb => "10.11",
        DatabaseKind::Oracle => "19",
        DatabaseKind::Mongodb => "5.0.0",
    }
}

fn major_engine_version(kind: DatabaseKind) -> &'static str {
    match kind {
        DatabaseKind::Postgresql => "16",
        DatabaseKind::Mysql | DatabaseKind::H2 => "8.0",
        DatabaseKind::Mariadb => "10.11",
        DatabaseKind::Oracle => "19",
        DatabaseKind::Mongodb => "5.0",
    }
}

fn parameter_family(kind: DatabaseKind) -> &'static str {
    match kind {
        DatabaseKind::Postgresql => "postgres16",
        DatabaseKind::Mysql | DatabaseKind::H2 => "mysql8.0",
        DatabaseKind::Mariadb => "mariadb10.11",
        DatabaseKind::Oracle => "oracle-se2-19",
        DatabaseKind::Mongodb => "docdb5.0",
    }
}

const PROVIDER_BLOCK: &str = r#"terraform {
  required_version = ">= 1.5.0"

  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = "~> 5.0"
    }
  }
}

provider "aws" {
  region = var.region

  default_tags {
    tags = local.tags
  }
}

data "aws_availability_zones" "available" {
  state = "available"
}

"#;

fn locals_block() -> String {
    format!(
        r#"locals {{
  name = "${{var.project_name}}-${{var.environment}}"
  azs  = slice(data.aws_availability_zones.available.names, 0, 2)

  tags = {{
    Project     = var.project_name
    Environment = var.environment
    ManagedBy   = {managed_by}
  }}
}}

"#,
        managed_by = hcl(MANAGED_BY)
    )
}

const NETWORK_AND_CLUSTER: &str = r#"module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = "~> 5.0"

  name = local.name
  cidr = var.vpc_cidr

  azs             = local.azs
  private_subnets = [for i, az in local.azs : cidrsubnet(var.vpc_cidr, 4, i)]
  public_subnets  = [for i, az in local.azs : cidrsubnet(var.vpc_cidr, 8, i + 48)]

  enable_nat_gateway   = true
  single_nat_gateway   = var.environment != "prod"
  enable_dns_hostnames = true

  public_subnet_tags = {
    "kubernetes.io/role/elb" = 1
  }

  private_subnet_tags = {
    "kubernetes.io/role/internal-elb" = 1
  }
}

module "eks" {
  source  = "terraform-aws-modules/eks/aws"
  version = "~> 20.0"

  cluster_name    = local.name
  cluster_version = var.kubernetes_version

  cluster_endpoint_public_access = true

  vpc_id     = module.vpc.vpc_id
  subnet_ids = module.vpc.private_subnets

  eks_managed_node_groups = {
    default = {
      instance_types = [var.node_instance_type]

      min_size     = var.node_min_size
      max_size     = var.node_max_size
      desired_size = var.node_desired_size
    }
  }
}

"#;

fn relational_database(kind: DatabaseKind) -> String {
    format!(
        r#"resource "aws_security_group" "database" {{
  count = var.enable_database ? 1 : 0

  name_prefix = "${{local.name}}-db-"
  vpc_id      = module.vpc.vpc_id

  ingress {{
    from_port       = var.db_port
    to_port         = var.db_port
    protocol        = "tcp"
    security_groups = [module.eks.node_security_group_id]
  }}
}}

module "rds" {{
  source  = "terraform-aws-modules/rds/aws"
  version = "~> 6.0"
  count   = var.enable_database ? 1 : 0

  identifier = "${{local.name}}-db"

  engine               = var.db_engine
  engine_version       = {engine_version}
  family               = {family}
  major_engine_version = {major_version}
  instance_class       = var.db_instance_class
  allocated_storage    = var.db_allocated_storage

  db_name  = replace(var.project_name, "-", "_")
  username = "app_admin"
  port     = var.db_port

  manage_master_user_password = true

  create_db_subnet_group = true
  subnet_ids             = module.vpc.private_subnets
  vpc_security_group_ids = [aws_security_group.database[0].id]

  skip_final_snapshot = var.environment != "prod"
  deletion_protection = var.environment == "prod"
}}

"#,
        engine_version = hcl(engine_version(kind)),
        family = hcl(parameter_family(kind)),
        major_version = hcl(major_engine_version(kind)),
    )
}

fn document_database() -> String {
    r#"resource "aws_docdb_subnet_group" "database" {
  count = var.enable_database ? 1 : 0

  name       = "${local.name}-docdb"
  subnet_ids = module.vpc.private_subnets
}

resource "aws_docdb_cluster" "database" {
  count = var.enable_database ? 1 : 0

  cluster_identifier          = "${local.name}-docdb"
  engine                      = var.db_engine
  master_username             = "app_admin"
  manage_master_user_password = true
  port                        = var.db_port
  db_subnet_group_name        = aws_docdb_subnet_group.database[0].name
  skip_final_snapshot         = var.environment != "prod"
}

resource "aws_docdb_cluster_instance" "database" {
  count = var.enable_database ? 1 : 0

  identifier         = "${local.name}-docdb-0"
  cluster_identifier = aws_docdb_cluster.database[0].id
  instance_class     = var.db_instance_class
}

"#
    .to_string()
}

const CACHE_BLOCK: &str = r#"resource "aws_elasticache_subnet_group" "cache" {
  count = var.enable_cache ? 1 : 0

  name       = "${local.name}-cache"
  subnet_ids = module.vpc.private_subnets
}

resource "aws_elasticache_cluster" "cache" {
  count = var.enable_cache ? 1 : 0

  cluster_id           = "${local.name}-cache"
  engine               = "redis"
  node_type            = var.cache_node_type
  num_cache_nodes      = 1
  parameter_group_name = "default.redis7"
  port                 = 6379
  subnet_group_name    = aws_elasticache_subnet_group.cache[0].name
  security_group_ids   = [module.eks.node_security_group_id]
}
"#;

/// `terraform/main.tf`
pub fn main_tf(signature: &ProjectSignature) -> String {
    let kind = signature.database.effective_kind();
    let mut out = String::new();
    out.push_str(PROVIDER_BLOCK);
    out.push_str(&locals_block());
    out.push_str(NETWORK_AND_CLUSTER);
    if kind == DatabaseKind::Mongodb {
        out.push_str(&document_database());
    } else {
        out.push_str(&relational_database(kind));
    }
    out.push_str(CACHE_BLOCK);
    out
}

struct Variable {
    name: &'static str,
    kind: &'static str,
    description: &'static str,
}

const VARIABLES: &[Variable] = &[
    Variable { name: "project_name", kind: "string", description: "Project name used in resource names" },
    Variable { name: "environment", kind: "string", description: "Deployment environment" },
    Variable { name: "region", kind: "string", description: "AWS region" },
    Variable { name: "vpc_cidr", kind: "string", description: "VPC CIDR block" },
    Variable { name: "kubernetes_version", kind: "string", description: "EKS control plane version" },
    Variable { name: "node_instance_type", kind: "string", description: "Worker node instance type" },
    Variable { name: "node_min_size", kind: "number", description: "Minimum worker nodes" },
    Variable { name: "node_max_size", kind: "number", description: "Maximum worker nodes" },
    Variable { name: "node_desired_size", kind: "number", description: "Desired worker nodes" },
    Variable { name: "app_port", kind: "number", description: "Container port of the application" },
    Variable { name: "enable_database", kind: "bool", description: "Provision a managed database" },
    Variable { name: "db_engine", kind: "string", description: "Database engine" },
    Variable { name: "db_instance_class", kind: "string", description: "Database instance class" },
    Variable { name: "db_allocated_storage", kind: "number", description: "Database storage in GiB" },
    Variable { name: "db_port", kind: "number", description: "Database listener port" },
    Variable { name: "enable_cache", kind: "bool", description: "Provision a Redis cache" },
    Variable { name: "cache_node_type", kind: "string", description: "Cache node type" },
];

/// `terraform/variables.tf`
pub fn variables_tf() -> String {
    VARIABLES
        .iter()
        .map(|var| {
            format!(
                "variable {} {{\n  description = {}\n  type        = {}\n}}\n",
                hcl(var.name),
                hcl(var.description),
                var.kind
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn allocated_storage(signature: &ProjectSignature) -> u32 {
    match signature.database.estimated_size {
        crate::signature::DatabaseSize::Small => 20,
        crate::signature::DatabaseSize::Medium => 100,
        crate::signature::DatabaseSize::Large => 500,
    }
}

/// `terraform/terraform.tfvars`
pub fn tfvars(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let database = &signature.database;
    let kind = database.effective_kind();
    let replicas = signature.resources.replicas.max(1);

    let rows: Vec<(&str, String)> = vec![
        ("project_name", hcl(&params.project_name)),
        ("environment", hcl(&params.environment)),
        ("region", hcl(&params.region)),
        ("vpc_cidr", hcl("10.0.0.0/16")),
        ("kubernetes_version", hcl(&params.kubernetes_version)),
        ("node_instance_type", hcl(&params.node_instance_type)),
        ("node_min_size", "1".to_string()),
        ("node_max_size", replicas.saturating_add(2).to_string()),
        ("node_desired_size", replicas.to_string()),
        ("app_port", signature.primary_port().to_string()),
        ("enable_database", database.required.to_string()),
        ("db_engine", hcl(kind.rds_engine())),
        ("db_instance_class", hcl(database.estimated_size.instance_class())),
        ("db_allocated_storage", allocated_storage(signature).to_string()),
        ("db_port", kind.default_port().to_string()),
        ("enable_cache", signature.dependencies.uses("redis").to_string()),
        ("cache_node_type", hcl("cache.t3.micro")),
    ];

    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in rows {
        out.push_str(&format!("{:<width$} = {}\n", name, value, width = width));
    }
    out
}

/// `terraform/outputs.tf`
pub fn outputs_tf(signature: &ProjectSignature) -> String {
    let db_endpoint = if signature.database.effective_kind() == DatabaseKind::Mongodb {
        "aws_docdb_cluster.database[0].endpoint"
    } else {
        "module.rds[0].db_instance_endpoint"
    };

    format!(
        r#"output "cluster_name" {{
  description = "EKS cluster name"
  value       = module.eks.cluster_name
}}

output "cluster_endpoint" {{
  description = "EKS API server endpoint"
  value       = module.eks.cluster_endpoint
}}

output "vpc_id" {{
  description = "VPC id"
  value       = module.vpc.vpc_id
}}

output "database_endpoint" {{
  description = "Database endpoint, null when no database is provisioned"
  value       = var.enable_database ? {db_endpoint} : null
}}

output "cache_endpoint" {{
  description = "Redis endpoint, null when no cache is provisioned"
  value       = var.enable_cache ? aws_elasticache_cluster.cache[0].cache_nodes[0].address : null
}}
"#
    )
}

/// Every Terraform artifact, in order
pub fn render(signature: &ProjectSignature, params: &DeploymentParams) -> Vec<RenderedArtifact> {
    vec![
        RenderedArtifact::new("terraform/main.tf", main_tf(signature)),
        RenderedArtifact::new("terraform/variables.tf", variables_tf()),
        RenderedArtifact::new("terraform/terraform.tfvars", tfvars(signature, params)),
        RenderedArtifact::new("terraform/outputs.tf", outputs_tf(signature)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{SignatureAssembler, SignatureParts};
    use crate::signature::{
        AppType, BuildConfig, DatabaseRequirement, DependencyProfile, Framework, Provenance,
    };
    use std::collections::BTreeSet;

    fn signature(database: DatabaseRequirement, services: &[&str]) -> ProjectSignature {
        SignatureAssembler::new().assemble(
            SignatureParts {
                app_type: AppType::JavaMaven,
                framework: Framework::SpringBoot,
                database,
                resources: None,
                ports: BTreeSet::new(),
                environment: BTreeSet::new(),
                dependencies: DependencyProfile {
                    external_services: services.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
                build_config: BuildConfig::default(),
                complexity: 500,
            },
            Provenance::Heuristic,
        )
    }

    #[test]
    fn test_tfvars_toggles() {
        let sig = signature(
            DatabaseRequirement {
                required: true,
                kind: Some(DatabaseKind::Postgresql),
                ..Default::default()
            },
            &["redis"],
        );
        let vars = tfvars(&sig, &DeploymentParams::for_project("shop"));

        assert!(vars.contains("enable_database      = true"));
        assert!(vars.contains("db_engine            = \"postgres\""));
        assert!(vars.contains("db_port              = 5432"));
        assert!(vars.contains("enable_cache         = true"));
        assert!(vars.contains("node_desired_size    = 3"));
        assert!(vars.contains("app_port             = 8080"));
    }

    #[test]
    fn test_main_tf_uses_counts() {
        let sig = signature(DatabaseRequirement::default(), &[]);
        let main = main_tf(&sig);
        assert!(main.contains("count   = var.enable_database ? 1 : 0"));
        assert!(main.contains("count = var.enable_cache ? 1 : 0"));
        assert!(main.contains("name = \"${var.project_name}-${var.environment}\""));
        assert!(main.contains("ManagedBy   = \"skyline\""));

        let vars = tfvars(&sig, &DeploymentParams::default());
        assert!(vars.contains("enable_database      = false"));
        assert!(vars.contains("db_engine            = \"mysql\""));
    }

    #[test]
    fn test_mongodb_uses_document_database() {
        let sig = signature(
            DatabaseRequirement {
                required: true,
                kind: Some(DatabaseKind::Mongodb),
                ..Default::default()
            },
            &[],
        );
        assert!(main_tf(&sig).contains("resource \"aws_docdb_cluster\" \"database\""));
        assert!(outputs_tf(&sig).contains("aws_docdb_cluster.database[0].endpoint"));
    }

    #[test]
    fn test_every_variable_has_a_value() {
        let sig = signature(DatabaseRequirement::default(), &[]);
        let vars = tfvars(&sig, &DeploymentParams::default());
        for variable in VARIABLES {
            assert!(
                vars.lines().any(|line| line.starts_with(&format!("{} ", variable.name))),
                "{}",
                variable.name
            );
        }
    }

    #[test]
    fn test_hcl_escapes_templates() {
        assert_eq!(hcl("${x}"), "\"$${x}\"");
    }
}
