//! `skyline analyze`

use colored::*;
use skyline_core::{ProjectSignature, SkylineConfig};

use super::{build_pipeline, deployment_params, expand_path};
use crate::args::AnalysisArgs;
use crate::console::CliConsole;

/// Classify a project and print its signature
pub async fn run(
    mut config: SkylineConfig,
    analysis: AnalysisArgs,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut console = CliConsole::new(verbose);
    let root = expand_path(&analysis.path);
    let params = deployment_params(&config, &analysis);
    let pipeline = build_pipeline(&mut config, &analysis, params)?;

    console.start_spinner(&format!("Analyzing {}", root.display()));
    let signature = pipeline.classify(&root).await;
    console.finish_spinner();
    let signature = signature?;

    if json {
        println!("{}", serde_json::to_string_pretty(&signature)?);
        return Ok(());
    }

    print_signature(&console, &signature);
    Ok(())
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let items: Vec<&str> = items.map(String::as_str).collect();
    if items.is_empty() {
        "none".dimmed().to_string()
    } else {
        items.join(", ")
    }
}

/// Human-readable signature
pub fn print_signature(console: &CliConsole, signature: &ProjectSignature) {
    console.print_header("Project Signature");
    console.field("Application", &signature.app_type.to_string());
    console.field("Framework", &signature.framework.to_string());
    console.field(
        "Classified by",
        &format!(
            "{} ({:.0}% confidence)",
            signature.source,
            signature.confidence * 100.0
        ),
    );

    let database = if signature.database.required {
        format!(
            "{} ({})",
            signature.database.effective_kind(),
            signature.database.estimated_size.name()
        )
    } else {
        "not required".to_string()
    };
    console.field("Database", &database);

    let ports: Vec<String> = signature.ports.iter().map(|p| p.to_string()).collect();
    console.field("Ports", &ports.join(", "));

    let res = &signature.resources;
    console.field(
        "CPU",
        &format!("{} request / {} limit", res.cpu_request, res.cpu_limit),
    );
    console.field(
        "Memory",
        &format!("{} request / {} limit", res.memory_request, res.memory_limit),
    );
    console.field("Replicas", &res.replicas.to_string());
    console.field("Environment", &join(signature.environment.iter()));
    console.field(
        "Services",
        &join(signature.dependencies.external_services.iter()),
    );
    console.field(
        "Third-party APIs",
        &join(signature.dependencies.third_party_apis.iter()),
    );
    console.field(
        "Security",
        &join(signature.dependencies.security_requirements.iter()),
    );

    let build = match (
        signature.build_config.build_tool,
        &signature.build_config.language_version,
    ) {
        (Some(tool), Some(version)) => format!("{} ({})", tool.name(), version),
        (Some(tool), None) => tool.name().to_string(),
        (None, _) => "unknown".to_string(),
    };
    console.field("Build", &build);
    console.field(
        "Dockerfile",
        if signature.build_config.docker_required {
            "present"
        } else {
            "missing"
        },
    );
}
