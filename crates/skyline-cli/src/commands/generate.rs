//! `skyline generate`

use skyline_core::review::DirectoryReviewer;
use skyline_core::{ArtifactWriter, RenderedArtifact, SkylineConfig};

use super::{build_pipeline, deployment_params, expand_path, run_pipeline};
use crate::args::AnalysisArgs;
use crate::console::CliConsole;

/// Report files written next to the rendered configuration
pub const REPORT_PATH: &str = "reports/analysis_report.md";
pub const SUMMARY_PATH: &str = "reports/analysis_summary.json";

/// Overrides for the rendered deployment
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub output: String,
    pub image: Option<String>,
    pub domain: Option<String>,
    pub review: bool,
}

/// Render configuration files into the output directory
pub async fn run(
    mut config: SkylineConfig,
    analysis: AnalysisArgs,
    options: GenerateOptions,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut console = CliConsole::new(verbose);
    let root = expand_path(&analysis.path);
    let output = expand_path(&options.output);

    let mut params = deployment_params(&config, &analysis);
    if let Some(image) = options.image {
        params = params.with_image(image);
    }
    if let Some(domain) = options.domain {
        params = params.with_domain(domain);
    }

    let pipeline = build_pipeline(&mut config, &analysis, params)?;
    let outcome = run_pipeline(&mut console, &pipeline, &root).await?;
    console.info(&outcome.signature.summary());

    if options.review {
        let reviewer = DirectoryReviewer::new(&output);
        let receipt = pipeline.deliver(&outcome, &reviewer).await?;
        console.success(&format!(
            "Staged review {} in {}",
            receipt.branch, receipt.location
        ));
    } else {
        let written = ArtifactWriter::new(&output).write_all(&outcome.artifacts)?;
        for path in &written {
            console.info(&format!("Wrote {}", path.display()));
        }
    }

    ArtifactWriter::new(&output).write_all(&[
        RenderedArtifact::new(REPORT_PATH, outcome.report_markdown.clone()),
        RenderedArtifact::new(SUMMARY_PATH, outcome.summary_json.clone()),
    ])?;

    console.success(&format!(
        "Generated {} files for {} ({}) in {}",
        outcome.artifacts.len(),
        pipeline.params().project_name,
        outcome.signature.framework,
        output.display()
    ));
    if outcome.signature.database.required {
        console.warn("Fill in the placeholders in k8s/secret.yaml before applying");
    }
    Ok(())
}
