//! `skyline report`

use skyline_core::SkylineConfig;

use super::{build_pipeline, deployment_params, expand_path, run_pipeline};
use crate::args::AnalysisArgs;
use crate::console::CliConsole;

/// Produce the markdown report or JSON summary
pub async fn run(
    mut config: SkylineConfig,
    analysis: AnalysisArgs,
    output: Option<String>,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut console = CliConsole::new(verbose);
    let root = expand_path(&analysis.path);
    let params = deployment_params(&config, &analysis);
    let pipeline = build_pipeline(&mut config, &analysis, params)?;
    let outcome = run_pipeline(&mut console, &pipeline, &root).await?;

    let content = if json {
        outcome.summary_json
    } else {
        outcome.report_markdown
    };

    match output {
        Some(path) => {
            let path = expand_path(&path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, content).await?;
            console.success(&format!("Report written to {}", path.display()));
        }
        None => println!("{content}"),
    }
    Ok(())
}
