//! Skyline CLI
//!
//! Infers what an application needs to run from its source tree and renders
//! Terraform and Kubernetes configuration for it.
//!
//! ```bash
//! skyline analyze ./my-service
//! skyline generate ./my-service --output ./infra --review
//! skyline report ./my-service --output report.md
//! skyline config init
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod router;

use args::Cli;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // One short-lived pass, no parallel work
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(router::route(cli))
}
