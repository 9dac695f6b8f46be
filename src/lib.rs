// src/lib.rs

pub mod barrier;
pub mod cli;
pub mod config;
pub mod console;
pub mod coordinator;
pub mod errors;
pub mod logging;
pub mod relay;
pub mod supervisor;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::RunConfig;
use crate::console::StdoutSink;
use crate::coordinator::Coordinator;
use crate::supervisor::Supervisor;

/// High-level entry point used by `main.rs`.
///
/// Builds the run configuration from CLI arguments, then supervises every
/// script with console output on stdout. Job failures are reported on the
/// console and never turn into an `Err` here.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = RunConfig::from_args(&args)?;
    debug!(?cfg, "resolved run configuration");

    let supervisor = Supervisor::new(cfg.supervisor, Arc::new(StdoutSink));
    Coordinator::new(cfg.scripts, supervisor).run().await;
    Ok(())
}
