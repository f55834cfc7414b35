use anyhow::Result;
use clap::Args;

use super::PipelineArgs;
use crate::graph::clean;

/// Commandline option: Remove outputs of the selected tasks
#[derive(Args, Debug)]
pub struct CleanCMD {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    // Task names or stage keys; everything if empty
    pub selectors: Vec<String>,

    // Only report what would be removed
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl CleanCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        let (_config, graph) = self.pipeline.to_graph()?;
        let selected = graph.select(&self.selectors, false)?;
        let removed = clean(&graph, &selected, self.dry_run)?;
        log::info!(
            "{} {} files",
            if self.dry_run { "Would remove" } else { "Removed" },
            removed.len()
        );
        Ok(())
    }
}
