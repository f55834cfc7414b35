use anyhow::bail;
use anyhow::Result;
use clap::Args;

use super::PipelineArgs;
use crate::graph::{ExecOptions, Executor, Stage};
use crate::runtime::ErrorMode;
use crate::utils::check_dnashape;

pub const DEFAULT_THREADS: usize = 1;

/// Commandline option: Run the pipeline, or the selected tasks and their upstream
#[derive(Args, Debug)]
pub struct RunCMD {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    // Task names or stage keys; everything if empty
    pub selectors: Vec<String>,

    // Only report what would run
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[arg(long, value_parser = clap::value_parser!(usize), default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    // abort or continue after a failed task
    #[arg(long = "error-mode", default_value = "abort")]
    pub error_mode: ErrorMode,
}

impl RunCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        let (config, graph) = self.pipeline.to_graph()?;
        let selected = graph.select(&self.selectors, true)?;

        let needs_shape = selected
            .iter()
            .any(|&i| graph.task(i).stage == Stage::GetShape);
        if needs_shape && !self.dry_run {
            check_dnashape(config.dnashape_exe())?;
        }

        let options = ExecOptions {
            dry_run: self.dry_run,
            threads: self.threads,
            error_mode: self.error_mode,
        };
        let summary = Executor::new(&graph, options).run(&selected)?;

        if let Some((name, e)) = summary.failed.first() {
            bail!(
                "{} of {} tasks failed, first was {}: {}",
                summary.failed.len(),
                selected.len(),
                name,
                e
            );
        }
        log::info!("Run has finished successfully");
        Ok(())
    }
}
