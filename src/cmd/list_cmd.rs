use std::io::Write;

use anyhow::Result;
use clap::Args;

use super::PipelineArgs;
use crate::graph::{Stage, TaskGraph};

/// Commandline option: List tasks or stages
#[derive(Args, Debug)]
pub struct ListCMD {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    // Task names or stage keys; everything if empty
    pub selectors: Vec<String>,

    // Also print inputs and targets of each task
    #[arg(long = "deps")]
    pub deps: bool,

    // Print the stages instead of the tasks
    #[arg(long = "stages")]
    pub stages: bool,
}

///////////////////////////////
/// Write "name<TAB>stage" per task, with indented inputs (<) and targets (>) if asked for
pub fn write_task_list<W: Write>(
    out: &mut W,
    graph: &TaskGraph,
    selected: impl IntoIterator<Item = usize>,
    deps: bool,
) -> Result<()> {
    for i in selected {
        let task = graph.task(i);
        writeln!(out, "{}\t{}", task.name, task.stage)?;
        if deps {
            for dep in &task.file_dep {
                writeln!(out, "\t< {}", dep.display())?;
            }
            for target in &task.targets {
                writeln!(out, "\t> {}", target.display())?;
            }
        }
    }
    Ok(())
}

impl ListCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        if self.stages {
            for stage in Stage::ALL {
                writeln!(out, "{}\t{}", stage.key(), stage.description())?;
            }
            return Ok(());
        }

        let (_config, graph) = self.pipeline.to_graph()?;
        let selected = graph.select(&self.selectors, true)?;
        write_task_list(&mut out, &graph, selected, self.deps)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CountShapemersParams;
    use crate::graph::{Action, StageCall, TaskDescriptor};
    use std::path::PathBuf;

    #[test]
    fn lists_inputs_and_targets() {
        let task = TaskDescriptor {
            name: "count_fg_shapemers:x.cnt".to_string(),
            stage: Stage::CountFgShapemers,
            actions: vec![Action::Call(StageCall::CountShapemers(CountShapemersParams {
                path_in: PathBuf::from("x"),
                path_out: PathBuf::from("x.cnt"),
            }))],
            file_dep: vec![PathBuf::from("x")],
            targets: vec![PathBuf::from("x.cnt")],
            clean: true,
        };
        let graph = TaskGraph::new(vec![task]).unwrap();

        let mut buf = Vec::new();
        write_task_list(&mut buf, &graph, [0], true).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "count_fg_shapemers:x.cnt\tcount_fg_shapemers\n\t< x\n\t> x.cnt\n"
        );
    }
}
