use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use log::{debug, error, info, warn};
use rayon::prelude::*;

use super::dag::TaskGraph;
use super::task::TaskDescriptor;
use crate::runtime::Error;
use crate::runtime::ErrorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecOptions {
    pub dry_run: bool,
    pub threads: usize,
    pub error_mode: ErrorMode,
}

impl Default for ExecOptions {
    fn default() -> Self {
        ExecOptions {
            dry_run: false,
            threads: 1,
            error_mode: ErrorMode::Abort,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    UpToDate,
    Ran,
    WouldRun,
    Failed,
    /// Downstream of a failure, or not reached after an abort
    Skipped,
}

///////////////////////////////
/// What happened to the selected tasks
#[derive(Debug, Default)]
pub struct RunSummary {
    pub ran: Vec<String>,
    pub up_to_date: Vec<String>,
    pub would_run: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, anyhow::Error)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

///////////////////////////////
/// All targets exist and none is older than the newest input
fn is_up_to_date(task: &TaskDescriptor) -> bool {
    let mut oldest_target: Option<SystemTime> = None;
    for target in &task.targets {
        match modified(target) {
            Some(t) => oldest_target = Some(oldest_target.map_or(t, |o| o.min(t))),
            None => return false,
        }
    }
    let mut newest_input: Option<SystemTime> = None;
    for dep in &task.file_dep {
        match modified(dep) {
            Some(t) => newest_input = Some(newest_input.map_or(t, |n| n.max(t))),
            None => return false,
        }
    }
    match (oldest_target, newest_input) {
        (Some(target), Some(input)) => target >= input,
        (Some(_), None) => true,
        // A task without targets always runs
        (None, _) => false,
    }
}

fn remove_targets(task: &TaskDescriptor) {
    for target in &task.targets {
        if target.exists() {
            if let Err(e) = fs::remove_file(target) {
                warn!("Could not remove {}: {}", target.display(), e);
            }
        }
    }
}

fn execute_task(task: &TaskDescriptor) -> anyhow::Result<()> {
    for dep in &task.file_dep {
        if !dep.exists() {
            return Err(Error::file_not_found(dep).into());
        }
    }
    for target in &task.targets {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
    }

    for action in &task.actions {
        debug!("{}: {}", task.name, action);
        action.run()?;
    }

    for target in &task.targets {
        if !target.exists() {
            return Err(Error::missing_output(&task.name, target).into());
        }
    }
    Ok(())
}

///////////////////////////////
/// Runs a task graph level by level; tasks within a level run in parallel
pub struct Executor<'a> {
    graph: &'a TaskGraph,
    options: ExecOptions,
}

impl<'a> Executor<'a> {
    pub fn new(graph: &'a TaskGraph, options: ExecOptions) -> Executor<'a> {
        Executor { graph, options }
    }

    fn run_one(&self, i: usize, upstream_ran: bool) -> (TaskOutcome, Option<anyhow::Error>) {
        let task = self.graph.task(i);
        if !upstream_ran && is_up_to_date(task) {
            info!("-- {}", task.name);
            return (TaskOutcome::UpToDate, None);
        }
        if self.options.dry_run {
            info!(".  {} (dry run)", task.name);
            return (TaskOutcome::WouldRun, None);
        }

        info!(".  {}", task.name);
        match execute_task(task) {
            Ok(()) => (TaskOutcome::Ran, None),
            Err(e) => {
                error!("Task {} failed: {}", task.name, e);
                remove_targets(task);
                (TaskOutcome::Failed, Some(e))
            }
        }
    }

    ///////////////////////////////
    /// Run the selected tasks. Task failures end up in the summary; only failing to set
    /// up the thread pool is an error here
    pub fn run(&self, selected: &BTreeSet<usize>) -> anyhow::Result<RunSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads.max(1))
            .build()?;

        let mut outcome: Vec<Option<TaskOutcome>> = vec![None; self.graph.len()];
        let mut summary = RunSummary::default();
        let mut aborted = false;

        for level in self.graph.levels() {
            let mut runnable: Vec<(usize, bool)> = Vec::new();
            for &i in level.iter().filter(|&&i| selected.contains(&i)) {
                let ups = self.graph.upstream(i);
                let blocked = aborted
                    || ups.iter().any(|&u| {
                        matches!(
                            outcome[u],
                            Some(TaskOutcome::Failed) | Some(TaskOutcome::Skipped)
                        )
                    });
                if blocked {
                    outcome[i] = Some(TaskOutcome::Skipped);
                    summary.skipped.push(self.graph.task(i).name.clone());
                    continue;
                }
                let upstream_ran = ups.iter().any(|&u| {
                    matches!(
                        outcome[u],
                        Some(TaskOutcome::Ran) | Some(TaskOutcome::WouldRun)
                    )
                });
                runnable.push((i, upstream_ran));
            }

            let results: Vec<(usize, TaskOutcome, Option<anyhow::Error>)> = pool.install(|| {
                runnable
                    .par_iter()
                    .map(|&(i, upstream_ran)| {
                        let (o, e) = self.run_one(i, upstream_ran);
                        (i, o, e)
                    })
                    .collect()
            });

            for (i, o, e) in results {
                outcome[i] = Some(o);
                let name = self.graph.task(i).name.clone();
                match o {
                    TaskOutcome::UpToDate => summary.up_to_date.push(name),
                    TaskOutcome::Ran => summary.ran.push(name),
                    TaskOutcome::WouldRun => summary.would_run.push(name),
                    TaskOutcome::Skipped => summary.skipped.push(name),
                    TaskOutcome::Failed => {
                        let e = e.unwrap_or_else(|| anyhow::anyhow!("task failed"));
                        summary.failed.push((name, e));
                    }
                }
            }

            if !summary.failed.is_empty() && self.options.error_mode == ErrorMode::Abort {
                aborted = true;
            }
        }

        info!(
            "{} ran, {} up to date, {} would run, {} skipped, {} failed",
            summary.ran.len(),
            summary.up_to_date.len(),
            summary.would_run.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }
}

///////////////////////////////
/// Remove existing targets of the selected cleanable tasks. Returns what was (or, in a dry
/// run, would be) removed
pub fn clean(
    graph: &TaskGraph,
    selected: &BTreeSet<usize>,
    dry_run: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for &i in selected.iter().rev() {
        let task = graph.task(i);
        if !task.clean {
            continue;
        }
        for target in task.targets.iter().filter(|t| t.exists()) {
            if dry_run {
                info!("{} - would remove {}", task.name, target.display());
            } else {
                info!("{} - removing {}", task.name, target.display());
                fs::remove_file(target)?;
            }
            removed.push(target.clone());
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CountShapemersParams;
    use crate::graph::task::{Action, Stage, StageCall};
    use std::time::Duration;

    fn count_task(name: &str, path_in: &Path, path_out: &Path) -> TaskDescriptor {
        TaskDescriptor {
            name: name.to_string(),
            stage: Stage::CountFgShapemers,
            actions: vec![Action::Call(StageCall::CountShapemers(CountShapemersParams {
                path_in: path_in.to_path_buf(),
                path_out: path_out.to_path_buf(),
            }))],
            file_dep: vec![path_in.to_path_buf()],
            targets: vec![path_out.to_path_buf()],
            clean: true,
        }
    }

    fn set_age(path: &Path, secs_ago: u64) {
        let t = SystemTime::now() - Duration::from_secs(secs_ago);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(t)
            .unwrap();
    }

    #[test]
    fn skips_up_to_date_and_reruns_downstream() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.shapemer");
        let b = dir.path().join("out/a.shapemer.cnt");
        let c = dir.path().join("out/a.shapemer.cnt.cnt");
        fs::write(&a, "AAB 0 0\nAAB 1 0\nAAC 1 1\n").unwrap();
        let graph = TaskGraph::new(vec![count_task("first", &a, &b), count_task("second", &b, &c)])
            .unwrap();
        let all: BTreeSet<usize> = (0..2).collect();

        let summary = Executor::new(&graph, ExecOptions::default()).run(&all).unwrap();
        assert!(summary.is_success());
        assert_eq!(summary.ran, vec!["first", "second"]);
        assert_eq!(fs::read_to_string(&b).unwrap(), "2 AAB\n1 AAC\n");

        let summary = Executor::new(&graph, ExecOptions::default()).run(&all).unwrap();
        assert_eq!(summary.up_to_date, vec!["first", "second"]);
        assert!(summary.ran.is_empty());

        // A newer input makes the whole chain stale
        set_age(&b, 100);
        set_age(&c, 100);
        let summary = Executor::new(&graph, ExecOptions::default()).run(&all).unwrap();
        assert_eq!(summary.ran, vec!["first", "second"]);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.shapemer");
        let b = dir.path().join("a.shapemer.cnt");
        fs::write(&a, "AAB 0 0\n").unwrap();
        let graph = TaskGraph::new(vec![count_task("count", &a, &b)]).unwrap();
        let opts = ExecOptions {
            dry_run: true,
            ..ExecOptions::default()
        };
        let summary = Executor::new(&graph, opts).run(&BTreeSet::from([0])).unwrap();
        assert_eq!(summary.would_run, vec!["count"]);
        assert!(!b.exists());
    }

    #[test]
    fn missing_input_fails_and_skips_downstream() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("missing.shapemer");
        let b = dir.path().join("a.cnt");
        let c = dir.path().join("a.cnt.cnt");
        let x = dir.path().join("x.shapemer");
        let y = dir.path().join("x.cnt");
        fs::write(&x, "BBB 0 0\n").unwrap();
        let graph = TaskGraph::new(vec![
            count_task("first", &a, &b),
            count_task("second", &b, &c),
            count_task("other", &x, &y),
        ])
        .unwrap();

        let opts = ExecOptions {
            threads: 2,
            error_mode: ErrorMode::Continue,
            ..ExecOptions::default()
        };
        let summary = Executor::new(&graph, opts).run(&(0..3).collect()).unwrap();
        assert!(!summary.is_success());
        assert_eq!(summary.failed.len(), 1);
        assert!(matches!(
            summary.failed[0].1.downcast_ref::<Error>(),
            Some(Error::FileNotFound { .. })
        ));
        assert_eq!(summary.skipped, vec!["second"]);
        assert_eq!(summary.ran, vec!["other"]);
        assert!(y.exists());
    }

    fn sorted(names: &[String]) -> Vec<&str> {
        let mut v: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        v.sort();
        v
    }

    #[test]
    fn abort_stops_independent_chains_after_the_failing_level() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("missing.shapemer");
        let b = dir.path().join("a.cnt");
        let c = dir.path().join("a.cnt.cnt");
        let x = dir.path().join("x.shapemer");
        let y = dir.path().join("x.cnt");
        let z = dir.path().join("x.cnt.cnt");
        fs::write(&x, "BBB 0 0\n").unwrap();
        let graph = TaskGraph::new(vec![
            count_task("first", &a, &b),
            count_task("second", &b, &c),
            count_task("other", &x, &y),
            count_task("other_next", &y, &z),
        ])
        .unwrap();
        let all: BTreeSet<usize> = (0..4).collect();

        let summary = Executor::new(&graph, ExecOptions::default()).run(&all).unwrap();
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "first");
        assert_eq!(summary.ran, vec!["other"]);
        assert_eq!(sorted(&summary.skipped), vec!["other_next", "second"]);
        assert!(y.exists());
        assert!(!z.exists());

        let opts = ExecOptions {
            error_mode: ErrorMode::Continue,
            ..ExecOptions::default()
        };
        let summary = Executor::new(&graph, opts).run(&all).unwrap();
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.skipped, vec!["second"]);
        assert_eq!(summary.up_to_date, vec!["other"]);
        assert_eq!(summary.ran, vec!["other_next"]);
        assert!(z.exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_task_leaves_no_targets() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.seq");
        let out = dir.path().join("in.seq.MGW");
        fs::write(&input, "ACGT\n").unwrap();
        fs::write(&out, "stale\n").unwrap();
        set_age(&out, 100);

        // Writes its target, then fails
        let task = TaskDescriptor {
            name: "get_shape:in.seq.MGW".to_string(),
            stage: Stage::GetShape,
            actions: vec![Action::Exec {
                program: PathBuf::from("sh"),
                args: vec![
                    "-c".into(),
                    format!("echo 1 > '{}' && exit 3", out.display()).into(),
                ],
            }],
            file_dep: vec![input.clone()],
            targets: vec![out.clone()],
            clean: true,
        };
        let graph = TaskGraph::new(vec![task]).unwrap();
        let summary = Executor::new(&graph, ExecOptions::default())
            .run(&BTreeSet::from([0]))
            .unwrap();
        assert!(matches!(
            summary.failed[0].1.downcast_ref::<Error>(),
            Some(Error::UtilityExecutionError { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn clean_removes_existing_targets() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.shapemer");
        let b = dir.path().join("a.shapemer.cnt");
        fs::write(&a, "AAB 0 0\n").unwrap();
        fs::write(&b, "1 AAB\n").unwrap();
        let graph = TaskGraph::new(vec![count_task("count", &a, &b)]).unwrap();
        let sel = BTreeSet::from([0]);

        assert_eq!(clean(&graph, &sel, true).unwrap(), vec![b.clone()]);
        assert!(b.exists());
        assert_eq!(clean(&graph, &sel, false).unwrap(), vec![b.clone()]);
        assert!(!b.exists());
        assert!(a.exists());
        assert!(clean(&graph, &sel, false).unwrap().is_empty());
    }
}
