use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use super::task::TaskDescriptor;
use crate::runtime::Error;

///////////////////////////////
/// Validated set of task descriptors. Edges run from the producer of a file to every
/// task listing it as a dependency
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<TaskDescriptor>,
    producer: FxHashMap<PathBuf, usize>,
    upstream: Vec<Vec<usize>>,
    levels: Vec<Vec<usize>>,
}

impl TaskGraph {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Result<TaskGraph, Error> {
        let mut names: FxHashSet<&str> = FxHashSet::default();
        for t in &tasks {
            if !names.insert(t.name.as_str()) {
                return Err(Error::DuplicateTask {
                    name: t.name.clone(),
                });
            }
        }

        let mut producer: FxHashMap<PathBuf, usize> = FxHashMap::default();
        for (i, t) in tasks.iter().enumerate() {
            for target in &t.targets {
                if let Some(&first) = producer.get(target) {
                    return Err(Error::DuplicateTarget {
                        path: target.clone(),
                        first: tasks[first].name.clone(),
                        second: t.name.clone(),
                    });
                }
                producer.insert(target.clone(), i);
            }
        }

        let upstream: Vec<Vec<usize>> = tasks
            .iter()
            .map(|t| {
                let ups: BTreeSet<usize> = t
                    .file_dep
                    .iter()
                    .filter_map(|dep| producer.get(dep).copied())
                    .collect();
                ups.into_iter().collect()
            })
            .collect();

        let levels = topological_levels(&upstream).map_err(|stuck| Error::DependencyCycle {
            tasks: stuck.iter().map(|&i| tasks[i].name.clone()).collect(),
        })?;

        Ok(TaskGraph {
            tasks,
            producer,
            upstream,
            levels,
        })
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    pub fn task(&self, i: usize) -> &TaskDescriptor {
        &self.tasks[i]
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks producing the inputs of task i
    pub fn upstream(&self, i: usize) -> &[usize] {
        &self.upstream[i]
    }

    pub fn producer_of(&self, path: &Path) -> Option<usize> {
        self.producer.get(path).copied()
    }

    /// Each level only depends on earlier levels
    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    /// Files read by some task but produced by none
    pub fn root_inputs(&self) -> BTreeSet<PathBuf> {
        self.tasks
            .iter()
            .flat_map(|t| t.file_dep.iter())
            .filter(|p| self.producer_of(p).is_none())
            .cloned()
            .collect()
    }

    ///////////////////////////////
    /// Tasks matching any selector, by task name or stage key. No selectors selects all.
    /// With upstream, everything the matches depend on is included too
    pub fn select(&self, selectors: &[String], with_upstream: bool) -> Result<BTreeSet<usize>, Error> {
        if selectors.is_empty() {
            return Ok((0..self.tasks.len()).collect());
        }

        let mut selected = BTreeSet::new();
        for sel in selectors {
            let mut matched = false;
            for (i, t) in self.tasks.iter().enumerate() {
                if t.name == *sel || t.stage.key() == sel {
                    selected.insert(i);
                    matched = true;
                }
            }
            if !matched {
                return Err(Error::invalid_config(format!(
                    "no task or stage named '{}'",
                    sel
                )));
            }
        }

        if with_upstream {
            let mut stack: Vec<usize> = selected.iter().copied().collect();
            while let Some(i) = stack.pop() {
                for &u in &self.upstream[i] {
                    if selected.insert(u) {
                        stack.push(u);
                    }
                }
            }
        }
        Ok(selected)
    }
}

///////////////////////////////
/// Kahn's algorithm, one level at a time. On a cycle, returns the tasks that could never run
fn topological_levels(upstream: &[Vec<usize>]) -> Result<Vec<Vec<usize>>, Vec<usize>> {
    let n = upstream.len();
    let mut indegree: Vec<usize> = upstream.iter().map(|u| u.len()).collect();
    let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, ups) in upstream.iter().enumerate() {
        for &u in ups {
            downstream[u].push(i);
        }
    }

    let mut levels = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut num_done = 0;
    while !current.is_empty() {
        num_done += current.len();
        let mut next = Vec::new();
        for &i in &current {
            for &d in &downstream[i] {
                indegree[d] -= 1;
                if indegree[d] == 0 {
                    next.push(d);
                }
            }
        }
        next.sort_unstable();
        levels.push(current);
        current = next;
    }

    if num_done < n {
        return Err((0..n).filter(|&i| indegree[i] > 0).collect());
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CountShapemersParams;
    use crate::graph::task::{Action, Stage, StageCall};

    fn task(name: &str, deps: &[&str], targets: &[&str]) -> TaskDescriptor {
        TaskDescriptor {
            name: name.to_string(),
            stage: Stage::CountFgShapemers,
            actions: vec![Action::Call(StageCall::CountShapemers(CountShapemersParams {
                path_in: PathBuf::from(deps.first().copied().unwrap_or("none")),
                path_out: PathBuf::from(targets.first().copied().unwrap_or("none")),
            }))],
            file_dep: deps.iter().map(PathBuf::from).collect(),
            targets: targets.iter().map(PathBuf::from).collect(),
            clean: true,
        }
    }

    #[test]
    fn levels_follow_file_dependencies() {
        let g = TaskGraph::new(vec![
            task("c", &["b.txt", "a.txt"], &["c.txt"]),
            task("a", &["raw.txt"], &["a.txt"]),
            task("b", &["a.txt"], &["b.txt"]),
        ])
        .unwrap();
        assert_eq!(g.levels(), &[vec![1], vec![2], vec![0]]);
        assert_eq!(g.upstream(0), &[1, 2]);
        assert_eq!(g.root_inputs(), BTreeSet::from([PathBuf::from("raw.txt")]));
        assert_eq!(g.producer_of(Path::new("b.txt")), Some(2));
    }

    #[test]
    fn rejects_duplicates_and_cycles() {
        let err = TaskGraph::new(vec![task("a", &[], &["x"]), task("a", &[], &["y"])]).unwrap_err();
        assert!(matches!(err, Error::DuplicateTask { .. }));

        let err = TaskGraph::new(vec![task("a", &[], &["x"]), task("b", &[], &["x"])]).unwrap_err();
        assert!(matches!(err, Error::DuplicateTarget { ref first, ref second, .. }
            if first == "a" && second == "b"));

        let err = TaskGraph::new(vec![
            task("a", &["y"], &["x"]),
            task("b", &["x"], &["y"]),
            task("c", &[], &["z"]),
        ])
        .unwrap_err();
        match err {
            Error::DependencyCycle { tasks } => assert_eq!(tasks, vec!["a", "b"]),
            e => panic!("unexpected {}", e),
        }
    }

    #[test]
    fn selection_pulls_in_upstream() {
        let g = TaskGraph::new(vec![
            task("a", &["raw"], &["a.txt"]),
            task("b", &["a.txt"], &["b.txt"]),
            task("c", &["raw"], &["c.txt"]),
        ])
        .unwrap();
        assert_eq!(g.select(&["b".to_string()], true).unwrap(), BTreeSet::from([0, 1]));
        assert_eq!(g.select(&["b".to_string()], false).unwrap(), BTreeSet::from([1]));
        assert_eq!(g.select(&[], false).unwrap().len(), 3);
        assert_eq!(
            g.select(&["count_fg_shapemers".to_string()], false).unwrap().len(),
            3
        );
        assert!(g.select(&["nope".to_string()], true).is_err());
    }
}
