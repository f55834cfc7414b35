use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::command::{
    BgShapemerParams, BgShapemers, CountShapemers, CountShapemersParams, Coverage,
    CoverageParams, Discretize, DiscretizeParams, FgParts, FgPartsParams, FgShapemerParams,
    FgShapemers, Partition, PartitionParams, Preprocess, PreprocessParams, SeqmerTable,
    SeqmerTableParams,
};
use crate::runtime::Error;
use crate::utils::command_to_string;

///////////////////////////////
/// Pipeline stages, in dependency order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Preprocess,
    SeqmerTable,
    GetShape,
    DiscretizeShape,
    Partition,
    GetFgParts,
    GetFgShapemers,
    GetBgShapemers,
    CountFgShapemers,
    CountBgShapemers,
    GetFgCoverage,
    GetBgCoverage,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::Preprocess,
        Stage::SeqmerTable,
        Stage::GetShape,
        Stage::DiscretizeShape,
        Stage::Partition,
        Stage::GetFgParts,
        Stage::GetFgShapemers,
        Stage::GetBgShapemers,
        Stage::CountFgShapemers,
        Stage::CountBgShapemers,
        Stage::GetFgCoverage,
        Stage::GetBgCoverage,
    ];

    /// Name used on the command line and as task name prefix
    pub fn key(&self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::SeqmerTable => "seqmer_table",
            Stage::GetShape => "get_shape",
            Stage::DiscretizeShape => "discretize_shape",
            Stage::Partition => "partition",
            Stage::GetFgParts => "get_fg_parts",
            Stage::GetFgShapemers => "get_fg_shapemers",
            Stage::GetBgShapemers => "get_bg_shapemers",
            Stage::CountFgShapemers => "count_fg_shapemers",
            Stage::CountBgShapemers => "count_bg_shapemers",
            Stage::GetFgCoverage => "get_fg_coverage",
            Stage::GetBgCoverage => "get_bg_coverage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::Preprocess => "Collapse raw reads into distinct sequences and counts",
            Stage::SeqmerTable => "Tabulate k-mer abundances of each pool",
            Stage::GetShape => "Predict DNA shape of each pool",
            Stage::DiscretizeShape => "Discretize predicted shapes into symbols",
            Stage::Partition => "Split each pool into motif (fg) and non-motif (bg) sequences",
            Stage::GetFgParts => "Cut fg sequences down to motif hit and flanks",
            Stage::GetFgShapemers => "Extract shapemers around fg motif hits",
            Stage::GetBgShapemers => "Extract shapemers of bg sequences",
            Stage::CountFgShapemers => "Count fg shapemers",
            Stage::CountBgShapemers => "Count bg shapemers",
            Stage::GetFgCoverage => "Sequence and read coverage of fg shapemers",
            Stage::GetBgCoverage => "Sequence and read coverage of bg shapemers",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .find(|stage| stage.key() == s)
            .copied()
            .ok_or_else(|| format!("Unknown stage: {}", s))
    }
}

///////////////////////////////
/// An in-process helper together with all the files it touches
#[derive(Clone, Debug, PartialEq)]
pub enum StageCall {
    Preprocess(PreprocessParams),
    SeqmerTable(SeqmerTableParams),
    Discretize(DiscretizeParams),
    Partition(PartitionParams),
    FgParts(FgPartsParams),
    FgShapemers(FgShapemerParams),
    BgShapemers(BgShapemerParams),
    CountShapemers(CountShapemersParams),
    Coverage(CoverageParams),
}

impl StageCall {
    pub fn invoke(&self) -> anyhow::Result<()> {
        match self {
            StageCall::Preprocess(p) => Preprocess::run(p).map(|_| ()),
            StageCall::SeqmerTable(p) => SeqmerTable::run(p).map(|_| ()),
            StageCall::Discretize(p) => Discretize::run(p).map(|_| ()),
            StageCall::Partition(p) => Partition::run(p).map(|_| ()),
            StageCall::FgParts(p) => FgParts::run(p).map(|_| ()),
            StageCall::FgShapemers(p) => FgShapemers::run(p).map(|_| ()),
            StageCall::BgShapemers(p) => BgShapemers::run(p).map(|_| ()),
            StageCall::CountShapemers(p) => CountShapemers::run(p).map(|_| ()),
            StageCall::Coverage(p) => Coverage::run(p).map(|_| ()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StageCall::Preprocess(_) => "preprocess",
            StageCall::SeqmerTable(_) => "seqmer_table",
            StageCall::Discretize(_) => "discretize",
            StageCall::Partition(_) => "partition",
            StageCall::FgParts(_) => "fg_parts",
            StageCall::FgShapemers(_) => "fg_shapemers",
            StageCall::BgShapemers(_) => "bg_shapemers",
            StageCall::CountShapemers(_) => "count_shapemers",
            StageCall::Coverage(_) => "coverage",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// External program
    Exec { program: PathBuf, args: Vec<OsString> },
    /// In-process helper
    Call(StageCall),
}

impl Action {
    fn command(program: &Path, args: &[OsString]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Action::Exec { program, args } => {
                let mut cmd = Action::command(program, args);
                let cmd_str = command_to_string(&cmd);
                debug!("Running {}", cmd_str);

                let output = cmd
                    .output()
                    .map_err(|_| Error::utility_not_executable(program.display().to_string()))?;
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    let msg = if stderr.is_empty() {
                        output.status.to_string()
                    } else {
                        format!("{}: {}", output.status, stderr)
                    };
                    return Err(Error::utility_execution_error(
                        program.display().to_string(),
                        cmd_str,
                        Some(msg),
                    )
                    .into());
                }
                Ok(())
            }
            Action::Call(call) => {
                debug!("Calling {}", call.name());
                call.invoke()
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Exec { program, args } => {
                f.write_str(&command_to_string(&Action::command(program, args)))
            }
            Action::Call(call) => write!(f, "<{}>", call.name()),
        }
    }
}

///////////////////////////////
/// One unit of work: what it runs, what it reads, what it writes
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDescriptor {
    pub name: String,
    pub stage: Stage,
    pub actions: Vec<Action>,
    pub file_dep: Vec<PathBuf>,
    pub targets: Vec<PathBuf>,
    /// Targets may be removed by clean
    pub clean: bool,
}
