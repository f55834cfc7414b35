use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use super::task::{Action, Stage, StageCall, TaskDescriptor};
use crate::command::{
    BgShapemerParams, CountShapemersParams, CoverageParams, DiscretizeParams, FgPartsParams,
    FgShapemerParams, PartitionParams, PreprocessParams, SeqmerTableParams,
};
use crate::core::{raw_archive_file, Flank, MotifKey, PipelineConfig, PoolContext, TaskInfo};

fn motif_keys(task: &TaskInfo) -> Vec<MotifKey<'_>> {
    let mut keys = Vec::new();
    for &cycle in task.cycles() {
        for (motif, distance) in task.motif_distances() {
            keys.push(MotifKey {
                cycle,
                motif,
                distance,
            });
        }
    }
    keys
}

fn describe(
    stage: Stage,
    primary: &Path,
    action: Action,
    file_dep: Vec<PathBuf>,
    targets: Vec<PathBuf>,
) -> TaskDescriptor {
    TaskDescriptor {
        name: format!("{}:{}", stage.key(), primary.display()),
        stage,
        actions: vec![action],
        file_dep,
        targets,
        clean: true,
    }
}

///////////////////////////////
/// Emits the task descriptors of every stage. Pure: no file is touched, and calling
/// any method twice gives equal results
pub struct TaskGraphBuilder<'a> {
    config: &'a PipelineConfig,
}

impl<'a> TaskGraphBuilder<'a> {
    pub fn new(config: &'a PipelineConfig) -> TaskGraphBuilder<'a> {
        TaskGraphBuilder { config }
    }

    fn orig(&self, p: PathBuf) -> PathBuf {
        self.config.dirs().orig_data.join(p)
    }

    fn top(&self, p: PathBuf) -> PathBuf {
        self.config.dirs().top_data.join(p)
    }

    fn seqmer(&self, p: PathBuf) -> PathBuf {
        self.config.dirs().seqmer_data.join(p)
    }

    pub fn stage(&self, stage: Stage) -> Vec<TaskDescriptor> {
        match stage {
            Stage::Preprocess => self.preprocess(),
            Stage::SeqmerTable => self.seqmer_table(),
            Stage::GetShape => self.get_shape(),
            Stage::DiscretizeShape => self.discretize_shape(),
            Stage::Partition => self.partition(),
            Stage::GetFgParts => self.get_fg_parts(),
            Stage::GetFgShapemers => self.get_fg_shapemers(),
            Stage::GetBgShapemers => self.get_bg_shapemers(),
            Stage::CountFgShapemers => self.count_shapemers(PoolContext::Fg),
            Stage::CountBgShapemers => self.count_shapemers(PoolContext::Bg),
            Stage::GetFgCoverage => self.coverage(PoolContext::Fg),
            Stage::GetBgCoverage => self.coverage(PoolContext::Bg),
        }
    }

    /// Every stage, in stage order
    pub fn build_all(&self) -> Vec<TaskDescriptor> {
        Stage::ALL.iter().flat_map(|&s| self.stage(s)).collect()
    }

    pub fn preprocess(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for &cycle in task.cycles() {
                let rel_seq = task.sequence_file(cycle);
                let params = PreprocessParams {
                    path_fastq: raw_archive_file(
                        &self.config.dirs().download,
                        task.accession(cycle),
                    ),
                    path_seq: self.orig(rel_seq.clone()),
                    path_count: self.orig(task.count_file(cycle)),
                };
                out.push(describe(
                    Stage::Preprocess,
                    &rel_seq,
                    Action::Call(StageCall::Preprocess(params.clone())),
                    vec![params.path_fastq],
                    vec![params.path_seq, params.path_count],
                ));
            }
        }
        out
    }

    pub fn seqmer_table(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for &cycle in task.cycles() {
                for kmer_size in task.motif_lengths() {
                    let rel_nbr = task.seqmer_table_file(cycle, kmer_size);
                    let params = SeqmerTableParams {
                        path_seq: self.orig(task.sequence_file(cycle)),
                        path_count: self.orig(task.count_file(cycle)),
                        kmer_size,
                        path_out: self.seqmer(rel_nbr.clone()),
                    };
                    out.push(describe(
                        Stage::SeqmerTable,
                        &rel_nbr,
                        Action::Call(StageCall::SeqmerTable(params.clone())),
                        vec![params.path_seq, params.path_count],
                        vec![params.path_out],
                    ));
                }
            }
        }
        out
    }

    pub fn get_shape(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for shape in self.config.shapes() {
                for &cycle in task.cycles() {
                    let rel_shape = task.shape_file(cycle, shape);
                    let path_seq = self.orig(task.sequence_file(cycle));
                    let action = Action::Exec {
                        program: self.config.dnashape_exe().clone(),
                        args: vec![path_seq.clone().into_os_string(), OsString::from(shape)],
                    };
                    out.push(describe(
                        Stage::GetShape,
                        &rel_shape,
                        action,
                        vec![path_seq],
                        vec![self.orig(rel_shape.clone())],
                    ));
                }
            }
        }
        out
    }

    pub fn discretize_shape(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for ss in self.config.shape_schemes() {
                for &cycle in task.cycles() {
                    let rel_dsc =
                        task.discrete_shape_file(cycle, &ss.shape, ss.info.levels_str());
                    let params = DiscretizeParams {
                        shape_info: ss.info.clone(),
                        path_in: self.orig(task.shape_file(cycle, &ss.shape)),
                        path_out: self.orig(rel_dsc.clone()),
                    };
                    out.push(describe(
                        Stage::DiscretizeShape,
                        &rel_dsc,
                        Action::Call(StageCall::Discretize(params.clone())),
                        vec![params.path_in],
                        vec![params.path_out],
                    ));
                }
            }
        }
        out
    }

    pub fn partition(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for key in motif_keys(task) {
                let rel_fg = task.context_file(&key, PoolContext::Fg);
                let params = PartitionParams {
                    path_seq: self.orig(task.sequence_file(key.cycle)),
                    motif: key.motif.to_string(),
                    distance: key.distance,
                    path_seqmer_table: self
                        .seqmer(task.seqmer_table_file(key.cycle, key.motif.len())),
                    path_fg: self.top(rel_fg.clone()),
                    path_bg: self.top(task.context_file(&key, PoolContext::Bg)),
                };
                out.push(describe(
                    Stage::Partition,
                    &rel_fg,
                    Action::Call(StageCall::Partition(params.clone())),
                    vec![params.path_seq, params.path_seqmer_table],
                    vec![params.path_fg, params.path_bg],
                ));
            }
        }
        out
    }

    pub fn get_fg_parts(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for &flank in self.config.flanks() {
                for key in motif_keys(task) {
                    let rel_parts = task.fg_parts_file(&key, flank);
                    let params = FgPartsParams {
                        path_seq: self.orig(task.sequence_file(key.cycle)),
                        path_fg_context: self.top(task.context_file(&key, PoolContext::Fg)),
                        path_seqmer_table: self
                            .seqmer(task.seqmer_table_file(key.cycle, key.motif.len())),
                        motif: key.motif.to_string(),
                        flank,
                        path_out: self.top(rel_parts.clone()),
                    };
                    out.push(describe(
                        Stage::GetFgParts,
                        &rel_parts,
                        Action::Call(StageCall::FgParts(params.clone())),
                        vec![
                            params.path_seq,
                            params.path_fg_context,
                            params.path_seqmer_table,
                        ],
                        vec![params.path_out],
                    ));
                }
            }
        }
        out
    }

    pub fn get_fg_shapemers(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for &flank in self.config.flanks() {
                for ss in self.config.shape_schemes() {
                    let levels_str = ss.info.levels_str();
                    for key in motif_keys(task) {
                        let rel_out = task.contexted_shapemer_file(
                            &key,
                            flank,
                            PoolContext::Fg,
                            &ss.shape,
                            levels_str,
                        );
                        let params = FgShapemerParams {
                            shapemer_length: self.config.shapemer_length(),
                            path_shape: self.orig(task.discrete_shape_file(
                                key.cycle,
                                &ss.shape,
                                levels_str,
                            )),
                            path_count: self.orig(task.count_file(key.cycle)),
                            path_context: self.top(task.context_file(&key, PoolContext::Fg)),
                            path_parts: self.top(task.fg_parts_file(&key, flank)),
                            motif: key.motif.to_string(),
                            path_out: self.top(rel_out.clone()),
                        };
                        out.push(describe(
                            Stage::GetFgShapemers,
                            &rel_out,
                            Action::Call(StageCall::FgShapemers(params.clone())),
                            vec![
                                params.path_shape,
                                params.path_count,
                                params.path_context,
                                params.path_parts,
                            ],
                            vec![params.path_out],
                        ));
                    }
                }
            }
        }
        out
    }

    pub fn get_bg_shapemers(&self) -> Vec<TaskDescriptor> {
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for ss in self.config.shape_schemes() {
                let levels_str = ss.info.levels_str();
                for key in motif_keys(task) {
                    let rel_out = task.contexted_shapemer_file(
                        &key,
                        Flank::NONE,
                        PoolContext::Bg,
                        &ss.shape,
                        levels_str,
                    );
                    let params = BgShapemerParams {
                        shapemer_length: self.config.shapemer_length(),
                        path_shape: self.orig(task.discrete_shape_file(
                            key.cycle,
                            &ss.shape,
                            levels_str,
                        )),
                        path_count: self.orig(task.count_file(key.cycle)),
                        path_context: self.top(task.context_file(&key, PoolContext::Bg)),
                        path_out: self.top(rel_out.clone()),
                    };
                    out.push(describe(
                        Stage::GetBgShapemers,
                        &rel_out,
                        Action::Call(StageCall::BgShapemers(params.clone())),
                        vec![params.path_shape, params.path_count, params.path_context],
                        vec![params.path_out],
                    ));
                }
            }
        }
        out
    }

    /// Flanks that apply to a pool context; bg shapemers are never flanked
    fn context_flanks(&self, ctx: PoolContext) -> Vec<Flank> {
        match ctx {
            PoolContext::Fg => self.config.flanks().to_vec(),
            PoolContext::Bg => vec![Flank::NONE],
        }
    }

    pub fn count_shapemers(&self, ctx: PoolContext) -> Vec<TaskDescriptor> {
        let stage = match ctx {
            PoolContext::Fg => Stage::CountFgShapemers,
            PoolContext::Bg => Stage::CountBgShapemers,
        };
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for flank in self.context_flanks(ctx) {
                for ss in self.config.shape_schemes() {
                    let levels_str = ss.info.levels_str();
                    for key in motif_keys(task) {
                        let rel_out = task.contexted_shapemer_count_file(
                            &key, flank, ctx, &ss.shape, levels_str,
                        );
                        let params = CountShapemersParams {
                            path_in: self.top(task.contexted_shapemer_file(
                                &key, flank, ctx, &ss.shape, levels_str,
                            )),
                            path_out: self.top(rel_out.clone()),
                        };
                        out.push(describe(
                            stage,
                            &rel_out,
                            Action::Call(StageCall::CountShapemers(params.clone())),
                            vec![params.path_in],
                            vec![params.path_out],
                        ));
                    }
                }
            }
        }
        out
    }

    pub fn coverage(&self, ctx: PoolContext) -> Vec<TaskDescriptor> {
        let stage = match ctx {
            PoolContext::Fg => Stage::GetFgCoverage,
            PoolContext::Bg => Stage::GetBgCoverage,
        };
        let mut out = Vec::new();
        for task in self.config.tasks() {
            for flank in self.context_flanks(ctx) {
                for ss in self.config.shape_schemes() {
                    let levels_str = ss.info.levels_str();
                    for key in motif_keys(task) {
                        let rel_out =
                            task.contexted_coverage_file(&key, flank, ctx, &ss.shape, levels_str);
                        let params = CoverageParams {
                            path_context: self.top(task.context_file(&key, ctx)),
                            path_count: self.orig(task.count_file(key.cycle)),
                            path_shapemer: self.top(task.contexted_shapemer_file(
                                &key, flank, ctx, &ss.shape, levels_str,
                            )),
                            path_out: self.top(rel_out.clone()),
                        };
                        out.push(describe(
                            stage,
                            &rel_out,
                            Action::Call(StageCall::Coverage(params.clone())),
                            vec![params.path_context, params.path_count, params.path_shapemer],
                            vec![params.path_out],
                        ));
                    }
                }
            }
        }
        out
    }
}
