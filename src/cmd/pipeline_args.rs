use std::path::PathBuf;

use clap::Args;

use crate::core::{DataDirs, Flank, PipelineConfig};
use crate::fileformat::{read_factor_table, read_levels_table};
use crate::graph::{TaskGraph, TaskGraphBuilder};
use crate::utils::expand_and_resolve_path;

pub const DEFAULT_SHAPEMER_LENGTH: usize = 6;
pub const DEFAULT_DNASHAPE: &str = "DNAshape";
pub const DEFAULT_FLANK: &str = "0:0";

///////////////////////////////
/// Options shared by every command that needs the pipeline layout
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    // Factor table: tf, primer, family, motif, distance, accessions
    #[arg(long = "factors", value_parser = clap::value_parser!(PathBuf))]
    pub path_factors: PathBuf,

    // Discretization table: scheme, shape, levels
    #[arg(long = "levels", value_parser = clap::value_parser!(PathBuf))]
    pub path_levels: PathBuf,

    // Flank configurations as LEFT:RIGHT
    #[arg(long = "flanks", value_delimiter = ',', default_value = DEFAULT_FLANK)]
    pub flanks: Vec<Flank>,

    // Cycles to process; all accessions of a factor if not given
    #[arg(long = "cycles", value_delimiter = ',')]
    pub cycles: Option<Vec<usize>>,

    #[arg(long = "shapemer-length", value_parser = clap::value_parser!(usize), default_value_t = DEFAULT_SHAPEMER_LENGTH)]
    pub shapemer_length: usize,

    // Shape prediction program
    #[arg(long = "dnashape", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_DNASHAPE)]
    pub dnashape: PathBuf,

    // Raw {accession}.fastq.gz files
    #[arg(long = "download-dir", value_parser = clap::value_parser!(PathBuf), default_value = "download")]
    pub download_dir: PathBuf,

    // Sequence, count and shape files
    #[arg(long = "orig-dir", value_parser = clap::value_parser!(PathBuf), default_value = "orig")]
    pub orig_dir: PathBuf,

    // Context, shapemer and coverage files
    #[arg(long = "top-dir", value_parser = clap::value_parser!(PathBuf), default_value = "top")]
    pub top_dir: PathBuf,

    // k-mer tables
    #[arg(long = "seqmer-dir", value_parser = clap::value_parser!(PathBuf), default_value = "seqmer")]
    pub seqmer_dir: PathBuf,
}

impl PipelineArgs {
    pub fn to_config(&self) -> anyhow::Result<PipelineConfig> {
        let tasks = read_factor_table(
            &expand_and_resolve_path(&self.path_factors)?,
            self.cycles.as_deref(),
        )?;
        let shape_levels = read_levels_table(&expand_and_resolve_path(&self.path_levels)?)?;

        let dirs = DataDirs {
            download: expand_and_resolve_path(&self.download_dir)?,
            orig_data: expand_and_resolve_path(&self.orig_dir)?,
            top_data: expand_and_resolve_path(&self.top_dir)?,
            seqmer_data: expand_and_resolve_path(&self.seqmer_dir)?,
        };

        let config = PipelineConfig::new(
            dirs,
            self.dnashape.clone(),
            tasks,
            shape_levels,
            self.flanks.clone(),
            self.shapemer_length,
        )?;
        Ok(config)
    }

    /// Configuration and the validated graph of every task
    pub fn to_graph(&self) -> anyhow::Result<(PipelineConfig, TaskGraph)> {
        let config = self.to_config()?;
        let tasks = TaskGraphBuilder::new(&config).build_all();
        log::debug!("Built {} tasks", tasks.len());
        let graph = TaskGraph::new(tasks)?;
        Ok((config, graph))
    }
}
