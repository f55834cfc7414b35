use std::collections::HashMap;
use std::collections::HashSet;
use std::path::PathBuf;

use itertools::Itertools;

use super::task_info::validate_identifier;
use super::Flank;
use super::ShapeInfo;
use super::TaskInfo;
use crate::runtime::Error;

///////////////////////////////
/// Where inputs are read from and outputs are written to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDirs {
    /// Raw {accession}.fastq.gz files
    pub download: PathBuf,
    /// Per-cycle sequence and shape files
    pub orig_data: PathBuf,
    /// Context, shapemer and coverage files
    pub top_data: PathBuf,
    /// k-mer neighbour tables
    pub seqmer_data: PathBuf,
}

///////////////////////////////
/// One row of the levels table: a discretization scheme applied to a shape type
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeScheme {
    pub scheme: String,
    pub shape: String,
    pub info: ShapeInfo,
}

///////////////////////////////
/// Immutable description of the whole pipeline, built once at startup
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    dirs: DataDirs,
    dnashape_exe: PathBuf,
    tasks: Vec<TaskInfo>,
    shapes: Vec<String>,
    schemes: Vec<String>,
    shape_schemes: Vec<ShapeScheme>,
    flanks: Vec<Flank>,
    shapemer_length: usize,
}

impl PipelineConfig {
    pub fn new(
        dirs: DataDirs,
        dnashape_exe: PathBuf,
        tasks: Vec<TaskInfo>,
        shape_levels: Vec<ShapeScheme>,
        flanks: Vec<Flank>,
        shapemer_length: usize,
    ) -> Result<PipelineConfig, Error> {
        if let Some(tf) = tasks.iter().map(|t| t.tf()).duplicates().next() {
            return Err(Error::invalid_config(format!("factor {} listed twice", tf)));
        }

        if shapemer_length == 0 {
            return Err(Error::invalid_config("shapemer length must be at least 1"));
        }

        if flanks.is_empty() {
            return Err(Error::invalid_config("at least one flank configuration needed"));
        }
        if let Some(f) = flanks.iter().duplicates().next() {
            return Err(Error::invalid_config(format!("flank {} listed twice", f)));
        }

        //Shapes and schemes in order of first appearance
        let shapes: Vec<String> = shape_levels.iter().map(|s| s.shape.clone()).unique().collect();
        let schemes: Vec<String> = shape_levels.iter().map(|s| s.scheme.clone()).unique().collect();
        for shape in &shapes {
            validate_identifier("Shape type", shape)?;
        }
        if shapes.is_empty() {
            return Err(Error::invalid_config("no shape levels given"));
        }

        let mut by_pair: HashMap<(&str, &str), &ShapeScheme> = HashMap::new();
        for s in &shape_levels {
            if by_pair.insert((s.scheme.as_str(), s.shape.as_str()), s).is_some() {
                return Err(Error::invalid_config(format!(
                    "levels for scheme {} and shape {} given twice",
                    s.scheme, s.shape
                )));
            }
        }

        //Every scheme must cover every shape; the builder loops over the full product
        let mut shape_schemes = Vec::new();
        for shape in &shapes {
            let mut seen_levels: HashSet<&str> = HashSet::new();
            for scheme in &schemes {
                let s = by_pair.get(&(scheme.as_str(), shape.as_str())).ok_or_else(|| {
                    Error::invalid_config(format!(
                        "scheme {} has no levels for shape {}",
                        scheme, shape
                    ))
                })?;
                if !seen_levels.insert(s.info.levels_str()) {
                    return Err(Error::invalid_config(format!(
                        "scheme {} repeats the levels of another scheme for shape {}",
                        scheme, shape
                    )));
                }
                shape_schemes.push((*s).clone());
            }
        }

        Ok(PipelineConfig {
            dirs,
            dnashape_exe,
            tasks,
            shapes,
            schemes,
            shape_schemes,
            flanks,
            shapemer_length,
        })
    }

    pub fn dirs(&self) -> &DataDirs {
        &self.dirs
    }

    pub fn dnashape_exe(&self) -> &PathBuf {
        &self.dnashape_exe
    }

    pub fn tasks(&self) -> &[TaskInfo] {
        &self.tasks
    }

    pub fn shapes(&self) -> &[String] {
        &self.shapes
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Every (shape, scheme) pair, shape-major
    pub fn shape_schemes(&self) -> &[ShapeScheme] {
        &self.shape_schemes
    }

    pub fn flanks(&self) -> &[Flank] {
        &self.flanks
    }

    pub fn shapemer_length(&self) -> usize {
        self.shapemer_length
    }
}
