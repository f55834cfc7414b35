use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use log::info;
use rustc_hash::FxHashMap;

use crate::core::UNDEFINED_SYMBOL;
use crate::fileformat::count_lines;
use crate::fileformat::read_lines;
use crate::fileformat::read_tsv_rows;
use crate::fileformat::BgContextRow;
use crate::fileformat::FgContextRow;
use crate::fileformat::PartsRow;
use crate::fileformat::StagedFile;
use crate::fileformat::Strand;
use crate::runtime::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FgShapemerParams {
    pub shapemer_length: usize,
    pub path_shape: PathBuf,
    pub path_count: PathBuf,
    pub path_context: PathBuf,
    pub path_parts: PathBuf,
    pub motif: String,
    pub path_out: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BgShapemerParams {
    pub shapemer_length: usize,
    pub path_shape: PathBuf,
    pub path_count: PathBuf,
    pub path_context: PathBuf,
    pub path_out: PathBuf,
}

///////////////////////////////
/// Discretized shapes of a pool; must line up with its count file
fn load_discrete_shapes(path_shape: &Path, path_count: &Path) -> anyhow::Result<Vec<String>> {
    let shapes = read_lines(path_shape)?;
    let num_counts = count_lines(path_count)?;
    if shapes.len() != num_counts {
        return Err(Error::file_not_valid(
            path_shape,
            Some(format!(
                "{} shape lines but {} counts in {}",
                shapes.len(),
                num_counts,
                path_count.display()
            )),
        )
        .into());
    }
    Ok(shapes)
}

fn shape_of<'a>(shapes: &'a [String], index: usize, path: &Path) -> anyhow::Result<&'a [u8]> {
    shapes.get(index).map(|s| s.as_bytes()).ok_or_else(|| {
        Error::file_not_valid(path, Some(format!("no shape for sequence {}", index))).into()
    })
}

///////////////////////////////
/// Write every fully defined window as "shapemer index offset"; returns how many were written
fn write_windows(
    out: &mut impl Write,
    symbols: &[u8],
    shapemer_length: usize,
    index: usize,
    origin: usize,
) -> anyhow::Result<usize> {
    let mut n = 0;
    for (w, word) in symbols.windows(shapemer_length).enumerate() {
        if word.contains(&UNDEFINED_SYMBOL) {
            continue;
        }
        out.write_all(word)?;
        writeln!(out, " {} {}", index, w as i64 - origin as i64)?;
        n += 1;
    }
    Ok(n)
}

pub struct FgShapemers {}

impl FgShapemers {
    ///////////////////////////////
    /// Shapemers around the motif hit of every fg sequence. Offsets are relative to the motif
    /// start in motif orientation, negative inside the upstream flank
    pub fn run(params: &FgShapemerParams) -> anyhow::Result<usize> {
        let shapes = load_discrete_shapes(&params.path_shape, &params.path_count)?;
        let context: Vec<FgContextRow> = read_tsv_rows(&params.path_context)?;
        let parts: Vec<PartsRow> = read_tsv_rows(&params.path_parts)?;
        let hit_of: FxHashMap<usize, &FgContextRow> =
            context.iter().map(|row| (row.index, row)).collect();
        let k = params.motif.len();

        let mut out = StagedFile::create(&params.path_out)?;
        let mut num_shapemers = 0;
        for part in &parts {
            let hit = hit_of.get(&part.index).ok_or_else(|| {
                Error::file_not_valid(
                    &params.path_parts,
                    Some(format!("sequence {} is not in the fg context", part.index)),
                )
            })?;
            let shape = shape_of(&shapes, part.index, &params.path_shape)?;
            if part.start > hit.position || hit.position + k > part.end || part.end > shape.len() {
                return Err(Error::file_not_valid(
                    &params.path_parts,
                    Some(format!(
                        "region {}..{} of sequence {} does not match its hit or shape",
                        part.start, part.end, part.index
                    )),
                )
                .into());
            }

            let region = &shape[part.start..part.end];
            let (symbols, motif_start) = match hit.strand {
                Strand::Forward => (region.to_vec(), hit.position - part.start),
                Strand::Reverse => (
                    region.iter().rev().copied().collect(),
                    part.end - (hit.position + k),
                ),
            };
            num_shapemers += write_windows(
                &mut out,
                &symbols,
                params.shapemer_length,
                part.index,
                motif_start,
            )?;
        }
        out.commit()?;

        info!(
            "Wrote {} fg shapemers to {}",
            num_shapemers,
            params.path_out.display()
        );
        Ok(num_shapemers)
    }
}

pub struct BgShapemers {}

impl BgShapemers {
    ///////////////////////////////
    /// Shapemers at every position of every bg sequence
    pub fn run(params: &BgShapemerParams) -> anyhow::Result<usize> {
        let shapes = load_discrete_shapes(&params.path_shape, &params.path_count)?;
        let context: Vec<BgContextRow> = read_tsv_rows(&params.path_context)?;

        let mut out = StagedFile::create(&params.path_out)?;
        let mut num_shapemers = 0;
        for row in &context {
            let shape = shape_of(&shapes, row.index, &params.path_shape)?;
            num_shapemers += write_windows(&mut out, shape, params.shapemer_length, row.index, 0)?;
        }
        out.commit()?;

        info!(
            "Wrote {} bg shapemers to {}",
            num_shapemers,
            params.path_out.display()
        );
        Ok(num_shapemers)
    }
}
