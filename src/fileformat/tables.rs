use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::core::ShapeInfo;
use crate::core::ShapeScheme;
use crate::core::TaskInfo;
use crate::runtime::Error;

///////////////////////////////
/// For serialization: one row in the factor table
#[derive(Debug, serde::Deserialize, Eq, PartialEq)]
struct FactorTsvRow {
    tf: String,
    primer: String,
    family: String,
    motif: String,
    distance: String,
    accessions: String,
}

///////////////////////////////
/// For serialization: one row in the discretization levels table
#[derive(Debug, serde::Deserialize, PartialEq)]
struct LevelsTsvRow {
    scheme: String,
    shape: String,
    levels: String,
}

fn split_list(s: &str) -> Vec<&str> {
    s.split(',').map(|x| x.trim()).filter(|x| !x.is_empty()).collect()
}

fn open_table(path: &Path) -> anyhow::Result<File> {
    File::open(path).map_err(|_| Error::file_not_found(path).into())
}

///////////////////////////////
/// Read the factor table. Without explicit cycles, every accession of a factor is a cycle
pub fn read_factor_table(path: &Path, cycles: Option<&[usize]>) -> anyhow::Result<Vec<TaskInfo>> {
    let tasks = read_factor_table_from(open_table(path)?, cycles)?;
    log::info!("Read {} factors from {}", tasks.len(), path.display());
    Ok(tasks)
}

pub fn read_factor_table_from(
    src: impl Read,
    cycles: Option<&[usize]>,
) -> anyhow::Result<Vec<TaskInfo>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_reader(src);

    let mut tasks = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let record: FactorTsvRow = result.map_err(|e| {
            Error::parse_error(format!("factor table row {}", i + 1), Some(e.to_string()))
        })?;

        let motifs: Vec<String> = split_list(&record.motif)
            .into_iter()
            .map(|m| m.to_ascii_uppercase())
            .collect();
        let distances = split_list(&record.distance)
            .into_iter()
            .map(|d| {
                d.parse::<u32>().map_err(|e| {
                    Error::parse_error(
                        format!("distance of {}", record.tf),
                        Some(format!("'{}': {}", d, e)),
                    )
                })
            })
            .collect::<Result<Vec<u32>, Error>>()?;
        let accessions: Vec<String> = split_list(&record.accessions)
            .into_iter()
            .map(String::from)
            .collect();
        let task_cycles = match cycles {
            Some(c) => c.to_vec(),
            None => (0..accessions.len()).collect(),
        };

        tasks.push(TaskInfo::new(
            &record.tf,
            &record.primer,
            &record.family,
            accessions,
            motifs,
            task_cycles,
            distances,
        )?);
    }
    Ok(tasks)
}

///////////////////////////////
/// Read the table of discretization levels, one row per (scheme, shape)
pub fn read_levels_table(path: &Path) -> anyhow::Result<Vec<ShapeScheme>> {
    let schemes = read_levels_table_from(open_table(path)?)?;
    log::info!("Read {} discretization rows from {}", schemes.len(), path.display());
    Ok(schemes)
}

pub fn read_levels_table_from(src: impl Read) -> anyhow::Result<Vec<ShapeScheme>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_reader(src);

    let mut schemes = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let record: LevelsTsvRow = result.map_err(|e| {
            Error::parse_error(format!("levels table row {}", i + 1), Some(e.to_string()))
        })?;

        let levels = split_list(&record.levels)
            .into_iter()
            .map(|l| {
                l.parse::<f64>().map_err(|e| {
                    Error::parse_error(
                        format!("levels of {}/{}", record.scheme, record.shape),
                        Some(format!("'{}': {}", l, e)),
                    )
                })
            })
            .collect::<Result<Vec<f64>, Error>>()?;

        schemes.push(ShapeScheme {
            scheme: record.scheme,
            shape: record.shape,
            info: ShapeInfo::new(levels)?,
        });
    }
    Ok(schemes)
}
