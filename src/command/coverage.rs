use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;
use std::path::PathBuf;

use log::info;
use rustc_hash::FxHashSet;

use crate::fileformat::open_text;
use crate::fileformat::read_counts;
use crate::fileformat::read_lines;
use crate::fileformat::write_tsv_rows;
use crate::fileformat::CoverageRow;
use crate::runtime::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageParams {
    pub path_context: PathBuf,
    pub path_count: PathBuf,
    pub path_shapemer: PathBuf,
    pub path_out: PathBuf,
}

#[derive(Default)]
struct Tally {
    occurrences: u64,
    sequences: BTreeSet<usize>,
    reads: u64,
}

///////////////////////////////
/// Sequence indices of a context file; the index is its first column
fn context_indices(path: &Path) -> anyhow::Result<FxHashSet<usize>> {
    let mut indices = FxHashSet::default();
    for (i, line) in read_lines(path)?.iter().enumerate() {
        let field = line.split('\t').next().unwrap_or("");
        if field.is_empty() {
            continue;
        }
        let index = field.parse::<usize>().map_err(|e| {
            Error::file_not_valid(path, Some(format!("line {}: {}", i + 1, e)))
        })?;
        indices.insert(index);
    }
    Ok(indices)
}

pub struct Coverage {}

impl Coverage {
    ///////////////////////////////
    /// Per shapemer: how often it occurs, in how many distinct sequences, and how many reads
    /// carry it, each occurrence weighted by the read count of its sequence
    pub fn run(params: &CoverageParams) -> anyhow::Result<usize> {
        let context = context_indices(&params.path_context)?;
        let counts = read_counts(&params.path_count)?;

        let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
        for (i, line) in open_text(&params.path_shapemer)?.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let index = fields
                .next()
                .and_then(|f| f.parse::<usize>().ok())
                .ok_or_else(|| {
                    Error::file_not_valid(
                        &params.path_shapemer,
                        Some(format!("line {}: missing sequence index", i + 1)),
                    )
                })?;
            if !context.contains(&index) || index >= counts.len() {
                return Err(Error::file_not_valid(
                    &params.path_shapemer,
                    Some(format!(
                        "line {}: sequence {} is not part of {}",
                        i + 1,
                        index,
                        params.path_context.display()
                    )),
                )
                .into());
            }

            let tally = tallies.entry(word.to_string()).or_default();
            tally.occurrences += 1;
            tally.sequences.insert(index);
            tally.reads += counts[index];
        }

        let rows: Vec<CoverageRow> = tallies
            .into_iter()
            .map(|(shapemer, tally)| CoverageRow {
                shapemer,
                occurrences: tally.occurrences,
                sequences: tally.sequences.len() as u64,
                reads: tally.reads,
            })
            .collect();
        let num_rows = rows.len();
        write_tsv_rows(&params.path_out, rows)?;

        info!(
            "Coverage of {} shapemers written to {}",
            num_rows,
            params.path_out.display()
        );
        Ok(num_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileformat::read_tsv_rows;
    use std::fs;

    fn setup(dir: &Path, shapemers: &str) -> CoverageParams {
        let params = CoverageParams {
            path_context: dir.join("m.d0.fg.ctx"),
            path_count: dir.join("a.seq.cnt"),
            path_shapemer: dir.join("m.shapemer"),
            path_out: dir.join("m.shapemer.cov"),
        };
        fs::write(&params.path_context, "0\t+\t1\t0\n2\t-\t0\t1\n").unwrap();
        fs::write(&params.path_count, "5\n7\n2\n").unwrap();
        fs::write(&params.path_shapemer, shapemers).unwrap();
        params
    }

    #[test]
    fn reads_are_weighted_per_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let params = setup(dir.path(), "AAB 0 -1\nAAB 0 0\nAAB 2 0\nBBC 2 1\n");
        assert_eq!(Coverage::run(&params).unwrap(), 2);

        let rows: Vec<CoverageRow> = read_tsv_rows(&params.path_out).unwrap();
        assert_eq!(
            rows,
            vec![
                CoverageRow {
                    shapemer: "AAB".to_string(),
                    occurrences: 3,
                    sequences: 2,
                    reads: 12,
                },
                CoverageRow {
                    shapemer: "BBC".to_string(),
                    occurrences: 1,
                    sequences: 1,
                    reads: 2,
                },
            ]
        );
    }

    #[test]
    fn repeated_shapemer_in_one_sequence_counts_twice() {
        let dir = tempfile::tempdir().unwrap();
        let params = setup(dir.path(), "AAB 0 -1\nAAB 0 0\n");
        Coverage::run(&params).unwrap();

        let rows: Vec<CoverageRow> = read_tsv_rows(&params.path_out).unwrap();
        assert_eq!(
            rows,
            vec![CoverageRow {
                shapemer: "AAB".to_string(),
                occurrences: 2,
                sequences: 1,
                reads: 10,
            }]
        );
    }

    #[test]
    fn index_outside_context_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let params = setup(dir.path(), "AAB 1 0\n");
        let err = Coverage::run(&params).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FileNotValid { .. })
        ));
        assert!(!params.path_out.exists());
    }
}
