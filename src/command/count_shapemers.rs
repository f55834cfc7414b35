use std::collections::BTreeMap;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::fileformat::open_text;
use crate::fileformat::StagedFile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountShapemersParams {
    pub path_in: PathBuf,
    pub path_out: PathBuf,
}

///////////////////////////////
/// Occurrences of each shapemer, keyed on the first whitespace field of each line.
/// Blank lines are ignored
pub fn count_words<R: BufRead>(reader: R) -> anyhow::Result<BTreeMap<String, u64>> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(word) = line.split_whitespace().next() {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

pub struct CountShapemers {}

impl CountShapemers {
    ///////////////////////////////
    /// Write "count shapemer" lines, sorted by shapemer
    pub fn run(params: &CountShapemersParams) -> anyhow::Result<usize> {
        let counts = count_words(open_text(&params.path_in)?)?;

        let mut out = StagedFile::create(&params.path_out)?;
        for (word, cnt) in &counts {
            writeln!(out, "{} {}", cnt, word)?;
        }
        out.commit()?;

        info!(
            "Counted {} distinct shapemers in {}",
            counts.len(),
            params.path_in.display()
        );
        Ok(counts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn counts_first_field() {
        let counts = count_words("AAB 0 1\nAAB 3 -2\n\nAAC 1 0\n".as_bytes()).unwrap();
        assert_eq!(counts.get("AAB"), Some(&2));
        assert_eq!(counts.get("AAC"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn writes_sorted_count_lines() {
        let dir = tempfile::tempdir().unwrap();
        let params = CountShapemersParams {
            path_in: dir.path().join("x.shapemer"),
            path_out: dir.path().join("x.shapemer.cnt"),
        };
        fs::write(&params.path_in, "AAB\nAAB\nAAC\n").unwrap();
        assert_eq!(CountShapemers::run(&params).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&params.path_out).unwrap(),
            "2 AAB\n1 AAC\n"
        );
    }
}
