use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::StagedFile;
use crate::runtime::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => f.write_str("+"),
            Strand::Reverse => f.write_str("-"),
        }
    }
}

///////////////////////////////
/// Best motif hit of a motif-containing sequence. Position is the forward-strand start
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FgContextRow {
    pub index: usize,
    pub strand: Strand,
    pub position: usize,
    pub distance: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgContextRow {
    pub index: usize,
}

///////////////////////////////
/// Region [start, end) of a fg sequence kept around its motif; sequence is in motif orientation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartsRow {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub sequence: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqmerRow {
    pub kmer: String,
    pub abundance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
    pub shapemer: String,
    pub occurrences: u64,
    pub sequences: u64,
    pub reads: u64,
}

///////////////////////////////
/// Read a headerless TSV file into rows
pub fn read_tsv_rows<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|_| Error::file_not_found(path))?;

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: T = result
            .map_err(|e| Error::file_not_valid(path, Some(format!("row {}: {}", i + 1, e))))?;
        rows.push(row);
    }
    Ok(rows)
}

///////////////////////////////
/// Write rows as a headerless TSV file, through a staged file
pub fn write_tsv_rows<T, I>(path: &Path, rows: I) -> anyhow::Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    stage_tsv_rows(path, rows)?.commit()?;
    Ok(())
}

///////////////////////////////
/// Write rows to a staged file, leaving the commit to the caller
pub fn stage_tsv_rows<T, I>(path: &Path, rows: I) -> anyhow::Result<StagedFile>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let staged = StagedFile::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(staged);
    for row in rows {
        writer.serialize(row)?;
    }
    let staged = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush {}: {}", path.display(), e.error()))?;
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rows_use_strand_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("x.fg.ctx");
        let rows = vec![
            FgContextRow {
                index: 0,
                strand: Strand::Forward,
                position: 3,
                distance: 0,
            },
            FgContextRow {
                index: 4,
                strand: Strand::Reverse,
                position: 1,
                distance: 1,
            },
        ];
        write_tsv_rows(&p, rows.iter()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&p).unwrap(),
            "0\t+\t3\t0\n4\t-\t1\t1\n"
        );
        let back: Vec<FgContextRow> = read_tsv_rows(&p).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn malformed_rows_are_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("x.bg.ctx");
        std::fs::write(&p, "1\nabc\n").unwrap();
        let err = read_tsv_rows::<BgContextRow>(&p).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FileNotValid { .. })
        ));
    }
}
