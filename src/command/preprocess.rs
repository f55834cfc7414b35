use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, info};
use seq_io::fastq::Record as FastqRecord;

use crate::fileformat::commit_all;
use crate::fileformat::open_fastq;
use crate::fileformat::StagedFile;
use crate::utils::normalize_read;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreprocessParams {
    pub path_fastq: PathBuf,
    pub path_seq: PathBuf,
    pub path_count: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreprocessStats {
    pub reads_total: u64,
    pub reads_kept: u64,
    pub distinct: usize,
}

pub struct Preprocess {}

impl Preprocess {
    ///////////////////////////////
    /// Collapse a FASTQ file into distinct ACGT-only sequences and their read counts.
    /// Both outputs are committed together
    pub fn run(params: &PreprocessParams) -> anyhow::Result<PreprocessStats> {
        let mut reader = open_fastq(&params.path_fastq)?;

        let mut stats = PreprocessStats::default();
        let mut tally: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        while let Some(record) = reader.next() {
            let record = record?;
            stats.reads_total += 1;
            if let Some(seq) = normalize_read(record.seq()) {
                stats.reads_kept += 1;
                *tally.entry(seq).or_insert(0) += 1;
            }
        }
        stats.distinct = tally.len();

        let mut seq_out = StagedFile::create(&params.path_seq)?;
        let mut count_out = StagedFile::create(&params.path_count)?;
        for (seq, cnt) in &tally {
            seq_out.write_all(seq)?;
            seq_out.write_all(b"\n")?;
            writeln!(count_out, "{}", cnt)?;
        }
        commit_all(vec![seq_out, count_out])?;

        debug!(
            "{}: dropped {} reads with bases outside ACGT",
            params.path_fastq.display(),
            stats.reads_total - stats.reads_kept
        );
        info!(
            "Preprocessed {}: {} reads kept of {}, {} distinct",
            params.path_fastq.display(),
            stats.reads_kept,
            stats.reads_total,
            stats.distinct
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;

    #[test]
    fn filters_and_collapses_reads() {
        let dir = tempfile::tempdir().unwrap();
        let fq = dir.path().join("SRR1.fastq.gz");
        {
            let mut gz = GzEncoder::new(fs::File::create(&fq).unwrap(), Compression::default());
            for (i, seq) in ["ACGT", "TTTT", "ACNT", "acgt", "GGGG", "TTTT"].iter().enumerate() {
                let qual = "I".repeat(seq.len());
                write!(gz, "@r{}\n{}\n+\n{}\n", i, seq, qual).unwrap();
            }
            gz.finish().unwrap();
        }

        let params = PreprocessParams {
            path_fastq: fq,
            path_seq: dir.path().join("out/a.seq"),
            path_count: dir.path().join("out/a.seq.cnt"),
        };
        let stats = Preprocess::run(&params).unwrap();
        assert_eq!(
            stats,
            PreprocessStats {
                reads_total: 6,
                reads_kept: 5,
                distinct: 3
            }
        );
        assert_eq!(fs::read_to_string(&params.path_seq).unwrap(), "ACGT\nGGGG\nTTTT\n");
        assert_eq!(fs::read_to_string(&params.path_count).unwrap(), "2\n1\n2\n");
    }

    #[test]
    fn missing_archive_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let params = PreprocessParams {
            path_fastq: dir.path().join("none.fastq.gz"),
            path_seq: dir.path().join("a.seq"),
            path_count: dir.path().join("a.seq.cnt"),
        };
        assert!(Preprocess::run(&params).is_err());
        assert!(!params.path_seq.exists());
        assert!(!params.path_count.exists());
    }
}
