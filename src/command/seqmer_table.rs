use std::path::Path;
use std::path::PathBuf;

use itertools::Itertools;
use log::info;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::fileformat::read_counts;
use crate::fileformat::read_lines;
use crate::fileformat::read_tsv_rows;
use crate::fileformat::write_tsv_rows;
use crate::fileformat::SeqmerRow;
use crate::runtime::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqmerTableParams {
    pub path_seq: PathBuf,
    pub path_count: PathBuf,
    pub kmer_size: usize,
    pub path_out: PathBuf,
}

pub struct SeqmerTable {}

impl SeqmerTable {
    ///////////////////////////////
    /// Abundance of every forward k-mer in a pool: the summed read count of the
    /// sequences containing it, each sequence counted once
    pub fn run(params: &SeqmerTableParams) -> anyhow::Result<usize> {
        let seqs = read_lines(&params.path_seq)?;
        let counts = read_counts(&params.path_count)?;
        if seqs.len() != counts.len() {
            return Err(Error::file_not_valid(
                &params.path_count,
                Some(format!(
                    "{} counts for {} sequences in {}",
                    counts.len(),
                    seqs.len(),
                    params.path_seq.display()
                )),
            )
            .into());
        }
        if params.kmer_size == 0 {
            anyhow::bail!("k-mer size must be at least 1");
        }

        let mut abundance: FxHashMap<&[u8], u64> = FxHashMap::default();
        let mut seen: FxHashSet<&[u8]> = FxHashSet::default();
        for (seq, cnt) in seqs.iter().zip(&counts) {
            seen.clear();
            for kmer in seq.as_bytes().windows(params.kmer_size) {
                if seen.insert(kmer) {
                    *abundance.entry(kmer).or_insert(0) += cnt;
                }
            }
        }

        let num_kmers = abundance.len();
        let rows = abundance
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(kmer, abundance)| SeqmerRow {
                kmer: String::from_utf8_lossy(kmer).into_owned(),
                abundance,
            });
        write_tsv_rows(&params.path_out, rows)?;

        info!(
            "Wrote {} {}-mers to {}",
            num_kmers,
            params.kmer_size,
            params.path_out.display()
        );
        Ok(num_kmers)
    }
}

///////////////////////////////
/// Load a k-mer table for lookups
pub fn load_seqmer_table(path: &Path) -> anyhow::Result<FxHashMap<String, u64>> {
    let rows: Vec<SeqmerRow> = read_tsv_rows(path)?;
    Ok(rows.into_iter().map(|r| (r.kmer, r.abundance)).collect())
}
