use std::path::PathBuf;

use log::info;

use super::seqmer_table::load_seqmer_table;
use crate::core::Flank;
use crate::fileformat::read_lines;
use crate::fileformat::read_tsv_rows;
use crate::fileformat::write_tsv_rows;
use crate::fileformat::FgContextRow;
use crate::fileformat::PartsRow;
use crate::fileformat::Strand;
use crate::runtime::Error;
use crate::utils::revcomp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FgPartsParams {
    pub path_seq: PathBuf,
    pub path_fg_context: PathBuf,
    pub path_seqmer_table: PathBuf,
    pub motif: String,
    pub flank: Flank,
    pub path_out: PathBuf,
}

///////////////////////////////
/// Forward-strand region [start, end) covering a motif hit plus its flanks, clipped to the sequence.
/// Flanks are given in motif orientation, so they swap sides for reverse-strand hits
pub fn flanked_region(
    seq_len: usize,
    position: usize,
    motif_len: usize,
    strand: Strand,
    flank: Flank,
) -> (usize, usize) {
    let (upstream, downstream) = match strand {
        Strand::Forward => (flank.left, flank.right),
        Strand::Reverse => (flank.right, flank.left),
    };
    let start = position.saturating_sub(upstream);
    let end = (position + motif_len + downstream).min(seq_len);
    (start, end)
}

pub struct FgParts {}

impl FgParts {
    ///////////////////////////////
    /// Cut every motif-containing sequence down to its motif hit and flanks
    pub fn run(params: &FgPartsParams) -> anyhow::Result<usize> {
        let seqs = read_lines(&params.path_seq)?;
        let context: Vec<FgContextRow> = read_tsv_rows(&params.path_fg_context)?;
        let table = load_seqmer_table(&params.path_seqmer_table)?;
        let k = params.motif.len();

        let mut parts = Vec::with_capacity(context.len());
        for row in &context {
            let seq = seqs.get(row.index).ok_or_else(|| {
                Error::file_not_valid(
                    &params.path_fg_context,
                    Some(format!(
                        "index {} beyond the {} sequences of {}",
                        row.index,
                        seqs.len(),
                        params.path_seq.display()
                    )),
                )
            })?;
            if row.position + k > seq.len() || !seq.is_ascii() {
                return Err(Error::file_not_valid(
                    &params.path_fg_context,
                    Some(format!("hit at {} does not fit sequence {}", row.position, row.index)),
                )
                .into());
            }

            // The hit must be a k-mer of this pool
            let hit_kmer = &seq[row.position..row.position + k];
            if !table.contains_key(hit_kmer) {
                return Err(Error::file_not_valid(
                    &params.path_seqmer_table,
                    Some(format!("k-mer {} of sequence {} is missing", hit_kmer, row.index)),
                )
                .into());
            }

            let (start, end) = flanked_region(seq.len(), row.position, k, row.strand, params.flank);
            let region = &seq.as_bytes()[start..end];
            let sequence = match row.strand {
                Strand::Forward => String::from_utf8_lossy(region).into_owned(),
                Strand::Reverse => String::from_utf8_lossy(&revcomp(region)).into_owned(),
            };
            parts.push(PartsRow {
                index: row.index,
                start,
                end,
                sequence,
            });
        }

        let num_parts = parts.len();
        write_tsv_rows(&params.path_out, parts)?;
        info!(
            "Cut {} fg sequences to {} with flank {}",
            num_parts, params.motif, params.flank
        );
        Ok(num_parts)
    }
}
