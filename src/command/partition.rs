use std::cmp::Reverse;
use std::path::PathBuf;

use log::info;
use rustc_hash::FxHashMap;

use super::seqmer_table::load_seqmer_table;
use crate::fileformat::commit_all;
use crate::fileformat::read_lines;
use crate::fileformat::stage_tsv_rows;
use crate::fileformat::BgContextRow;
use crate::fileformat::FgContextRow;
use crate::fileformat::Strand;
use crate::utils::mismatches;
use crate::utils::revcomp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionParams {
    pub path_seq: PathBuf,
    pub motif: String,
    pub distance: u32,
    pub path_seqmer_table: PathBuf,
    pub path_fg: PathBuf,
    pub path_bg: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub fg: usize,
    pub bg: usize,
}

///////////////////////////////
/// Closest occurrence of a motif in a sequence, on either strand.
/// Ties go to the more abundant k-mer, then the forward strand, then the leftmost position
pub fn best_motif_hit(
    seq: &[u8],
    motif: &[u8],
    motif_rc: &[u8],
    abundance: &FxHashMap<String, u64>,
) -> Option<FgContextRow> {
    let k = motif.len();
    if k == 0 || seq.len() < k {
        return None;
    }

    let mut best: Option<((u32, Reverse<u64>, Strand, usize), FgContextRow)> = None;
    for (position, window) in seq.windows(k).enumerate() {
        // Lookups only happen for windows that could win
        let kmer_abundance = || {
            std::str::from_utf8(window)
                .ok()
                .and_then(|w| abundance.get(w))
                .copied()
                .unwrap_or(0)
        };
        for (strand, oriented_motif) in [(Strand::Forward, motif), (Strand::Reverse, motif_rc)] {
            let distance = mismatches(window, oriented_motif);
            if let Some((best_key, _)) = &best {
                if distance > best_key.0 {
                    continue;
                }
            }
            let key = (distance, Reverse(kmer_abundance()), strand, position);
            let better = match &best {
                Some((best_key, _)) => key < *best_key,
                None => true,
            };
            if better {
                best = Some((
                    key,
                    FgContextRow {
                        index: 0,
                        strand,
                        position,
                        distance,
                    },
                ));
            }
        }
    }
    best.map(|(_, row)| row)
}

pub struct Partition {}

impl Partition {
    ///////////////////////////////
    /// Split a pool into sequences with a motif hit within the distance (fg) and the rest (bg).
    /// Every sequence index ends up in exactly one of the two files
    pub fn run(params: &PartitionParams) -> anyhow::Result<PartitionStats> {
        let seqs = read_lines(&params.path_seq)?;
        let abundance = load_seqmer_table(&params.path_seqmer_table)?;

        let motif = params.motif.as_bytes();
        let motif_rc = revcomp(motif);

        let mut fg: Vec<FgContextRow> = Vec::new();
        let mut bg: Vec<BgContextRow> = Vec::new();
        for (index, seq) in seqs.iter().enumerate() {
            match best_motif_hit(seq.as_bytes(), motif, &motif_rc, &abundance) {
                Some(hit) if hit.distance <= params.distance => {
                    fg.push(FgContextRow { index, ..hit });
                }
                _ => bg.push(BgContextRow { index }),
            }
        }

        let stats = PartitionStats {
            fg: fg.len(),
            bg: bg.len(),
        };
        let fg_out = stage_tsv_rows(&params.path_fg, fg)?;
        let bg_out = stage_tsv_rows(&params.path_bg, bg)?;
        commit_all(vec![fg_out, bg_out])?;

        info!(
            "Partitioned {} on {} (d<={}): {} fg, {} bg",
            params.path_seq.display(),
            params.motif,
            params.distance,
            stats.fg,
            stats.bg
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileformat::read_tsv_rows;
    use std::collections::BTreeSet;
    use std::fs;

    fn no_table() -> FxHashMap<String, u64> {
        FxHashMap::default()
    }

    #[test]
    fn finds_hits_on_both_strands() {
        let motif = b"AACG";
        let rc = revcomp(motif);

        let hit = best_motif_hit(b"TTAACGTT", motif, &rc, &no_table()).unwrap();
        assert_eq!((hit.strand, hit.position, hit.distance), (Strand::Forward, 2, 0));

        // CGTT is the reverse complement of AACG
        let hit = best_motif_hit(b"GGCGTTGG", motif, &rc, &no_table()).unwrap();
        assert_eq!((hit.strand, hit.position, hit.distance), (Strand::Reverse, 2, 0));

        assert!(best_motif_hit(b"AAC", motif, &rc, &no_table()).is_none());
    }

    #[test]
    fn ties_prefer_abundant_kmers() {
        let motif = b"AAAA";
        let rc = revcomp(motif);
        let mut table = no_table();
        table.insert("AAAC".to_string(), 1);
        table.insert("GAAA".to_string(), 10);

        // AAAC at 0 and GAAA at 4 are both one mismatch away
        let hit = best_motif_hit(b"AAACGAAA", motif, &rc, &table).unwrap();
        assert_eq!((hit.position, hit.distance), (4, 1));

        let hit = best_motif_hit(b"AAACGAAA", motif, &rc, &no_table()).unwrap();
        assert_eq!((hit.position, hit.distance), (0, 1));
    }

    #[test]
    fn fg_and_bg_partition_the_pool() {
        let dir = tempfile::tempdir().unwrap();
        let seq = dir.path().join("a.seq");
        let nbr = dir.path().join("a.seq.seq4mer.enr.nbr");
        let pool = [
            "ACGTACGT", "CCCCCCCC", "ACGAGGGG", "GGGGGGGG", "TTTTACGT", "ACG", "ATCAGGGG",
        ];
        fs::write(&seq, pool.join("\n") + "\n").unwrap();
        fs::write(&nbr, "ACGT\t3\n").unwrap();

        let params = PartitionParams {
            path_seq: seq,
            motif: "ACGT".to_string(),
            distance: 1,
            path_seqmer_table: nbr,
            path_fg: dir.path().join("ACGT.d1.fg.ctx"),
            path_bg: dir.path().join("ACGT.d1.bg.ctx"),
        };
        let stats = Partition::run(&params).unwrap();
        assert_eq!(stats.fg + stats.bg, pool.len());

        let fg: Vec<FgContextRow> = read_tsv_rows(&params.path_fg).unwrap();
        let bg: Vec<BgContextRow> = read_tsv_rows(&params.path_bg).unwrap();
        let fg_idx: BTreeSet<usize> = fg.iter().map(|r| r.index).collect();
        let bg_idx: BTreeSet<usize> = bg.iter().map(|r| r.index).collect();
        assert!(fg_idx.is_disjoint(&bg_idx));
        let all: BTreeSet<usize> = fg_idx.union(&bg_idx).copied().collect();
        assert_eq!(all, (0..pool.len()).collect());

        assert_eq!(fg_idx, BTreeSet::from([0, 2, 4]));
        assert!(fg.iter().all(|r| r.distance <= 1));
    }
}
