use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use super::Flank;
use super::TaskInfo;

///////////////////////////////
/// Motif-containing (fg) or motif-free (bg) part of a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoolContext {
    Fg,
    Bg,
}

impl PoolContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolContext::Fg => "fg",
            PoolContext::Bg => "bg",
        }
    }
}

impl fmt::Display for PoolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///////////////////////////////
/// One (cycle, motif, distance) combination of a factor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MotifKey<'a> {
    pub cycle: usize,
    pub motif: &'a str,
    pub distance: u32,
}

/// Append ".ext" to a path without touching any existing extension
pub fn with_suffix<P: AsRef<Path>>(path: P, ext: &str) -> PathBuf {
    let mut s = path.as_ref().as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Raw reads of one selection cycle
pub fn raw_archive_file(download_dir: &Path, accession: &str) -> PathBuf {
    download_dir.join(format!("{}.fastq.gz", accession))
}

// All paths below are relative; the caller decides which data directory they live in.
// Identifiers never contain '_' or '.', so every name can be split back into its parts.
impl TaskInfo {
    pub fn sequence_file(&self, cycle: usize) -> PathBuf {
        Path::new(self.family())
            .join(self.tf())
            .join(format!("{}_{}_c{}.seq", self.tf(), self.primer(), cycle))
    }

    pub fn count_file(&self, cycle: usize) -> PathBuf {
        with_suffix(self.sequence_file(cycle), "cnt")
    }

    pub fn shape_file(&self, cycle: usize, shape: &str) -> PathBuf {
        with_suffix(self.sequence_file(cycle), shape)
    }

    pub fn discrete_shape_file(&self, cycle: usize, shape: &str, levels_str: &str) -> PathBuf {
        with_suffix(
            self.sequence_file(cycle),
            &format!("{}.{}.dsc", shape, levels_str),
        )
    }

    pub fn seqmer_table_file(&self, cycle: usize, kmer_size: usize) -> PathBuf {
        with_suffix(
            self.sequence_file(cycle),
            &format!("seq{}mer.enr.nbr", kmer_size),
        )
    }

    fn motif_dir(&self, cycle: usize) -> PathBuf {
        Path::new(self.tf()).join(format!("c{}", cycle))
    }

    pub fn context_file(&self, key: &MotifKey, ctx: PoolContext) -> PathBuf {
        self.motif_dir(key.cycle)
            .join(format!("{}.d{}.{}.ctx", key.motif, key.distance, ctx))
    }

    pub fn fg_parts_file(&self, key: &MotifKey, flank: Flank) -> PathBuf {
        self.motif_dir(key.cycle).join(format!(
            "{}.d{}.{}.fg.parts",
            key.motif,
            key.distance,
            flank.tag()
        ))
    }

    pub fn contexted_shapemer_file(
        &self,
        key: &MotifKey,
        flank: Flank,
        ctx: PoolContext,
        shape: &str,
        levels_str: &str,
    ) -> PathBuf {
        self.motif_dir(key.cycle).join(format!(
            "{}.d{}.{}.{}.{}.{}.shapemer",
            key.motif,
            key.distance,
            flank.tag(),
            ctx,
            shape,
            levels_str
        ))
    }

    pub fn contexted_shapemer_count_file(
        &self,
        key: &MotifKey,
        flank: Flank,
        ctx: PoolContext,
        shape: &str,
        levels_str: &str,
    ) -> PathBuf {
        with_suffix(
            self.contexted_shapemer_file(key, flank, ctx, shape, levels_str),
            "cnt",
        )
    }

    pub fn contexted_coverage_file(
        &self,
        key: &MotifKey,
        flank: Flank,
        ctx: PoolContext,
        shape: &str,
        levels_str: &str,
    ) -> PathBuf {
        with_suffix(
            self.contexted_shapemer_file(key, flank, ctx, shape, levels_str),
            "cov",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShapeInfo;

    fn tf1() -> TaskInfo {
        TaskInfo::new(
            "TF1",
            "BC1",
            "fam",
            vec!["SRR1".to_string()],
            vec!["ACGT".to_string()],
            vec![0],
            vec![1],
        )
        .unwrap()
    }

    #[test]
    fn layout() {
        let t = tf1();
        let key = MotifKey {
            cycle: 0,
            motif: "ACGT",
            distance: 1,
        };
        assert_eq!(t.sequence_file(0), PathBuf::from("fam/TF1/TF1_BC1_c0.seq"));
        assert_eq!(t.count_file(0), PathBuf::from("fam/TF1/TF1_BC1_c0.seq.cnt"));
        assert_eq!(
            t.seqmer_table_file(0, 4),
            PathBuf::from("fam/TF1/TF1_BC1_c0.seq.seq4mer.enr.nbr")
        );
        assert_eq!(
            t.context_file(&key, PoolContext::Bg),
            PathBuf::from("TF1/c0/ACGT.d1.bg.ctx")
        );
        assert_eq!(
            t.contexted_coverage_file(&key, Flank::new(2, 1), PoolContext::Fg, "MGW", "lv0"),
            PathBuf::from("TF1/c0/ACGT.d1.l2r1.fg.MGW.lv0.shapemer.cov")
        );
        assert_eq!(
            raw_archive_file(Path::new("dl"), "SRR1"),
            PathBuf::from("dl/SRR1.fastq.gz")
        );
    }

    #[test]
    fn discretized_names_depend_on_levels() {
        let t = tf1();
        let a = ShapeInfo::new(vec![-1.0, 0.0, 1.0]).unwrap();
        let b = ShapeInfo::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        let fa = t.discrete_shape_file(0, "MGW", a.levels_str());
        let fb = t.discrete_shape_file(0, "MGW", b.levels_str());
        assert_ne!(fa, fb);

        let key = MotifKey {
            cycle: 0,
            motif: "ACGT",
            distance: 1,
        };
        let sa = t.contexted_shapemer_file(&key, Flank::NONE, PoolContext::Fg, "MGW", a.levels_str());
        let sb = t.contexted_shapemer_file(&key, Flank::NONE, PoolContext::Fg, "MGW", b.levels_str());
        assert_ne!(sa, sb);
    }
}
