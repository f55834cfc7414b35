use itertools::izip;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::runtime::Error;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").unwrap();
    static ref ACCESSION: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
    static ref MOTIF: Regex = Regex::new(r"^[ACGT]+$").unwrap();
}

///////////////////////////////
/// Check a name that ends up inside a file name. No '_' or '.' allowed, so file names stay parseable
pub fn validate_identifier(what: &str, value: &str) -> Result<(), Error> {
    if IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(Error::invalid_config(format!(
            "{} '{}' must match [A-Za-z0-9][A-Za-z0-9-]*",
            what, value
        )))
    }
}

///////////////////////////////
/// Everything known about one transcription factor: its barcode, the accession of each
/// selection cycle and the motifs (with their allowed edit distance) to look for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskInfo {
    tf: String,
    primer: String,
    family: String,
    accessions: Vec<String>,
    motifs: Vec<String>,
    cycles: Vec<usize>,
    distances: Vec<u32>,
}

impl TaskInfo {
    pub fn new(
        tf: &str,
        primer: &str,
        family: &str,
        accessions: Vec<String>,
        motifs: Vec<String>,
        cycles: Vec<usize>,
        distances: Vec<u32>,
    ) -> Result<TaskInfo, Error> {
        validate_identifier("Factor", tf)?;
        validate_identifier("Primer", primer)?;
        validate_identifier("Family", family)?;

        if accessions.is_empty() {
            return Err(Error::invalid_config(format!("{}: no accessions given", tf)));
        }
        for acc in &accessions {
            if !ACCESSION.is_match(acc) {
                return Err(Error::invalid_config(format!(
                    "{}: accession '{}' is not a valid file name",
                    tf, acc
                )));
            }
        }

        if motifs.len() != distances.len() {
            return Err(Error::invalid_config(format!(
                "{}: {} motifs but {} distances",
                tf,
                motifs.len(),
                distances.len()
            )));
        }
        for motif in &motifs {
            if !MOTIF.is_match(motif) {
                return Err(Error::invalid_config(format!(
                    "{}: motif '{}' must only contain ACGT",
                    tf, motif
                )));
            }
        }
        if let Some(dup) = izip!(&motifs, &distances).duplicates().next() {
            return Err(Error::invalid_config(format!(
                "{}: motif {} with distance {} listed twice",
                tf, dup.0, dup.1
            )));
        }
        for (motif, dist) in izip!(&motifs, &distances) {
            if *dist as usize >= motif.len() {
                return Err(Error::invalid_config(format!(
                    "{}: distance {} would let every {}-mer match {}",
                    tf,
                    dist,
                    motif.len(),
                    motif
                )));
            }
        }

        if let Some(cycle) = cycles.iter().find(|&&c| c >= accessions.len()) {
            return Err(Error::invalid_config(format!(
                "{}: cycle {} but only {} accessions",
                tf,
                cycle,
                accessions.len()
            )));
        }
        if cycles.iter().duplicates().next().is_some() {
            return Err(Error::invalid_config(format!("{}: repeated cycle", tf)));
        }

        Ok(TaskInfo {
            tf: tf.to_string(),
            primer: primer.to_string(),
            family: family.to_string(),
            accessions,
            motifs,
            cycles,
            distances,
        })
    }

    pub fn tf(&self) -> &str {
        &self.tf
    }

    pub fn primer(&self) -> &str {
        &self.primer
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn accessions(&self) -> &[String] {
        &self.accessions
    }

    pub fn accession(&self, cycle: usize) -> &str {
        &self.accessions[cycle]
    }

    pub fn motifs(&self) -> &[String] {
        &self.motifs
    }

    pub fn distances(&self) -> &[u32] {
        &self.distances
    }

    pub fn cycles(&self) -> &[usize] {
        &self.cycles
    }

    /// Motifs paired with their distance, in table order
    pub fn motif_distances(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        izip!(&self.motifs, &self.distances).map(|(m, d)| (m.as_str(), *d))
    }

    /// Distinct motif lengths, ascending
    pub fn motif_lengths(&self) -> Vec<usize> {
        self.motifs.iter().map(|m| m.len()).sorted().dedup().collect()
    }
}
