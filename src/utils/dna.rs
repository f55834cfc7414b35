use bio::alignment::distance::hamming;
use bio::alphabets::Alphabet;
use lazy_static::lazy_static;

lazy_static! {
    static ref ACGT: Alphabet = Alphabet::new(b"ACGT");
}

///////////////////////////////
/// Upper-case a read; None if any base is outside ACGT
pub fn normalize_read(seq: &[u8]) -> Option<Vec<u8>> {
    let upper = seq.to_ascii_uppercase();
    if !upper.is_empty() && ACGT.is_word(&upper) {
        Some(upper)
    } else {
        None
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    bio::alphabets::dna::revcomp(seq)
}

///////////////////////////////
/// Hamming distance between two words of the same length
pub fn mismatches(a: &[u8], b: &[u8]) -> u32 {
    hamming(a, b) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_filters_n() {
        assert_eq!(normalize_read(b"acgT"), Some(b"ACGT".to_vec()));
        assert_eq!(normalize_read(b"ACNT"), None);
        assert_eq!(normalize_read(b""), None);
    }

    #[test]
    fn revcomp_and_distance() {
        assert_eq!(revcomp(b"AACG"), b"CGTT".to_vec());
        assert_eq!(mismatches(b"ACGT", b"ACGA"), 1);
        assert_eq!(mismatches(b"ACGT", b"ACGT"), 0);
    }
}
