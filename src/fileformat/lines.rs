use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use crate::runtime::Error;

pub fn open_text(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).map_err(|_| Error::file_not_found(path))?;
    Ok(BufReader::new(file))
}

///////////////////////////////
/// All lines of a text file, without line endings
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in open_text(path)?.lines() {
        let line = line?;
        lines.push(line.trim_end_matches('\r').to_string());
    }
    Ok(lines)
}

///////////////////////////////
/// A count file: one non-negative integer per line, parallel to a sequence file
pub fn read_counts(path: &Path) -> anyhow::Result<Vec<u64>> {
    let mut counts = Vec::new();
    for (i, line) in open_text(path)?.lines().enumerate() {
        let line = line?;
        let cnt = line.trim().parse::<u64>().map_err(|e| {
            Error::file_not_valid(path, Some(format!("line {}: {}", i + 1, e)))
        })?;
        counts.push(cnt);
    }
    Ok(counts)
}

pub fn count_lines(path: &Path) -> anyhow::Result<usize> {
    let mut n = 0;
    for line in open_text(path)?.lines() {
        line?;
        n += 1;
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_must_be_integers() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.cnt");
        std::fs::write(&p, "3\n1\r\n").unwrap();
        assert_eq!(read_counts(&p).unwrap(), vec![3, 1]);
        assert_eq!(count_lines(&p).unwrap(), 2);

        std::fs::write(&p, "3\nx\n").unwrap();
        assert!(read_counts(&p).is_err());

        let missing = dir.path().join("none.cnt");
        let err = read_lines(&missing).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FileNotFound { .. })
        ));
    }
}
