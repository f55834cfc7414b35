use std::fs;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;

///////////////////////////////
/// Output written to a temporary file next to its final location and persisted on commit.
/// Dropped without commit, the temporary file is deleted, so a half-written target never
/// looks complete
pub struct StagedFile {
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl StagedFile {
    pub fn create(target: &Path) -> anyhow::Result<StagedFile> {
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let temp = NamedTempFile::new_in(parent)?;
        Ok(StagedFile {
            target: target.to_path_buf(),
            writer: BufWriter::new(temp),
        })
    }

    /// Flush and move into place
    pub fn commit(self) -> anyhow::Result<PathBuf> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&self.target)?;
        Ok(self.target)
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

///////////////////////////////
/// Commit several outputs as a group; if any rename fails the ones already in place are removed
pub fn commit_all(files: Vec<StagedFile>) -> anyhow::Result<()> {
    let mut done: Vec<PathBuf> = Vec::new();
    for f in files {
        match f.commit() {
            Ok(p) => done.push(p),
            Err(e) => {
                for p in &done {
                    _ = fs::remove_file(p);
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_committed_files_appear() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("sub/a.txt");
        let b = dir.path().join("sub/b.txt");

        {
            let mut f = StagedFile::create(&a).unwrap();
            writeln!(f, "hello").unwrap();
        }
        assert!(!a.exists());
        assert_eq!(fs::read_dir(dir.path().join("sub")).unwrap().count(), 0);

        let mut fa = StagedFile::create(&a).unwrap();
        let mut fb = StagedFile::create(&b).unwrap();
        writeln!(fa, "a").unwrap();
        writeln!(fb, "b").unwrap();
        commit_all(vec![fa, fb]).unwrap();
        assert_eq!(fs::read_to_string(&a).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "b\n");
        assert_eq!(fs::read_dir(dir.path().join("sub")).unwrap().count(), 2);
    }

    #[test]
    fn failed_group_commit_removes_committed_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");

        let mut fa = StagedFile::create(&a).unwrap();
        let fb = StagedFile::create(&b).unwrap();
        writeln!(fa, "a").unwrap();
        // A directory in the way makes persisting b fail
        fs::create_dir(&b).unwrap();
        fs::write(b.join("keep"), "x").unwrap();

        assert!(commit_all(vec![fa, fb]).is_err());
        assert!(!a.exists());
        assert!(b.join("keep").exists());
    }
}
