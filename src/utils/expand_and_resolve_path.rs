use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Expands ~ and env vars if possible (only for UTF-8 paths), and always returns an absolute PathBuf.
/// Logs a warning if the path is not valid UTF-8 or expansion fails, but still makes the path absolute.
/// Does NOT fail if the file does not exist.
pub fn expand_and_resolve_path<P: AsRef<Path>>(input: P) -> Result<PathBuf> {
    let input = input.as_ref();
    let expanded: PathBuf = match input.to_str() {
        Some(s) => match shellexpand::full(s) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                log::warn!("Failed to expand path {:?}: {}. Using original path", input, e);
                input.to_path_buf()
            }
        },
        None => {
            log::warn!("Path {:?} is not valid UTF-8. Skipping path expansion", input);
            input.to_path_buf()
        }
    };

    // Try canonicalize, else make absolute
    if let Ok(absolute) = fs::canonicalize(&expanded) {
        return Ok(absolute);
    }
    let abs = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .context("Failed to get current directory")?
            .join(expanded)
    };
    Ok(abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_becomes_absolute() {
        let p = expand_and_resolve_path("no/such/file.log").unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("no/such/file.log"));
    }

    #[test]
    fn expands_environment_variables() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("orig")).unwrap();
        env::set_var("SHAPEMER_TEST_SCRATCH", dir.path());
        let p = expand_and_resolve_path("$SHAPEMER_TEST_SCRATCH/orig").unwrap();
        assert_eq!(p, fs::canonicalize(dir.path()).unwrap().join("orig"));
    }

    #[test]
    fn unknown_variable_keeps_the_path() {
        let p = expand_and_resolve_path("$SHAPEMER_TEST_NO_SUCH_VAR/orig").unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("$SHAPEMER_TEST_NO_SUCH_VAR/orig"));
    }
}
