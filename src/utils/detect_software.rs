use log::debug;
use log::info;
use std::path::Path;
use std::process::Command;

use crate::runtime::Error;

///////////////////////////////
/// Make sure the shape predictor can be spawned at all. Its exit code is not checked;
/// most builds print usage and fail when called without arguments
pub fn check_dnashape(exe: &Path) -> anyhow::Result<()> {
    debug!("Checking for {}", exe.display());
    if let Ok(_output) = Command::new(exe).output() {
        info!("Found {}", exe.display());
        Ok(())
    } else {
        Err(Error::utility_not_executable(exe.display().to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_reported() {
        let err = check_dnashape(Path::new("/definitely/not/here/DNAshape")).unwrap_err();
        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::UtilityNotExecutable { .. }));
    }
}
