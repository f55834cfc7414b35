use std::fs::OpenOptions;
use std::path::PathBuf;

use crate::utils::expand_and_resolve_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevel(pub log::LevelFilter);
impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" | "warning" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" | "none" => log::LevelFilter::Off,
            _ => return Err(format!("Invalid log level: {}", s)),
        };
        Ok(LogLevel(level))
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogMode {
    Path,
    Terminal,
    Discard,
}
impl std::str::FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_lowercase().as_str() {
            "path" | "file" => LogMode::Path,
            "terminal" | "term" | "cli" => LogMode::Terminal,
            "discard" | "none" => LogMode::Discard,
            _ => return Err(format!("Invalid log mode: {}", s)),
        };
        Ok(mode)
    }
}

///////////////////////////////
/// Logger for the given level and mode. RUST_LOG, if set, refines the level, except when
/// discarding
fn logger_builder(
    log_level: LogLevel,
    log_output: LogMode,
    log_path: PathBuf,
) -> anyhow::Result<env_logger::Builder> {
    let mut builder = env_logger::Builder::new();

    match log_output {
        LogMode::Discard => {
            builder.filter_level(log::LevelFilter::Off);
            builder.target(env_logger::Target::Pipe(Box::new(std::io::sink())));
        }

        LogMode::Terminal => {
            builder.filter_level(log_level.into());
            builder.parse_default_env();
            builder.target(env_logger::Target::Stderr);
        }

        LogMode::Path => {
            builder.filter_level(log_level.into());
            builder.parse_default_env();
            let path = expand_and_resolve_path(log_path)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;

            // Same format as the terminal, no colors
            builder.write_style(env_logger::WriteStyle::Never);
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    };
    Ok(builder)
}

///////////////////////////////
/// Install the process-wide logger
pub fn setup_global_logger(
    log_level: LogLevel,
    log_output: LogMode,
    log_path: PathBuf,
) -> anyhow::Result<()> {
    logger_builder(log_level, log_output, log_path)?.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels_and_modes() {
        assert_eq!(
            "Warning".parse::<LogLevel>().unwrap(),
            LogLevel(log::LevelFilter::Warn)
        );
        assert_eq!("file".parse::<LogMode>().unwrap(), LogMode::Path);
        assert!("loud".parse::<LogLevel>().is_err());
        assert!("printer".parse::<LogMode>().is_err());
    }

    #[test]
    fn discard_ignores_module_directives() {
        std::env::set_var("RUST_LOG", "shapemer=debug");
        let logger = logger_builder(
            LogLevel(log::LevelFilter::Info),
            LogMode::Discard,
            PathBuf::from("unused.log"),
        )
        .unwrap()
        .build();
        assert_eq!(logger.filter(), log::LevelFilter::Off);
    }
}
