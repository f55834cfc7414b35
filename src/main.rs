use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shapemer::cmd::Commands;
use shapemer::runtime;

pub const DEFAULT_LOG_PATH: &str = "shapemer.log";

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    // trace, debug, info, warn, error or off
    #[arg(long = "log-level", global = true, default_value = "info")]
    log_level: runtime::LogLevel,

    // terminal, path or discard
    #[arg(long = "log-mode", global = true, default_value = "terminal")]
    log_mode: runtime::LogMode,

    // Log file when logging to a path
    #[arg(long = "log-path", global = true, value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_LOG_PATH)]
    log_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let mut cli = Cli::parse();

    let config = runtime::Config {
        log_level: cli.log_level,
        log_mode: cli.log_mode,
        log_path: cli.log_path.clone(),
    };
    if let Err(e) = config.setup_logger() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    log::debug!("Running {:?}", cli.command);

    if let Err(e) = cli.command.try_execute() {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
