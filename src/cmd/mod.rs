use clap::Subcommand;

pub mod clean_cmd;
pub mod list_cmd;
pub mod pipeline_args;
pub mod run_cmd;

pub use clean_cmd::CleanCMD;
pub use list_cmd::ListCMD;
pub use pipeline_args::PipelineArgs;
pub use run_cmd::RunCMD;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Run the selected tasks and everything they depend on
    Run(RunCMD),
    /// List tasks, their files, or the pipeline stages
    List(ListCMD),
    /// Remove outputs of the selected tasks
    Clean(CleanCMD),
}

impl Commands {
    pub fn try_execute(&mut self) -> anyhow::Result<()> {
        match self {
            Commands::Run(cmd) => cmd.try_execute(),
            Commands::List(cmd) => cmd.try_execute(),
            Commands::Clean(cmd) => cmd.try_execute(),
        }
    }
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Commands::Run(_) => write!(f, "run"),
            Commands::List(_) => write!(f, "list"),
            Commands::Clean(_) => write!(f, "clean"),
        }
    }
}
