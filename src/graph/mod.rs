mod builder;
mod dag;
mod executor;
mod task;

pub use builder::TaskGraphBuilder;

pub use dag::TaskGraph;

pub use executor::clean;
pub use executor::ExecOptions;
pub use executor::Executor;
pub use executor::RunSummary;
pub use executor::TaskOutcome;

pub use task::Action;
pub use task::Stage;
pub use task::StageCall;
pub use task::TaskDescriptor;
