use crate::runtime;

///////////////////////////////
/// Process-level options; pipeline configuration lives in core::PipelineConfig
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: runtime::LogLevel,
    pub log_mode: runtime::LogMode,
    pub log_path: std::path::PathBuf,
}

impl Config {
    pub fn setup_logger(&self) -> anyhow::Result<()> {
        runtime::setup_global_logger(self.log_level, self.log_mode, self.log_path.clone())
    }
}
