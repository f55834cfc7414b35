mod flank;
mod naming;
mod pipeline;
mod shape_info;
mod task_info;

pub use flank::Flank;

pub use naming::raw_archive_file;
pub use naming::with_suffix;
pub use naming::MotifKey;
pub use naming::PoolContext;

pub use pipeline::DataDirs;
pub use pipeline::PipelineConfig;
pub use pipeline::ShapeScheme;

pub use shape_info::decode_levels_str;
pub use shape_info::encode_levels;
pub use shape_info::ShapeInfo;
pub use shape_info::UNDEFINED_SYMBOL;

pub use task_info::validate_identifier;
pub use task_info::TaskInfo;
