mod fastq;
mod lines;
mod rows;
mod staged;
mod tables;

pub use fastq::open_fastq;

pub use lines::count_lines;
pub use lines::open_text;
pub use lines::read_counts;
pub use lines::read_lines;

pub use rows::read_tsv_rows;
pub use rows::stage_tsv_rows;
pub use rows::write_tsv_rows;
pub use rows::BgContextRow;
pub use rows::CoverageRow;
pub use rows::FgContextRow;
pub use rows::PartsRow;
pub use rows::SeqmerRow;
pub use rows::Strand;

pub use staged::commit_all;
pub use staged::StagedFile;

pub use tables::read_factor_table;
pub use tables::read_factor_table_from;
pub use tables::read_levels_table;
pub use tables::read_levels_table_from;
