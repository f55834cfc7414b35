// Stage helpers (in pipeline order)
pub mod preprocess;
pub mod seqmer_table;
pub mod discretize;
pub mod partition;
pub mod fg_parts;
pub mod shapemers;
pub mod count_shapemers;
pub mod coverage;

pub use preprocess::{Preprocess, PreprocessParams, PreprocessStats};
pub use seqmer_table::{load_seqmer_table, SeqmerTable, SeqmerTableParams};
pub use discretize::{Discretize, DiscretizeParams};
pub use partition::{best_motif_hit, Partition, PartitionParams, PartitionStats};
pub use fg_parts::{flanked_region, FgParts, FgPartsParams};
pub use shapemers::{BgShapemerParams, BgShapemers, FgShapemerParams, FgShapemers};
pub use count_shapemers::{count_words, CountShapemers, CountShapemersParams};
pub use coverage::{Coverage, CoverageParams};
