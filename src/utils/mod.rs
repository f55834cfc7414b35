mod command_to_string;
mod detect_software;
mod dna;
mod expand_and_resolve_path;

pub use command_to_string::command_to_string;
pub use detect_software::check_dnashape;
pub use expand_and_resolve_path::expand_and_resolve_path;

pub use dna::mismatches;
pub use dna::normalize_read;
pub use dna::revcomp;
