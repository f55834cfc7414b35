pub mod cmd;
pub mod command;
pub mod core;
pub mod fileformat;
pub mod graph;
pub mod runtime;
pub mod utils;
