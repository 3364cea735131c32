//! Library side of the `bars` command: configuration, logging and the
//! scoring pipeline. The binary adds argument parsing and terminal output.

pub mod config;
pub mod logging;
pub mod pipeline;
