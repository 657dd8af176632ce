mod args;
mod commands;
mod dispatch;


pub use commands::build_cli;
pub use dispatch::{CheckParams, CompileParams, log_filter};
