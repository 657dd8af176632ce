//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::check::CheckArgs;
use crate::commands::compile::CompileArgs;

pub struct CompileParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub output: Option<PathBuf>,
    pub header: Option<String>,
    pub max_nested_blocks: usize,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned(),
            grammar_text: m.get_one::<String>("grammar_text").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            header: m.get_one::<String>("header").cloned(),
            max_nested_blocks: m
                .get_one::<usize>("max_nested_blocks")
                .copied()
                .unwrap_or(pegloom_compiler::DEFAULT_MAX_NESTED_BLOCKS),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            output: p.output,
            header: p.header,
            max_nested_blocks: p.max_nested_blocks,
        }
    }
}

pub struct CheckParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned(),
            grammar_text: m.get_one::<String>("grammar_text").cloned(),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
        }
    }
}

/// Log filter for the `-v` count; `RUST_LOG` overrides it.
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
