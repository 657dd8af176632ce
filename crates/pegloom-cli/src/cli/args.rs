//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file in JSON form, or `-` for stdin (positional).
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .help("Grammar file (JSON), or - for stdin")
}

/// Inline grammar JSON (-g/--grammar).
pub fn grammar_text_arg() -> Arg {
    Arg::new("grammar_text")
        .short('g')
        .long("grammar")
        .value_name("JSON")
        .conflicts_with("grammar_path")
        .help("Inline grammar JSON")
}

/// Output file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the parser to FILE instead of stdout")
}

/// Header comment for the generated file (--header).
pub fn header_arg() -> Arg {
    Arg::new("header")
        .long("header")
        .value_name("TEXT")
        .help("Text emitted as a comment at the top of the parser")
}

/// Nesting budget per generated function (--max-nested-blocks).
pub fn max_nested_blocks_arg() -> Arg {
    Arg::new("max_nested_blocks")
        .long("max-nested-blocks")
        .value_name("N")
        .default_value("12")
        .value_parser(value_parser!(usize))
        .help("Nested blocks per generated function before code is split out")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log compiler phases (-v), or every generated function (-vv)")
}
