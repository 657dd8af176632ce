//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("pegloom")
        .about("Compile PEG combinator trees into standalone Rust parsers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(compile_command())
        .subcommand(check_command())
}

/// Generate a parser from a grammar.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Generate the Rust source of a parser")
        .override_usage(
            "\
  pegloom compile <GRAMMAR> [-o FILE]
  pegloom compile -g <JSON>",
        )
        .after_help(
            r#"EXAMPLES:
  pegloom compile calc.json -o src/calc_parser.rs
  pegloom compile calc.json --header "Calculator grammar"
  cat calc.json | pegloom compile -"#,
        )
        .arg(grammar_path_arg())
        .arg(grammar_text_arg())
        .arg(output_arg())
        .arg(header_arg())
        .arg(max_nested_blocks_arg())
}

/// Validate a grammar without writing anything.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a grammar")
        .override_usage(
            "\
  pegloom check <GRAMMAR>
  pegloom check -g <JSON>",
        )
        .arg(grammar_path_arg())
        .arg(grammar_text_arg())
}
