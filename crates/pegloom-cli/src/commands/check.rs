use std::path::PathBuf;

use pegloom_compiler::{Config, generate_source_code};

use super::grammar_loader::load_grammar;

pub struct CheckArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
}

/// Runs every compiler pass and discards the output. Silent on success.
pub fn run(args: CheckArgs) {
    let grammar = match load_grammar(args.grammar_path.as_deref(), args.grammar_text.as_deref()) {
        Ok(grammar) => grammar,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    if let Err(e) = generate_source_code(&Config::default(), grammar) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
