use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use pegloom_compiler::{Config, generate_source_code};

use super::grammar_loader::load_grammar;

pub struct CompileArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub output: Option<PathBuf>,
    pub header: Option<String>,
    pub max_nested_blocks: usize,
}

pub fn run(args: CompileArgs) {
    let grammar = match load_grammar(args.grammar_path.as_deref(), args.grammar_text.as_deref()) {
        Ok(grammar) => grammar,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let mut config = Config::new().max_nested_blocks(args.max_nested_blocks);
    if let Some(header) = args.header {
        config = config.header(header);
    }

    let source = match generate_source_code(&config, grammar) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let written = match &args.output {
        Some(path) => {
            log::info!("writing parser to {}", path.display());
            fs::write(path, &source)
                .map_err(|e| format!("failed to write '{}': {}", path.display(), e))
        }
        None => io::stdout()
            .write_all(source.as_bytes())
            .map_err(|e| format!("failed to write stdout: {}", e)),
    };

    if let Err(msg) = written {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    }
}
