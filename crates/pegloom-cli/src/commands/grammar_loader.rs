use std::fs;
use std::io::{self, Read};
use std::path::Path;

use pegloom_core::Grammar;

pub fn load_grammar(
    grammar_path: Option<&Path>,
    grammar_text: Option<&str>,
) -> Result<Grammar, String> {
    let json = load_grammar_source(grammar_path, grammar_text)?;
    if json.trim().is_empty() {
        return Err("grammar cannot be empty".to_string());
    }
    Grammar::from_json(&json).map_err(|e| e.to_string())
}

fn load_grammar_source(
    grammar_path: Option<&Path>,
    grammar_text: Option<&str>,
) -> Result<String, String> {
    if let Some(text) = grammar_text {
        return Ok(text.to_string());
    }

    if let Some(path) = grammar_path {
        if path.as_os_str() == "-" {
            return load_stdin();
        }
        return fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e));
    }

    Err("grammar is required: use positional argument or -g/--grammar".to_string())
}

fn load_stdin() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(buf)
}
