//! pegloom compiler: turns a combinator tree into a standalone Rust parser.
//!
//! The pipeline:
//! - `analyze` - validation, reference resolution, free variables, error delegates
//! - `compile` - code generation for each combinator
//! - `emit` - indentation-aware source writer with a nested-block budget
//! - `runtime` - trampoline, memo table and error types embedded in the output
//! - `driver` - wires the passes together
//!
//! ```
//! use pegloom_compiler::{Config, generate_source_code};
//! use pegloom_core::{Expr, Grammar, Rule};
//!
//! let grammar = Grammar::new(vec![Rule::new("Digits", Expr::regex("[0-9]+")).into()]);
//! let source = generate_source_code(&Config::default(), grammar).unwrap();
//! assert!(source.contains("pub fn parse("));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod compile;
mod driver;
pub mod emit;
pub mod runtime;

#[cfg(test)]
mod driver_tests;

use std::path::PathBuf;

pub use driver::generate_source_code;

/// Default ceiling on nested code blocks per generated function.
pub const DEFAULT_MAX_NESTED_BLOCKS: usize = 12;

/// Errors raised while building a parser from a grammar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expected one or more grammar rules")]
    NoRules,

    #[error("each grammar rule must have a unique name; found two or more rules named `{0}`")]
    DuplicateRule(String),

    #[error("grammar rule names must start with a letter; found `{0}`")]
    ReservedRuleName(String),

    #[error("`{0}` cannot be used as a {1} name")]
    InvalidName(String, &'static str),

    #[error("the start rule `{0}` may not have the \"ignored\" modifier")]
    IgnoredStartRule(String),

    #[error("the start rule `{0}` may not take parameters")]
    ParameterizedStartRule(String),

    #[error("reference to undefined rule `{name}` in rule `{rule}`")]
    UndefinedReference { rule: String, name: String },

    #[error("rule `{func}` expects {expected} arguments, called with {found}")]
    ArityMismatch {
        func: String,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    InvalidCall(String),

    #[error("invalid regular expression /{pattern}/: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Compiler options.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nested blocks allowed in one generated function before a
    /// sub-expression is moved into a function of its own.
    pub max_nested_blocks: usize,
    /// Text emitted as a comment at the top of the generated file.
    pub header: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nested_blocks: DEFAULT_MAX_NESTED_BLOCKS,
            header: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_nested_blocks(mut self, max: usize) -> Self {
        self.max_nested_blocks = max;
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Generate a parser into `$OUT_DIR/{file_name}`, for use from build scripts.
///
/// Returns the path of the written file, ready for `include!`.
pub fn write_to_out_dir(
    file_name: &str,
    config: &Config,
    grammar: pegloom_core::Grammar,
) -> Result<PathBuf> {
    let out_dir = std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?;
    let path = PathBuf::from(out_dir).join(file_name);
    let source = generate_source_code(config, grammar)?;
    std::fs::write(&path, source)?;
    Ok(path)
}
