//! Runtime support copied into every generated parser.
//!
//! The template is plain Rust that depends only on `std`. It is emitted as
//! the body of a `pub mod runtime` in the output, and compiled here under
//! test so its behavior is checked without generating a parser.

/// Source of the generated `runtime` module.
pub const TEMPLATE: &str = include_str!("template.rs");

/// Names the generated file re-exports from its `runtime` module.
pub const EXPORTS: &[&str] = &[
    "Node",
    "ParseError",
    "PartialParseError",
    "Position",
    "PositionInfo",
    "SourceError",
    "Value",
    "transform",
    "visit",
];

#[cfg(test)]
#[allow(dead_code)]
#[path = "template.rs"]
mod template;
