pub mod check;
pub mod compile;
pub mod grammar_loader;
