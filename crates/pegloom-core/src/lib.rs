#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for pegloom grammars.
//!
//! - `grammar`: the combinator tree (expressions, rules, grammars)
//! - `utils`: identifier rules shared by the compiler and the CLI

pub mod grammar;
pub mod utils;


pub use grammar::{
    Assoc, Expr, ExprKind, Field, Grammar, Item, LoadError, OperatorTier, Precedence, ProgramId,
    Rule, RuleBody, SepList, TierSpec,
};
