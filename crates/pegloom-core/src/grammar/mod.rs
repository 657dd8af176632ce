//! Combinator tree for PEG grammars.
//!
//! This module provides the expression node set consumed by the compiler,
//! with constructors for building trees in code and JSON deserialization.

mod builder;
mod display;
mod json;
mod types;
mod visit;


pub use json::LoadError;
pub use types::{
    Assoc, Expr, ExprKind, Field, Grammar, Item, OperatorTier, Precedence, ProgramId, Rule,
    RuleBody, SepList, TierSpec,
};
