//! Semantic analysis of a grammar before code generation.
//!
//! - `validation` - rule names, binders, start rule, regex patterns, references
//! - `refs` - local vs. rule reference resolution and free variables
//! - `delegates` - error delegates for choices ending in explicit failures

pub mod delegates;
pub mod refs;
pub mod validation;


use std::collections::HashMap;

use indexmap::IndexMap;
use pegloom_core::{Expr, Grammar, ProgramId, Rule};

pub use refs::{Binding, Resolution};

/// Everything the compiler needs to know about a grammar besides its tree.
#[derive(Debug)]
pub struct Analysis<'g> {
    rules: IndexMap<&'g str, &'g Rule>,
    pub resolution: Resolution,
    /// Keyed by the id of the last `Fail` alternative of a choice.
    pub delegates: HashMap<ProgramId, Vec<&'g Expr>>,
}

/// Number rules and expressions in pre-order, starting at 1. A class rule
/// takes a second id for its record sub-parse.
pub fn assign_ids(grammar: &mut Grammar) {
    let mut next: ProgramId = 1;
    for rule in grammar.rules_mut() {
        rule.id = next;
        next += 1;
        if rule.is_class() {
            rule.extra_id = next;
            next += 1;
        }
        for expr in rule.exprs_mut() {
            expr.walk_mut(&mut |e| {
                e.id = next;
                next += 1;
            });
        }
    }
}

impl<'g> Analysis<'g> {
    /// Analyze a grammar whose ids are assigned and whose rules are all named.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            rules: grammar.rule_index(),
            resolution: refs::resolve(grammar),
            delegates: delegates::error_delegates(grammar),
        }
    }

    pub fn rule(&self, name: &str) -> Option<&'g Rule> {
        self.rules.get(name).copied()
    }

    pub fn is_local(&self, id: ProgramId) -> bool {
        self.resolution.binding(id) == Some(Binding::Local)
    }

    pub fn free_vars(&self, id: ProgramId) -> &[String] {
        self.resolution.free_vars(id)
    }
}
