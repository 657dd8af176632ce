//! Error delegates.
//!
//! A choice such as `A | B | Fail("expected a term")` reports its last
//! failure through the `Fail` leaf. The message of that leaf quotes the
//! substantive alternatives (`A | B`) instead of `Fail(..)` itself.

use std::collections::HashMap;

use pegloom_core::{Expr, ExprKind, Grammar, ProgramId};

/// Map the id of the last `Fail` alternative of each mixed choice to the
/// choice's other alternatives.
pub fn error_delegates(grammar: &Grammar) -> HashMap<ProgramId, Vec<&Expr>> {
    let mut delegates = HashMap::new();
    grammar.walk(&mut |expr| {
        let ExprKind::Choice(alternatives) = &expr.kind else {
            return;
        };
        let (fails, real): (Vec<&Expr>, Vec<&Expr>) = alternatives
            .iter()
            .partition(|alt| matches!(alt.kind, ExprKind::Fail(_)));
        if let Some(last) = fails.last()
            && !real.is_empty()
        {
            delegates.insert(last.id, real);
        }
    });
    delegates
}

/// Render a delegate the way the choice of those alternatives renders.
pub fn render(delegate: &[&Expr]) -> String {
    delegate
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}
