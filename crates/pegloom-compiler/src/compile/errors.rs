//! Error functions for expressions that can fail on their own.

use std::collections::HashSet;

use pegloom_core::{Expr, ExprKind, ProgramId, Rule};

use super::compiler::{Compiler, error_fn_name};
use crate::analyze::delegates;

/// What the generated parser says when `expr` fails, if `expr` reports
/// failures of its own.
pub fn complaint(expr: &Expr) -> Option<String> {
    let text = match &expr.kind {
        ExprKind::Str { value, .. } if !value.is_empty() => {
            format!("Expected to match the string {value:?}")
        }
        ExprKind::Regex { pattern, .. } => {
            format!("Expected to match the regular expression /{pattern}/")
        }
        ExprKind::ExpectNot(inner) => format!("Did not expect to match: {inner}"),
        ExprKind::Fail(message) => message.clone().unwrap_or_else(|| "Failed".to_string()),
        ExprKind::Where { predicate, .. } => {
            format!("Expected to satisfy the predicate: {predicate}")
        }
        ExprKind::Choice(_) => "Unexpected input".to_string(),
        _ => return None,
    };
    Some(text)
}

impl Compiler<'_, '_> {
    /// Emit the error functions of `rule`, skipping ids already in `emitted`.
    pub fn compile_error_functions(&mut self, rule: &Rule, emitted: &mut HashSet<ProgramId>) {
        for expr in rule.exprs() {
            expr.walk(&mut |e| self.compile_error_function(rule.name(), e, emitted));
        }
    }

    fn compile_error_function(&mut self, rule: &str, expr: &Expr, emitted: &mut HashSet<ProgramId>) {
        let Some(complaint) = complaint(expr) else {
            return;
        };
        if expr.always_succeeds() || !emitted.insert(expr.id) {
            return;
        }

        // A trailing `Fail` of a choice names the alternatives it stands for.
        let shown = match self.analysis.delegates.get(&expr.id) {
            Some(delegate) => delegates::render(delegate),
            None => expr.to_string(),
        };
        let details =
            format!("Failed to parse the '{rule}' rule, at the expression:\n    {shown}\n\n{complaint}");

        self.emit.open_function(
            &error_fn_name(expr.id),
            "text: &str, pos: usize",
            "runtime::ParseError",
        );
        self.emit
            .line(&format!("runtime::ParseError::new(text, pos, {details:?})"));
        self.emit.close_function();
    }
}
